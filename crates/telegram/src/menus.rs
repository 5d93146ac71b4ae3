use primavent_core::{Catalog, Category};

use crate::callbacks::{BackTarget, CallbackAction};

/// Labels of the persistent reply keyboard plus the checkout trigger. Text
/// messages are matched against these exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuLabel {
    Home,
    Catalog,
    About,
    Contacts,
    Services,
    Reviews,
    News,
    Help,
    Cart,
    Checkout,
}

impl MenuLabel {
    pub const ALL: [MenuLabel; 10] = [
        Self::Home,
        Self::Catalog,
        Self::About,
        Self::Contacts,
        Self::Services,
        Self::Reviews,
        Self::News,
        Self::Help,
        Self::Cart,
        Self::Checkout,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Self::Home => "🏠 Головна",
            Self::Catalog => "🛒 Каталог",
            Self::About => "📝 Про нас",
            Self::Contacts => "📞 Контакти",
            Self::Services => "🛠 Послуги",
            Self::Reviews => "💬 Відгуки",
            Self::News => "📰 Новини",
            Self::Help => "❓ Допомога",
            Self::Cart => "📦 Кошик",
            Self::Checkout => "🛍 Оформити замовлення",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|label| label.text() == text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
}

impl ReplyKeyboard {
    pub fn from_labels(rows: &[&[MenuLabel]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|label| label.text().to_owned()).collect())
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub action: CallbackAction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn buttons(&self) -> impl Iterator<Item = &InlineButton> {
        self.rows.iter().flatten()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Menu {
    Reply(ReplyKeyboard),
    Inline(InlineKeyboard),
}

/// Lays buttons out left to right, starting a new row every `row_width`
/// buttons.
pub struct InlineKeyboardBuilder {
    row_width: usize,
    rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboardBuilder {
    pub fn new(row_width: usize) -> Self {
        Self { row_width: row_width.max(1), rows: Vec::new() }
    }

    pub fn button(mut self, label: impl Into<String>, action: CallbackAction) -> Self {
        let button = InlineButton { label: label.into(), action };
        match self.rows.last_mut() {
            Some(row) if row.len() < self.row_width => row.push(button),
            _ => self.rows.push(vec![button]),
        }
        self
    }

    pub fn build(self) -> InlineKeyboard {
        InlineKeyboard { rows: self.rows }
    }
}

const BACK_LABEL: &str = "🔙 Назад";

pub fn main_menu() -> Menu {
    use MenuLabel::{About, Cart, Catalog, Contacts, Help, Home, News, Reviews, Services};

    Menu::Reply(ReplyKeyboard::from_labels(&[
        &[Home, Catalog],
        &[About, Contacts],
        &[Services, Reviews],
        &[News, Help],
        &[Cart],
    ]))
}

pub fn cart_menu() -> Menu {
    Menu::Reply(ReplyKeyboard::from_labels(&[&[MenuLabel::Checkout], &[MenuLabel::Home]]))
}

pub fn catalog_menu(catalog: &Catalog) -> Menu {
    let builder = catalog.list_categories().iter().fold(
        InlineKeyboardBuilder::new(2),
        |builder, category| {
            builder.button(category.label.clone(), CallbackAction::Category(category.key.clone()))
        },
    );

    Menu::Inline(builder.button(BACK_LABEL, CallbackAction::Back(BackTarget::Main)).build())
}

pub fn product_menu(category: &Category) -> Menu {
    let builder =
        category.products.iter().fold(InlineKeyboardBuilder::new(1), |builder, product| {
            builder.button(
                format!("{} — {}", product.name, product.price),
                CallbackAction::AddProduct(product.id.clone()),
            )
        });

    Menu::Inline(builder.button(BACK_LABEL, CallbackAction::Back(BackTarget::Catalog)).build())
}

pub fn confirmation_menu() -> Menu {
    Menu::Inline(
        InlineKeyboardBuilder::new(2)
            .button("Підтвердити", CallbackAction::Confirm)
            .button("Скасувати", CallbackAction::Cancel)
            .build(),
    )
}

use primavent_core::{CartEntry, Catalog, DomainError, Product, UserId};

use crate::events::OutboundAction;
use crate::menus::{self, Menu, MenuLabel};

/// Message body with an optional keyboard, not yet addressed to anyone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub body: String,
    pub menu: Option<Menu>,
}

impl Reply {
    pub fn text(body: impl Into<String>) -> Self {
        Self { body: body.into(), menu: None }
    }

    pub fn with_menu(body: impl Into<String>, menu: Menu) -> Self {
        Self { body: body.into(), menu: Some(menu) }
    }

    pub fn to(self, user_id: UserId) -> OutboundAction {
        OutboundAction::SendText { user_id, body: self.body, menu: self.menu }
    }
}

pub fn welcome() -> Reply {
    Reply::with_menu("Вітаємо в компанії «Пріма Вент»! Оберіть розділ:", menus::main_menu())
}

pub fn home() -> Reply {
    Reply::with_menu("Вітаємо! Оберіть розділ:", menus::main_menu())
}

pub fn catalog_prompt(catalog: &Catalog) -> Reply {
    Reply::with_menu("Оберіть категорію товарів:", menus::catalog_menu(catalog))
}

pub fn product_list(catalog: &Catalog, category_key: &str) -> Reply {
    match catalog.category(category_key) {
        Some(category) if !category.products.is_empty() => {
            Reply::with_menu("Оберіть товар:", menus::product_menu(category))
        }
        _ => not_found(&DomainError::UnknownCategory(category_key.to_owned()), catalog),
    }
}

fn not_found(error: &DomainError, catalog: &Catalog) -> Reply {
    Reply::with_menu(error.user_message().unwrap_or_default(), menus::catalog_menu(catalog))
}

pub fn info_page(label: MenuLabel) -> Option<Reply> {
    let body = match label {
        MenuLabel::About => {
            "📝 «Пріма Вент» — продаж, монтаж і сервіс кліматичного обладнання: кондиціонери, вентиляція, опалення та зволоження повітря."
        }
        MenuLabel::Contacts => {
            "📞 Залиште свій телефон або email під час оформлення замовлення, і наш менеджер зв'яжеться з вами."
        }
        MenuLabel::Services => {
            "🛠 Підбір обладнання, монтаж, сервісне обслуговування та ремонт кліматичної техніки."
        }
        MenuLabel::Reviews => "💬 Відгуки наших клієнтів незабаром з'являться тут.",
        MenuLabel::News => "📰 Поки що новин немає. Слідкуйте за оновленнями!",
        MenuLabel::Help => {
            "❓ Оберіть «🛒 Каталог», щоб переглянути товари, додайте потрібні до кошика, а потім відкрийте «📦 Кошик», щоб оформити замовлення."
        }
        MenuLabel::Home | MenuLabel::Catalog | MenuLabel::Cart | MenuLabel::Checkout => {
            return None
        }
    };
    Some(Reply::text(body))
}

fn cart_lines(entries: &[CartEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("- {} ({})", entry.product.name, entry.product.price))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn cart_summary(entries: &[CartEntry]) -> Reply {
    if entries.is_empty() {
        return Reply::text(DomainError::EmptyCart.user_message().unwrap_or_default());
    }

    Reply::with_menu(
        format!(
            "🛒 Ваш кошик:\n{}\n\nДля оформлення замовлення натисніть «{}».",
            cart_lines(entries),
            MenuLabel::Checkout.text()
        ),
        menus::cart_menu(),
    )
}

pub fn cart_empty() -> Reply {
    Reply::text(DomainError::EmptyCart.user_message().unwrap_or_default())
}

pub fn checkout_prompt(entries: &[CartEntry]) -> Reply {
    Reply::text(format!(
        "Підтвердіть ваше замовлення:\n{}\n\nВведіть ваші контактні дані (телефон або email) для зв'язку:",
        cart_lines(entries)
    ))
}

pub fn confirmation_prompt() -> Reply {
    Reply::with_menu(
        "Підтвердіть замовлення. Натисніть «Підтвердити» для завершення замовлення.",
        menus::confirmation_menu(),
    )
}

pub fn order_confirmed(contact_info: &str) -> Reply {
    Reply::with_menu(
        format!("Ваше замовлення підтверджено! Контакт: {contact_info}. Дякуємо за покупку!"),
        menus::main_menu(),
    )
}

pub fn order_cancelled() -> Reply {
    Reply::with_menu(
        "Замовлення скасовано. Товари залишилися у вашому кошику.",
        menus::main_menu(),
    )
}

pub fn unrecognized() -> Reply {
    Reply::with_menu(
        "Не вдалося розпізнати запит. Скористайтеся меню нижче:",
        menus::main_menu(),
    )
}

pub fn added_to_cart(product: &Product) -> String {
    format!("«{}» додано до кошика.", product.name)
}

pub fn product_not_found(product_id: &str) -> String {
    DomainError::UnknownProduct(product_id.to_owned()).user_message().unwrap_or_default().to_owned()
}

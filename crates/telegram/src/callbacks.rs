use primavent_core::ProductId;

const CATEGORY_PREFIX: &str = "category_";
const ADD_PREFIX: &str = "add_";
const CONFIRM_ORDER: &str = "confirm_order";
const CANCEL_ORDER: &str = "cancel_order";
const BACK_TO_MAIN: &str = "back_to_main";
const BACK_TO_CATALOG: &str = "back_to_catalog";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackTarget {
    Main,
    Catalog,
}

/// Button payload decoded once at the router boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    Category(String),
    AddProduct(ProductId),
    Confirm,
    Cancel,
    Back(BackTarget),
}

impl CallbackAction {
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        match token {
            CONFIRM_ORDER => return Some(Self::Confirm),
            CANCEL_ORDER => return Some(Self::Cancel),
            BACK_TO_MAIN => return Some(Self::Back(BackTarget::Main)),
            BACK_TO_CATALOG => return Some(Self::Back(BackTarget::Catalog)),
            _ => {}
        }

        if let Some(key) = token.strip_prefix(CATEGORY_PREFIX).filter(|key| !key.is_empty()) {
            return Some(Self::Category(key.to_owned()));
        }
        if let Some(id) = token.strip_prefix(ADD_PREFIX).filter(|id| !id.is_empty()) {
            return Some(Self::AddProduct(ProductId::from(id)));
        }

        None
    }

    pub fn token(&self) -> String {
        match self {
            Self::Category(key) => format!("{CATEGORY_PREFIX}{key}"),
            Self::AddProduct(id) => format!("{ADD_PREFIX}{id}"),
            Self::Confirm => CONFIRM_ORDER.to_owned(),
            Self::Cancel => CANCEL_ORDER.to_owned(),
            Self::Back(BackTarget::Main) => BACK_TO_MAIN.to_owned(),
            Self::Back(BackTarget::Catalog) => BACK_TO_CATALOG.to_owned(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Category(_) => "category",
            Self::AddProduct(_) => "add_product",
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Back(_) => "back",
        }
    }
}

#[cfg(test)]
mod tests {
    use primavent_core::ProductId;

    use super::{BackTarget, CallbackAction};

    #[test]
    fn decodes_tokens_emitted_by_existing_keyboards() {
        assert_eq!(
            CallbackAction::parse("category_air_conditioners"),
            Some(CallbackAction::Category("air_conditioners".to_owned()))
        );
        assert_eq!(
            CallbackAction::parse("add_daikin_ftxb20c"),
            Some(CallbackAction::AddProduct(ProductId::from("daikin_ftxb20c")))
        );
        assert_eq!(CallbackAction::parse("confirm_order"), Some(CallbackAction::Confirm));
        assert_eq!(CallbackAction::parse("cancel_order"), Some(CallbackAction::Cancel));
        assert_eq!(
            CallbackAction::parse("back_to_catalog"),
            Some(CallbackAction::Back(BackTarget::Catalog))
        );
    }

    #[test]
    fn exact_tokens_win_over_prefixes() {
        assert_eq!(
            CallbackAction::parse("back_to_main"),
            Some(CallbackAction::Back(BackTarget::Main))
        );
    }

    #[test]
    fn unknown_or_empty_tokens_are_rejected() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("add_"), None);
        assert_eq!(CallbackAction::parse("category_"), None);
        assert_eq!(CallbackAction::parse("back_to_nowhere"), None);
        assert_eq!(CallbackAction::parse("delete_everything"), None);
    }

    #[test]
    fn token_is_inverse_of_parse() {
        let actions = [
            CallbackAction::Category("ventilation".to_owned()),
            CallbackAction::AddProduct(ProductId::from("vents_vut300")),
            CallbackAction::Confirm,
            CallbackAction::Cancel,
            CallbackAction::Back(BackTarget::Main),
            CallbackAction::Back(BackTarget::Catalog),
        ];

        for action in actions {
            assert_eq!(CallbackAction::parse(&action.token()), Some(action));
        }
    }
}

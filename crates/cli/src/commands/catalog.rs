use std::path::Path;

use primavent_core::Catalog;
use serde::Serialize;

use crate::commands::{to_json, CommandResult, EXIT_CATALOG};

#[derive(Debug, Serialize)]
struct CatalogDump<'a> {
    source: String,
    categories: &'a [primavent_core::Category],
}

pub fn run(path: Option<&Path>) -> CommandResult {
    let (catalog, source) = match path {
        Some(path) => match Catalog::load(path) {
            Ok(catalog) => (catalog, path.display().to_string()),
            Err(error) => {
                return CommandResult::failure(
                    "catalog",
                    "catalog_load",
                    error.to_string(),
                    EXIT_CATALOG,
                )
            }
        },
        None => (Catalog::builtin(), "builtin".to_string()),
    };

    let dump = CatalogDump { source, categories: catalog.list_categories() };
    CommandResult { exit_code: 0, output: to_json("catalog", &dump, true) }
}

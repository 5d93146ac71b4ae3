use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::{Product, ProductId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Category {
    pub fn new(key: impl Into<String>, label: impl Into<String>, products: Vec<Product>) -> Self {
        Self { key: key.into(), label: label.into(), products }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}

/// Read-only product catalog. Category order is menu display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    categories: Vec<Category>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        validate(&categories)?;
        Ok(Self { categories })
    }

    /// The shop's stock assortment, used when no catalog file is configured.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                Category::new(
                    "air_conditioners",
                    "Кондиціонери ❄️",
                    vec![
                        Product::new(
                            "general_eco",
                            "Кондиціонер General ECO RANGE ASHG09KPCA/AOHG09KPCA",
                            "25 000 грн",
                        ),
                        Product::new(
                            "lg_pc09sq",
                            "Кондиціонер LG Standard Plus PC09SQ",
                            "15 000 грн",
                        ),
                        Product::new(
                            "daikin_ftxb20c",
                            "Кондиціонер Daikin FTXB20C/RXB20C",
                            "18 500 грн",
                        ),
                    ],
                ),
                Category::new(
                    "ventilation",
                    "Вентиляція 💨",
                    vec![
                        Product::new("vents_vut300", "ВЕНТС ВУТ 300-1 ВГ ЕС", "63 000 грн"),
                        Product::new("vents_vut2000", "ВЕНТС ВУТ 2000 Г", "87 500 грн"),
                    ],
                ),
                Category::new("heating", "Опалення 🔥", Vec::new()),
                Category::new("humidifiers", "Зволожувачі 💧", Vec::new()),
            ],
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file = toml::from_str::<CatalogFile>(raw)?;
        Self::new(file.categories)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn list_categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, key: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.key == key)
    }

    /// Products of a category; empty when the key is unknown.
    pub fn products(&self, category_key: &str) -> &[Product] {
        self.category(category_key).map(|category| category.products.as_slice()).unwrap_or(&[])
    }

    pub fn find_product(&self, product_id: &ProductId) -> Option<&Product> {
        self.categories
            .iter()
            .flat_map(|category| category.products.iter())
            .find(|product| &product.id == product_id)
    }

    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|category| category.products.len()).sum()
    }
}

/// Telegram rejects inline buttons whose `callback_data` exceeds this many bytes.
pub const MAX_CALLBACK_DATA_BYTES: usize = 64;

const CATEGORY_TOKEN_PREFIX: &str = "category_";
const PRODUCT_TOKEN_PREFIX: &str = "add_";

fn fits_callback_data(prefix: &str, value: &str) -> bool {
    prefix.len() + value.len() <= MAX_CALLBACK_DATA_BYTES
}

fn validate(categories: &[Category]) -> Result<(), CatalogError> {
    let mut category_keys = HashSet::new();
    let mut product_ids = HashSet::new();

    for category in categories {
        if category.key.trim().is_empty() {
            return Err(CatalogError::Validation("category key must not be empty".to_string()));
        }
        if category.label.trim().is_empty() {
            return Err(CatalogError::Validation(format!(
                "category `{}` must have a label",
                category.key
            )));
        }
        if !fits_callback_data(CATEGORY_TOKEN_PREFIX, &category.key) {
            return Err(CatalogError::Validation(format!(
                "category key `{}` is too long for a button callback",
                category.key
            )));
        }
        if !category_keys.insert(category.key.as_str()) {
            return Err(CatalogError::Validation(format!(
                "duplicate category key `{}`",
                category.key
            )));
        }

        for product in &category.products {
            if product.id.as_str().trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "product in category `{}` has an empty id",
                    category.key
                )));
            }
            if product.name.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "product `{}` must have a name",
                    product.id
                )));
            }
            if !fits_callback_data(PRODUCT_TOKEN_PREFIX, product.id.as_str()) {
                return Err(CatalogError::Validation(format!(
                    "product id `{}` is too long for a button callback",
                    product.id
                )));
            }
            if !product_ids.insert(product.id.as_str()) {
                return Err(CatalogError::Validation(format!(
                    "duplicate product id `{}`",
                    product.id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{Catalog, CatalogError, MAX_CALLBACK_DATA_BYTES};
    use crate::domain::product::ProductId;

    #[test]
    fn builtin_catalog_keeps_menu_order_and_passes_validation() {
        let catalog = Catalog::builtin();
        let keys: Vec<&str> =
            catalog.list_categories().iter().map(|category| category.key.as_str()).collect();

        assert_eq!(keys, vec!["air_conditioners", "ventilation", "heating", "humidifiers"]);
        assert_eq!(catalog.product_count(), 5);
        Catalog::new(catalog.list_categories().to_vec()).expect("builtin catalog is valid");
    }

    #[test]
    fn products_of_unknown_or_empty_category_are_empty() {
        let catalog = Catalog::builtin();

        assert!(catalog.products("category_that_does_not_exist").is_empty());
        assert!(catalog.products("heating").is_empty());
        assert_eq!(catalog.products("ventilation").len(), 2);
    }

    #[test]
    fn find_product_searches_every_category() {
        let catalog = Catalog::builtin();

        let daikin = catalog.find_product(&ProductId::from("daikin_ftxb20c")).expect("daikin");
        assert_eq!(daikin.price, "18 500 грн");
        let vents = catalog.find_product(&ProductId::from("vents_vut2000")).expect("vents");
        assert_eq!(vents.name, "ВЕНТС ВУТ 2000 Г");
    }

    #[test]
    fn find_product_returns_none_for_unknown_id() {
        let catalog = Catalog::builtin();

        assert!(catalog.find_product(&ProductId::from("no_such_unit")).is_none());
        assert!(catalog.find_product(&ProductId::from("")).is_none());
    }

    #[test]
    fn catalog_file_is_parsed_in_declaration_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("catalog.toml");
        fs::write(
            &path,
            r#"
[[categories]]
key = "fans"
label = "Fans"

[[categories.products]]
id = "fan_small"
name = "Small fan"
price = "1 200 грн"

[[categories.products]]
id = "fan_large"
name = "Large fan"
price = "2 400 грн"

[[categories]]
key = "filters"
label = "Filters"
"#,
        )
        .expect("write catalog");

        let catalog = Catalog::load(&path).expect("catalog loads");

        assert_eq!(catalog.list_categories().len(), 2);
        assert_eq!(catalog.products("fans")[1].id, ProductId::from("fan_large"));
        assert!(catalog.products("filters").is_empty());
    }

    #[test]
    fn duplicate_product_ids_are_rejected() {
        let error = Catalog::from_toml_str(
            r#"
[[categories]]
key = "a"
label = "A"
products = [{ id = "same", name = "One", price = "1" }]

[[categories]]
key = "b"
label = "B"
products = [{ id = "same", name = "Two", price = "2" }]
"#,
        )
        .expect_err("duplicate ids must fail");

        assert!(matches!(error, CatalogError::Validation(ref message) if message.contains("same")));
    }

    #[test]
    fn ids_that_overflow_callback_data_are_rejected() {
        let long_id = "x".repeat(80);
        let error = Catalog::from_toml_str(&format!(
            r#"
[[categories]]
key = "a"
label = "A"
products = [{{ id = "{long_id}", name = "One", price = "1" }}]
"#
        ))
        .expect_err("oversized product id must fail");
        assert!(matches!(error, CatalogError::Validation(ref message) if message.contains("too long")));

        let long_key = "k".repeat(60);
        let error = Catalog::from_toml_str(&format!(
            "[[categories]]\nkey = \"{long_key}\"\nlabel = \"K\"\n"
        ))
        .expect_err("oversized category key must fail");
        assert!(matches!(error, CatalogError::Validation(ref message) if message.contains(&long_key)));

        let boundary_id = "y".repeat(MAX_CALLBACK_DATA_BYTES - "add_".len());
        let catalog = Catalog::from_toml_str(&format!(
            "[[categories]]\nkey = \"a\"\nlabel = \"A\"\nproducts = [{{ id = \"{boundary_id}\", name = \"Edge\", price = \"1\" }}]\n"
        ))
        .expect("id filling the callback exactly is accepted");
        assert_eq!(catalog.product_count(), 1);
    }

    #[test]
    fn missing_catalog_file_reports_path() {
        let error = Catalog::load(std::path::Path::new("/definitely/not/here.toml"))
            .expect_err("missing file");

        assert!(error.to_string().contains("/definitely/not/here.toml"));
    }
}

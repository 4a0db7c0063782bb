use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

/// The taxonomy of valid category/subcategory names, sourced from a
/// human-editable JSON file shaped like:
///
/// ```json
/// { "Food": ["Groceries", "Restaurants"], "Utilities": [] }
/// ```
///
/// A catalog is a pure function of the file's current contents: it is
/// rebuilt by [`CategoryCatalog::load`] on every access and never cached,
/// so edits to the file take effect on the very next operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: BTreeMap<String, Vec<String>>,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot read category file {path}: {source}")]
    Unavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("Category file {path} is malformed: {source}")]
    Malformed {
        path: String,
        source: serde_json::Error,
    },
}

impl CategoryCatalog {
    /// Read and parse the category file. Callers must load a fresh
    /// catalog for every validating call rather than hold on to one.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Unavailable {
                path: path.display().to_string(),
                source,
            })?;

        let categories =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Malformed {
                path: path.display().to_string(),
                source,
            })?;

        Ok(Self { categories })
    }

    /// Check a category/subcategory pair against the taxonomy.
    /// An absent subcategory is always valid.
    pub fn validate(&self, category: &str, subcategory: Option<&str>) -> bool {
        match self.categories.get(category) {
            Some(subcategories) => {
                subcategory.is_none_or(|s| subcategories.iter().any(|known| known == s))
            }
            None => false,
        }
    }

    /// The category -> subcategories mapping, categories in sorted order.
    pub fn categories(&self) -> &BTreeMap<String, Vec<String>> {
        &self.categories
    }
}

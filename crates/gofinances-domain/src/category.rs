//! Category catalog consumed by expense aggregation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::common::NamedEntity;

/// A catalog entry: storage key, display name and chart color.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub key: String,
    pub name: String,
    pub color: String,
}

impl Category {
    pub fn new(key: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

static DEFAULT_CATALOG: Lazy<CategoryCatalog> = Lazy::new(|| {
    CategoryCatalog::new(vec![
        Category::new("purchases", "Compras", "#5636D3"),
        Category::new("food", "Alimentação", "#FF872C"),
        Category::new("salary", "Salário", "#12A454"),
        Category::new("car", "Carro", "#E83F5B"),
        Category::new("leisure", "Lazer", "#26195C"),
        Category::new("studies", "Estudos", "#9C001A"),
    ])
});

/// Fixed, ordered list of categories. Order drives breakdown output order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategoryCatalog {
    entries: Vec<Category>,
}

impl CategoryCatalog {
    /// Builds a catalog; later entries reusing an earlier key are dropped.
    pub fn new(entries: Vec<Category>) -> Self {
        let mut unique: Vec<Category> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique.iter().any(|existing| existing.key == entry.key) {
                unique.push(entry);
            }
        }
        Self { entries: unique }
    }

    pub fn get(&self, key: &str) -> Option<&Category> {
        self.entries.iter().find(|category| category.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        DEFAULT_CATALOG.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_keeps_declared_order() {
        let catalog = CategoryCatalog::default();
        let keys: Vec<&str> = catalog.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["purchases", "food", "salary", "car", "leisure", "studies"]
        );
        assert_eq!(catalog.get("food").map(|c| c.name()), Some("Alimentação"));
    }

    #[test]
    fn duplicate_keys_keep_first_entry() {
        let catalog = CategoryCatalog::new(vec![
            Category::new("food", "Food", "#000"),
            Category::new("food", "Other", "#fff"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("food").unwrap().name, "Food");
    }
}

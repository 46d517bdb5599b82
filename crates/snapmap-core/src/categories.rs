//! Store-type categories: the label → icon/color table and the set of
//! categories left out of nearest-retailer search.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A store-type label as seen through the category table.
///
/// Labels missing from the table, and records with no label at all, resolve
/// to [`Category::Unrecognized`] and borrow the fallback entry's label, icon
/// and color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Known(String),
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStyle {
    pub label: String,
    pub icon: String,
    pub color: String,
}

impl CategoryStyle {
    fn new(label: &str, icon: &str, color: &str) -> Self {
        Self {
            label: label.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    /// Catch-all entry, used for unknown or missing labels.
    pub fallback: CategoryStyle,
    /// Labels never listed in nearest-retailer results.
    #[serde(default)]
    pub near_excluded: Vec<String>,
    pub categories: Vec<CategoryStyle>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            fallback: CategoryStyle::new("Other", "📍", "#9467bd"),
            near_excluded: vec!["Other".to_string(), "Specialty Store".to_string()],
            categories: vec![
                CategoryStyle::new("Convenience Store", "🏪", "#1f77b4"),
                CategoryStyle::new("Farmers and Markets", "🥦", "#2ca02c"),
                CategoryStyle::new("Grocery Store", "🛒", "#ff7f0e"),
                CategoryStyle::new("Pharmacy", "💊", "#d62728"),
                CategoryStyle::new("Specialty Store", "🧀", "#8c564b"),
                CategoryStyle::new("Super Store", "🛍️", "#17becf"),
                CategoryStyle::new("Supermarket", "🛒", "#e377c2"),
            ],
        }
    }
}

impl CategoryTable {
    /// Resolve a raw store-type attribute against the table.
    #[must_use]
    pub fn resolve(&self, raw: Option<&str>) -> Category {
        match raw {
            Some(label) if self.contains_label(label) => Category::Known(label.to_string()),
            _ => Category::Unrecognized,
        }
    }

    /// Display label for a category; unrecognized categories use the fallback label.
    #[must_use]
    pub fn label<'a>(&'a self, category: &'a Category) -> &'a str {
        match category {
            Category::Known(label) => label,
            Category::Unrecognized => &self.fallback.label,
        }
    }

    #[must_use]
    pub fn style(&self, category: &Category) -> &CategoryStyle {
        match category {
            Category::Known(label) => self
                .categories
                .iter()
                .find(|c| &c.label == label)
                .unwrap_or(&self.fallback),
            Category::Unrecognized => &self.fallback,
        }
    }

    /// Style lookup by raw label, falling back to the catch-all entry.
    #[must_use]
    pub fn style_for_label(&self, label: &str) -> &CategoryStyle {
        self.style(&self.resolve(Some(label)))
    }

    /// Whether nearest-retailer search skips this category.
    #[must_use]
    pub fn is_near_excluded(&self, category: &Category) -> bool {
        let label = self.label(category);
        self.near_excluded.iter().any(|l| l == label)
    }

    fn contains_label(&self, label: &str) -> bool {
        self.fallback.label == label || self.categories.iter().any(|c| c.label == label)
    }
}

/// Load and validate the category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<CategoryTable, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let table: CategoryTable =
        serde_yaml::from_str(&content).map_err(ConfigError::CategoriesFileParse)?;

    validate_categories(&table)?;

    Ok(table)
}

/// Like [`load_categories`], but returns the built-in table when `path` does not exist.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read, parsed, or validated.
pub fn load_categories_or_default(path: &Path) -> Result<CategoryTable, ConfigError> {
    if path.exists() {
        load_categories(path)
    } else {
        Ok(CategoryTable::default())
    }
}

fn validate_categories(table: &CategoryTable) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for style in std::iter::once(&table.fallback).chain(&table.categories) {
        if style.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category label must be non-empty".to_string(),
            ));
        }

        if !is_hex_color(&style.color) {
            return Err(ConfigError::Validation(format!(
                "category '{}' has invalid color '{}'; expected #rrggbb",
                style.label, style.color
            )));
        }

        if !seen.insert(style.label.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category label: '{}'",
                style.label
            )));
        }
    }

    for label in &table.near_excluded {
        if !seen.contains(label.as_str()) {
            return Err(ConfigError::Validation(format!(
                "near_excluded label '{label}' is not a known category"
            )));
        }
    }

    Ok(())
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
#[path = "categories_test.rs"]
mod tests;

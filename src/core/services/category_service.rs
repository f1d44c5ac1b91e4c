//! Ordered registry of transaction categories.

use crate::domain::category::{
    default_categories, system_categories, Category, CategoryLabel, CategoryUpdate,
};
use crate::domain::common::EntryKind;
use crate::errors::{LedgerError, LedgerResult};

/// Owns the category sequence. Display order is insertion order.
///
/// Names and colors may repeat. Deleting a category never touches the transactions
/// that reference it; those resolve to [`CategoryLabel::unknown`] at display time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryRegistry {
    categories: Vec<Category>,
}

impl CategoryRegistry {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn with_defaults() -> Self {
        Self::new(default_categories())
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        color: impl Into<String>,
        kind: EntryKind,
    ) -> LedgerResult<Category> {
        let name = name.into();
        let color = color.into();
        validate_name(&name)?;
        validate_color(&color)?;
        let category = Category::new(name.trim(), color, kind);
        tracing::debug!(id = %category.id, name = %category.name, "category added");
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Merges `update` into the category. Returns `Ok(false)` when `id` is unknown.
    ///
    /// Changing the kind does not reclassify transactions already using the category.
    pub fn update(&mut self, id: &str, update: CategoryUpdate) -> LedgerResult<bool> {
        if let Some(name) = update.name.as_deref() {
            validate_name(name)?;
        }
        if let Some(color) = update.color.as_deref() {
            validate_color(color)?;
        }
        let Some(category) = self.get_mut(id) else {
            tracing::debug!(id, "category update ignored: not found");
            return Ok(false);
        };
        let update = CategoryUpdate {
            name: update.name.map(|name| name.trim().to_string()),
            ..update
        };
        category.apply(update);
        Ok(true)
    }

    /// Removes the category. Returns `Ok(false)` when `id` is unknown.
    pub fn delete(&mut self, id: &str) -> LedgerResult<bool> {
        if self.get(id).is_some_and(|category| category.system) {
            return Err(LedgerError::ReservedCategory(id.to_string()));
        }
        let before = self.categories.len();
        self.categories.retain(|category| category.id != id);
        let removed = self.categories.len() != before;
        if removed {
            tracing::debug!(id, "category deleted");
        }
        Ok(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories usable for the given side, in display order.
    pub fn of_kind(&self, kind: EntryKind) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|category| category.kind == kind)
            .collect()
    }

    /// Name and color for `id`, or the unknown-category fallback.
    pub fn label_for(&self, id: &str) -> CategoryLabel {
        self.get(id)
            .map(CategoryLabel::of)
            .unwrap_or_else(CategoryLabel::unknown)
    }

    /// Adds missing reserved categories and re-tags existing ones as reserved.
    /// Returns the ids that were repaired.
    pub fn ensure_system_categories(&mut self) -> Vec<String> {
        let mut repaired = Vec::new();
        for reserved in system_categories() {
            match self.get_mut(&reserved.id) {
                Some(existing) if existing.system => {}
                Some(existing) => {
                    existing.system = true;
                    repaired.push(reserved.id.clone());
                }
                None => {
                    repaired.push(reserved.id.clone());
                    self.categories.push(reserved);
                }
            }
        }
        repaired
    }
}

fn validate_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::validation("category name must not be empty"));
    }
    Ok(())
}

/// Accepts `#rgb` and `#rrggbb`.
fn validate_color(color: &str) -> LedgerResult<()> {
    let valid = color
        .strip_prefix('#')
        .filter(|hex| matches!(hex.len(), 3 | 6))
        .is_some_and(|hex| hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "category color `{color}` is not a hex color"
        )))
    }
}

//! Category taxonomy
//!
//! Immutable lookup from a raw category id to its top-level parent and
//! display metadata. The taxonomy is built once and injected wherever it
//! is needed; there is no global instance.

use std::collections::HashMap;

use crate::models::{Category, CategoryId};

/// Id of the catch-all parent for unknown or missing categories
pub const OTHER: &str = "other";

/// Immutable category lookup table
#[derive(Debug, Clone)]
pub struct CategoryTaxonomy {
    categories: HashMap<CategoryId, Category>,
    other: Category,
}

impl CategoryTaxonomy {
    /// Build a taxonomy from a category list
    ///
    /// An `other` fallback is added when the list does not define one.
    /// Later duplicates replace earlier entries.
    pub fn from_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut map: HashMap<CategoryId, Category> = categories
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();

        let other = map
            .get(&CategoryId::from(OTHER))
            .cloned()
            .unwrap_or_else(default_other);
        map.insert(other.id.clone(), other.clone());

        Self {
            categories: map,
            other,
        }
    }

    /// Look up a category by raw id
    pub fn get(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    /// The catch-all parent
    pub fn other(&self) -> &Category {
        &self.other
    }

    /// Resolve a raw id to its top-level parent
    ///
    /// Top-level ids resolve to themselves. Unknown ids, and ids whose
    /// parent is missing or not top-level, resolve to `other`.
    pub fn parent_of(&self, raw: &CategoryId) -> &Category {
        let Some(category) = self.categories.get(raw) else {
            return &self.other;
        };

        match &category.parent {
            None => category,
            Some(parent_id) => match self.categories.get(parent_id) {
                Some(parent) if parent.is_top_level() => parent,
                _ => &self.other,
            },
        }
    }

    /// Display name for a raw id; unknown ids display as themselves
    pub fn display_name(&self, raw: &CategoryId) -> String {
        self.categories
            .get(raw)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Top-level categories, sorted by id
    pub fn parents(&self) -> Vec<&Category> {
        let mut parents: Vec<_> = self
            .categories
            .values()
            .filter(|c| c.is_top_level())
            .collect();
        parents.sort_by(|a, b| a.id.cmp(&b.id));
        parents
    }

    /// Direct children of a parent, sorted by id
    pub fn children_of(&self, parent: &CategoryId) -> Vec<&Category> {
        let mut children: Vec<_> = self
            .categories
            .values()
            .filter(|c| c.parent.as_ref() == Some(parent))
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        children
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CategoryTaxonomy {
    fn default() -> Self {
        Self::from_categories(default_categories())
    }
}

fn default_other() -> Category {
    Category::top_level(OTHER, "Other", "dots", "#B0B0B0")
}

/// The built-in category table
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::top_level("food", "Food & Dining", "utensils", "#FF6B6B"),
        Category::child_of("food", "food_delivery", "Food Delivery", "bike", "#FF8E72"),
        Category::child_of("food", "restaurant", "Restaurants", "chef-hat", "#FF7F50"),
        Category::child_of("food", "groceries", "Groceries", "basket", "#F4A261"),
        Category::top_level("transport", "Transport", "car", "#4ECDC4"),
        Category::top_level("shopping", "Shopping", "bag", "#45B7D1"),
        Category::top_level("entertainment", "Entertainment", "film", "#96CEB4"),
        Category::top_level("bills", "Bills & Utilities", "receipt", "#FFEAA7"),
        Category::child_of("bills", "subscriptions", "Subscriptions", "repeat", "#FDCB6E"),
        Category::top_level("health", "Health", "heart-pulse", "#DDA0DD"),
        Category::top_level("education", "Education", "book", "#98D8C8"),
        default_other(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_parents() {
        let taxonomy = CategoryTaxonomy::default();
        let ids: Vec<_> = taxonomy.parents().iter().map(|c| c.id.to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "bills",
                "education",
                "entertainment",
                "food",
                "health",
                "other",
                "shopping",
                "transport"
            ]
        );
    }

    #[test]
    fn test_parent_resolution() {
        let taxonomy = CategoryTaxonomy::default();
        assert_eq!(taxonomy.parent_of(&"food_delivery".into()).id.as_str(), "food");
        assert_eq!(taxonomy.parent_of(&"food".into()).id.as_str(), "food");
        assert_eq!(taxonomy.parent_of(&"subscriptions".into()).id.as_str(), "bills");
    }

    #[test]
    fn test_unknown_rolls_up_to_other() {
        let taxonomy = CategoryTaxonomy::default();
        assert_eq!(taxonomy.parent_of(&"crypto".into()).id.as_str(), OTHER);
        assert_eq!(taxonomy.display_name(&"crypto".into()), "crypto");
    }

    #[test]
    fn test_custom_taxonomy_gets_other() {
        let taxonomy = CategoryTaxonomy::from_categories(vec![
            Category::top_level("home", "Home", "house", "#000000"),
            Category::child_of("missing", "plants", "Plants", "leaf", "#00FF00"),
        ]);
        assert!(taxonomy.get(&OTHER.into()).is_some());
        assert_eq!(taxonomy.parent_of(&"plants".into()).id.as_str(), OTHER);
        assert_eq!(taxonomy.len(), 3);
    }

    #[test]
    fn test_children_of() {
        let taxonomy = CategoryTaxonomy::default();
        let children: Vec<_> = taxonomy
            .children_of(&"food".into())
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(children, vec!["food_delivery", "groceries", "restaurant"]);
    }
}

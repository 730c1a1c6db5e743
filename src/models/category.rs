//! Category reference data
//!
//! Categories form a two-level hierarchy: top-level parents (no `parent`)
//! and raw categories that roll up into them. The data is static for the
//! lifetime of a computation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;

/// A spending category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (e.g., "food_delivery")
    pub id: CategoryId,

    /// Parent category; `None` for top-level categories
    #[serde(default)]
    pub parent: Option<CategoryId>,

    /// Human readable name
    pub name: String,

    /// Icon key understood by the presentation layer
    #[serde(default)]
    pub icon: String,

    /// Color token understood by the presentation layer
    #[serde(default)]
    pub color: String,
}

impl Category {
    /// Create a top-level category
    pub fn top_level(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent: None,
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// Create a sub-category under `parent`
    pub fn child_of(
        parent: impl Into<CategoryId>,
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent: Some(parent.into()),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// Check if this category has no parent
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CategoryValidationError::EmptyId);
        }

        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if self.parent.as_ref() == Some(&self.id) {
            return Err(CategoryValidationError::SelfParent(self.id.to_string()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyId,
    EmptyName,
    SelfParent(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Category id cannot be empty"),
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::SelfParent(id) => write!(f, "Category '{}' cannot be its own parent", id),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

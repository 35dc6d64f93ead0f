//! Category model for colour-coding events.
//!
//! Every event belongs to one category. A category's `visible` flag decides
//! whether its events take part in the month layout or are hidden.

use serde::{Deserialize, Serialize};

use crate::models::event::DEFAULT_CATEGORY_ID;

/// Category id used for every record produced by the holiday feed.
pub const HOLIDAY_CATEGORY_ID: &str = "holidays";

/// A category for organizing events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier referenced by event records
    pub id: String,
    /// Display name of the category
    pub name: String,
    /// Hex color code for the category (e.g., "#3B82F6")
    pub color: String,
    /// Whether events of this category are shown in the calendar
    pub visible: bool,
    /// Whether this is a system category (cannot be deleted)
    pub is_system: bool,
}

impl Category {
    /// Create a new visible category. The id is assigned by the category store.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            color: color.into(),
            visible: true,
            is_system: false,
        }
    }

    /// Create a system category with a fixed id.
    pub fn system(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            visible: true,
            is_system: true,
        }
    }

    /// Validate the category data.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if name.chars().count() > 50 {
            return Err(CategoryValidationError::NameTooLong);
        }

        if !is_valid_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor);
        }

        Ok(())
    }
}

/// Lookup deciding whether a category's events are shown.
pub trait CategoryVisibility {
    fn is_visible(&self, category_id: &str) -> bool;
}

/// Every category visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllVisible;

impl CategoryVisibility for AllVisible {
    fn is_visible(&self, _category_id: &str) -> bool {
        true
    }
}

/// Validation errors for Category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name must be 50 characters or less")]
    NameTooLong,
    #[error("Invalid color format (use hex like #FF0000)")]
    InvalidColor,
}

/// Check if a string is a valid hex color code.
fn is_valid_hex_color(color: &str) -> bool {
    let Some(hex) = color.trim().strip_prefix('#') else {
        return false;
    };
    // Accept 3, 6, or 8 character hex codes
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Categories that ship with the application.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::system(DEFAULT_CATEGORY_ID, "Personal", "#10B981"),
        Category::system(HOLIDAY_CATEGORY_ID, "Holidays", "#EF4444"),
    ]
}

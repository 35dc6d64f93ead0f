//! Category service for CRUD operations on event categories.
//!
//! This service creates, reads, updates and deletes categories, toggles
//! their visibility, and seeds the default categories on first run.

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::category::{default_categories, Category, CategoryVisibility};
use crate::models::event::DEFAULT_CATEGORY_ID;

const SELECT_COLUMNS: &str = "SELECT id, name, color, visible, is_system FROM categories";

/// Snapshot of category visibility taken from the store.
///
/// Categories the snapshot does not know about are treated as visible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilityMap {
    visible: HashMap<String, bool>,
}

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, category_id: impl Into<String>, visible: bool) {
        self.visible.insert(category_id.into(), visible);
    }

    /// Ids of the categories currently hidden, sorted.
    pub fn hidden(&self) -> Vec<&str> {
        let mut hidden: Vec<&str> = self
            .visible
            .iter()
            .filter(|(_, visible)| !**visible)
            .map(|(id, _)| id.as_str())
            .collect();
        hidden.sort_unstable();
        hidden
    }
}

impl CategoryVisibility for VisibilityMap {
    fn is_visible(&self, category_id: &str) -> bool {
        self.visible.get(category_id).copied().unwrap_or(true)
    }
}

/// Service for managing event categories.
pub struct CategoryService<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryService<'a> {
    /// Create a new CategoryService with the given database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Populate the categories table with the defaults if it is empty.
    pub fn initialize_defaults(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .context("Failed to count categories")?;

        if count == 0 {
            log::info!("Initializing default categories");
            for category in default_categories() {
                if let Err(e) = self.create(category) {
                    log::warn!("Failed to create default category: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Create a new category. An empty id is replaced by a fresh UUID.
    pub fn create(&self, mut category: Category) -> Result<Category> {
        category.validate()?;
        if category.id.trim().is_empty() {
            category.id = uuid::Uuid::new_v4().to_string();
        }
        category.name = category.name.trim().to_string();

        self.conn
            .execute(
                "INSERT INTO categories (id, name, color, visible, is_system)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    category.id,
                    category.name,
                    category.color,
                    category.visible as i32,
                    category.is_system as i32,
                ],
            )
            .context("Failed to insert category")?;

        Ok(category)
    }

    /// Get a category by ID.
    pub fn get(&self, id: &str) -> Result<Option<Category>> {
        let category = self
            .conn
            .query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), [id], map_category_row)
            .optional()?;
        Ok(category)
    }

    /// Get a category by name.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>> {
        let result = self.conn.query_row(
            &format!("{} WHERE name = ?1", SELECT_COLUMNS),
            [name],
            map_category_row,
        );

        match result {
            Ok(cat) => Ok(Some(cat)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all categories, system categories first, then by name.
    pub fn list_all(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY is_system DESC, name ASC", SELECT_COLUMNS))?;

        let categories = stmt.query_map([], map_category_row)?;

        categories
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to fetch categories")
    }

    /// Update an existing category.
    /// System categories can only have their color updated, not their name.
    pub fn update(&self, category: &Category) -> Result<()> {
        category.validate()?;

        let existing = self
            .get(&category.id)?
            .ok_or_else(|| anyhow!("Category with id {} not found", category.id))?;

        if existing.is_system {
            self.conn
                .execute(
                    "UPDATE categories SET color = ?1, visible = ?2 WHERE id = ?3",
                    params![category.color, category.visible as i32, category.id],
                )
                .context("Failed to update system category")?;
        } else {
            self.conn
                .execute(
                    "UPDATE categories SET name = ?1, color = ?2, visible = ?3 WHERE id = ?4",
                    params![
                        category.name.trim(),
                        category.color,
                        category.visible as i32,
                        category.id
                    ],
                )
                .context("Failed to update category")?;
        }

        Ok(())
    }

    /// Show or hide the events of a category.
    pub fn set_visible(&self, id: &str, visible: bool) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE categories SET visible = ?1 WHERE id = ?2",
                params![visible as i32, id],
            )
            .context("Failed to update category visibility")?;

        if rows_affected == 0 {
            return Err(anyhow!("Category with id {} not found", id));
        }

        log::info!(
            "Category '{}' is now {}",
            id,
            if visible { "visible" } else { "hidden" }
        );
        Ok(())
    }

    /// Current visibility of every stored category.
    pub fn visibility(&self) -> Result<VisibilityMap> {
        let mut map = VisibilityMap::new();
        for category in self.list_all()? {
            map.set(category.id, category.visible);
        }
        Ok(map)
    }

    /// Delete a category by ID.
    /// System categories cannot be deleted; events of a deleted category move
    /// to the default category.
    pub fn delete(&self, id: &str) -> Result<()> {
        let category = self
            .get(id)?
            .ok_or_else(|| anyhow!("Category with id {} not found", id))?;
        if category.is_system {
            return Err(anyhow!("Cannot delete system category '{}'", category.name));
        }

        self.conn
            .execute(
                "UPDATE events SET category_id = ?1 WHERE category_id = ?2",
                params![DEFAULT_CATEGORY_ID, id],
            )
            .context("Failed to move events to the default category")?;

        self.conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])
            .context("Failed to delete category")?;

        Ok(())
    }

    /// Check if a category name already exists (excluding a specific ID).
    pub fn name_exists(&self, name: &str, exclude_id: Option<&str>) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM categories WHERE LOWER(name) = LOWER(?1) AND id != ?2",
            params![name.trim(), exclude_id.unwrap_or("")],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    /// Get the number of events using a specific category.
    pub fn get_usage_count(&self, category_id: &str) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM events WHERE category_id = ?1",
            [category_id],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}

fn map_category_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        color: row.get(2)?,
        visible: row.get::<_, i32>(3)? != 0,
        is_system: row.get::<_, i32>(4)? != 0,
    })
}

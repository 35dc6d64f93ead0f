use anyhow::{Context, Result};
use rusqlite::Connection;

use super::migrations;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_categories_table(conn)?;
    run_category_migrations(conn)?;
    create_events_table(conn)?;
    run_event_migrations(conn)?;
    create_event_indexes(conn)?;
    Ok(())
}

fn create_categories_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            is_system INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )
    .context("Failed to create categories table")?;

    Ok(())
}

fn run_category_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "categories",
        "visible",
        "ALTER TABLE categories ADD COLUMN visible INTEGER NOT NULL DEFAULT 1",
    )?;

    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            start_year INTEGER NOT NULL,
            name TEXT NOT NULL,
            category_id TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            dates TEXT NOT NULL,
            start_time TEXT,
            end_time TEXT,
            is_all_day INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )
    .context("Failed to create events table")?;

    Ok(())
}

fn run_event_migrations(conn: &Connection) -> Result<()> {
    migrations::ensure_column(
        conn,
        "events",
        "location",
        "ALTER TABLE events ADD COLUMN location TEXT",
    )?;

    migrations::ensure_column(
        conn,
        "events",
        "notes",
        "ALTER TABLE events ADD COLUMN notes TEXT",
    )?;

    Ok(())
}

fn create_event_indexes(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_start_year ON events(start_year)",
        [],
    )
    .context("Failed to create start_year index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_range ON events(start_date, end_date)",
        [],
    )
    .context("Failed to create date range index")?;

    Ok(())
}

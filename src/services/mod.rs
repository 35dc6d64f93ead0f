// Service module exports

pub mod category;
pub mod database;
pub mod event;
pub mod holiday;
pub mod layout;
pub mod month_view;
pub mod settings;
pub mod year_view;

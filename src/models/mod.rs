// Module exports for models

pub mod category;
pub mod event;
pub mod grid;
pub mod settings;
pub mod ui;

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod settings;
pub mod state;
pub mod ui;

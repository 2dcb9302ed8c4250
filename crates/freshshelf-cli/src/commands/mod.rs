//! Command handlers, one module per command group

pub mod category;
pub mod config;
pub mod item;
pub mod recipe;
pub mod status;
pub mod user;

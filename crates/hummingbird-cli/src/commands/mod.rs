pub mod config;
pub mod listing;

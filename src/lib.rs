// Library interface for testing

pub mod booking;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod listing;
pub mod models;
pub mod queries;
pub mod quiz;
pub mod schema;
pub mod seed;
pub mod serve;
pub mod trivia;

// Re-export the expected database version for convenience
pub use constants::EXPECTED_DB_VERSION;

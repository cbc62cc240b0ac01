//! Storage layer for blogsmith

pub mod db;
pub mod models;

pub use db::{Database, SharedDatabase};
pub use models::*;

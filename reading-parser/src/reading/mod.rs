//! Main module for reading log parsing

pub mod assembling;
pub mod attributes;
pub mod config;
pub mod error;
pub mod item;
pub mod length;
pub mod loader;
pub mod parsing;
pub mod rows;
pub mod testing;
pub mod transforms;

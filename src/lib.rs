//! BuildForge - Tag-driven build component recommender
//!
//! Extracts semantic tags from a free-text playstyle description and ranks the
//! game-data catalogs (skills, unique items, passive nodes, runes) against
//! them, producing small bounded lists for a downstream build generator.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod filtering;
pub mod patterns;
pub mod tags;

pub use error::{BuildForgeError, Result};

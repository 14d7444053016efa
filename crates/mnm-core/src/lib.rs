#![deny(warnings)]

//! Core domain types for the Mines and Magic economy engine.
//!
//! This crate defines the resource model, the affordability oracle, the
//! engine error type and the catalog configuration every game is built from.

pub mod config;
pub mod error;
pub mod resources;

pub use config::{
    load_config, validate_config, validate_mine_rules, validate_rules, CatalogConfig,
    ConfigError, GameRules, MineLayoutEntry, MineRules, SendSpec, UnitSpec, ValidationError,
    YardRules,
};
pub use error::{CatalogRef, EngineError, EngineResult};
pub use resources::{affordable, affordable_mask, Resource, ResourceVector, RESOURCE_COUNT};

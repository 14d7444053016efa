#![deny(warnings)]

//! Per-game economy catalogs for Mines and Magic.
//!
//! Each catalog is built from a [`mnm_core::CatalogConfig`] and owned by a
//! single game:
//! - [`MineCatalog`]: mine slots, the tiered purchase price and the upgrade ledger
//! - [`SendCatalog`]: repeatable sends that add gold income
//! - [`UnitCatalog`]: research, build and upgrade of combat units
//! - [`ConstructionYards`]: the yard counter that unlocks mine tiers
//!
//! Every mutator validates all preconditions and affordability before it
//! debits the bank.

pub mod mines;
pub mod sends;
pub mod units;
pub mod yard;

pub use mines::{mine_output, MineCatalog, MineSlot, MineUpgradeEntry};
pub use sends::{SendCatalog, SendEntry};
pub use units::{UnitCatalog, UnitEntry};
pub use yard::ConstructionYards;

//! Errors raised by the engine and its catalogs.

use crate::resources::{Resource, ResourceVector};
use std::fmt;
use thiserror::Error;

/// Identifies an entry of one of the per-game catalogs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogRef {
    Mine(usize),
    Send(usize),
    Unit(usize),
}

impl fmt::Display for CatalogRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogRef::Mine(id) => write!(f, "mine {id}"),
            CatalogRef::Send(id) => write!(f, "send {id}"),
            CatalogRef::Unit(id) => write!(f, "unit {id}"),
        }
    }
}

/// Every failure is detected before the game state is touched, so an `Err`
/// always leaves bank, income, round and catalogs exactly as they were.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Index is outside the action universe or not in the current legal set.
    #[error("action index {index} is not currently legal")]
    IllegalActionIndex { index: usize },
    /// The mine's upgrade track for this resource is already at its cap.
    #[error("mine {mine} has no {resource} upgrade left")]
    ExhaustedUpgradeTrack { mine: usize, resource: Resource },
    /// Action names a mine, send or unit that is not in the catalog.
    #[error("invalid catalog reference: {0}")]
    InvalidCatalogReference(CatalogRef),
    #[error("mine {mine} is already owned")]
    MineOwned { mine: usize },
    #[error("mine {mine} must be owned before it can be upgraded")]
    MineNotOwned { mine: usize },
    #[error("mine {mine} needs {tier} construction yards, {yards} built")]
    MineLocked { mine: usize, tier: u32, yards: u32 },
    #[error("send {send} unlocks at round {unlock_round}, current round is {round}")]
    SendLocked {
        send: usize,
        unlock_round: u32,
        round: u32,
    },
    #[error("unit {unit} has no base-tier unit to upgrade")]
    NoBaseUnit { unit: usize },
    #[error("cost {cost} exceeds bank {bank}")]
    Unaffordable {
        cost: ResourceVector,
        bank: ResourceVector,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;

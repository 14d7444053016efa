#![deny(warnings)]

//! State/action engine for the Mines and Magic economy.
//!
//! A [`GameTemplate`] holds the catalog templates and the shared
//! [`ActionUniverse`]; each [`Game`] owns clones of the catalogs and exposes
//! `legal_actions`, `apply`, `describe`, `state_vector` and `score`.

pub mod game;
pub mod legal;
pub mod universe;

pub use game::{Game, GameTemplate, Phase, STATE_VECTOR_LEN};
pub use universe::{Action, ActionUniverse, CatalogShape};

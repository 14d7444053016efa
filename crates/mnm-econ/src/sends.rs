//! Sends: repeatable purchases that add permanent gold income.

use mnm_core::{affordable, CatalogRef, EngineError, EngineResult, ResourceVector, SendSpec};
use rust_decimal::Decimal;
use serde::Serialize;

/// One row of the send table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SendEntry {
    /// Display name, e.g. "Fat Ling".
    pub name: String,
    /// First round in which the send can be bought.
    pub unlock_round: u32,
    /// Gold added to the per-round income by each purchase.
    pub gold_income: Decimal,
    /// Price of one purchase.
    pub cost: ResourceVector,
}

impl SendEntry {
    /// Income change caused by one purchase.
    pub fn income_delta(&self) -> ResourceVector {
        ResourceVector::gold(self.gold_income)
    }

    pub fn is_unlocked(&self, round: u32) -> bool {
        self.unlock_round <= round
    }
}

impl From<&SendSpec> for SendEntry {
    fn from(spec: &SendSpec) -> Self {
        Self {
            name: spec.name.clone(),
            unlock_round: spec.unlock_round,
            gold_income: spec.gold_income,
            cost: spec.cost,
        }
    }
}

/// Immutable send table. Purchases never consume catalog state.
#[derive(Clone, Debug)]
pub struct SendCatalog {
    entries: Vec<SendEntry>,
}

impl SendCatalog {
    pub fn new(specs: &[SendSpec]) -> Self {
        Self {
            entries: specs.iter().map(SendEntry::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[SendEntry] {
        &self.entries
    }

    pub fn get(&self, send: usize) -> EngineResult<&SendEntry> {
        self.entries
            .get(send)
            .ok_or(EngineError::InvalidCatalogReference(CatalogRef::Send(send)))
    }

    /// Buy a send at `round`, paying from `bank`. Returns the income it adds.
    pub fn purchase(
        &self,
        send: usize,
        round: u32,
        bank: &mut ResourceVector,
    ) -> EngineResult<ResourceVector> {
        let entry = self.get(send)?;
        if !entry.is_unlocked(round) {
            return Err(EngineError::SendLocked {
                send,
                unlock_round: entry.unlock_round,
                round,
            });
        }
        if !affordable(bank, &entry.cost) {
            return Err(EngineError::Unaffordable {
                cost: entry.cost,
                bank: *bank,
            });
        }
        *bank -= entry.cost;
        Ok(entry.income_delta())
    }
}

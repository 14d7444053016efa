//! Combat units: research-once pricing, base and upgraded tiers.

use mnm_core::{affordable, CatalogRef, EngineError, EngineResult, ResourceVector, UnitSpec};
use serde::Serialize;

/// A unit type together with how many of it the player owns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnitEntry {
    pub name: String,
    /// One-time cost, added to the first purchase.
    pub research_cost: ResourceVector,
    /// Cost of every base unit.
    pub build_cost: ResourceVector,
    /// Cost of converting one base unit into an upgraded one.
    pub upgrade_cost: ResourceVector,
    /// Base units owned; each scores 1.
    pub base_count: u32,
    /// Upgraded units owned; each scores 10.
    pub upgraded_count: u32,
}

impl UnitEntry {
    /// Research is paid with the first unit of the entry, at either tier.
    pub fn researched(&self) -> bool {
        self.base_count + self.upgraded_count > 0
    }

    pub fn purchase_cost(&self) -> ResourceVector {
        if self.researched() {
            self.build_cost
        } else {
            self.research_cost + self.build_cost
        }
    }
}

#[derive(Clone, Debug)]
pub struct UnitCatalog {
    entries: Vec<UnitEntry>,
}

impl UnitCatalog {
    pub fn new(specs: &[UnitSpec]) -> Self {
        let entries = specs
            .iter()
            .map(|s| UnitEntry {
                name: s.name.clone(),
                research_cost: s.research_cost,
                build_cost: s.build_cost,
                upgrade_cost: s.upgrade_cost,
                base_count: 0,
                upgraded_count: 0,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    pub fn get(&self, unit: usize) -> EngineResult<&UnitEntry> {
        self.entries
            .get(unit)
            .ok_or(EngineError::InvalidCatalogReference(CatalogRef::Unit(unit)))
    }

    pub fn purchase_cost(&self, unit: usize) -> EngineResult<ResourceVector> {
        Ok(self.get(unit)?.purchase_cost())
    }

    pub fn purchase(&mut self, unit: usize, bank: &mut ResourceVector) -> EngineResult<()> {
        let cost = self.purchase_cost(unit)?;
        if !affordable(bank, &cost) {
            return Err(EngineError::Unaffordable { cost, bank: *bank });
        }
        *bank -= cost;
        self.entries[unit].base_count += 1;
        Ok(())
    }

    /// Turn one base-tier unit into an upgraded one.
    pub fn upgrade(&mut self, unit: usize, bank: &mut ResourceVector) -> EngineResult<()> {
        let entry = self.get(unit)?;
        if entry.base_count == 0 {
            return Err(EngineError::NoBaseUnit { unit });
        }
        let cost = entry.upgrade_cost;
        if !affordable(bank, &cost) {
            return Err(EngineError::Unaffordable { cost, bank: *bank });
        }
        *bank -= cost;
        let entry = &mut self.entries[unit];
        entry.base_count -= 1;
        entry.upgraded_count += 1;
        Ok(())
    }

    /// Army score: one point per base unit, ten per upgraded unit.
    pub fn score(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.base_count) + 10 * u64::from(e.upgraded_count))
            .sum()
    }
}

//! Construction yards gate mine tiers; each one raises the price of the next.

use mnm_core::{affordable, EngineError, EngineResult, ResourceVector, YardRules};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConstructionYards {
    count: u32,
    next_cost: Decimal,
    cost_step: Decimal,
}

impl ConstructionYards {
    pub fn new(rules: &YardRules) -> Self {
        Self {
            count: rules.initial_count,
            next_cost: rules.initial_cost,
            cost_step: rules.cost_step,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Gold-only price of the next yard.
    pub fn next_cost(&self) -> ResourceVector {
        ResourceVector::gold(self.next_cost)
    }

    /// Build one yard. Returns the new yard count.
    pub fn build(&mut self, bank: &mut ResourceVector) -> EngineResult<u32> {
        let cost = self.next_cost();
        if !affordable(bank, &cost) {
            return Err(EngineError::Unaffordable { cost, bank: *bank });
        }
        *bank -= cost;
        self.count += 1;
        self.next_cost += self.cost_step;
        Ok(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnm_core::CatalogConfig;

    #[test]
    fn price_rises_by_step_without_cap() {
        let mut yards = ConstructionYards::new(&CatalogConfig::default().yards);
        let mut bank = ResourceVector::gold(Decimal::from(31 + 41 + 51 + 61));
        for expected in 2..=5 {
            assert_eq!(yards.build(&mut bank).unwrap(), expected);
        }
        assert_eq!(bank, ResourceVector::ZERO);
        assert_eq!(yards.next_cost(), ResourceVector::gold(Decimal::from(71)));
        assert!(yards.build(&mut bank).is_err());
        assert_eq!(yards.count(), 5);
    }
}

//! Mine slots, their purchase pricing and the per-track upgrade ledger.

use mnm_core::{
    affordable, validate_mine_rules, CatalogRef, EngineError, EngineResult, MineLayoutEntry,
    MineRules, Resource, ResourceVector, ValidationError, RESOURCE_COUNT,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

/// A resource node of the map together with its per-game state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MineSlot {
    pub kind: Resource,
    /// Construction yards required to buy this mine.
    pub tier: u32,
    pub owned: bool,
    /// Upgrades bought per resource; index 0 is the gold track.
    pub upgrades: [u8; RESOURCE_COUNT],
    /// Yield per round; only the `kind` component is non-zero.
    pub income: ResourceVector,
}

impl MineSlot {
    /// Current per-round yield of the mine's own resource.
    pub fn output(&self) -> Decimal {
        self.income[self.kind]
    }

    pub fn upgrade_count(&self, resource: Resource) -> u8 {
        self.upgrades[resource.index()]
    }

    fn secondary_upgrades(&self) -> u32 {
        self.upgrades[1..].iter().map(|u| u32::from(*u)).sum()
    }
}

/// Price and availability of the next step on one (mine, resource) track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MineUpgradeEntry {
    pub cost: ResourceVector,
    pub available: bool,
}

/// Yield of a mine: `(base + gold upgrades) * (1 + bonus * secondary upgrades)`,
/// rounded half-to-even to one decimal place.
pub fn mine_output(rules: &MineRules, slot: &MineSlot) -> Decimal {
    let base = rules.base_incomes[slot.kind] + Decimal::from(slot.upgrades[0]);
    let multiplier = Decimal::ONE + rules.secondary_bonus * Decimal::from(slot.secondary_upgrades());
    (base * multiplier).round_dp(1)
}

/// Every mine of the map, the shared purchase counter and the upgrade ledger.
#[derive(Clone, Debug)]
pub struct MineCatalog {
    rules: MineRules,
    slots: Vec<MineSlot>,
    ledger: Vec<[MineUpgradeEntry; RESOURCE_COUNT]>,
    non_food_owned: usize,
}

impl MineCatalog {
    /// Rejects rules with an empty purchase or gold upgrade schedule, so every
    /// later schedule lookup has at least one entry to clamp to.
    pub fn new(rules: &MineRules, layout: &[MineLayoutEntry]) -> Result<Self, ValidationError> {
        validate_mine_rules(rules)?;
        let slots = layout
            .iter()
            .map(|entry| MineSlot {
                kind: entry.kind,
                tier: entry.tier,
                owned: false,
                upgrades: [0; RESOURCE_COUNT],
                income: ResourceVector::single(entry.kind, rules.base_incomes[entry.kind]),
            })
            .collect::<Vec<_>>();
        let ledger = slots
            .iter()
            .map(|slot| {
                let mut tracks = [MineUpgradeEntry {
                    cost: ResourceVector::ZERO,
                    available: false,
                }; RESOURCE_COUNT];
                for r in Resource::ALL {
                    tracks[r.index()].cost = match r {
                        Resource::Gold => {
                            ResourceVector::gold(rules.gold_schedule_for(slot.kind)[0])
                        }
                        _ => ResourceVector::single(r, rules.secondary_upgrade_costs[r]),
                    };
                }
                tracks
            })
            .collect();
        Ok(Self {
            rules: rules.clone(),
            slots,
            ledger,
            non_food_owned: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn rules(&self) -> &MineRules {
        &self.rules
    }

    pub fn slots(&self) -> &[MineSlot] {
        &self.slots
    }

    pub fn slot(&self, mine: usize) -> EngineResult<&MineSlot> {
        self.slots
            .get(mine)
            .ok_or(EngineError::InvalidCatalogReference(CatalogRef::Mine(mine)))
    }

    /// Ledger entry for one upgrade track.
    pub fn ledger_entry(&self, mine: usize, resource: Resource) -> EngineResult<&MineUpgradeEntry> {
        self.ledger
            .get(mine)
            .map(|tracks| &tracks[resource.index()])
            .ok_or(EngineError::InvalidCatalogReference(CatalogRef::Mine(mine)))
    }

    /// Non-Food mines bought so far; drives the purchase schedule.
    pub fn non_food_owned(&self) -> usize {
        self.non_food_owned
    }

    /// Gold price of the next non-Food mine.
    pub fn next_purchase_cost(&self) -> ResourceVector {
        let schedule = &self.rules.purchase_schedule;
        let last = schedule.len() - 1;
        ResourceVector::gold(schedule[self.non_food_owned.min(last)])
    }

    fn cost_for_kind(&self, kind: Resource) -> ResourceVector {
        if kind == Resource::Food {
            ResourceVector::gold(self.rules.food_purchase_cost)
        } else {
            self.next_purchase_cost()
        }
    }

    pub fn purchase_cost(&self, mine: usize) -> EngineResult<ResourceVector> {
        Ok(self.cost_for_kind(self.slot(mine)?.kind))
    }

    /// Purchase price of every slot, in catalog order.
    pub fn purchase_cost_rows(&self) -> Vec<ResourceVector> {
        self.slots.iter().map(|s| self.cost_for_kind(s.kind)).collect()
    }

    /// Buy a mine, paying from `bank`. Returns the income the mine adds.
    pub fn purchase(
        &mut self,
        mine: usize,
        yards: u32,
        bank: &mut ResourceVector,
    ) -> EngineResult<ResourceVector> {
        let slot = self.slot(mine)?;
        if slot.owned {
            return Err(EngineError::MineOwned { mine });
        }
        if slot.tier > yards {
            return Err(EngineError::MineLocked {
                mine,
                tier: slot.tier,
                yards,
            });
        }
        let cost = self.cost_for_kind(slot.kind);
        if !affordable(bank, &cost) {
            return Err(EngineError::Unaffordable { cost, bank: *bank });
        }

        *bank -= cost;
        let slot = &mut self.slots[mine];
        slot.owned = true;
        if slot.kind != Resource::Food {
            self.non_food_owned += 1;
        }
        for entry in self.ledger[mine].iter_mut() {
            entry.available = true;
        }
        Ok(slot.income)
    }

    /// Price of the next upgrade on a track, if the track is open.
    pub fn upgrade_cost(&self, mine: usize, resource: Resource) -> EngineResult<ResourceVector> {
        let slot = self.slot(mine)?;
        if !slot.owned {
            return Err(EngineError::MineNotOwned { mine });
        }
        let entry = self.ledger_entry(mine, resource)?;
        if !entry.available {
            return Err(EngineError::ExhaustedUpgradeTrack { mine, resource });
        }
        Ok(entry.cost)
    }

    /// Open upgrade tracks as `(mine, resource, cost)`, mine-major.
    pub fn open_upgrades(&self) -> impl Iterator<Item = (usize, Resource, ResourceVector)> + '_ {
        self.ledger.iter().enumerate().flat_map(|(mine, tracks)| {
            Resource::ALL
                .into_iter()
                .filter(move |r| tracks[r.index()].available)
                .map(move |r| (mine, r, tracks[r.index()].cost))
        })
    }

    /// Upgrade a mine on one track, paying from `bank`. Returns the income delta.
    pub fn upgrade(
        &mut self,
        mine: usize,
        resource: Resource,
        bank: &mut ResourceVector,
    ) -> EngineResult<ResourceVector> {
        let cost = self.upgrade_cost(mine, resource)?;
        if !affordable(bank, &cost) {
            return Err(EngineError::Unaffordable { cost, bank: *bank });
        }

        *bank -= cost;
        let slot = &mut self.slots[mine];
        let before = slot.income;
        slot.upgrades[resource.index()] += 1;
        let output = mine_output(&self.rules, slot);
        slot.income[slot.kind] = output;

        let entry = &mut self.ledger[mine][resource.index()];
        if resource == Resource::Gold {
            let level = usize::from(slot.upgrades[0]);
            match self.rules.gold_schedule_for(slot.kind).get(level) {
                Some(next) => entry.cost = ResourceVector::gold(*next),
                None => {
                    entry.available = false;
                    debug!(mine, kind = %slot.kind, "gold upgrade track exhausted");
                }
            }
        } else {
            entry.available = false;
        }
        Ok(slot.income - before)
    }

    /// Combined yield of all owned mines.
    pub fn owned_income(&self) -> ResourceVector {
        self.slots
            .iter()
            .filter(|s| s.owned)
            .fold(ResourceVector::ZERO, |acc, s| acc + s.income)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnm_core::CatalogConfig;

    fn catalog() -> MineCatalog {
        let cfg = CatalogConfig::default();
        MineCatalog::new(&cfg.mine_rules, &cfg.mines).unwrap()
    }

    fn rich_bank() -> ResourceVector {
        ResourceVector::from_units([10_000; RESOURCE_COUNT])
    }

    fn first_of(cat: &MineCatalog, kind: Resource) -> usize {
        cat.slots().iter().position(|s| s.kind == kind).unwrap()
    }

    #[test]
    fn purchase_schedule_advances_and_clamps() {
        let mut cat = catalog();
        let mut bank = rich_bank();
        let mut paid = Vec::new();
        let non_food: Vec<usize> = cat
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind != Resource::Food)
            .map(|(i, _)| i)
            .take(9)
            .collect();
        for id in non_food {
            let before = bank;
            cat.purchase(id, 5, &mut bank).unwrap();
            paid.push((before - bank)[Resource::Gold]);
        }
        let expected: Vec<Decimal> = [6, 10, 13, 16, 23, 27, 31, 31, 31]
            .into_iter()
            .map(Decimal::from)
            .collect();
        assert_eq!(paid, expected);
    }

    #[test]
    fn food_mines_cost_flat_and_do_not_advance_counter() {
        let mut cat = catalog();
        let mut bank = rich_bank();
        let food = first_of(&cat, Resource::Food);
        assert_eq!(cat.purchase_cost(food).unwrap(), ResourceVector::gold(Decimal::from(10)));
        cat.purchase(food, 1, &mut bank).unwrap();
        assert_eq!(cat.non_food_owned(), 0);
        assert_eq!(cat.next_purchase_cost(), ResourceVector::gold(Decimal::from(6)));
    }

    #[test]
    fn purchase_checks_preconditions_before_paying() {
        let mut cat = catalog();
        let mut bank = ResourceVector::from_units([5, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            cat.purchase(0, 1, &mut bank),
            Err(EngineError::Unaffordable {
                cost: ResourceVector::gold(Decimal::from(6)),
                bank,
            })
        );
        let tier_two = cat.slots().iter().position(|s| s.tier == 2).unwrap();
        assert!(matches!(
            cat.purchase(tier_two, 1, &mut bank),
            Err(EngineError::MineLocked { tier: 2, yards: 1, .. })
        ));
        assert_eq!(
            cat.purchase(99, 1, &mut bank),
            Err(EngineError::InvalidCatalogReference(CatalogRef::Mine(99)))
        );
        assert_eq!(bank, ResourceVector::from_units([5, 0, 0, 0, 0, 0, 0]));

        let mut bank = rich_bank();
        cat.purchase(0, 1, &mut bank).unwrap();
        assert_eq!(cat.purchase(0, 1, &mut bank), Err(EngineError::MineOwned { mine: 0 }));
    }

    #[test]
    fn unowned_mines_cannot_be_upgraded() {
        let cat = catalog();
        assert_eq!(
            cat.upgrade_cost(0, Resource::Gold),
            Err(EngineError::MineNotOwned { mine: 0 })
        );
        assert_eq!(cat.open_upgrades().count(), 0);
    }

    #[test]
    fn gold_track_follows_schedule_then_closes() {
        let mut cat = catalog();
        let mut bank = rich_bank();
        let metal = first_of(&cat, Resource::Metal);
        cat.purchase(metal, 1, &mut bank).unwrap();
        let mut outputs = Vec::new();
        for expected in [10, 16, 23, 31] {
            assert_eq!(
                cat.upgrade_cost(metal, Resource::Gold).unwrap(),
                ResourceVector::gold(Decimal::from(expected))
            );
            cat.upgrade(metal, Resource::Gold, &mut bank).unwrap();
            outputs.push(cat.slot(metal).unwrap().output());
        }
        assert_eq!(outputs, vec![2, 3, 4, 5].into_iter().map(Decimal::from).collect::<Vec<_>>());
        assert_eq!(
            cat.upgrade_cost(metal, Resource::Gold),
            Err(EngineError::ExhaustedUpgradeTrack {
                mine: metal,
                resource: Resource::Gold
            })
        );
    }

    #[test]
    fn mana_gold_track_has_five_steps() {
        let mut cat = catalog();
        let mut bank = rich_bank();
        let mana = first_of(&cat, Resource::Mana);
        cat.purchase(mana, 1, &mut bank).unwrap();
        for _ in 0..5 {
            cat.upgrade(mana, Resource::Gold, &mut bank).unwrap();
        }
        assert_eq!(cat.slot(mana).unwrap().upgrade_count(Resource::Gold), 5);
        assert_eq!(cat.slot(mana).unwrap().output(), Decimal::from(10));
        assert!(!cat.ledger_entry(mana, Resource::Gold).unwrap().available);
    }

    #[test]
    fn secondary_upgrades_are_one_shot_and_compound() {
        // Metal mine with two gold upgrades and food, metal, oil investments: 3 * 1.6 = 4.8.
        let mut cat = catalog();
        let mut bank = rich_bank();
        let metal = first_of(&cat, Resource::Metal);
        cat.purchase(metal, 1, &mut bank).unwrap();
        cat.upgrade(metal, Resource::Gold, &mut bank).unwrap();
        cat.upgrade(metal, Resource::Gold, &mut bank).unwrap();
        let before = bank;
        let delta = cat.upgrade(metal, Resource::Food, &mut bank).unwrap();
        assert_eq!(before - bank, ResourceVector::from_units([0, 7, 0, 0, 0, 0, 0]));
        assert_eq!(delta, ResourceVector::single(Resource::Metal, Decimal::new(6, 1)));
        cat.upgrade(metal, Resource::Metal, &mut bank).unwrap();
        cat.upgrade(metal, Resource::Oil, &mut bank).unwrap();
        assert_eq!(cat.slot(metal).unwrap().output(), Decimal::new(48, 1));
        assert!(matches!(
            cat.upgrade(metal, Resource::Food, &mut bank),
            Err(EngineError::ExhaustedUpgradeTrack { .. })
        ));
    }

    #[test]
    fn fully_upgraded_gold_mine_yields_twenty_two() {
        let mut cat = catalog();
        let mut bank = rich_bank();
        cat.purchase(0, 1, &mut bank).unwrap();
        for r in Resource::ALL {
            while cat.upgrade_cost(0, r).is_ok() {
                cat.upgrade(0, r, &mut bank).unwrap();
            }
        }
        // (6 + 4) * (1 + 0.2 * 6)
        assert_eq!(cat.slot(0).unwrap().output(), Decimal::from(22));
        assert_eq!(cat.owned_income(), ResourceVector::gold(Decimal::from(22)));
    }

    #[test]
    fn empty_schedules_are_rejected() {
        let cfg = CatalogConfig::default();
        let mut rules = cfg.mine_rules.clone();
        rules.purchase_schedule.clear();
        assert_eq!(
            MineCatalog::new(&rules, &cfg.mines).err(),
            Some(ValidationError::EmptySchedule("purchase_schedule"))
        );
        let mut rules = cfg.mine_rules.clone();
        rules.mana_gold_upgrade_schedule.clear();
        assert_eq!(
            MineCatalog::new(&rules, &cfg.mines).err(),
            Some(ValidationError::EmptySchedule("mana_gold_upgrade_schedule"))
        );
    }

    #[test]
    fn purchase_price_clamps_to_last_schedule_entry() {
        let cfg = CatalogConfig::default();
        let mut rules = cfg.mine_rules.clone();
        rules.purchase_schedule = vec![Decimal::from(6), Decimal::from(10)];
        let mut cat = MineCatalog::new(&rules, &cfg.mines).unwrap();
        let mut bank = rich_bank();
        for id in [0, 2, 3] {
            cat.purchase(id, 1, &mut bank).unwrap();
        }
        assert_eq!(cat.next_purchase_cost(), ResourceVector::gold(Decimal::from(10)));
    }
}

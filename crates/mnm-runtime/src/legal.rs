//! Family-local legality filters.
//!
//! Each family looks only at its own catalog plus bank, round and yard
//! count, builds one cost row per candidate and runs a single batched
//! affordability check. The results are unioned and mapped to universe
//! indices by [`legal_indices`].

use crate::universe::{Action, ActionUniverse};
use mnm_core::{affordable, affordable_mask, ResourceVector};
use mnm_econ::{ConstructionYards, MineCatalog, SendCatalog, UnitCatalog};
use tracing::warn;

/// Keep the candidates whose cost rows are affordable against `bank`.
fn keep_affordable(bank: &ResourceVector, candidates: Vec<(Action, ResourceVector)>) -> Vec<Action> {
    let rows: Vec<ResourceVector> = candidates.iter().map(|(_, cost)| *cost).collect();
    let mask = affordable_mask(bank, &rows);
    candidates
        .into_iter()
        .zip(mask)
        .filter_map(|((action, _), ok)| ok.then_some(action))
        .collect()
}

pub fn yard_actions(yards: &ConstructionYards, bank: &ResourceVector) -> Vec<Action> {
    if affordable(bank, &yards.next_cost()) {
        vec![Action::BuildYard]
    } else {
        Vec::new()
    }
}

pub fn unit_purchases(units: &UnitCatalog, bank: &ResourceVector) -> Vec<Action> {
    let candidates = units
        .entries()
        .iter()
        .enumerate()
        .map(|(id, e)| (Action::PurchaseUnit(id), e.purchase_cost()))
        .collect();
    keep_affordable(bank, candidates)
}

pub fn unit_upgrades(units: &UnitCatalog, bank: &ResourceVector) -> Vec<Action> {
    let candidates = units
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.base_count > 0)
        .map(|(id, e)| (Action::UpgradeUnit(id), e.upgrade_cost))
        .collect();
    keep_affordable(bank, candidates)
}

pub fn send_purchases(sends: &SendCatalog, round: u32, bank: &ResourceVector) -> Vec<Action> {
    let candidates = sends
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_unlocked(round))
        .map(|(id, s)| (Action::PurchaseSend(id), s.cost))
        .collect();
    keep_affordable(bank, candidates)
}

pub fn mine_purchases(mines: &MineCatalog, yards: u32, bank: &ResourceVector) -> Vec<Action> {
    let candidates = mines
        .slots()
        .iter()
        .zip(mines.purchase_cost_rows())
        .enumerate()
        .filter(|(_, (slot, _))| !slot.owned && slot.tier <= yards)
        .map(|(id, (_, cost))| (Action::PurchaseMine(id), cost))
        .collect();
    keep_affordable(bank, candidates)
}

pub fn mine_upgrades(mines: &MineCatalog, bank: &ResourceVector) -> Vec<Action> {
    let candidates = mines
        .open_upgrades()
        .map(|(mine, resource, cost)| (Action::UpgradeMine { mine, resource }, cost))
        .collect();
    keep_affordable(bank, candidates)
}

/// Map legal actions to universe indices, ascending.
pub fn legal_indices(universe: &ActionUniverse, actions: impl IntoIterator<Item = Action>) -> Vec<usize> {
    let mut indices: Vec<usize> = actions
        .into_iter()
        .filter_map(|action| {
            let index = universe.index_of(&action);
            if index.is_none() {
                warn!(?action, "legal action missing from universe");
            }
            index
        })
        .collect();
    indices.sort_unstable();
    indices
}

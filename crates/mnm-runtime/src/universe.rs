//! The action universe: every expressible action with a stable integer index.

use mnm_core::{Resource, RESOURCE_COUNT};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One action of the game, tagged by family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    NextRound,
    BuildYard,
    PurchaseUnit(usize),
    UpgradeUnit(usize),
    PurchaseSend(usize),
    PurchaseMine(usize),
    UpgradeMine { mine: usize, resource: Resource },
}

impl Action {
    /// Family tag, 0 (next round) through 6 (mine upgrade).
    pub fn family(&self) -> u8 {
        match self {
            Action::NextRound => 0,
            Action::BuildYard => 1,
            Action::PurchaseUnit(_) => 2,
            Action::UpgradeUnit(_) => 3,
            Action::PurchaseSend(_) => 4,
            Action::PurchaseMine(_) => 5,
            Action::UpgradeMine { .. } => 6,
        }
    }
}

/// Catalog sizes that determine the universe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogShape {
    /// Unit types; each contributes a purchase and an upgrade action.
    pub units: usize,
    /// Send types; one purchase action each.
    pub sends: usize,
    /// Mine slots; one purchase action plus one upgrade per resource.
    pub mines: usize,
}

impl CatalogShape {
    /// Shape of the built-in catalog.
    pub const DEFAULT: CatalogShape = CatalogShape {
        units: 4,
        sends: 20,
        mines: 35,
    };

    /// `2 + 2·units + sends + mines + 7·mines`.
    pub fn universe_len(&self) -> usize {
        2 + 2 * self.units + self.sends + self.mines + RESOURCE_COUNT * self.mines
    }
}

static DEFAULT_UNIVERSE: Lazy<Arc<ActionUniverse>> =
    Lazy::new(|| Arc::new(ActionUniverse::new(CatalogShape::DEFAULT)));

/// Immutable index <-> action mapping, built once and shared by every game
/// of the same catalog shape.
///
/// Order: next round, build yard, unit purchases, unit upgrades, sends, mine
/// purchases, then mine upgrades grouped by resource (every mine for Gold,
/// then every mine for Food, and so on).
#[derive(Debug)]
pub struct ActionUniverse {
    shape: CatalogShape,
    actions: Vec<Action>,
    index: HashMap<Action, usize>,
}

impl ActionUniverse {
    pub fn new(shape: CatalogShape) -> Self {
        let mut actions = Vec::with_capacity(shape.universe_len());
        actions.push(Action::NextRound);
        actions.push(Action::BuildYard);
        actions.extend((0..shape.units).map(Action::PurchaseUnit));
        actions.extend((0..shape.units).map(Action::UpgradeUnit));
        actions.extend((0..shape.sends).map(Action::PurchaseSend));
        actions.extend((0..shape.mines).map(Action::PurchaseMine));
        for resource in Resource::ALL {
            actions.extend((0..shape.mines).map(|mine| Action::UpgradeMine { mine, resource }));
        }
        let index = actions.iter().enumerate().map(|(i, a)| (*a, i)).collect();
        Self {
            shape,
            actions,
            index,
        }
    }

    /// Shared universe for `shape`; the default shape is built once per process.
    pub fn for_shape(shape: CatalogShape) -> Arc<Self> {
        if shape == CatalogShape::DEFAULT {
            Arc::clone(&DEFAULT_UNIVERSE)
        } else {
            Arc::new(Self::new(shape))
        }
    }

    pub fn shape(&self) -> CatalogShape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn action(&self, index: usize) -> Option<Action> {
        self.actions.get(index).copied()
    }

    pub fn index_of(&self, action: &Action) -> Option<usize> {
        self.index.get(action).copied()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_universe_has_expected_size() {
        let u = ActionUniverse::for_shape(CatalogShape::DEFAULT);
        assert_eq!(u.len(), 310);
        assert_eq!(u.len(), CatalogShape::DEFAULT.universe_len());
        assert!(Arc::ptr_eq(&u, &ActionUniverse::for_shape(CatalogShape::DEFAULT)));
    }

    #[test]
    fn index_mapping_is_bijective() {
        let u = ActionUniverse::new(CatalogShape::DEFAULT);
        for i in 0..u.len() {
            let action = u.action(i).unwrap();
            assert_eq!(u.index_of(&action), Some(i));
        }
        assert_eq!(u.index.len(), u.len());
        assert_eq!(u.action(u.len()), None);
    }

    #[test]
    fn families_are_laid_out_in_order() {
        let u = ActionUniverse::new(CatalogShape::DEFAULT);
        assert_eq!(u.action(0), Some(Action::NextRound));
        assert_eq!(u.action(1), Some(Action::BuildYard));
        assert_eq!(u.action(2), Some(Action::PurchaseUnit(0)));
        assert_eq!(u.action(6), Some(Action::UpgradeUnit(0)));
        assert_eq!(u.action(10), Some(Action::PurchaseSend(0)));
        assert_eq!(u.action(30), Some(Action::PurchaseMine(0)));
        assert_eq!(
            u.action(65),
            Some(Action::UpgradeMine {
                mine: 0,
                resource: Resource::Gold
            })
        );
        assert_eq!(
            u.action(100),
            Some(Action::UpgradeMine {
                mine: 0,
                resource: Resource::Food
            })
        );
        let tags: Vec<u8> = u.actions().iter().map(Action::family).collect();
        assert!(tags.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn custom_shape_builds_fresh_universe() {
        let shape = CatalogShape {
            units: 1,
            sends: 0,
            mines: 2,
        };
        let u = ActionUniverse::for_shape(shape);
        assert_eq!(u.len(), 2 + 2 + 0 + 2 + 14);
        assert_eq!(u.shape(), shape);
    }
}

//! Game state machine: bank, income, round and the per-game catalogs.

use crate::legal;
use crate::universe::{Action, ActionUniverse, CatalogShape};
use mnm_core::{
    validate_config, CatalogConfig, EngineError, EngineResult, GameRules, ResourceVector,
    ValidationError, RESOURCE_COUNT,
};
use mnm_econ::{ConstructionYards, MineCatalog, SendCatalog, UnitCatalog};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Length of [`Game::state_vector`]: bank, income and round.
pub const STATE_VECTOR_LEN: usize = 2 * RESOURCE_COUNT + 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    InProgress,
    Complete,
}

/// Catalog templates plus the shared action universe. Every game created
/// from a template gets its own clone of the catalogs.
#[derive(Clone, Debug)]
pub struct GameTemplate {
    rules: GameRules,
    yards: ConstructionYards,
    mines: MineCatalog,
    sends: SendCatalog,
    units: UnitCatalog,
    universe: Arc<ActionUniverse>,
}

impl GameTemplate {
    /// Validate `config`, then build the template. This is the only way to
    /// turn a configuration into games.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ValidationError> {
        validate_config(config)?;
        let shape = CatalogShape {
            units: config.units.len(),
            sends: config.sends.len(),
            mines: config.mines.len(),
        };
        Ok(Self {
            rules: config.rules.clone(),
            yards: ConstructionYards::new(&config.yards),
            mines: MineCatalog::new(&config.mine_rules, &config.mines)?,
            sends: SendCatalog::new(&config.sends),
            units: UnitCatalog::new(&config.units),
            universe: ActionUniverse::for_shape(shape),
        })
    }

    pub fn universe(&self) -> &Arc<ActionUniverse> {
        &self.universe
    }

    pub fn new_game(&self) -> Game {
        let mut game = Game {
            universe: Arc::clone(&self.universe),
            bank: self.rules.start_bank,
            income: self.rules.start_income,
            round: 1,
            final_round: self.rules.final_round,
            yards: self.yards.clone(),
            mines: self.mines.clone(),
            sends: self.sends.clone(),
            units: self.units.clone(),
            legal: Vec::new(),
            move_log: Vec::new(),
        };
        game.refresh_legal();
        game
    }
}

impl Default for GameTemplate {
    fn default() -> Self {
        Self::from_config(&CatalogConfig::default()).expect("built-in catalog is valid")
    }
}

/// One game of the economy phase.
#[derive(Clone, Debug)]
pub struct Game {
    universe: Arc<ActionUniverse>,
    bank: ResourceVector,
    income: ResourceVector,
    round: u32,
    final_round: u32,
    yards: ConstructionYards,
    mines: MineCatalog,
    sends: SendCatalog,
    units: UnitCatalog,
    legal: Vec<usize>,
    move_log: Vec<String>,
}

impl Default for Game {
    fn default() -> Self {
        GameTemplate::default().new_game()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bank(&self) -> &ResourceVector {
        &self.bank
    }

    pub fn income(&self) -> &ResourceVector {
        &self.income
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn final_round(&self) -> u32 {
        self.final_round
    }

    pub fn yards(&self) -> &ConstructionYards {
        &self.yards
    }

    pub fn mines(&self) -> &MineCatalog {
        &self.mines
    }

    pub fn sends(&self) -> &SendCatalog {
        &self.sends
    }

    pub fn units(&self) -> &UnitCatalog {
        &self.units
    }

    pub fn universe(&self) -> &Arc<ActionUniverse> {
        &self.universe
    }

    /// Descriptions of every applied action, oldest first.
    pub fn move_log(&self) -> &[String] {
        &self.move_log
    }

    pub fn phase(&self) -> Phase {
        if self.round >= self.final_round {
            Phase::Complete
        } else {
            Phase::InProgress
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == Phase::Complete
    }

    /// Currently legal universe indices, ascending. Empty once the game is complete.
    pub fn legal_actions(&self) -> &[usize] {
        &self.legal
    }

    pub fn is_legal(&self, index: usize) -> bool {
        self.legal.binary_search(&index).is_ok()
    }

    /// Army score: base units count 1, upgraded units count 10.
    pub fn score(&self) -> u64 {
        self.units.score()
    }

    /// Observation vector: bank (7), income (7), round (1).
    pub fn state_vector(&self) -> [f64; STATE_VECTOR_LEN] {
        let mut out = [0.0; STATE_VECTOR_LEN];
        out[..RESOURCE_COUNT].copy_from_slice(&self.bank.to_f64_array());
        out[RESOURCE_COUNT..2 * RESOURCE_COUNT].copy_from_slice(&self.income.to_f64_array());
        out[2 * RESOURCE_COUNT] = f64::from(self.round);
        out
    }

    fn refresh_legal(&mut self) {
        if self.is_complete() {
            self.legal.clear();
            return;
        }
        let bank = &self.bank;
        let actions = [Action::NextRound]
            .into_iter()
            .chain(legal::yard_actions(&self.yards, bank))
            .chain(legal::unit_purchases(&self.units, bank))
            .chain(legal::unit_upgrades(&self.units, bank))
            .chain(legal::send_purchases(&self.sends, self.round, bank))
            .chain(legal::mine_purchases(&self.mines, self.yards.count(), bank))
            .chain(legal::mine_upgrades(&self.mines, bank));
        self.legal = legal::legal_indices(&self.universe, actions);
    }

    /// Human-readable description of any universe index. Pure.
    pub fn describe(&self, index: usize) -> EngineResult<String> {
        let action = self
            .universe
            .action(index)
            .ok_or(EngineError::IllegalActionIndex { index })?;
        self.describe_action(action)
    }

    pub fn describe_action(&self, action: Action) -> EngineResult<String> {
        let text = match action {
            Action::NextRound => format!("Next round (collect {})", self.income),
            Action::BuildYard => format!(
                "Purchase construction yard {} for {}",
                self.yards.count() + 1,
                self.yards.next_cost()
            ),
            Action::PurchaseUnit(unit) => {
                let entry = self.units.get(unit)?;
                format!("Purchase {} for {}", entry.name, entry.purchase_cost())
            }
            Action::UpgradeUnit(unit) => {
                let entry = self.units.get(unit)?;
                format!("Upgrade {} for {}", entry.name, entry.upgrade_cost)
            }
            Action::PurchaseSend(send) => {
                let entry = self.sends.get(send)?;
                format!(
                    "Purchase {} (+{} gold/round) for {}",
                    entry.name,
                    entry.gold_income.normalize(),
                    entry.cost
                )
            }
            Action::PurchaseMine(mine) => {
                let slot = self.mines.slot(mine)?;
                format!(
                    "Purchase {} mine (ID {mine}, tier {}) for {}",
                    slot.kind,
                    slot.tier,
                    self.mines.purchase_cost(mine)?
                )
            }
            Action::UpgradeMine { mine, resource } => {
                let slot = self.mines.slot(mine)?;
                let entry = self.mines.ledger_entry(mine, resource)?;
                format!(
                    "Upgrade +{} {} mine (ID {mine}) with {resource} for {}",
                    slot.output().normalize(),
                    slot.kind,
                    entry.cost
                )
            }
        };
        Ok(text)
    }

    /// Apply a legal action and return its description.
    ///
    /// Rejects any index that is not in [`Game::legal_actions`] without
    /// touching the state.
    pub fn apply(&mut self, index: usize) -> EngineResult<String> {
        if !self.is_legal(index) {
            warn!(index, round = self.round, "rejected illegal action");
            return Err(EngineError::IllegalActionIndex { index });
        }
        let action = self
            .universe
            .action(index)
            .ok_or(EngineError::IllegalActionIndex { index })?;
        let description = self.dispatch(action)?;
        debug!(index, ?action, %description, "applied action");
        self.move_log.push(description.clone());
        self.refresh_legal();
        Ok(description)
    }

    fn dispatch(&mut self, action: Action) -> EngineResult<String> {
        match action {
            Action::NextRound => {
                self.bank += self.income;
                self.round += 1;
                if self.is_complete() {
                    info!(bank = %self.bank, income = %self.income, score = self.score(), "economy phase complete");
                } else {
                    info!(round = self.round, bank = %self.bank, "advanced round");
                }
                Ok(format!("Proceeded to round {}", self.round))
            }
            Action::BuildYard => {
                let count = self.yards.build(&mut self.bank)?;
                Ok(format!("Built construction yard {count}"))
            }
            Action::PurchaseUnit(unit) => {
                let name = self.units.get(unit)?.name.clone();
                self.units.purchase(unit, &mut self.bank)?;
                Ok(format!("Purchased {name}"))
            }
            Action::UpgradeUnit(unit) => {
                let name = self.units.get(unit)?.name.clone();
                self.units.upgrade(unit, &mut self.bank)?;
                Ok(format!("Upgraded {name}"))
            }
            Action::PurchaseSend(send) => {
                let name = self.sends.get(send)?.name.clone();
                let delta = self.sends.purchase(send, self.round, &mut self.bank)?;
                self.income += delta;
                Ok(format!("Purchased send {name}"))
            }
            Action::PurchaseMine(mine) => {
                let delta = self.mines.purchase(mine, self.yards.count(), &mut self.bank)?;
                self.income += delta;
                let kind = self.mines.slot(mine)?.kind;
                Ok(format!("Purchased {kind} mine (ID {mine})"))
            }
            Action::UpgradeMine { mine, resource } => {
                let delta = self.mines.upgrade(mine, resource, &mut self.bank)?;
                self.income += delta;
                let slot = self.mines.slot(mine)?;
                Ok(format!(
                    "Upgraded {} mine (ID {mine}) with {resource}, now +{}",
                    slot.kind,
                    slot.output().normalize()
                ))
            }
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Round {}: bank {}, income +{}, {} yard(s)",
            self.round,
            self.bank,
            self.income,
            self.yards.count()
        )
    }
}

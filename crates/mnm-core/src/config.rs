//! Catalog configuration: every cost table, schedule and starting value of a game.
//!
//! [`CatalogConfig::default`] is the built-in map. The same data can be
//! supplied as YAML (see `assets/catalog.yaml`) and is validated on load.

use crate::resources::{Resource, ResourceVector};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Starting position and game length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    /// Bank at round 1.
    pub start_bank: ResourceVector,
    /// Income at round 1, before any purchase.
    pub start_income: ResourceVector,
    /// First round that is no longer played (38 means rounds 1..=37).
    pub final_round: u32,
}

/// Construction yard pricing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YardRules {
    pub initial_count: u32,
    /// Gold price of the first extra yard.
    pub initial_cost: Decimal,
    /// Gold added to the price after each yard.
    pub cost_step: Decimal,
}

/// Mine pricing and yield tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineRules {
    /// Gold price of the k-th non-Food mine; the last entry repeats forever.
    pub purchase_schedule: Vec<Decimal>,
    /// Flat gold price of every Food mine.
    pub food_purchase_cost: Decimal,
    /// Unupgraded yield per mine kind.
    pub base_incomes: ResourceVector,
    /// Gold upgrade prices for every kind except Mana.
    pub gold_upgrade_schedule: Vec<Decimal>,
    /// Gold upgrade prices for Mana mines.
    pub mana_gold_upgrade_schedule: Vec<Decimal>,
    /// Price of the one-shot upgrade paid in each secondary resource.
    /// The Gold component is ignored.
    pub secondary_upgrade_costs: ResourceVector,
    /// Yield multiplier added per secondary upgrade (0.2 = +20%).
    pub secondary_bonus: Decimal,
}

impl MineRules {
    pub fn gold_schedule_for(&self, kind: Resource) -> &[Decimal] {
        if kind == Resource::Mana {
            &self.mana_gold_upgrade_schedule
        } else {
            &self.gold_upgrade_schedule
        }
    }
}

/// One resource node of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineLayoutEntry {
    pub kind: Resource,
    /// Construction yards required before the mine can be bought.
    pub tier: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SendSpec {
    pub name: String,
    pub unlock_round: u32,
    /// Permanent gold income gained per purchase.
    pub gold_income: Decimal,
    pub cost: ResourceVector,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    /// Paid once, together with the first build.
    pub research_cost: ResourceVector,
    pub build_cost: ResourceVector,
    pub upgrade_cost: ResourceVector,
}

/// Complete template from which every game instance clones its catalogs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub rules: GameRules,
    pub yards: YardRules,
    pub mine_rules: MineRules,
    pub mines: Vec<MineLayoutEntry>,
    pub sends: Vec<SendSpec>,
    pub units: Vec<UnitSpec>,
}

/// Validation errors for catalog invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// The game must last at least one round.
    #[error("final round must be > 1, got {0}")]
    InvalidFinalRound(u32),
    /// A game starts with at least one construction yard.
    #[error("initial construction yard count must be >= 1")]
    NoInitialYard,
    #[error("schedule `{0}` is empty")]
    EmptySchedule(&'static str),
    #[error("negative value in {0}")]
    NegativeValue(String),
    /// `table` is `"sends"` or `"units"`.
    #[error("{table} entry {index} has an empty name")]
    EmptyName { table: &'static str, index: usize },
    #[error("mine {0} has tier 0; tiers start at 1")]
    InvalidTier(usize),
}

/// Errors from reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(String),
    #[error("yaml error: {0}")]
    Yaml(String),
    #[error("invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e.to_string())
    }
}

fn units(v: i64) -> Decimal {
    Decimal::from(v)
}

fn schedule(values: &[i64]) -> Vec<Decimal> {
    values.iter().copied().map(units).collect()
}

fn send(name: &str, unlock_round: u32, tenths: i64, cost: [i64; 7]) -> SendSpec {
    SendSpec {
        name: name.to_string(),
        unlock_round,
        gold_income: Decimal::new(tenths, 1),
        cost: ResourceVector::from_units(cost),
    }
}

fn unit(name: &str, research: [i64; 7], build: [i64; 7], upgrade: [i64; 7]) -> UnitSpec {
    UnitSpec {
        name: name.to_string(),
        research_cost: ResourceVector::from_units(research),
        build_cost: ResourceVector::from_units(build),
        upgrade_cost: ResourceVector::from_units(upgrade),
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let mines = (1..=5)
            .flat_map(|tier| Resource::ALL.into_iter().map(move |kind| MineLayoutEntry { kind, tier }))
            .collect();
        Self {
            rules: GameRules {
                start_bank: ResourceVector::from_units([60, 0, 0, 0, 0, 0, 0]),
                start_income: ResourceVector::from_units([16, 0, 0, 0, 0, 0, 0]),
                final_round: 38,
            },
            yards: YardRules {
                initial_count: 1,
                initial_cost: units(31),
                cost_step: units(10),
            },
            mine_rules: MineRules {
                purchase_schedule: schedule(&[6, 10, 13, 16, 23, 27, 31]),
                food_purchase_cost: units(10),
                base_incomes: ResourceVector::from_units([6, 1, 1, 5, 1, 1, 1]),
                gold_upgrade_schedule: schedule(&[10, 16, 23, 31]),
                mana_gold_upgrade_schedule: schedule(&[6, 10, 16, 23, 31]),
                secondary_upgrade_costs: ResourceVector::from_units([0, 7, 7, 18, 5, 5, 5]),
                secondary_bonus: Decimal::new(2, 1),
            },
            mines,
            sends: vec![
                send("Fat Ling", 1, 7, [0, 3, 0, 0, 0, 0, 0]),
                send("Acid Ling", 1, 6, [0, 0, 3, 0, 0, 0, 0]),
                send("Drone Ling", 1, 7, [0, 0, 0, 9, 0, 0, 0]),
                send("Zealot", 5, 25, [0, 9, 0, 0, 0, 0, 0]),
                send("Marine", 5, 22, [0, 0, 9, 0, 0, 0, 0]),
                send("Slime", 5, 22, [0, 0, 0, 26, 0, 0, 0]),
                send("Mechanical Ling", 6, 15, [0, 0, 0, 0, 5, 0, 0]),
                send("Pink Crystaling", 6, 15, [0, 0, 0, 0, 0, 5, 0]),
                send("Scorpion", 6, 15, [0, 0, 0, 0, 0, 0, 5]),
                send("Laserbot", 7, 44, [0, 0, 0, 0, 7, 7, 0]),
                send("Hellion", 7, 44, [0, 0, 0, 0, 7, 0, 7]),
                send("Pink Crystalisk", 7, 38, [0, 0, 0, 0, 0, 7, 7]),
                send("Roach", 10, 55, [0, 18, 0, 0, 0, 0, 0]),
                send("Dark Reaper", 10, 48, [0, 0, 18, 0, 0, 0, 0]),
                send("Queen", 10, 55, [0, 0, 0, 50, 0, 0, 0]),
                send("Lurker", 17, 70, [0, 25, 0, 12, 0, 0, 0]),
                send("Mutalisk", 17, 70, [0, 0, 25, 12, 0, 0, 0]),
                send("Mule", 17, 70, [0, 0, 0, 10, 20, 0, 0]),
                send("Diamonster", 17, 70, [0, 0, 0, 10, 0, 20, 0]),
                send("Voidray", 17, 70, [0, 0, 0, 20, 0, 0, 20]),
            ],
            units: vec![
                unit(
                    "Anubis",
                    [91, 55, 0, 0, 0, 0, 5],
                    [140, 40, 0, 30, 0, 0, 5],
                    [150, 50, 0, 40, 0, 0, 10],
                ),
                unit(
                    "Sun Idol",
                    [128, 0, 57, 0, 0, 0, 5],
                    [110, 0, 25, 30, 0, 5, 5],
                    [110, 0, 15, 30, 0, 10, 10],
                ),
                unit(
                    "Conjurer",
                    [150, 0, 0, 120, 0, 0, 10],
                    [60, 0, 0, 60, 0, 0, 4],
                    [100, 0, 0, 110, 0, 0, 10],
                ),
                unit(
                    "Robotron",
                    [157, 0, 40, 0, 56, 0, 5],
                    [148, 0, 20, 0, 20, 5, 5],
                    [176, 0, 20, 0, 20, 5, 5],
                ),
            ],
        }
    }
}

impl CatalogConfig {
    /// Parse and validate a YAML catalog.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: CatalogConfig = serde_yaml::from_str(text)?;
        validate_config(&cfg)?;
        Ok(cfg)
    }
}

/// Read, parse and validate a YAML catalog file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig, ConfigError> {
    let text = fs::read_to_string(path.as_ref())?;
    let cfg = CatalogConfig::from_yaml_str(&text)?;
    info!(
        path = %path.as_ref().display(),
        mines = cfg.mines.len(),
        sends = cfg.sends.len(),
        units = cfg.units.len(),
        "loaded catalog"
    );
    Ok(cfg)
}

fn check_vector(v: &ResourceVector, what: impl FnOnce() -> String) -> Result<(), ValidationError> {
    if v.is_nonnegative() {
        Ok(())
    } else {
        Err(ValidationError::NegativeValue(what()))
    }
}

fn check_schedule(values: &[Decimal], name: &'static str) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::EmptySchedule(name));
    }
    if values.iter().any(|v| *v < Decimal::ZERO) {
        return Err(ValidationError::NegativeValue(name.to_string()));
    }
    Ok(())
}

fn check_amount(v: Decimal, name: &str) -> Result<(), ValidationError> {
    if v < Decimal::ZERO {
        return Err(ValidationError::NegativeValue(name.to_string()));
    }
    Ok(())
}

/// Validate the game rules.
pub fn validate_rules(rules: &GameRules) -> Result<(), ValidationError> {
    if rules.final_round <= 1 {
        return Err(ValidationError::InvalidFinalRound(rules.final_round));
    }
    check_vector(&rules.start_bank, || "start_bank".into())?;
    check_vector(&rules.start_income, || "start_income".into())
}

/// Validate mine pricing tables.
pub fn validate_mine_rules(m: &MineRules) -> Result<(), ValidationError> {
    check_schedule(&m.purchase_schedule, "purchase_schedule")?;
    check_schedule(&m.gold_upgrade_schedule, "gold_upgrade_schedule")?;
    check_schedule(&m.mana_gold_upgrade_schedule, "mana_gold_upgrade_schedule")?;
    check_amount(m.food_purchase_cost, "food_purchase_cost")?;
    check_amount(m.secondary_bonus, "secondary_bonus")?;
    check_vector(&m.base_incomes, || "base_incomes".into())?;
    check_vector(&m.secondary_upgrade_costs, || "secondary_upgrade_costs".into())
}

/// Validate the whole catalog.
pub fn validate_config(cfg: &CatalogConfig) -> Result<(), ValidationError> {
    validate_rules(&cfg.rules)?;
    if cfg.yards.initial_count == 0 {
        return Err(ValidationError::NoInitialYard);
    }
    check_amount(cfg.yards.initial_cost, "yards.initial_cost")?;
    check_amount(cfg.yards.cost_step, "yards.cost_step")?;
    validate_mine_rules(&cfg.mine_rules)?;
    for (i, m) in cfg.mines.iter().enumerate() {
        if m.tier == 0 {
            return Err(ValidationError::InvalidTier(i));
        }
    }
    for (i, s) in cfg.sends.iter().enumerate() {
        if s.name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                table: "sends",
                index: i,
            });
        }
        check_amount(s.gold_income, &s.name)?;
        check_vector(&s.cost, || format!("send {}", s.name))?;
    }
    for (i, u) in cfg.units.iter().enumerate() {
        if u.name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                table: "units",
                index: i,
            });
        }
        check_vector(&u.research_cost, || format!("unit {} research", u.name))?;
        check_vector(&u.build_cost, || format!("unit {} build", u.name))?;
        check_vector(&u.upgrade_cost, || format!("unit {} upgrade", u.name))?;
    }
    Ok(())
}

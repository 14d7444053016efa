#![deny(warnings)]

//! Policies and rollouts over the economy engine.
//!
//! Provides the reward surface external trainers consume, a seeded random
//! policy, a greedy "eco" policy and a rollout driver that steps a game the
//! way an environment would be stepped.

use mnm_core::{EngineError, ResourceVector};
use mnm_runtime::{Action, Game};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

/// Reward for one step: change in army score.
pub fn reward(prev_score: u64, score: u64) -> f64 {
    score as f64 - prev_score as f64
}

/// Chooses one of the game's legal action indices.
pub trait Policy {
    /// `None` ends the rollout.
    fn choose(&mut self, game: &Game) -> Option<usize>;
}

/// Uniform choice among legal actions, with a separate probability of
/// ending the round so rollouts do not stall on cheap purchases.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
    next_round_prob: f64,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self::with_next_round_prob(seed, 0.25)
    }

    /// `next_round_prob` is clamped to [0, 1].
    pub fn with_next_round_prob(seed: u64, next_round_prob: f64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_round_prob: next_round_prob.clamp(0.0, 1.0),
        }
    }
}

impl Policy for RandomPolicy {
    fn choose(&mut self, game: &Game) -> Option<usize> {
        let legal = game.legal_actions();
        let (&first, rest) = legal.split_first()?;
        // Index 0 is NextRound and always first while the game is running.
        if rest.is_empty() || self.rng.gen_bool(self.next_round_prob) {
            return Some(first);
        }
        Some(rest[self.rng.gen_range(0..rest.len())])
    }
}

/// Greedy economy: reinvest in mines, sends and yards, then turn the bank
/// into units from `army_round` on.
#[derive(Debug, Clone, Copy)]
pub struct EcoPolicy {
    pub army_round: u32,
    pub max_yards: u32,
}

impl Default for EcoPolicy {
    fn default() -> Self {
        Self {
            army_round: 30,
            max_yards: 5,
        }
    }
}

impl EcoPolicy {
    fn priority(&self, game: &Game, action: Action) -> Option<u8> {
        let army = game.round() >= self.army_round;
        match action {
            Action::UpgradeUnit(_) if army => Some(0),
            Action::PurchaseUnit(_) if army => Some(1),
            Action::PurchaseMine(_) => Some(2),
            Action::UpgradeMine { .. } => Some(3),
            Action::PurchaseSend(_) => Some(4),
            Action::BuildYard if game.yards().count() < self.max_yards => Some(5),
            Action::NextRound => Some(9),
            _ => None,
        }
    }
}

impl Policy for EcoPolicy {
    fn choose(&mut self, game: &Game) -> Option<usize> {
        let universe = game.universe();
        game.legal_actions()
            .iter()
            .filter_map(|&index| {
                let action = universe.action(index)?;
                self.priority(game, action).map(|p| (p, index))
            })
            .min()
            .map(|(_, index)| index)
    }
}

/// Outcome of a rollout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RolloutSummary {
    pub rounds: u32,
    pub steps: usize,
    pub bank: ResourceVector,
    pub income: ResourceVector,
    pub score: u64,
    pub total_reward: f64,
    pub complete: bool,
}

/// Step `game` with `policy` until it completes, the policy stops, or
/// `max_steps` actions have been applied.
pub fn rollout<P: Policy>(
    game: &mut Game,
    policy: &mut P,
    max_steps: usize,
) -> Result<RolloutSummary, EngineError> {
    let mut steps = 0;
    let mut total_reward = 0.0;
    while steps < max_steps && !game.is_complete() {
        let Some(index) = policy.choose(game) else {
            break;
        };
        let prev = game.score();
        let description = game.apply(index)?;
        total_reward += reward(prev, game.score());
        steps += 1;
        debug!(step = steps, %description, "rollout step");
    }
    let summary = RolloutSummary {
        rounds: game.round(),
        steps,
        bank: *game.bank(),
        income: *game.income(),
        score: game.score(),
        total_reward,
        complete: game.is_complete(),
    };
    info!(
        rounds = summary.rounds,
        steps = summary.steps,
        score = summary.score,
        "rollout finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnm_core::{Resource, RESOURCE_COUNT};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    #[test]
    fn reward_is_score_delta() {
        assert_eq!(reward(3, 14), 11.0);
        assert_eq!(reward(5, 5), 0.0);
    }

    #[test]
    fn next_round_only_policy_plays_to_the_end() {
        let mut game = Game::new();
        let mut policy = RandomPolicy::with_next_round_prob(1, 1.0);
        let summary = rollout(&mut game, &mut policy, 1_000).unwrap();
        assert!(summary.complete);
        assert_eq!(summary.steps, 37);
        assert_eq!(summary.rounds, 38);
        assert_eq!(summary.bank[Resource::Gold], Decimal::from(652));
    }

    #[test]
    fn random_rollouts_are_deterministic_per_seed() {
        let mut a = Game::new();
        let mut b = Game::new();
        rollout(&mut a, &mut RandomPolicy::new(7), 5_000).unwrap();
        rollout(&mut b, &mut RandomPolicy::new(7), 5_000).unwrap();
        assert_eq!(a.move_log(), b.move_log());
        assert_eq!(a.state_vector(), b.state_vector());
    }

    #[test]
    fn eco_policy_grows_the_economy() {
        let mut game = Game::new();
        let summary = rollout(&mut game, &mut EcoPolicy::default(), 10_000).unwrap();
        assert!(summary.complete);
        assert!(summary.income[Resource::Gold] > Decimal::from(16));
        assert!(game.mines().slots().iter().filter(|s| s.owned).count() > 7);
        assert!(summary.income.iter().skip(1).any(|(_, v)| v > Decimal::ZERO));
    }

    #[test]
    fn policies_stop_on_finished_game() {
        let mut game = Game::new();
        rollout(&mut game, &mut RandomPolicy::with_next_round_prob(0, 1.0), 100).unwrap();
        assert_eq!(RandomPolicy::new(0).choose(&game), None);
        assert_eq!(EcoPolicy::default().choose(&game), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn random_play_preserves_invariants(seed in any::<u64>(), p in 0.05f64..0.6) {
            let mut game = Game::new();
            let mut policy = RandomPolicy::with_next_round_prob(seed, p);
            let mut prev_income = *game.income();
            let mut prev_round = game.round();
            for _ in 0..3_000 {
                let Some(index) = policy.choose(&game) else { break };
                prop_assert!(game.is_legal(index));
                let before_bank = *game.bank();
                let before_income = *game.income();
                game.apply(index).unwrap();

                prop_assert!(game.bank().is_nonnegative());
                if game.round() == prev_round + 1 {
                    prop_assert_eq!(*game.bank(), before_bank + before_income);
                } else {
                    prop_assert_eq!(game.round(), prev_round);
                }
                for r in 0..RESOURCE_COUNT {
                    prop_assert!(game.income().0[r] >= prev_income.0[r]);
                }
                for slot in game.mines().slots() {
                    let cap = if slot.kind == Resource::Mana { 5 } else { 4 };
                    prop_assert!(slot.upgrade_count(Resource::Gold) <= cap);
                    prop_assert!(slot.upgrades[1..].iter().all(|u| *u <= 1));
                }
                for &legal in game.legal_actions() {
                    let action = game.universe().action(legal).unwrap();
                    prop_assert_eq!(game.universe().index_of(&action), Some(legal));
                }
                prev_income = *game.income();
                prev_round = game.round();
            }
        }
    }
}

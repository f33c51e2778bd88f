use log::debug;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::config::TieBreak;
use crate::game::{GameState, PacmanFeatures};

use super::evaluation::feature_score;
use super::{select_best, Agent, PACMAN_INDEX};

/// Reflex Agent
/// Looks one Pacman move ahead and scores each successor with the feature formula
pub struct ReflexAgent {
    tie_break: TieBreak,
    rng: XorShiftRng,
}

impl ReflexAgent {
    pub fn new() -> Self {
        ReflexAgent {
            tie_break: TieBreak::Random,
            rng: XorShiftRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        ReflexAgent {
            tie_break: TieBreak::Random,
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Desirability of taking `action` from `state`.
    pub fn evaluate_action<S>(&self, state: &S, action: S::Action) -> f64
    where
        S: GameState + PacmanFeatures,
    {
        let successor = state.generate_successor(PACMAN_INDEX, action);
        feature_score(&successor)
    }
}

impl<S> Agent<S> for ReflexAgent
where
    S: GameState + PacmanFeatures,
{
    fn get_action(&mut self, state: &S) -> Option<S::Action> {
        let actions = state.legal_actions(PACMAN_INDEX);
        let scores: Vec<f64> = actions
            .iter()
            .map(|&action| self.evaluate_action(state, action))
            .collect();

        let best = select_best(&actions, &scores, self.tie_break, &mut self.rng);
        if let Some((action, score)) = best {
            debug!("reflex chose {:?} (score {})", action, score);
        }
        best.map(|(action, _)| action)
    }
}

impl Default for ReflexAgent {
    fn default() -> Self {
        Self::new()
    }
}

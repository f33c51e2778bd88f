// Agents module - Adversarial search agents for multi-agent games
//
// Every agent here plays as agent 0 (the maximizer) and consumes the game
// only through the `GameState` trait.

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{SearchConfig, TieBreak};
use crate::errors::{ConfigError, ConfigResult};
use crate::game::{GameState, PacmanFeatures};

pub mod alpha_beta;
pub mod evaluation;
pub mod expectimax;
pub mod minimax;
pub mod reflex;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::alpha_beta::AlphaBetaAgent;
pub use self::evaluation::{EvaluationFunction, Evaluator};
pub use self::expectimax::ExpectimaxAgent;
pub use self::minimax::MinimaxAgent;
pub use self::reflex::ReflexAgent;

/// The maximizing agent. Ghosts occupy indices `1..num_agents`.
pub const PACMAN_INDEX: usize = 0;

/// Trait implemented by every decision-making agent
pub trait Agent<S: GameState> {
    /// Decides the next action for agent 0, or `None` when it has no legal move.
    fn get_action(&mut self, state: &S) -> Option<S::Action>;
}

/// Summary of the most recent root decision of a search agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStats {
    /// Value backed up to the root (static evaluation when no move exists).
    pub value: f64,
    /// Nodes whose successors were generated during the search.
    pub nodes_expanded: u64,
}

/// Agent index and remaining depth for the children of `agent_index`.
///
/// One unit of depth is a full round, so depth only drops when play wraps
/// back to agent 0.
pub(crate) fn next_ply(agent_index: usize, depth: usize, num_agents: usize) -> (usize, usize) {
    let next_index = (agent_index + 1) % num_agents.max(1);
    let next_depth = if next_index == PACMAN_INDEX {
        depth.saturating_sub(1)
    } else {
        depth
    };
    (next_index, next_depth)
}

/// Picks the best-scoring action, resolving ties per `tie_break`.
pub(crate) fn select_best<A: Copy, R: Rng>(
    actions: &[A],
    scores: &[f64],
    tie_break: TieBreak,
    rng: &mut R,
) -> Option<(A, f64)> {
    let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let tied = scores.iter().positions(|&score| score == best).collect_vec();
    let chosen = match tie_break {
        TieBreak::First => tied.first().copied(),
        TieBreak::Random => tied.choose(rng).copied(),
    }?;
    Some((actions[chosen], best))
}

/// Builds boxed search agents by name
pub struct AgentFactory;

impl AgentFactory {
    /// Accepted names: `reflex`, `minimax`, `alphabeta` (or `alpha-beta`), `expectimax`.
    /// Without a seed the agent's RNG is seeded from entropy.
    pub fn create<S>(
        kind: &str,
        config: SearchConfig,
        seed: Option<u64>,
    ) -> ConfigResult<Box<dyn Agent<S>>>
    where
        S: GameState + PacmanFeatures,
    {
        config.validate()?;
        let agent: Box<dyn Agent<S>> = match kind {
            "reflex" => {
                let agent = seed.map_or_else(ReflexAgent::new, ReflexAgent::with_seed);
                Box::new(agent.with_tie_break(config.tie_break.unwrap_or(TieBreak::Random)))
            }
            "minimax" => {
                let agent = MinimaxAgent::new(config);
                Box::new(match seed {
                    Some(seed) => agent.seeded(seed),
                    None => agent,
                })
            }
            "alphabeta" | "alpha-beta" => {
                let agent = AlphaBetaAgent::new(config);
                Box::new(match seed {
                    Some(seed) => agent.seeded(seed),
                    None => agent,
                })
            }
            "expectimax" => {
                let agent = ExpectimaxAgent::new(config);
                Box::new(match seed {
                    Some(seed) => agent.seeded(seed),
                    None => agent,
                })
            }
            _ => return Err(ConfigError::unknown_agent(kind)),
        };
        Ok(agent)
    }
}

use log::debug;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::config::{SearchConfig, TieBreak};
use crate::game::GameState;

use super::evaluation::{EvaluationFunction, Evaluator};
use super::{next_ply, select_best, Agent, SearchStats, PACMAN_INDEX};

/// Expectimax Agent
/// Ghosts are chance nodes that pick uniformly among their legal moves
pub struct ExpectimaxAgent<E = EvaluationFunction> {
    depth: usize,
    evaluator: E,
    tie_break: TieBreak,
    rng: XorShiftRng,
    nodes_expanded: u64,
    last_search: Option<SearchStats>,
}

impl ExpectimaxAgent<EvaluationFunction> {
    pub fn new(config: SearchConfig) -> Self {
        Self::with_evaluator(config.depth, config.evaluation)
            .with_tie_break(config.tie_break.unwrap_or(TieBreak::Random))
    }

    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self::new(config).seeded(seed)
    }
}

impl<E> ExpectimaxAgent<E> {
    pub fn with_evaluator(depth: usize, evaluator: E) -> Self {
        ExpectimaxAgent {
            depth,
            evaluator,
            tie_break: TieBreak::Random,
            rng: XorShiftRng::from_entropy(),
            nodes_expanded: 0,
            last_search: None,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = XorShiftRng::seed_from_u64(seed);
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn last_search(&self) -> Option<SearchStats> {
        self.last_search
    }

    pub fn expectimax<S>(&mut self, state: &S, depth: usize, agent_index: usize) -> f64
    where
        S: GameState,
        E: Evaluator<S>,
    {
        if state.is_win() || state.is_lose() || depth == 0 {
            return self.evaluator.evaluate(state);
        }

        let actions = state.legal_actions(agent_index);
        if actions.is_empty() {
            return self.evaluator.evaluate(state);
        }

        self.nodes_expanded += 1;
        let (next_index, next_depth) = next_ply(agent_index, depth, state.num_agents());
        let count = actions.len() as f64;
        let scores = actions.into_iter().map(|action| {
            let successor = state.generate_successor(agent_index, action);
            self.expectimax(&successor, next_depth, next_index)
        });

        if agent_index == PACMAN_INDEX {
            scores.fold(f64::NEG_INFINITY, f64::max)
        } else {
            scores.sum::<f64>() / count
        }
    }
}

impl<S, E> Agent<S> for ExpectimaxAgent<E>
where
    S: GameState,
    E: Evaluator<S>,
{
    fn get_action(&mut self, state: &S) -> Option<S::Action> {
        self.nodes_expanded = 0;

        let actions = if state.is_terminal() {
            Vec::new()
        } else {
            state.legal_actions(PACMAN_INDEX)
        };
        let (next_index, next_depth) = next_ply(PACMAN_INDEX, self.depth, state.num_agents());
        if !actions.is_empty() {
            self.nodes_expanded += 1;
        }
        let scores: Vec<f64> = actions
            .iter()
            .map(|&action| {
                let successor = state.generate_successor(PACMAN_INDEX, action);
                self.expectimax(&successor, next_depth, next_index)
            })
            .collect();

        let best = select_best(&actions, &scores, self.tie_break, &mut self.rng);
        let value = best.map_or_else(|| self.evaluator.evaluate(state), |(_, value)| value);
        debug!(
            "expectimax chose {:?} (value {}, depth {}, {} nodes expanded)",
            best.map(|(action, _)| action),
            value,
            self.depth,
            self.nodes_expanded
        );
        self.last_search = Some(SearchStats {
            value,
            nodes_expanded: self.nodes_expanded,
        });

        best.map(|(action, _)| action)
    }
}

impl Default for ExpectimaxAgent<EvaluationFunction> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

// Game collaborator interface for the adversarial search agents.
//
// The search core only ever talks to a game through these traits, so any
// engine (the demo Pacman board, a hand-built test tree, ...) can be plugged in.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::enums::Position;

/// A multi-agent, turn-based game state.
///
/// Agent 0 is the maximizer; agents `1..num_agents()` are ghosts. States are
/// immutable from the search's point of view: `generate_successor` returns a
/// fresh state and leaves `self` untouched.
pub trait GameState: Clone {
    type Action: Copy + PartialEq + Debug;

    /// Legal actions for `agent_index`. Empty once the game is over.
    fn legal_actions(&self, agent_index: usize) -> Vec<Self::Action>;

    fn generate_successor(&self, agent_index: usize, action: Self::Action) -> Self;

    fn num_agents(&self) -> usize;

    fn is_win(&self) -> bool;

    fn is_lose(&self) -> bool;

    fn score(&self) -> f64;

    fn is_terminal(&self) -> bool {
        self.is_win() || self.is_lose()
    }
}

/// Remaining state of a ghost agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostState {
    pub position: Position,
    /// Moves left during which the ghost can be eaten.
    pub scared_timer: u32,
}

impl GhostState {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            scared_timer: 0,
        }
    }

    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }
}

/// Board features read by the reflex agent and the `better` evaluation.
pub trait PacmanFeatures {
    fn pacman_position(&self) -> Position;

    fn food(&self) -> Vec<Position>;

    fn ghost_states(&self) -> Vec<GhostState>;
}

// Environments module - Small in-memory worlds for exercising the agents
//
// `pacman` implements `GameState` for the search agents, `gridworld`
// implements `Mdp` for the value iteration agents.

pub mod gridworld;
pub mod pacman;

pub use self::gridworld::{GridAction, GridState, Gridworld};
pub use self::pacman::{run_game, GameRecord, PacmanState, RandomGhost};

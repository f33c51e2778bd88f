// Agent Lab Library - Core Module Organization
//
// Adversarial search agents (reflex, minimax, alpha-beta, expectimax) for
// multi-agent games, and value iteration agents (batch, cyclic, prioritized
// sweeping) for Markov Decision Processes.

// Core data structures and traits
pub mod enums;
pub mod game;
pub mod ordered_hashmap;

// Configuration and errors
pub mod config;
pub mod errors;

// Agents
pub mod agents;
pub mod mdp;

// Demo worlds
pub mod environments;

// Re-export common types for convenient access
pub use crate::agents::{
    Agent, AgentFactory, AlphaBetaAgent, EvaluationFunction, Evaluator, ExpectimaxAgent,
    MinimaxAgent, ReflexAgent, SearchStats,
};
pub use crate::config::{SearchConfig, TieBreak, ValueIterationConfig};
pub use crate::enums::{Direction, Position};
pub use crate::errors::{AgentError, AgentResult, ConfigError, EnvironmentError};
pub use crate::game::{GameState, GhostState, PacmanFeatures};
pub use crate::mdp::{
    AsynchronousValueIterationAgent, Mdp, PrioritizedSweepingValueIterationAgent,
    ValueEstimationAgent, ValueIterationAgent,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

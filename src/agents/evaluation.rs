use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::enums::manhattan_distance;
use crate::errors::ConfigError;
use crate::game::{GameState, PacmanFeatures};

/// Keeps the food term finite when Pacman stands on food (or none is left).
pub const FOOD_EPSILON: f64 = 0.01;
/// Keeps the ghost term finite when Pacman shares a square with a ghost.
pub const GHOST_EPSILON: f64 = 0.001;

/// Static scoring of a state, used at cutoff depth and terminal nodes.
pub trait Evaluator<S> {
    fn evaluate(&self, state: &S) -> f64;
}

impl<S, F> Evaluator<S> for F
where
    F: Fn(&S) -> f64,
{
    fn evaluate(&self, state: &S) -> f64 {
        self(state)
    }
}

/// The evaluation functions selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationFunction {
    /// The game score alone.
    #[default]
    Score,
    /// Score plus food attraction, ghost repulsion and scared-ghost bonus.
    Better,
}

impl FromStr for EvaluationFunction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "score" | "scoreEvaluationFunction" => Ok(EvaluationFunction::Score),
            "better" | "betterEvaluationFunction" => Ok(EvaluationFunction::Better),
            _ => Err(ConfigError::unknown_evaluation(s)),
        }
    }
}

impl<S> Evaluator<S> for EvaluationFunction
where
    S: GameState + PacmanFeatures,
{
    fn evaluate(&self, state: &S) -> f64 {
        match self {
            EvaluationFunction::Score => state.score(),
            EvaluationFunction::Better => feature_score(state),
        }
    }
}

/// `score + 1/(minFood + ε₁) − 1/(minGhost + ε₂) + scaredTimer(nearest ghost)`.
///
/// With no food left the food distance counts as 0. With no ghosts on the
/// board both ghost terms are 0. Among equidistant ghosts the first listed
/// one supplies the scared timer.
pub fn feature_score<S>(state: &S) -> f64
where
    S: GameState + PacmanFeatures,
{
    let position = state.pacman_position();

    let min_food_distance = state
        .food()
        .into_iter()
        .map(|food| manhattan_distance(position, food))
        .min()
        .unwrap_or(0);
    let food_term = 1.0 / (min_food_distance as f64 + FOOD_EPSILON);

    let ghosts = state.ghost_states();
    let ghost_distances = ghosts
        .iter()
        .map(|ghost| manhattan_distance(position, ghost.position))
        .collect_vec();
    let (ghost_term, scared_term) = match ghost_distances.iter().position_min() {
        Some(nearest) => (
            1.0 / (ghost_distances[nearest] as f64 + GHOST_EPSILON),
            ghosts[nearest].scared_timer as f64,
        ),
        None => (0.0, 0.0),
    };

    state.score() + food_term - ghost_term + scared_term
}

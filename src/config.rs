use serde::{Deserialize, Serialize};

use crate::agents::evaluation::EvaluationFunction;
use crate::errors::{ConfigError, ConfigResult};

pub const DEFAULT_DEPTH: usize = 2;
pub const DEFAULT_DISCOUNT: f64 = 0.9;
pub const DEFAULT_ITERATIONS: usize = 100;
/// Cyclic value iteration updates one state per iteration, so it gets a larger budget.
pub const DEFAULT_CYCLIC_ITERATIONS: usize = 1000;
pub const DEFAULT_THETA: f64 = 1e-5;

/// How a root decision is made when several actions share the best value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Uniformly at random among the tied actions.
    Random,
    /// First tied action in legal-action order.
    First,
}

/// Configuration shared by the adversarial search agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub evaluation: EvaluationFunction,
    /// Number of full rounds (one move by every agent) to look ahead.
    pub depth: usize,
    /// `None` lets each agent use its own default.
    pub tie_break: Option<TieBreak>,
}

impl SearchConfig {
    /// Builds a config from an evaluation function name and a depth.
    pub fn new(evaluation: &str, depth: usize) -> ConfigResult<Self> {
        let config = Self {
            evaluation: evaluation.parse()?,
            depth,
            tie_break: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.depth == 0 {
            return Err(ConfigError::InvalidDepth { depth: self.depth });
        }
        Ok(())
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationFunction) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = Some(tie_break);
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            evaluation: EvaluationFunction::Score,
            depth: DEFAULT_DEPTH,
            tie_break: None,
        }
    }
}

/// Configuration shared by the value iteration agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueIterationConfig {
    pub discount: f64,
    /// Sweeps for batch iteration; single-state updates for the others.
    pub iterations: usize,
    /// Prioritized sweeping only: residuals at or below this are not queued.
    pub theta: f64,
}

impl ValueIterationConfig {
    pub fn new(discount: f64, iterations: usize) -> ConfigResult<Self> {
        let config = Self {
            discount,
            iterations,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults for the cyclic agent: same discount and theta, `DEFAULT_CYCLIC_ITERATIONS`.
    pub fn cyclic() -> Self {
        Self {
            iterations: DEFAULT_CYCLIC_ITERATIONS,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(ConfigError::InvalidDiscount {
                discount: self.discount,
            });
        }
        if !(self.theta > 0.0) {
            return Err(ConfigError::InvalidTheta { theta: self.theta });
        }
        Ok(())
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            discount: DEFAULT_DISCOUNT,
            iterations: DEFAULT_ITERATIONS,
            theta: DEFAULT_THETA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_by_name() {
        let config = SearchConfig::new("better", 3).unwrap();
        assert_eq!(config.evaluation, EvaluationFunction::Better);
        assert_eq!(config.depth, 3);

        let config = SearchConfig::new("scoreEvaluationFunction", 1).unwrap();
        assert_eq!(config.evaluation, EvaluationFunction::Score);

        assert_eq!(
            SearchConfig::new("nope", 2),
            Err(ConfigError::unknown_evaluation("nope"))
        );
        assert_eq!(
            SearchConfig::new("score", 0),
            Err(ConfigError::InvalidDepth { depth: 0 })
        );
    }

    #[test]
    fn test_search_config_from_json() {
        let config =
            SearchConfig::from_json(r#"{"evaluation": "better", "tie_break": "first"}"#).unwrap();
        assert_eq!(config.evaluation, EvaluationFunction::Better);
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.tie_break, Some(TieBreak::First));

        assert!(matches!(
            SearchConfig::from_json("{\"depth\": 0}"),
            Err(ConfigError::InvalidDepth { .. })
        ));
        assert!(matches!(
            SearchConfig::from_json("not json"),
            Err(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_cyclic_defaults() {
        let cyclic = ValueIterationConfig::cyclic();
        assert_eq!(cyclic.iterations, DEFAULT_CYCLIC_ITERATIONS);
        assert_eq!(cyclic.discount, DEFAULT_DISCOUNT);
        assert_eq!(cyclic.theta, DEFAULT_THETA);
        assert!(cyclic.validate().is_ok());
    }

    #[test]
    fn test_value_iteration_config_validation() {
        assert!(ValueIterationConfig::new(0.0, 0).is_ok());
        assert!(ValueIterationConfig::new(1.0, 10).is_ok());
        assert_eq!(
            ValueIterationConfig::new(1.5, 10),
            Err(ConfigError::InvalidDiscount { discount: 1.5 })
        );

        let config = ValueIterationConfig::default().with_theta(0.0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidTheta { theta: 0.0 })
        );

        let config = ValueIterationConfig::from_json(r#"{"iterations": 5}"#).unwrap();
        assert_eq!(config.iterations, 5);
        assert_eq!(config.discount, DEFAULT_DISCOUNT);
        assert_eq!(config.theta, DEFAULT_THETA);
    }
}

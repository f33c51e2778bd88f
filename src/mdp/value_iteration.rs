use log::{debug, trace};

use crate::config::ValueIterationConfig;
use crate::errors::ConfigResult;

use super::{max_q_value, Mdp, ValueEstimationAgent, ValueTable};

/// Value Iteration Agent
/// Batch Bellman updates: every sweep reads the previous sweep's values only
pub struct ValueIterationAgent<'a, M: Mdp> {
    mdp: &'a M,
    discount: f64,
    iterations: usize,
    values: ValueTable<M::State>,
}

impl<'a, M: Mdp> ValueIterationAgent<'a, M> {
    /// Builds the agent and runs `config.iterations` full sweeps.
    pub fn new(mdp: &'a M, config: ValueIterationConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut agent = ValueIterationAgent {
            mdp,
            discount: config.discount,
            iterations: config.iterations,
            values: ValueTable::new(),
        };
        agent.run_value_iteration();
        Ok(agent)
    }

    fn run_value_iteration(&mut self) {
        let states = self.mdp.states();

        for iteration in 0..self.iterations {
            let mut next_values = self.values.clone();
            for state in &states {
                if self.mdp.is_terminal(state) {
                    continue;
                }
                if let Some(best) = max_q_value(self.mdp, &self.values, self.discount, state) {
                    next_values.set(state.clone(), best);
                }
            }
            self.values = next_values;
            trace!("value iteration sweep {} done", iteration + 1);
        }

        debug!(
            "value iteration: {} sweeps over {} states (discount {})",
            self.iterations,
            states.len(),
            self.discount
        );
    }
}

impl<'a, M: Mdp> ValueEstimationAgent<M> for ValueIterationAgent<'a, M> {
    fn mdp(&self) -> &M {
        self.mdp
    }

    fn discount(&self) -> f64 {
        self.discount
    }

    fn values(&self) -> &ValueTable<M::State> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mdp::test_support::TableMdp;

    fn config(discount: f64, iterations: usize) -> ValueIterationConfig {
        ValueIterationConfig::new(discount, iterations).unwrap()
    }

    #[test]
    fn test_two_state_scenario() {
        let mdp = TableMdp::two_state();
        let agent = ValueIterationAgent::new(&mdp, config(0.9, 100)).unwrap();
        assert_eq!(agent.get_value(&"A"), 10.0);
        assert_eq!(agent.get_value(&"T"), 0.0);
        assert_eq!(agent.get_policy(&"A"), Some("go"));
        assert_eq!(agent.get_action(&"A"), Some("go"));
        assert_eq!(agent.get_policy(&"T"), None);
        assert_eq!(agent.get_q_value(&"A", &"go"), 10.0);
    }

    #[test]
    fn test_zero_iterations_leaves_zero_values() {
        let mdp = TableMdp::noisy_chain();
        let agent = ValueIterationAgent::new(&mdp, config(0.9, 0)).unwrap();
        for state in mdp.states() {
            assert_eq!(agent.get_value(&state), 0.0);
        }
        assert!(agent.values().is_empty());
    }

    #[test]
    fn test_zero_discount_is_one_step_lookahead() {
        let mdp = TableMdp::noisy_chain();
        let agent = ValueIterationAgent::new(&mdp, config(0.0, 25)).unwrap();
        for state in mdp.states() {
            if mdp.is_terminal(&state) {
                assert_eq!(agent.get_value(&state), 0.0);
                continue;
            }
            let expected = mdp
                .possible_actions(&state)
                .iter()
                .map(|action| {
                    mdp.transition_states_and_probs(&state, action)
                        .iter()
                        .map(|(next, prob)| prob * mdp.reward(&state, action, next))
                        .sum::<f64>()
                })
                .fold(f64::NEG_INFINITY, f64::max);
            assert!((agent.get_value(&state) - expected).abs() < 1e-12, "{state}");
        }
    }

    #[test]
    fn test_sweeps_read_frozen_snapshot() {
        // Chain s0 -> s1 -> s2 -> done with the only reward at the end.
        let mdp = TableMdp::new(&["s0", "s1", "s2", "done"], &["done"])
            .row("s0", "go", "s1", 1.0, 0.0)
            .row("s1", "go", "s2", 1.0, 0.0)
            .row("s2", "go", "done", 1.0, 1.0);

        // One sweep only propagates the reward one step back.
        let one = ValueIterationAgent::new(&mdp, config(1.0, 1)).unwrap();
        assert_eq!(one.get_value(&"s2"), 1.0);
        assert_eq!(one.get_value(&"s1"), 0.0);
        assert_eq!(one.get_value(&"s0"), 0.0);

        let three = ValueIterationAgent::new(&mdp, config(1.0, 3)).unwrap();
        assert_eq!(three.get_value(&"s0"), 1.0);
    }

    #[test]
    fn test_policy_prefers_larger_expected_return() {
        let mdp = TableMdp::noisy_chain();
        let agent = ValueIterationAgent::new(&mdp, config(0.9, 200)).unwrap();
        assert_eq!(agent.get_policy(&"s3"), Some("exit"));
        assert_eq!(agent.get_policy(&"s2"), Some("right"));
        assert_eq!(agent.get_policy(&"done"), None);
        assert!(agent.get_value(&"s3") >= 10.0);
    }

    #[test]
    fn test_rejects_bad_config() {
        let mdp = TableMdp::two_state();
        let bad = ValueIterationConfig::default().with_discount(-0.1);
        assert!(ValueIterationAgent::new(&mdp, bad).is_err());
    }
}

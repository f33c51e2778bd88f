use log::{debug, trace};

use crate::config::ValueIterationConfig;
use crate::errors::ConfigResult;

use super::{max_q_value, Mdp, ValueEstimationAgent, ValueTable};

/// Cyclic value iteration: iteration `i` updates only `states[i % len]`, in place.
///
/// Each iteration touches one state, so build it with
/// `ValueIterationConfig::cyclic()` to match the batch agent's defaults.
pub struct AsynchronousValueIterationAgent<'a, M: Mdp> {
    mdp: &'a M,
    discount: f64,
    iterations: usize,
    values: ValueTable<M::State>,
}

impl<'a, M: Mdp> AsynchronousValueIterationAgent<'a, M> {
    pub fn new(mdp: &'a M, config: ValueIterationConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut agent = AsynchronousValueIterationAgent {
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
        if states.is_empty() {
            debug!("asynchronous value iteration: no states");
            return;
        }

        let mut updates = 0;
        for iteration in 0..self.iterations {
            let state = &states[iteration % states.len()];
            if self.mdp.is_terminal(state) {
                continue;
            }
            if let Some(best) = max_q_value(self.mdp, &self.values, self.discount, state) {
                trace!("update {:?}: {} -> {}", state, self.values.get(state), best);
                self.values.set(state.clone(), best);
                updates += 1;
            }
        }

        debug!(
            "asynchronous value iteration: {} iterations, {} updates",
            self.iterations, updates
        );
    }
}

impl<'a, M: Mdp> ValueEstimationAgent<M> for AsynchronousValueIterationAgent<'a, M> {
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

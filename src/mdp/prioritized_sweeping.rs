use log::{debug, trace};

use crate::config::ValueIterationConfig;
use crate::errors::ConfigResult;
use crate::ordered_hashmap::OrderedHashMap;

use super::{max_q_value, Mdp, PriorityQueue, ValueEstimationAgent, ValueTable};

/// Prioritized sweeping value iteration
///
/// Updates the state with the largest Bellman residual first, then re-queues
/// the predecessors whose residual has grown past `theta`. Runs for at most
/// `iterations` updates and stops early once the queue drains.
pub struct PrioritizedSweepingValueIterationAgent<'a, M: Mdp> {
    mdp: &'a M,
    discount: f64,
    iterations: usize,
    theta: f64,
    values: ValueTable<M::State>,
    predecessors: OrderedHashMap<M::State, Vec<M::State>>,
    iterations_run: usize,
}

impl<'a, M: Mdp> PrioritizedSweepingValueIterationAgent<'a, M> {
    pub fn new(mdp: &'a M, config: ValueIterationConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut agent = PrioritizedSweepingValueIterationAgent {
            mdp,
            discount: config.discount,
            iterations: config.iterations,
            theta: config.theta,
            values: ValueTable::new(),
            predecessors: OrderedHashMap::new(),
            iterations_run: 0,
        };
        agent.compute_predecessors();
        agent.run_value_iteration();
        Ok(agent)
    }

    /// States with some action reaching `state` with nonzero probability.
    pub fn predecessors(&self, state: &M::State) -> &[M::State] {
        self.predecessors
            .get(state)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pops performed before the queue drained or the budget ran out.
    pub fn iterations_run(&self) -> usize {
        self.iterations_run
    }

    fn compute_predecessors(&mut self) {
        for state in self.mdp.states() {
            for action in self.mdp.possible_actions(&state) {
                for (next_state, prob) in self.mdp.transition_states_and_probs(&state, &action) {
                    if prob <= 0.0 {
                        continue;
                    }
                    let preds = self.predecessors.get_or_insert_with(next_state, Vec::new);
                    if !preds.contains(&state) {
                        preds.push(state.clone());
                    }
                }
            }
        }
    }

    /// `|maxQ(s) - V(s)|`, 0 for a state without actions.
    fn residual(&self, state: &M::State) -> f64 {
        max_q_value(self.mdp, &self.values, self.discount, state)
            .map_or(0.0, |best| (best - self.values.get(state)).abs())
    }

    fn run_value_iteration(&mut self) {
        let mut queue = PriorityQueue::new();
        for state in self.mdp.states() {
            if self.mdp.is_terminal(&state) {
                continue;
            }
            let diff = self.residual(&state);
            queue.push(state, -diff);
        }

        for _ in 0..self.iterations {
            let Some(state) = queue.pop() else {
                break;
            };
            self.iterations_run += 1;

            if !self.mdp.is_terminal(&state) {
                if let Some(best) = max_q_value(self.mdp, &self.values, self.discount, &state) {
                    trace!("sweep {:?}: {} -> {}", state, self.values.get(&state), best);
                    self.values.set(state.clone(), best);
                }
            }

            for pred in self.predecessors(&state).to_vec() {
                if self.mdp.is_terminal(&pred) {
                    continue;
                }
                let diff = self.residual(&pred);
                if diff > self.theta {
                    queue.update(pred, -diff);
                }
            }
        }

        debug!(
            "prioritized sweeping: {} of {} iterations run, {} states still queued",
            self.iterations_run,
            self.iterations,
            queue.len()
        );
    }
}

impl<'a, M: Mdp> ValueEstimationAgent<M> for PrioritizedSweepingValueIterationAgent<'a, M> {
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

// MDP module - Value iteration agents over a Markov Decision Process
//
// The environment is consumed only through the `Mdp` trait; each agent owns
// its value table and runs its iterations once, at construction.

use std::fmt::Debug;
use std::hash::Hash;

pub mod asynchronous;
pub mod priority_queue;
pub mod prioritized_sweeping;
pub mod value_iteration;
pub mod value_table;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::asynchronous::AsynchronousValueIterationAgent;
pub use self::prioritized_sweeping::PrioritizedSweepingValueIterationAgent;
pub use self::priority_queue::PriorityQueue;
pub use self::value_iteration::ValueIterationAgent;
pub use self::value_table::ValueTable;

/// A finite Markov Decision Process.
pub trait Mdp {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + PartialEq + Debug;

    /// Every state, in a fixed enumeration order.
    fn states(&self) -> Vec<Self::State>;

    /// Actions available in `state`; empty for terminal states.
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// `(next_state, probability)` pairs summing to 1.
    fn transition_states_and_probs(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)>;

    fn reward(&self, state: &Self::State, action: &Self::Action, next_state: &Self::State) -> f64;

    fn is_terminal(&self, state: &Self::State) -> bool;
}

/// `Σ P(s'|s,a) · (R(s,a,s') + γ·V(s'))`
pub fn q_value<M: Mdp>(
    mdp: &M,
    values: &ValueTable<M::State>,
    discount: f64,
    state: &M::State,
    action: &M::Action,
) -> f64 {
    mdp.transition_states_and_probs(state, action)
        .into_iter()
        .map(|(next_state, prob)| {
            let reward = mdp.reward(state, action, &next_state);
            prob * (reward + discount * values.get(&next_state))
        })
        .sum()
}

/// Best Q-value over the actions of `state`, `None` if it has none.
pub fn max_q_value<M: Mdp>(
    mdp: &M,
    values: &ValueTable<M::State>,
    discount: f64,
    state: &M::State,
) -> Option<f64> {
    mdp.possible_actions(state)
        .iter()
        .map(|action| q_value(mdp, values, discount, state, action))
        .reduce(f64::max)
}

/// Greedy action under `values`; the first action wins ties.
pub fn greedy_action<M: Mdp>(
    mdp: &M,
    values: &ValueTable<M::State>,
    discount: f64,
    state: &M::State,
) -> Option<M::Action> {
    if mdp.is_terminal(state) {
        return None;
    }

    let mut best: Option<(M::Action, f64)> = None;
    for action in mdp.possible_actions(state) {
        let q = q_value(mdp, values, discount, state, &action);
        if best.as_ref().map_or(true, |(_, best_q)| q > *best_q) {
            best = Some((action, q));
        }
    }
    best.map(|(action, _)| action)
}

/// Common query surface of the value iteration agents.
pub trait ValueEstimationAgent<M: Mdp> {
    fn mdp(&self) -> &M;

    fn discount(&self) -> f64;

    fn values(&self) -> &ValueTable<M::State>;

    fn get_value(&self, state: &M::State) -> f64 {
        self.values().get(state)
    }

    fn get_q_value(&self, state: &M::State, action: &M::Action) -> f64 {
        q_value(self.mdp(), self.values(), self.discount(), state, action)
    }

    /// Best action in `state`, `None` for terminal states.
    fn get_policy(&self, state: &M::State) -> Option<M::Action> {
        greedy_action(self.mdp(), self.values(), self.discount(), state)
    }

    /// Same as the policy: no exploration.
    fn get_action(&self, state: &M::State) -> Option<M::Action> {
        self.get_policy(state)
    }
}

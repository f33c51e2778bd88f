// Small table-driven MDPs for the value iteration tests.

use super::Mdp;

type Name = &'static str;

#[derive(Debug, Clone)]
struct Row {
    state: Name,
    action: Name,
    next: Name,
    prob: f64,
    reward: f64,
}

/// An MDP written out as explicit `(s, a, s', P, R)` rows.
#[derive(Debug, Clone)]
pub struct TableMdp {
    states: Vec<Name>,
    terminals: Vec<Name>,
    rows: Vec<Row>,
}

impl TableMdp {
    pub fn new(states: &[Name], terminals: &[Name]) -> Self {
        Self {
            states: states.to_vec(),
            terminals: terminals.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, state: Name, action: Name, next: Name, prob: f64, reward: f64) -> Self {
        self.rows.push(Row {
            state,
            action,
            next,
            prob,
            reward,
        });
        self
    }

    /// A --go--> T with reward 10.
    pub fn two_state() -> Self {
        Self::new(&["A", "T"], &["T"]).row("A", "go", "T", 1.0, 10.0)
    }

    /// A fair coin worth 1 on heads, next to a safe action worth 0.5.
    pub fn coin_flip() -> Self {
        Self::new(&["start", "heads", "tails", "end"], &["end"])
            .row("start", "flip", "heads", 0.5, 1.0)
            .row("start", "flip", "tails", 0.5, 0.0)
            .row("start", "wait", "end", 1.0, 0.5)
            .row("heads", "cash", "end", 1.0, 0.0)
            .row("tails", "cash", "end", 1.0, 0.0)
    }

    /// Noisy chain with a loop back to the start and two exits.
    pub fn noisy_chain() -> Self {
        Self::new(&["s0", "s1", "s2", "s3", "done"], &["done"])
            .row("s0", "right", "s1", 0.8, 0.0)
            .row("s0", "right", "s0", 0.2, 0.0)
            .row("s0", "quit", "done", 1.0, 1.0)
            .row("s1", "right", "s2", 0.8, 0.0)
            .row("s1", "right", "s0", 0.2, -1.0)
            .row("s1", "left", "s0", 1.0, 0.0)
            .row("s2", "right", "s3", 0.9, 0.0)
            .row("s2", "right", "s1", 0.1, 0.0)
            .row("s2", "left", "s1", 1.0, 0.5)
            .row("s3", "exit", "done", 1.0, 10.0)
            .row("s3", "back", "s0", 1.0, 2.0)
    }
}

impl Mdp for TableMdp {
    type State = Name;
    type Action = Name;

    fn states(&self) -> Vec<Name> {
        self.states.clone()
    }

    fn possible_actions(&self, state: &Name) -> Vec<Name> {
        let mut actions = Vec::new();
        for row in self.rows.iter().filter(|row| row.state == *state) {
            if !actions.contains(&row.action) {
                actions.push(row.action);
            }
        }
        actions
    }

    fn transition_states_and_probs(&self, state: &Name, action: &Name) -> Vec<(Name, f64)> {
        self.rows
            .iter()
            .filter(|row| row.state == *state && row.action == *action)
            .map(|row| (row.next, row.prob))
            .collect()
    }

    fn reward(&self, state: &Name, action: &Name, next_state: &Name) -> f64 {
        self.rows
            .iter()
            .find(|row| row.state == *state && row.action == *action && row.next == *next_state)
            .map_or(0.0, |row| row.reward)
    }

    fn is_terminal(&self, state: &Name) -> bool {
        self.terminals.contains(state)
    }
}

// Hand-built games for exercising the search agents.

use std::cell::Cell;
use std::rc::Rc;

use rand::Rng;

use crate::enums::Position;
use crate::game::{GameState, GhostState, PacmanFeatures};

/// Declarative game tree. Children are indexed by action number.
#[derive(Debug, Clone)]
pub enum Tree {
    Leaf(f64),
    Win(f64),
    Lose(f64),
    Node(Vec<Tree>),
    /// A won position that still lists moves; searching below it is an error.
    WinNode(f64, Vec<Tree>),
    LoseNode(f64, Vec<Tree>),
}

impl Tree {
    /// Random tree of the given height with small integer leaves, so ties are common.
    pub fn random<R: Rng>(rng: &mut R, height: usize, max_branching: usize) -> Tree {
        if height == 0 {
            return Tree::Leaf(rng.gen_range(0..6) as f64);
        }
        let branching = rng.gen_range(1..=max_branching);
        Tree::Node(
            (0..branching)
                .map(|_| Tree::random(rng, height - 1, max_branching))
                .collect(),
        )
    }
}

#[derive(Debug)]
struct FlatNode {
    value: f64,
    win: bool,
    lose: bool,
    children: Vec<usize>,
}

/// A `GameState` walking an explicit tree. The static score of an inner node is 0.
#[derive(Debug, Clone)]
pub struct TreeGame {
    nodes: Rc<Vec<FlatNode>>,
    current: usize,
    num_agents: usize,
    generated: Rc<Cell<usize>>,
}

impl TreeGame {
    pub fn new(num_agents: usize, tree: Tree) -> Self {
        let mut nodes = Vec::new();
        flatten(&tree, &mut nodes);
        Self {
            nodes: Rc::new(nodes),
            current: 0,
            num_agents,
            generated: Rc::new(Cell::new(0)),
        }
    }

    /// Successors generated from this game (shared across all its states).
    pub fn generated(&self) -> usize {
        self.generated.get()
    }

    fn node(&self) -> &FlatNode {
        &self.nodes[self.current]
    }
}

fn flatten(tree: &Tree, nodes: &mut Vec<FlatNode>) -> usize {
    let index = nodes.len();
    let (value, win, lose) = match tree {
        Tree::Leaf(v) => (*v, false, false),
        Tree::Win(v) => (*v, true, false),
        Tree::Lose(v) => (*v, false, true),
        Tree::Node(_) => (0.0, false, false),
        Tree::WinNode(v, _) => (*v, true, false),
        Tree::LoseNode(v, _) => (*v, false, true),
    };
    nodes.push(FlatNode {
        value,
        win,
        lose,
        children: Vec::new(),
    });
    if let Tree::Node(children) | Tree::WinNode(_, children) | Tree::LoseNode(_, children) =
        tree
    {
        let ids: Vec<usize> = children.iter().map(|child| flatten(child, nodes)).collect();
        nodes[index].children = ids;
    }
    index
}

impl GameState for TreeGame {
    type Action = usize;

    fn legal_actions(&self, _agent_index: usize) -> Vec<usize> {
        (0..self.node().children.len()).collect()
    }

    fn generate_successor(&self, _agent_index: usize, action: usize) -> Self {
        self.generated.set(self.generated.get() + 1);
        Self {
            nodes: Rc::clone(&self.nodes),
            current: self.node().children[action],
            num_agents: self.num_agents,
            generated: Rc::clone(&self.generated),
        }
    }

    fn num_agents(&self) -> usize {
        self.num_agents
    }

    fn is_win(&self) -> bool {
        self.node().win
    }

    fn is_lose(&self) -> bool {
        self.node().lose
    }

    fn score(&self) -> f64 {
        self.node().value
    }
}

impl PacmanFeatures for TreeGame {
    fn pacman_position(&self) -> Position {
        (0, 0)
    }

    fn food(&self) -> Vec<Position> {
        Vec::new()
    }

    fn ghost_states(&self) -> Vec<GhostState> {
        Vec::new()
    }
}

/// A frozen board snapshot with no moves, for evaluation function tests.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub score: f64,
    pub pacman: Position,
    pub food: Vec<Position>,
    pub ghosts: Vec<GhostState>,
}

impl GameState for Snapshot {
    type Action = ();

    fn legal_actions(&self, _agent_index: usize) -> Vec<()> {
        Vec::new()
    }

    fn generate_successor(&self, _agent_index: usize, _action: ()) -> Self {
        self.clone()
    }

    fn num_agents(&self) -> usize {
        1 + self.ghosts.len()
    }

    fn is_win(&self) -> bool {
        false
    }

    fn is_lose(&self) -> bool {
        false
    }

    fn score(&self) -> f64 {
        self.score
    }
}

impl PacmanFeatures for Snapshot {
    fn pacman_position(&self) -> Position {
        self.pacman
    }

    fn food(&self) -> Vec<Position> {
        self.food.clone()
    }

    fn ghost_states(&self) -> Vec<GhostState> {
        self.ghosts.clone()
    }
}

use std::fmt;

use log::debug;

use crate::enums::{Direction, Position};
use crate::errors::{EnvironmentError, EnvironmentResult};
use crate::mdp::Mdp;

pub const DEFAULT_NOISE: f64 = 0.2;

const BOOK_GRID: &str = "\
_ _ _ 1
_ # _ -1
S _ _ _";

const BRIDGE_GRID: &str = "\
# -100 -100 -100 -100 -100 #
1 S _ _ _ _ 10
# -100 -100 -100 -100 -100 #";

const CLIFF_GRID: &str = "\
_ _ _ _ _
S _ _ _ 10
-100 -100 -100 -100 -100";

const DISCOUNT_GRID: &str = "\
_ _ _ _ _
_ # _ _ _
_ # 1 # 10
S _ _ _ _
-10 -10 -10 -10 -10";

/// Token text of a named built-in grid.
pub fn named_grid(name: &str) -> EnvironmentResult<&'static str> {
    match name {
        "book" => Ok(BOOK_GRID),
        "bridge" => Ok(BRIDGE_GRID),
        "cliff" => Ok(CLIFF_GRID),
        "discount" => Ok(DISCOUNT_GRID),
        _ => Err(EnvironmentError::unknown_layout(name)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Cell {
    Open,
    Wall,
    Exit(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GridState {
    /// Absorbing state reached through `Exit`.
    Terminal,
    Cell(Position),
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridState::Terminal => f.write_str("TERMINAL"),
            GridState::Cell((x, y)) => write!(f, "({x}, {y})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAction {
    Move(Direction),
    Exit,
}

impl fmt::Display for GridAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAction::Move(direction) => write!(f, "{direction}"),
            GridAction::Exit => f.write_str("Exit"),
        }
    }
}

const MOVES: [GridAction; 4] = [
    GridAction::Move(Direction::North),
    GridAction::Move(Direction::West),
    GridAction::Move(Direction::South),
    GridAction::Move(Direction::East),
];

/// Noisy gridworld: an intended move succeeds with `1 - noise` and slips to
/// either perpendicular direction with `noise / 2` each.
#[derive(Debug, Clone)]
pub struct Gridworld {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    start: Option<Position>,
    noise: f64,
    living_reward: f64,
}

impl Gridworld {
    /// Parses whitespace separated tokens: `_` open, `#` wall, `S` start,
    /// a number is an exit paying that reward. The first line is the top row.
    pub fn parse(text: &str) -> EnvironmentResult<Self> {
        let rows: Vec<Vec<&str>> = text
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|tokens| !tokens.is_empty())
            .collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, Vec::len) as i32;
        if rows.iter().any(|row| row.len() as i32 != width) {
            return Err(EnvironmentError::RaggedLayout);
        }
        if width == 0 {
            return Err(EnvironmentError::missing("cells"));
        }

        let mut cells = vec![Cell::Wall; (width * height) as usize];
        let mut start = None;
        for (row, tokens) in rows.iter().enumerate() {
            let y = height - 1 - row as i32;
            for (col, token) in tokens.iter().enumerate() {
                let cell = match *token {
                    "_" => Cell::Open,
                    "#" => Cell::Wall,
                    "S" => {
                        start = Some((col as i32, y));
                        Cell::Open
                    }
                    number => number
                        .parse::<f64>()
                        .map(Cell::Exit)
                        .map_err(|_| EnvironmentError::malformed(row, col, number))?,
                };
                cells[(y * width + col as i32) as usize] = cell;
            }
        }

        debug!("parsed {}x{} gridworld", width, height);
        Ok(Self {
            width,
            height,
            cells,
            start,
            noise: DEFAULT_NOISE,
            living_reward: 0.0,
        })
    }

    pub fn named(name: &str) -> EnvironmentResult<Self> {
        Self::parse(named_grid(name)?)
    }

    /// Fails unless `noise` lies in `[0, 1]`.
    pub fn with_noise(mut self, noise: f64) -> EnvironmentResult<Self> {
        if !(0.0..=1.0).contains(&noise) {
            return Err(EnvironmentError::InvalidNoise { noise });
        }
        self.noise = noise;
        Ok(self)
    }

    pub fn with_living_reward(mut self, living_reward: f64) -> Self {
        self.living_reward = living_reward;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn start(&self) -> Option<GridState> {
        self.start.map(GridState::Cell)
    }

    fn cell(&self, (x, y): Position) -> Cell {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Cell::Wall;
        }
        self.cells[(y * self.width + x) as usize]
    }

    /// Where a move in `direction` lands; walls and edges leave it in place.
    fn step(&self, from: Position, direction: Direction) -> GridState {
        let to = direction.apply(from);
        if self.cell(to) == Cell::Wall {
            GridState::Cell(from)
        } else {
            GridState::Cell(to)
        }
    }

    /// Renders one value per open cell, top row first. Walls print as `#`.
    pub fn format_values<F>(&self, value: F) -> String
    where
        F: Fn(&GridState) -> String,
    {
        let mut out = String::new();
        for y in (0..self.height).rev() {
            let line: Vec<String> = (0..self.width)
                .map(|x| match self.cell((x, y)) {
                    Cell::Wall => format!("{:>8}", "#"),
                    _ => format!("{:>8}", value(&GridState::Cell((x, y)))),
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

impl Mdp for Gridworld {
    type State = GridState;
    type Action = GridAction;

    /// The terminal state first, then every non-wall cell column by column.
    fn states(&self) -> Vec<GridState> {
        let mut states = vec![GridState::Terminal];
        for x in 0..self.width {
            for y in 0..self.height {
                if self.cell((x, y)) != Cell::Wall {
                    states.push(GridState::Cell((x, y)));
                }
            }
        }
        states
    }

    fn possible_actions(&self, state: &GridState) -> Vec<GridAction> {
        match *state {
            GridState::Terminal => Vec::new(),
            GridState::Cell(position) => match self.cell(position) {
                Cell::Exit(_) => vec![GridAction::Exit],
                Cell::Wall => Vec::new(),
                Cell::Open => MOVES.to_vec(),
            },
        }
    }

    fn transition_states_and_probs(
        &self,
        state: &GridState,
        action: &GridAction,
    ) -> Vec<(GridState, f64)> {
        let GridState::Cell(position) = *state else {
            return Vec::new();
        };
        let direction = match *action {
            GridAction::Exit => return vec![(GridState::Terminal, 1.0)],
            GridAction::Move(direction) => direction,
        };

        let [left, right] = direction.perpendicular();
        let outcomes = [
            (self.step(position, direction), 1.0 - self.noise),
            (self.step(position, left), self.noise / 2.0),
            (self.step(position, right), self.noise / 2.0),
        ];

        // Merge outcomes that land on the same cell, keeping first-seen order.
        let mut merged: Vec<(GridState, f64)> = Vec::with_capacity(outcomes.len());
        for (next_state, prob) in outcomes {
            if prob <= 0.0 {
                continue;
            }
            match merged.iter_mut().find(|(seen, _)| *seen == next_state) {
                Some((_, total)) => *total += prob,
                None => merged.push((next_state, prob)),
            }
        }
        merged
    }

    /// Exit cells pay their reward on leaving; every other step pays the living reward.
    fn reward(&self, state: &GridState, _action: &GridAction, _next_state: &GridState) -> f64 {
        match *state {
            GridState::Terminal => 0.0,
            GridState::Cell(position) => match self.cell(position) {
                Cell::Exit(reward) => reward,
                _ => self.living_reward,
            },
        }
    }

    fn is_terminal(&self, state: &GridState) -> bool {
        *state == GridState::Terminal
    }
}

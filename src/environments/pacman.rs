use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use log::{debug, trace};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::agents::{Agent, PACMAN_INDEX};
use crate::enums::{Direction, Position, DIRECTIONS};
use crate::errors::{EnvironmentError, EnvironmentResult};
use crate::game::{GameState, GhostState, PacmanFeatures};

pub const TIME_PENALTY: f64 = 1.0;
pub const FOOD_REWARD: f64 = 10.0;
pub const WIN_REWARD: f64 = 500.0;
pub const LOSE_PENALTY: f64 = 500.0;
pub const GHOST_REWARD: f64 = 200.0;
pub const SCARED_TIME: u32 = 40;

const TINY_LAYOUT: &str = "\
%%%%%
% . %
%.G.%
% . %
%. .%
%   %
%  .%
%   %
%P .%
%%%%%";

const SMALL_LAYOUT: &str = "\
%%%%%%%%%%%%%%%%%%%%
%......%G  G%......%
%.%%...%%  %%...%%.%
%.%o.%........%.o%.%
%.%%.%.%%%%%%.%.%%.%
%........P.........%
%%%%%%%%%%%%%%%%%%%%";

const TRAPPED_LAYOUT: &str = "\
%%%%%%%%
%   P G%
%G%%%%%%
%....  %
%%%%%%%%";

/// ASCII text of a named built-in layout.
pub fn named_layout(name: &str) -> EnvironmentResult<&'static str> {
    match name {
        "tiny" => Ok(TINY_LAYOUT),
        "small" => Ok(SMALL_LAYOUT),
        "trapped" => Ok(TRAPPED_LAYOUT),
        _ => Err(EnvironmentError::unknown_layout(name)),
    }
}

/// Static part of a board, shared by every state of a game.
#[derive(Debug)]
struct Board {
    width: i32,
    height: i32,
    walls: Vec<bool>,
    ghost_starts: Vec<Position>,
}

impl Board {
    fn is_wall(&self, (x, y): Position) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return true;
        }
        self.walls[(y * self.width + x) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Lose,
}

/// A small Pacman board: walls, food, power capsules and ghosts.
#[derive(Debug, Clone)]
pub struct PacmanState {
    board: Rc<Board>,
    pacman: Position,
    food: BTreeSet<Position>,
    capsules: BTreeSet<Position>,
    ghosts: Vec<GhostState>,
    score: f64,
    outcome: Option<Outcome>,
}

impl PacmanState {
    /// Parses an ASCII layout: `%` wall, `.` food, `o` capsule, `P` pacman, `G` ghost.
    ///
    /// The first line is the top row of the board.
    pub fn from_layout(text: &str) -> EnvironmentResult<Self> {
        let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |row| row.chars().count()) as i32;
        if rows.iter().any(|row| row.chars().count() as i32 != width) {
            return Err(EnvironmentError::RaggedLayout);
        }

        let mut walls = vec![false; (width * height) as usize];
        let mut pacman = None;
        let mut food = BTreeSet::new();
        let mut capsules = BTreeSet::new();
        let mut ghost_starts = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row as i32;
            for (col, ch) in line.chars().enumerate() {
                let position = (col as i32, y);
                match ch {
                    '%' => walls[(y * width + col as i32) as usize] = true,
                    '.' => {
                        food.insert(position);
                    }
                    'o' => {
                        capsules.insert(position);
                    }
                    'P' => pacman = Some(position),
                    'G' => ghost_starts.push(position),
                    ' ' => {}
                    other => return Err(EnvironmentError::malformed(row, col, other.to_string())),
                }
            }
        }

        let pacman = pacman.ok_or_else(|| EnvironmentError::missing("pacman"))?;
        // Ghosts are numbered in reading order, top row first.
        let ghosts = ghost_starts.iter().copied().map(GhostState::new).collect();

        Ok(Self {
            board: Rc::new(Board {
                width,
                height,
                walls,
                ghost_starts,
            }),
            pacman,
            food,
            capsules,
            ghosts,
            score: 0.0,
            outcome: None,
        })
    }

    pub fn named(name: &str) -> EnvironmentResult<Self> {
        Self::from_layout(named_layout(name)?)
    }

    pub fn capsules(&self) -> Vec<Position> {
        self.capsules.iter().copied().collect()
    }

    pub fn num_food(&self) -> usize {
        self.food.len()
    }

    fn open_moves(&self, from: Position) -> Vec<Direction> {
        DIRECTIONS
            .into_iter()
            .filter(|dir| !self.board.is_wall(dir.apply(from)))
            .collect()
    }

    fn move_pacman(&mut self, action: Direction) {
        self.pacman = action.apply(self.pacman);
        self.score -= TIME_PENALTY;

        if self.food.remove(&self.pacman) {
            self.score += FOOD_REWARD;
            if self.food.is_empty() {
                self.score += WIN_REWARD;
                self.outcome = Some(Outcome::Win);
            }
        }
        if self.capsules.remove(&self.pacman) {
            for ghost in &mut self.ghosts {
                ghost.scared_timer = SCARED_TIME;
            }
        }

        for ghost_index in 0..self.ghosts.len() {
            self.check_collision(ghost_index);
        }
    }

    fn move_ghost(&mut self, ghost_index: usize, action: Direction) {
        let ghost = &mut self.ghosts[ghost_index];
        ghost.position = action.apply(ghost.position);
        ghost.scared_timer = ghost.scared_timer.saturating_sub(1);
        self.check_collision(ghost_index);
    }

    fn check_collision(&mut self, ghost_index: usize) {
        if self.ghosts[ghost_index].position != self.pacman {
            return;
        }
        if self.ghosts[ghost_index].is_scared() {
            self.score += GHOST_REWARD;
            self.ghosts[ghost_index] = GhostState::new(self.board.ghost_starts[ghost_index]);
        } else if self.outcome.is_none() {
            self.score -= LOSE_PENALTY;
            self.outcome = Some(Outcome::Lose);
        }
    }
}

impl GameState for PacmanState {
    type Action = Direction;

    fn legal_actions(&self, agent_index: usize) -> Vec<Direction> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        if agent_index == PACMAN_INDEX {
            let mut moves = self.open_moves(self.pacman);
            moves.push(Direction::Stop);
            return moves;
        }
        match self.ghosts.get(agent_index - 1) {
            Some(ghost) => {
                let moves = self.open_moves(ghost.position);
                if moves.is_empty() {
                    vec![Direction::Stop]
                } else {
                    moves
                }
            }
            None => Vec::new(),
        }
    }

    fn generate_successor(&self, agent_index: usize, action: Direction) -> Self {
        let mut next = self.clone();
        if self.outcome.is_some() {
            return next;
        }
        if agent_index == PACMAN_INDEX {
            next.move_pacman(action);
        } else if agent_index <= self.ghosts.len() {
            next.move_ghost(agent_index - 1, action);
        }
        next
    }

    fn num_agents(&self) -> usize {
        1 + self.ghosts.len()
    }

    fn is_win(&self) -> bool {
        self.outcome == Some(Outcome::Win)
    }

    fn is_lose(&self) -> bool {
        self.outcome == Some(Outcome::Lose)
    }

    fn score(&self) -> f64 {
        self.score
    }
}

impl PacmanFeatures for PacmanState {
    fn pacman_position(&self) -> Position {
        self.pacman
    }

    fn food(&self) -> Vec<Position> {
        self.food.iter().copied().collect()
    }

    fn ghost_states(&self) -> Vec<GhostState> {
        self.ghosts.clone()
    }
}

impl fmt::Display for PacmanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.board.height).rev() {
            for x in 0..self.board.width {
                let position = (x, y);
                let ch = if position == self.pacman {
                    'P'
                } else if let Some(ghost) = self.ghosts.iter().find(|g| g.position == position) {
                    if ghost.is_scared() {
                        'S'
                    } else {
                        'G'
                    }
                } else if self.board.is_wall(position) {
                    '%'
                } else if self.food.contains(&position) {
                    '.'
                } else if self.capsules.contains(&position) {
                    'o'
                } else {
                    ' '
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "Score: {}", self.score)
    }
}

/// Ghost that picks uniformly among its legal moves.
pub struct RandomGhost {
    index: usize,
    rng: XorShiftRng,
}

impl RandomGhost {
    pub fn new(index: usize, seed: u64) -> Self {
        RandomGhost {
            index,
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get_action(&mut self, state: &PacmanState) -> Option<Direction> {
        state.legal_actions(self.index).choose(&mut self.rng).copied()
    }
}

/// Result of one simulated game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameRecord {
    pub score: f64,
    pub win: bool,
    /// Pacman moves played.
    pub moves: usize,
}

/// Plays Pacman against random ghosts until the game ends or `max_moves` Pacman moves.
pub fn run_game<A>(
    mut state: PacmanState,
    pacman: &mut A,
    ghost_seed: u64,
    max_moves: usize,
) -> GameRecord
where
    A: Agent<PacmanState> + ?Sized,
{
    let mut ghosts: Vec<RandomGhost> = (1..state.num_agents())
        .map(|index| RandomGhost::new(index, ghost_seed.wrapping_add(index as u64)))
        .collect();
    let mut moves = 0;

    'game: while moves < max_moves && !state.is_terminal() {
        let Some(action) = pacman.get_action(&state) else {
            break;
        };
        state = state.generate_successor(PACMAN_INDEX, action);
        moves += 1;
        trace!("pacman {} -> {:?}, score {}", action, state.pacman, state.score);

        for ghost in &mut ghosts {
            if state.is_terminal() {
                break 'game;
            }
            if let Some(action) = ghost.get_action(&state) {
                state = state.generate_successor(ghost.index(), action);
            }
        }
    }

    debug!(
        "game over after {} moves: score {}, win {}",
        moves,
        state.score,
        state.is_win()
    );
    GameRecord {
        score: state.score,
        win: state.is_win(),
        moves,
    }
}

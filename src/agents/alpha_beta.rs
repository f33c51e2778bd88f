use log::debug;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::config::{SearchConfig, TieBreak};
use crate::game::GameState;

use super::evaluation::{EvaluationFunction, Evaluator};
use super::{next_ply, select_best, Agent, SearchStats, PACMAN_INDEX};

/// Alpha-Beta Minimax Agent
/// Same decisions as minimax, but skips subtrees that cannot change the result
pub struct AlphaBetaAgent<E = EvaluationFunction> {
    depth: usize,
    evaluator: E,
    tie_break: TieBreak,
    rng: XorShiftRng,
    nodes_expanded: u64,
    last_search: Option<SearchStats>,
}

impl AlphaBetaAgent<EvaluationFunction> {
    /// Ties at the root go to the first best action unless the config says otherwise.
    pub fn new(config: SearchConfig) -> Self {
        Self::with_evaluator(config.depth, config.evaluation)
            .with_tie_break(config.tie_break.unwrap_or(TieBreak::First))
    }

    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        Self::new(config).seeded(seed)
    }
}

impl<E> AlphaBetaAgent<E> {
    pub fn with_evaluator(depth: usize, evaluator: E) -> Self {
        AlphaBetaAgent {
            depth,
            evaluator,
            tie_break: TieBreak::First,
            rng: XorShiftRng::from_entropy(),
            nodes_expanded: 0,
            last_search: None,
        }
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = XorShiftRng::seed_from_u64(seed);
        self
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn last_search(&self) -> Option<SearchStats> {
        self.last_search
    }

    /// Alpha-beta value of `state` inside the window `[alpha, beta]`.
    ///
    /// Cut-offs are strict: a max node stops once its running max exceeds
    /// `beta`, a min node once its running min drops below `alpha`.
    pub fn alpha_beta<S>(
        &mut self,
        state: &S,
        depth: usize,
        agent_index: usize,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64
    where
        S: GameState,
        E: Evaluator<S>,
    {
        if state.is_win() || state.is_lose() || depth == 0 {
            return self.evaluator.evaluate(state);
        }

        let actions = state.legal_actions(agent_index);
        if actions.is_empty() {
            return self.evaluator.evaluate(state);
        }

        self.nodes_expanded += 1;
        let (next_index, next_depth) = next_ply(agent_index, depth, state.num_agents());

        if agent_index == PACMAN_INDEX {
            let mut max_score = f64::NEG_INFINITY;
            for action in actions {
                let successor = state.generate_successor(agent_index, action);
                let score = self.alpha_beta(&successor, next_depth, next_index, alpha, beta);
                max_score = max_score.max(score);
                if max_score > beta {
                    return max_score; // beta cut-off
                }
                alpha = alpha.max(max_score);
            }
            max_score
        } else {
            let mut min_score = f64::INFINITY;
            for action in actions {
                let successor = state.generate_successor(agent_index, action);
                let score = self.alpha_beta(&successor, next_depth, next_index, alpha, beta);
                min_score = min_score.min(score);
                if min_score < alpha {
                    return min_score; // alpha cut-off
                }
                beta = beta.min(min_score);
            }
            min_score
        }
    }
}

impl<S, E> Agent<S> for AlphaBetaAgent<E>
where
    S: GameState,
    E: Evaluator<S>,
{
    fn get_action(&mut self, state: &S) -> Option<S::Action> {
        self.nodes_expanded = 0;

        let actions = if state.is_terminal() {
            Vec::new()
        } else {
            state.legal_actions(PACMAN_INDEX)
        };
        let (next_index, next_depth) = next_ply(PACMAN_INDEX, self.depth, state.num_agents());
        if !actions.is_empty() {
            self.nodes_expanded += 1;
        }

        // The root is a max node with beta = +inf, so it never cuts off.
        let mut alpha = f64::NEG_INFINITY;
        let mut scores = Vec::with_capacity(actions.len());
        for &action in &actions {
            let successor = state.generate_successor(PACMAN_INDEX, action);
            let score = self.alpha_beta(&successor, next_depth, next_index, alpha, f64::INFINITY);
            alpha = alpha.max(score);
            scores.push(score);
        }

        let best = select_best(&actions, &scores, self.tie_break, &mut self.rng);
        let value = best.map_or_else(|| self.evaluator.evaluate(state), |(_, value)| value);
        debug!(
            "alpha-beta chose {:?} (value {}, depth {}, {} nodes expanded)",
            best.map(|(action, _)| action),
            value,
            self.depth,
            self.nodes_expanded
        );
        self.last_search = Some(SearchStats {
            value,
            nodes_expanded: self.nodes_expanded,
        });

        best.map(|(action, _)| action)
    }
}

impl Default for AlphaBetaAgent<EvaluationFunction> {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::{Tree, TreeGame};
    use crate::agents::MinimaxAgent;

    fn score<S: GameState>(state: &S) -> f64 {
        state.score()
    }

    #[test]
    fn test_terminal_state_returns_evaluation() {
        let win = TreeGame::new(2, Tree::Win(8.0));
        let mut agent = AlphaBetaAgent::with_evaluator(2, score::<TreeGame>);
        assert_eq!(
            agent.alpha_beta(&win, 2, 0, f64::NEG_INFINITY, f64::INFINITY),
            8.0
        );
        assert_eq!(agent.get_action(&win), None);
        assert_eq!(win.generated(), 0);
    }

    #[test]
    fn test_finished_game_is_not_searched() {
        let mut agent = AlphaBetaAgent::with_evaluator(2, score::<TreeGame>);

        // Moves are still listed below a won or lost position.
        let won = TreeGame::new(2, Tree::WinNode(8.0, vec![Tree::Leaf(100.0), Tree::Leaf(-3.0)]));
        assert_eq!(agent.alpha_beta(&won, 2, 0, f64::NEG_INFINITY, f64::INFINITY), 8.0);
        assert_eq!(agent.get_action(&won), None);
        assert_eq!(agent.last_search().map(|stats| stats.value), Some(8.0));
        assert_eq!(won.generated(), 0);

        let lost = TreeGame::new(2, Tree::LoseNode(-500.0, vec![Tree::Leaf(50.0)]));
        assert_eq!(agent.alpha_beta(&lost, 2, 1, f64::NEG_INFINITY, f64::INFINITY), -500.0);
        assert_eq!(lost.generated(), 0);

        let tree = Tree::Node(vec![
            Tree::LoseNode(-500.0, vec![Tree::Leaf(50.0)]),
            Tree::Node(vec![Tree::Leaf(1.0)]),
        ]);
        let game = TreeGame::new(2, tree);
        assert_eq!(agent.get_action(&game), Some(1));
        assert_eq!(agent.last_search().map(|stats| stats.value), Some(1.0));
        // Two root successors plus the one leaf under the live ghost node.
        assert_eq!(game.generated(), 3);
    }

    #[test]
    fn test_prunes_textbook_tree() {
        // Classic example: after the first ghost node yields 3, the second
        // ghost node is abandoned as soon as it sees 2.
        let tree = Tree::Node(vec![
            Tree::Node(vec![Tree::Leaf(3.0), Tree::Leaf(12.0), Tree::Leaf(8.0)]),
            Tree::Node(vec![Tree::Leaf(2.0), Tree::Leaf(4.0), Tree::Leaf(6.0)]),
            Tree::Node(vec![Tree::Leaf(14.0), Tree::Leaf(5.0), Tree::Leaf(2.0)]),
        ]);
        let game = TreeGame::new(2, tree.clone());
        let mut agent = AlphaBetaAgent::with_evaluator(1, score::<TreeGame>);
        assert_eq!(agent.get_action(&game), Some(0));
        assert_eq!(agent.last_search().map(|stats| stats.value), Some(3.0));
        // 3 root successors + 3 + 1 + 3 leaves.
        assert_eq!(game.generated(), 10);

        let full = TreeGame::new(2, tree);
        let mut minimax = MinimaxAgent::with_evaluator(1, score::<TreeGame>).seeded(0);
        minimax.get_action(&full);
        assert_eq!(full.generated(), 12);
    }

    #[test]
    fn test_equal_to_alpha_is_not_pruned() {
        // The second ghost node ties the first at 3 and must be searched exactly.
        let tree = Tree::Node(vec![
            Tree::Node(vec![Tree::Leaf(3.0)]),
            Tree::Node(vec![Tree::Leaf(3.0), Tree::Leaf(7.0)]),
        ]);
        let game = TreeGame::new(2, tree);
        let mut agent = AlphaBetaAgent::with_evaluator(1, score::<TreeGame>);
        assert_eq!(agent.get_action(&game), Some(0));
        assert_eq!(game.generated(), 5);
    }

    #[test]
    fn test_matches_minimax_on_random_trees() {
        let mut rng = XorShiftRng::seed_from_u64(2024);
        for seed in 0..200u64 {
            let num_agents = 1 + (seed % 3) as usize;
            let depth = 1 + (seed % 2) as usize;
            let height = num_agents * depth;
            let tree = Tree::random(&mut rng, height, 3);
            let game = TreeGame::new(num_agents, tree);

            for tie_break in [TieBreak::Random, TieBreak::First] {
                let mut minimax = MinimaxAgent::with_evaluator(depth, score::<TreeGame>)
                    .with_tie_break(tie_break)
                    .seeded(seed);
                let mut alpha_beta = AlphaBetaAgent::with_evaluator(depth, score::<TreeGame>)
                    .with_tie_break(tie_break)
                    .seeded(seed);

                let expected = minimax.get_action(&game);
                let actual = alpha_beta.get_action(&game);
                assert_eq!(actual, expected, "seed {seed}, {tie_break:?}");

                let minimax_stats = minimax.last_search().unwrap();
                let alpha_beta_stats = alpha_beta.last_search().unwrap();
                assert_eq!(alpha_beta_stats.value, minimax_stats.value);
                assert!(alpha_beta_stats.nodes_expanded <= minimax_stats.nodes_expanded);
            }
        }
    }

    #[test]
    fn test_first_tie_by_default() {
        let tree = Tree::Node(vec![Tree::Leaf(1.0), Tree::Leaf(4.0), Tree::Leaf(4.0)]);
        let game = TreeGame::new(1, tree);
        let mut agent = AlphaBetaAgent::with_seed(SearchConfig::default().with_depth(1), 5);
        for _ in 0..10 {
            assert_eq!(agent.get_action(&game), Some(1));
        }
    }
}

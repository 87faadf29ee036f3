use log::debug;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg64;
use web_time::{Instant, SystemTime, UNIX_EPOCH};

use crate::ai::eval::{evaluate, evaluation};
use crate::board::Board;
use crate::level::Difficulty;
use crate::movegen::legal_full_moves;
use crate::types::{Color, Move};

/// Just outside the evaluation range so any real score replaces it.
pub const MIN_SCORE: f32 = -1001.0;
pub const MAX_SCORE: f32 = 1001.0;

/// Depth-limited minimax with alpha-beta pruning.
///
/// Black maximizes and White minimizes. Every branch works on its own board
/// clone; the caller's board is never touched. Ties between equally scored
/// root moves are broken with a seeded PCG generator.
pub struct Searcher {
    rng: Pcg64,
    max_depth: u8,
    nodes: u64,
}

impl Searcher {
    /// Seeds the tie-break generator from the wall clock.
    pub fn new(max_depth: u8) -> Self {
        Self::with_seed(max_depth, clock_seed())
    }

    pub fn with_seed(max_depth: u8, seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
            max_depth,
            nodes: 0,
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.depth())
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, max_depth: u8) {
        self.max_depth = max_depth;
    }

    /// Positions visited by the last [`Searcher::choose_move`].
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Picks uniformly among the best-scoring moves at the configured depth.
    pub fn choose_move(&mut self, board: &Board, color: Color) -> Option<Move> {
        let start = Instant::now();
        self.nodes = 0;

        let candidates = self.best_moves(board, color, self.max_depth);
        let chosen = candidates.choose(&mut self.rng).copied();

        debug!(
            "{color:?} depth {}: {} tied best, {} nodes, {} ms",
            self.max_depth,
            candidates.len(),
            self.nodes,
            start.elapsed().as_millis()
        );
        chosen
    }

    /// All root moves sharing the best score, in generation order.
    ///
    /// Each root move is scored with a fresh full window. Depth 0 is searched
    /// as depth 1.
    pub fn best_moves(&mut self, board: &Board, color: Color, depth: u8) -> Vec<Move> {
        let depth = depth.max(1);
        let moves = legal_full_moves(board, color);
        let maximizing = color == Color::Black;

        let mut best_score = if maximizing { MIN_SCORE } else { MAX_SCORE };
        let mut best = Vec::new();

        for mv in &moves {
            let score = self.score_move(board, mv, color, depth, MIN_SCORE, MAX_SCORE);
            let improves = if maximizing {
                score > best_score
            } else {
                score < best_score
            };

            if improves {
                best_score = score;
                best.clear();
                best.push(*mv);
            } else if score == best_score {
                best.push(*mv);
            }
        }

        debug!(
            "{color:?} root: {} moves, best score {best_score}, {} tied",
            moves.len(),
            best.len()
        );
        best
    }

    /// Minimax value of `board` with `color` to move.
    pub fn alpha_beta(
        &mut self,
        board: &Board,
        color: Color,
        depth: u8,
        alpha: f32,
        beta: f32,
    ) -> f32 {
        self.nodes += 1;

        if depth == 0 || board.is_finished() {
            return evaluation(board, color).score;
        }
        let moves = legal_full_moves(board, color);
        if moves.is_empty() {
            return evaluation(board, color).score;
        }

        let maximizing = color == Color::Black;
        let mut best_score = if maximizing { MIN_SCORE } else { MAX_SCORE };
        let mut alpha = alpha;
        let mut beta = beta;

        for mv in &moves {
            let score = self.score_move(board, mv, color, depth, alpha, beta);

            if maximizing {
                best_score = best_score.max(score);
                alpha = alpha.max(score);
            } else {
                best_score = best_score.min(score);
                beta = beta.min(score);
            }

            if alpha >= beta {
                break;
            }
        }

        best_score
    }

    /// Plays `mv` on a clone, then either takes the terminal evaluation or
    /// searches the reply with `depth - 1` plies.
    fn score_move(
        &mut self,
        board: &Board,
        mv: &Move,
        color: Color,
        depth: u8,
        alpha: f32,
        beta: f32,
    ) -> f32 {
        let mut next = board.clone();
        next.apply_full_move(mv);

        let reply = color.opponent();
        let static_eval = evaluate(&mut next, reply);
        if next.is_finished() || depth == 1 {
            // At depth 1 the reply search would return this same evaluation.
            self.nodes += 1;
            return static_eval.score;
        }

        self.alpha_beta(&next, reply, depth - 1, alpha, beta)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Occupant, SubMove};

    fn black_to_win_board() -> Board {
        Board::from_rows(&[
            "B B . B B",
            ". B . . .",
            ". . N . .",
            ". . . . .",
            "W W W W W",
        ])
        .unwrap()
    }

    fn score_after(board: &Board, mv: &Move, color: Color) -> f32 {
        let mut next = board.clone();
        next.apply_full_move(mv);
        evaluate(&mut next, color.opponent()).score
    }

    #[test]
    fn depth_zero_returns_static_evaluation() {
        let mut searcher = Searcher::with_seed(1, 7);
        let board = Board::standard();

        for color in [Color::White, Color::Black] {
            let score = searcher.alpha_beta(&board, color, 0, MIN_SCORE, MAX_SCORE);
            assert_eq!(score, evaluation(&board, color).score);
        }
    }

    #[test]
    fn depth_one_is_the_best_single_static_evaluation() {
        let mut searcher = Searcher::with_seed(1, 7);
        let board = Board::standard();
        let moves = legal_full_moves(&board, Color::Black);

        let expected = moves
            .iter()
            .map(|mv| score_after(&board, mv, Color::Black))
            .fold(MIN_SCORE, f32::max);

        let score = searcher.alpha_beta(&board, Color::Black, 1, MIN_SCORE, MAX_SCORE);
        assert_eq!(score, expected);
    }

    #[test]
    fn white_minimizes_at_depth_one() {
        let mut searcher = Searcher::with_seed(1, 7);
        let board = Board::standard();
        let moves = legal_full_moves(&board, Color::White);

        let expected = moves
            .iter()
            .map(|mv| score_after(&board, mv, Color::White))
            .fold(MAX_SCORE, f32::min);

        let score = searcher.alpha_beta(&board, Color::White, 1, MIN_SCORE, MAX_SCORE);
        assert_eq!(score, expected);
    }

    #[test]
    fn finished_board_is_scored_statically() {
        let mut searcher = Searcher::with_seed(3, 7);
        let mut board = black_to_win_board();
        board.apply_move(Coord::new(2, 2), Coord::new(2, 0), true);
        evaluate(&mut board, Color::White);

        assert!(board.is_finished());
        assert_eq!(searcher.alpha_beta(&board, Color::White, 3, MIN_SCORE, MAX_SCORE), 1000.0);
        assert!(searcher.best_moves(&board, Color::White, 3).is_empty());
        assert_eq!(searcher.choose_move(&board, Color::White), None);
    }

    #[test]
    fn best_moves_keep_every_tie_in_generation_order() {
        let mut searcher = Searcher::with_seed(1, 7);
        let board = Board::standard();
        let moves = legal_full_moves(&board, Color::Black);

        let best = searcher.best_moves(&board, Color::Black, 1);
        let best_score = score_after(&board, &best[0], Color::Black);

        let expected: Vec<Move> = moves
            .iter()
            .copied()
            .filter(|mv| score_after(&board, mv, Color::Black) == best_score)
            .collect();
        assert_eq!(best, expected);
        assert!(moves.iter().all(|mv| score_after(&board, mv, Color::Black) <= best_score));
    }

    #[test]
    fn greedy_win_at_depth_one() {
        let board = black_to_win_board();
        let mut searcher = Searcher::with_seed(1, 42);

        let best = searcher.best_moves(&board, Color::Black, 1);
        assert!(best.iter().all(|mv| mv.neutral.to == Coord::new(2, 0)));

        let mv = searcher.choose_move(&board, Color::Black).unwrap();
        assert_eq!(mv.neutral.to.y, 0);
    }

    #[test]
    fn greedy_win_at_depth_three() {
        let board = black_to_win_board();
        let mut searcher = Searcher::with_seed(3, 42);

        let mv = searcher.choose_move(&board, Color::Black).unwrap();

        assert_eq!(mv.neutral.to.y, 0);
    }

    #[test]
    fn home_row_threat_scores_exactly_at_depth_one() {
        // White cannot finish this turn, but can lift a home-row piece and
        // leave the neutral one slide away from row 4.
        let board = Board::from_rows(&[
            "B B B B B",
            ". . . . .",
            ". . . . .",
            ". . N . .",
            "W W W W W",
        ])
        .unwrap();
        let opening_file = Move {
            neutral: SubMove::new(Coord::new(2, 3), Coord::new(0, 3)),
            piece: SubMove::new(Coord::new(0, 4), Coord::new(3, 1)),
        };
        assert!(legal_full_moves(&board, Color::White).contains(&opening_file));

        let mut child = board.clone();
        child.apply_full_move(&opening_file);
        let threatened = evaluate(&mut child, Color::Black);
        assert_eq!(threatened.score, -500.0);
        assert!(!threatened.terminal);

        let mut searcher = Searcher::with_seed(1, 13);
        assert_eq!(
            searcher.alpha_beta(&board, Color::White, 1, MIN_SCORE, MAX_SCORE),
            -500.0
        );

        let best = searcher.best_moves(&board, Color::White, 1);
        assert!(best.contains(&opening_file));
        assert!(best.iter().all(|mv| score_after(&board, mv, Color::White) == -500.0));
    }

    #[test]
    fn avoids_pushing_the_neutral_onto_white_home_row() {
        let board = Board::from_rows(&[
            "B B B B B",
            ". . . . .",
            ". . N . .",
            ". . . . .",
            "W W . W W",
        ])
        .unwrap();
        let mut searcher = Searcher::with_seed(1, 3);

        for _ in 0..10 {
            let mv = searcher.choose_move(&board, Color::Black).unwrap();
            assert_ne!(mv.neutral.to.y, 4);
        }
    }

    #[test]
    fn search_never_mutates_the_callers_board() {
        let board = Board::standard();
        let before = board.clone();
        let mut searcher = Searcher::with_seed(1, 11);

        let _ = searcher.choose_move(&board, Color::White);

        assert_eq!(board, before);
        assert!(searcher.nodes() > 0);
    }

    #[test]
    fn same_seed_gives_same_choice() {
        let board = Board::standard();
        let mut first = Searcher::with_seed(1, 2024);
        let mut second = Searcher::with_seed(1, 2024);

        for _ in 0..5 {
            assert_eq!(
                first.choose_move(&board, Color::Black),
                second.choose_move(&board, Color::Black)
            );
        }
    }

    #[test]
    fn no_legal_moves_gives_none() {
        // Every Black piece is boxed in, so no neutral move can be completed.
        let board = Board::from_rows(&[
            "B W . . .",
            "W W . . .",
            ". . N . .",
            ". . . . .",
            ". . . W W",
        ])
        .unwrap();
        let mut searcher = Searcher::with_seed(1, 5);

        assert!(legal_full_moves(&board, Color::Black).is_empty());
        assert_eq!(searcher.choose_move(&board, Color::Black), None);
        assert_eq!(board.pieces_of(Occupant::Black).len(), 1);
    }
}

use crate::board::Board;
use crate::types::{Color, Move, Occupant, SubMove};

/// Enumerates every full turn available to `color`.
///
/// The neutral must move; for each of its destinations the piece moves are
/// computed on the board after the neutral has relocated. Order: neutral
/// destinations in direction order, then pieces column-major, then each
/// piece's destinations in direction order. Empty when `board` is finished.
pub fn legal_full_moves(board: &Board, color: Color) -> Vec<Move> {
    if board.is_finished() {
        return Vec::new();
    }

    let neutral = board.neutral();
    let pieces = board.pieces_of(Occupant::from(color));
    let mut moves = Vec::new();

    for neutral_to in board.reachable(neutral) {
        let neutral_move = SubMove::new(neutral, neutral_to);
        let mut after_neutral = board.clone();
        after_neutral.apply_sub_move(neutral_move);

        for &piece in &pieces {
            for piece_to in after_neutral.reachable(piece) {
                moves.push(Move {
                    neutral: neutral_move,
                    piece: SubMove::new(piece, piece_to),
                });
            }
        }
    }

    moves
}

/// Whether any piece of `color` can slide on `board`.
pub fn has_piece_move(board: &Board, color: Color) -> bool {
    board
        .pieces_of(Occupant::from(color))
        .into_iter()
        .any(|piece| !board.reachable(piece).is_empty())
}

/// Whether `mv` drops the neutral onto either home row.
pub fn is_winning_move(board: &Board, mv: &Move) -> bool {
    board.is_home_row(mv.neutral.to.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn initial_position_has_moves_for_both_colours() {
        let board = Board::standard();

        assert!(!legal_full_moves(&board, Color::White).is_empty());
        assert!(!legal_full_moves(&board, Color::Black).is_empty());
    }

    #[test]
    fn enumeration_order_is_neutral_then_piece_then_destination() {
        let board = Board::standard();
        let moves = legal_full_moves(&board, Color::White);

        // First neutral destination is north, first White piece is (0,4).
        let first = moves[0];
        assert_eq!(first.neutral, SubMove::new(c(2, 2), c(2, 1)));
        assert_eq!(first.piece.from, c(0, 4));
        // (0,4) slides north to (0,1), then north-east through the vacated centre to (3,1).
        assert_eq!(first.piece.to, c(0, 1));
        assert_eq!(moves[1].piece, SubMove::new(c(0, 4), c(3, 1)));

        let mut last_neutral_index = 0;
        let neutral_order = board.reachable(c(2, 2));
        for mv in &moves {
            let index = neutral_order.iter().position(|&to| to == mv.neutral.to).unwrap();
            assert!(index >= last_neutral_index);
            last_neutral_index = index;
        }
    }

    #[test]
    fn piece_moves_see_the_relocated_neutral() {
        let board = Board::standard();

        for mv in legal_full_moves(&board, Color::White) {
            let mut after_neutral = board.clone();
            after_neutral.apply_sub_move(mv.neutral);
            assert!(after_neutral.is_legal_move(mv.piece.from, mv.piece.to), "{mv}");
        }

        // Neutral moving south to (2,3) blocks (2,4)'s north slide at once.
        let moves = legal_full_moves(&board, Color::White);
        assert!(!moves.iter().any(|mv| {
            mv.neutral.to == c(2, 3) && mv.piece.from == c(2, 4) && mv.piece.to.x == 2
        }));
        // With the neutral gone north, (2,4) can slide up to (2,2).
        assert!(moves.iter().any(|mv| {
            mv.neutral.to == c(2, 1) && mv.piece == SubMove::new(c(2, 4), c(2, 2))
        }));
    }

    #[test]
    fn generated_moves_round_trip() {
        let board = Board::standard();

        for mv in legal_full_moves(&board, Color::Black) {
            let mut copy = board.clone();
            copy.apply_full_move(&mv);
            assert_ne!(copy, board);
            copy.revert_full_move(&mv);
            assert_eq!(copy, board);
        }
    }

    #[test]
    fn finished_board_yields_no_moves() {
        let mut board = Board::standard();
        board.mark_finished();

        assert!(legal_full_moves(&board, Color::White).is_empty());
    }

    #[test]
    fn winning_move_detects_either_home_row() {
        let board = Board::standard();
        let to_black_row = Move {
            neutral: SubMove::new(c(2, 2), c(2, 0)),
            piece: SubMove::new(c(0, 4), c(0, 1)),
        };
        let to_middle = Move {
            neutral: SubMove::new(c(2, 2), c(2, 1)),
            piece: SubMove::new(c(0, 4), c(0, 1)),
        };

        assert!(is_winning_move(&board, &to_black_row));
        assert!(!is_winning_move(&board, &to_middle));
    }

    #[test]
    fn has_piece_move_is_false_when_all_pieces_are_boxed() {
        let board = Board::from_rows(&[
            "B W . . .",
            "W W . . .",
            ". . N . .",
            ". . . . .",
            ". . . W W",
        ])
        .unwrap();

        assert!(!has_piece_move(&board, Color::Black));
        assert!(has_piece_move(&board, Color::White));
    }
}

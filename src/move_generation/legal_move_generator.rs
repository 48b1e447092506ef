//! Full legal move generation pipeline.
//!
//! Piece-wise pseudo-move generation followed by a filter that consults the
//! precomputed check and pin sets instead of playing every candidate out.
//! Only en-passant captures, which can expose the king along the line of the
//! removed pawn, are verified on a scratch board.

use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_checks::{is_attacked_by_opponents, PositionAnalysis};
use crate::move_generation::legal_move_shared::{chebyshev_distance, is_strictly_between};
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::{en_passant_victim, generate_pawn_moves};
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;

pub fn generate_pseudo_moves(state: &PositionState, color: Color, out: &mut Vec<Move>) {
    generate_pawn_moves(state, color, out);
    generate_knight_moves(state, color, out);
    generate_bishop_moves(state, color, out);
    generate_rook_moves(state, color, out);
    generate_queen_moves(state, color, out);
    generate_king_moves(state, color, out);
}

/// Legal moves for the side to move. Empty once the game is decided.
pub fn generate_legal_moves(state: &PositionState, analysis: &PositionAnalysis) -> Vec<Move> {
    let color = state.to_move;
    if state.outcome.is_some() || !state.is_active(color) {
        return Vec::new();
    }

    let mut moves = Vec::with_capacity(128);
    generate_pseudo_moves(state, color, &mut moves);

    let filter = LegalityFilter {
        state,
        color,
        king: state.king_square(color),
        checks: &analysis.checks[color.index()],
        pins: &analysis.pins[color.index()],
    };
    moves.retain(|mv| filter.allows(*mv));
    moves
}

struct LegalityFilter<'a> {
    state: &'a PositionState,
    color: Color,
    king: Option<Coord>,
    checks: &'a [Check],
    pins: &'a [Pin],
}

impl LegalityFilter<'_> {
    fn allows(&self, mv: Move) -> bool {
        if let Some(target) = self.state.piece_at(mv.to) {
            if target.kind == PieceKind::King && self.state.is_active(target.color) {
                return false;
            }
        }

        let Some(piece) = self.state.piece_at(mv.from) else {
            panic!("pseudo move {mv} starts on an empty square");
        };
        let Some(king) = self.king else {
            return true;
        };

        if piece.kind == PieceKind::King {
            // Two-square king moves are castles, already fully vetted.
            if chebyshev_distance(mv.from, mv.to) == 2 {
                return true;
            }
            return !is_attacked_by_opponents(self.state, mv.to, self.color, Some(mv.from));
        }

        if piece.kind == PieceKind::Pawn
            && self.state.piece_at(mv.to).is_none()
            && mv.from.file() != mv.to.file()
            && mv.from.rank() != mv.to.rank()
        {
            return self.en_passant_is_safe(mv, king);
        }

        if self.checks.len() >= 2 {
            return false;
        }
        if let Some(check) = self.checks.first() {
            if !self.resolves_check(mv, check) {
                return false;
            }
        }

        self.pins
            .iter()
            .filter(|pin| pin.pinned == mv.from)
            .all(|pin| mv.to == pin.pinner || is_strictly_between(mv.to, king, pin.pinner))
    }

    fn resolves_check(&self, mv: Move, check: &Check) -> bool {
        if mv.to == check.checker {
            return true;
        }
        let Some(checker) = self.state.piece_at(check.checker) else {
            panic!("checker square {} is empty", check.checker);
        };
        let blockable =
            checker.kind != PieceKind::Knight && chebyshev_distance(check.checker, check.king) > 1;
        blockable && is_strictly_between(mv.to, check.checker, check.king)
    }

    fn en_passant_is_safe(&self, mv: Move, king: Coord) -> bool {
        let Some(victim) = en_passant_victim(self.state, self.color, mv.to) else {
            panic!("diagonal pawn move {mv} to an empty square is not en passant");
        };
        let mut scratch = self.state.clone();
        scratch.take_piece(victim);
        scratch.shift_piece(mv.from, mv.to);
        !is_attacked_by_opponents(&scratch, king, self.color, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::position::Position;

    fn sq(text: &str) -> Coord {
        text.parse().expect("test coordinate should parse")
    }

    #[test]
    fn starting_position_has_twenty_moves_for_red() {
        let position = Position::start();
        assert_eq!(position.legal_moves().len(), 20);
    }

    #[test]
    fn single_check_allows_only_capture_block_or_king_move() {
        // Red king h1 checked along the h-file by a Yellow rook on h9.
        let position = Position::from_fen4(
            "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/7,yR,6/14/14/14/13,gK/14/14/5,rB,8/3,rR,3,rK,6",
        )
        .expect("test position should parse");
        let king = sq("h1");
        let checker = sq("h9");
        assert_eq!(position.checks(Color::Red).len(), 1);
        for mv in position.legal_moves() {
            if mv.from == king {
                assert_ne!(mv.to.file(), king.file(), "king stays on the checking file");
                continue;
            }
            assert!(
                mv.to == checker || is_strictly_between(mv.to, checker, king),
                "{mv} neither captures nor blocks"
            );
        }
        assert!(position.legal_moves().contains(&Move::new(sq("f2"), sq("h4"))));
        assert!(position.legal_moves().iter().all(|mv| mv.from != sq("d1")));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let position = Position::from_fen4(
            "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/7,yR,6/14/14/14/13,gK/14/5,gB,8/14/3,rR,3,rK,6",
        )
        .expect("test position should parse");
        assert_eq!(position.checks(Color::Red).len(), 2);
        assert!(!position.legal_moves().is_empty());
        assert!(position.legal_moves().iter().all(|mv| mv.from == sq("h1")));
    }

    #[test]
    fn pinned_piece_stays_on_the_pin_line() {
        let position = Position::from_fen4(
            "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/bK,13/14/7,yR,6/14/14/14/13,gK/14/7,rR,6/14/3,rR,3,rK,6",
        )
        .expect("test position should parse");
        let pinned = sq("h3");
        let moves: Vec<_> = position
            .legal_moves()
            .iter()
            .filter(|mv| mv.from == pinned)
            .copied()
            .collect();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.to.file() == pinned.file()));
        assert!(moves.contains(&Move::new(pinned, sq("h9"))));
    }

    #[test]
    fn active_kings_are_never_capturable() {
        // Blue king sits on Red's rook file; Red may not take it.
        let position = Position::from_fen4(
            "R-0,0,0,0-0,0,0,0-0,0,0,0-0,0,0,0-0-\
             3,yK,10/14/14/14/14/14/3,bK,10/14/14/13,gK/14/14/14/3,rR,3,rK,6",
        )
        .expect("test position should parse");
        assert!(!position
            .legal_moves()
            .contains(&Move::new(sq("d1"), sq("d8"))));
        assert!(position
            .legal_moves()
            .contains(&Move::new(sq("d1"), sq("d7"))));
    }
}

//! Engine-internal position state.
//!
//! `PositionState` is everything a move can change. `make_move` pushes a full
//! copy onto the undo stack before mutating, so `unmake_move` is a single pop
//! and can never drift from the forward path.

use crate::game_state::chess_types::*;
use crate::game_state::piece_list::PieceList;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    pub board: [Option<Piece>; GRID_SIZE],
    /// `[color][kind]` location lists, always in agreement with `board`.
    pub piece_lists: [[PieceList; 6]; 4],

    pub to_move: Color,
    pub eliminated: ColorSet,
    pub castling_rights: CastlingRights,
    pub en_passant: [Option<Coord>; 4],

    /// Plies since the last capture or pawn move.
    pub ply_since_progress: u32,
    /// Plies applied since this position was loaded.
    pub game_ply: u32,

    pub zobrist_key: u64,
    pub outcome: Option<Outcome>,
}

impl Default for PositionState {
    fn default() -> Self {
        Self {
            board: [None; GRID_SIZE],
            piece_lists: [[PieceList::new(); 6]; 4],
            to_move: Color::Red,
            eliminated: ColorSet::EMPTY,
            castling_rights: CastlingRights::NONE,
            en_passant: [None; 4],
            ply_since_progress: 0,
            game_ply: 0,
            zobrist_key: 0,
            outcome: None,
        }
    }
}

impl PositionState {
    #[inline]
    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.board[coord.index()]
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> &PieceList {
        &self.piece_lists[color.index()][kind.index()]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Coord> {
        self.pieces(color, PieceKind::King).first()
    }

    #[inline]
    pub fn is_active(&self, color: Color) -> bool {
        !self.eliminated.contains(color)
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        4 - self.eliminated.len()
    }

    pub fn active_colors(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL.into_iter().filter(|c| self.is_active(*c))
    }

    /// Every occupied square of `color`, by kind.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (PieceKind, Coord)> + '_ {
        PieceKind::ALL
            .into_iter()
            .flat_map(move |kind| self.pieces(color, kind).iter().map(move |sq| (kind, sq)))
    }

    /// Place a piece on an empty square. Hash is the caller's concern.
    pub fn put_piece(&mut self, coord: Coord, piece: Piece) {
        assert!(
            self.board[coord.index()].is_none(),
            "put_piece on occupied square {coord}"
        );
        self.board[coord.index()] = Some(piece);
        self.piece_lists[piece.color.index()][piece.kind.index()].push(coord);
    }

    /// Take the piece off `coord`; panics when the square is empty.
    pub fn take_piece(&mut self, coord: Coord) -> Piece {
        let Some(piece) = self.board[coord.index()].take() else {
            panic!("take_piece on empty square {coord}");
        };
        self.piece_lists[piece.color.index()][piece.kind.index()].remove(coord);
        piece
    }

    /// Move a piece to an empty square, keeping its list slot.
    pub fn shift_piece(&mut self, from: Coord, to: Coord) -> Piece {
        let Some(piece) = self.board[from.index()].take() else {
            panic!("shift_piece from empty square {from}");
        };
        assert!(
            self.board[to.index()].is_none(),
            "shift_piece onto occupied square {to}"
        );
        self.board[to.index()] = Some(piece);
        self.piece_lists[piece.color.index()][piece.kind.index()].relocate(from, to);
        piece
    }

    /// Next non-eliminated color after `color` in turn order, or `color` itself
    /// when nobody else is left.
    pub fn next_active_after(&self, color: Color) -> Color {
        let mut candidate = color.next();
        for _ in 0..3 {
            if self.is_active(candidate) {
                return candidate;
            }
            candidate = candidate.next();
        }
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(text: &str) -> Coord {
        text.parse().expect("test coordinate should parse")
    }

    #[test]
    fn board_and_lists_stay_in_step() {
        let mut state = PositionState::default();
        let rook = Piece::new(PieceKind::Rook, Color::Blue);
        state.put_piece(sq("a4"), rook);
        state.shift_piece(sq("a4"), sq("c4"));
        assert_eq!(state.piece_at(sq("c4")), Some(rook));
        assert!(state.piece_at(sq("a4")).is_none());
        assert!(state.pieces(Color::Blue, PieceKind::Rook).contains(sq("c4")));
        assert_eq!(state.take_piece(sq("c4")), rook);
        assert!(state.pieces(Color::Blue, PieceKind::Rook).is_empty());
    }

    #[test]
    fn turn_skips_eliminated_colors() {
        let mut state = PositionState::default();
        state.eliminated.insert(Color::Blue);
        state.eliminated.insert(Color::Yellow);
        assert_eq!(state.next_active_after(Color::Red), Color::Green);
        assert_eq!(state.next_active_after(Color::Green), Color::Red);
        state.eliminated.insert(Color::Green);
        assert_eq!(state.next_active_after(Color::Red), Color::Red);
    }
}

//! Rule constants for the four-player cross board.
//!
//! Holds the standard starting layout in position text, the castling geometry
//! of every color, and the pawn facing helpers the generator and `make_move`
//! share.

use crate::game_state::chess_types::{CastleSide, Color, Coord};

/// Standard starting layout: Red on ranks 1-2, Blue on files a-b, Yellow on
/// ranks 13-14, Green on files m-n. Red to move, all castling rights, no
/// en-passant targets.
pub const STARTING_POSITION_FEN4: &str = "R-0,0,0,0-1,1,1,1-1,1,1,1-0,0,0,0-0-\
3,yR,yN,yB,yK,yQ,yB,yN,yR,3/\
3,yP,yP,yP,yP,yP,yP,yP,yP,3/\
14/\
bR,bP,10,gP,gR/\
bN,bP,10,gP,gN/\
bB,bP,10,gP,gB/\
bK,bP,10,gP,gQ/\
bQ,bP,10,gP,gK/\
bB,bP,10,gP,gB/\
bN,bP,10,gP,gN/\
bR,bP,10,gP,gR/\
14/\
3,rP,rP,rP,rP,rP,rP,rP,rP,3/\
3,rR,rN,rB,rQ,rK,rB,rN,rR,3";

/// Distance from the king's home square to the king-side rook.
pub const KING_SIDE_ROOK_DISTANCE: i8 = 3;
/// Distance from the king's home square to the queen-side rook.
pub const QUEEN_SIDE_ROOK_DISTANCE: i8 = 4;

/// Pawns stand on this line (counted from the owner's edge) before moving.
pub const PAWN_START_LINE: u8 = 1;
/// Pawns promote on reaching this line, the far edge of the board.
pub const PAWN_PROMOTION_LINE: u8 = 13;

/// Squares involved in one castling move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleSpec {
    pub color: Color,
    pub side: CastleSide,
    pub king_from: Coord,
    pub king_to: Coord,
    pub rook_from: Coord,
    pub rook_to: Coord,
}

impl CastleSpec {
    /// Squares strictly between king and rook; all must be empty to castle.
    pub fn between(&self) -> impl Iterator<Item = Coord> {
        let (df, dr) = castle_direction(self.color, self.side);
        let distance = match self.side {
            CastleSide::KingSide => KING_SIDE_ROOK_DISTANCE,
            CastleSide::QueenSide => QUEEN_SIDE_ROOK_DISTANCE,
        };
        let king = self.king_from;
        (1..distance).filter_map(move |step| king.offset(df * step, dr * step))
    }

    /// Squares that must not be attacked: the king's start, the square it
    /// crosses (where the rook lands) and its destination.
    pub fn king_path(&self) -> [Coord; 3] {
        [self.king_from, self.rook_to, self.king_to]
    }
}

/// Home square of each color's king.
#[inline]
pub const fn king_home(color: Color) -> Coord {
    match color {
        Color::Red => Coord::at(7, 0),
        Color::Blue => Coord::at(0, 7),
        Color::Yellow => Coord::at(6, 13),
        Color::Green => Coord::at(13, 6),
    }
}

/// Unit step from the king towards the rook on `side`.
#[inline]
pub const fn castle_direction(color: Color, side: CastleSide) -> (i8, i8) {
    let (df, dr) = match color {
        Color::Red => (1, 0),
        Color::Blue => (0, 1),
        Color::Yellow => (-1, 0),
        Color::Green => (0, -1),
    };
    match side {
        CastleSide::KingSide => (df, dr),
        CastleSide::QueenSide => (-df, -dr),
    }
}

const fn step(from: Coord, (df, dr): (i8, i8), distance: i8) -> Coord {
    Coord::at(
        (from.file() as i8 + df * distance) as u8,
        (from.rank() as i8 + dr * distance) as u8,
    )
}

pub const fn castle_spec(color: Color, side: CastleSide) -> CastleSpec {
    let home = king_home(color);
    let dir = castle_direction(color, side);
    let rook_distance = match side {
        CastleSide::KingSide => KING_SIDE_ROOK_DISTANCE,
        CastleSide::QueenSide => QUEEN_SIDE_ROOK_DISTANCE,
    };
    CastleSpec {
        color,
        side,
        king_from: home,
        king_to: step(home, dir, 2),
        rook_from: step(home, dir, rook_distance),
        rook_to: step(home, dir, 1),
    }
}

/// Castling move matching a king step from `from` to `to`, if any.
pub fn castle_for_king_move(color: Color, from: Coord, to: Coord) -> Option<CastleSpec> {
    CastleSide::BOTH
        .into_iter()
        .map(|side| castle_spec(color, side))
        .find(|spec| spec.king_from == from && spec.king_to == to)
}

/// How far a square is from `color`'s own edge, measured along its facing.
#[inline]
pub const fn pawn_line(color: Color, coord: Coord) -> u8 {
    match color {
        Color::Red => coord.rank(),
        Color::Blue => coord.file(),
        Color::Yellow => 13 - coord.rank(),
        Color::Green => 13 - coord.file(),
    }
}

/// The two diagonal steps a pawn of `color` captures along.
#[inline]
pub const fn pawn_capture_offsets(color: Color) -> [(i8, i8); 2] {
    let (df, dr) = color.forward();
    if color.advances_by_rank() {
        [(df - 1, dr), (df + 1, dr)]
    } else {
        [(df, dr - 1), (df, dr + 1)]
    }
}

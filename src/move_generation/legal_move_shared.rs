use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const ORTHOGONAL_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

pub const DIAGONAL_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Whether a piece of `color` may end its move on `to`: empty, or held by
/// any other color. Kings of active colors are filtered later.
#[inline]
pub fn can_land_on(state: &PositionState, color: Color, to: Coord) -> bool {
    match state.piece_at(to) {
        None => true,
        Some(piece) => piece.color != color,
    }
}

/// Single-step moves along each offset.
pub fn push_step_moves(
    state: &PositionState,
    color: Color,
    from: Coord,
    offsets: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            if can_land_on(state, color, to) {
                out.push(Move::new(from, to));
            }
        }
    }
}

/// Ray moves along each direction, stopping at (and capturing) the first
/// foreign piece and stopping before an own piece.
pub fn push_slide_moves(
    state: &PositionState,
    color: Color,
    from: Coord,
    directions: &[(i8, i8)],
    out: &mut Vec<Move>,
) {
    for &(df, dr) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(df, dr) {
            match state.piece_at(to) {
                None => out.push(Move::new(from, to)),
                Some(piece) => {
                    if piece.color != color {
                        out.push(Move::new(from, to));
                    }
                    break;
                }
            }
            cursor = to;
        }
    }
}

/// Unit step from `from` towards `to` when the two share a rank, file or
/// diagonal.
pub fn line_direction(from: Coord, to: Coord) -> Option<(i8, i8)> {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    if (df, dr) == (0, 0) {
        return None;
    }
    if df == 0 || dr == 0 || df.abs() == dr.abs() {
        Some((df.signum(), dr.signum()))
    } else {
        None
    }
}

/// Whether `mid` lies strictly between `a` and `b` on a shared line.
pub fn is_strictly_between(mid: Coord, a: Coord, b: Coord) -> bool {
    let Some((df, dr)) = line_direction(a, b) else {
        return false;
    };
    let mut cursor = a;
    while let Some(next) = cursor.offset(df, dr) {
        if next == b {
            return false;
        }
        if next == mid {
            return true;
        }
        cursor = next;
    }
    false
}

#[inline]
pub fn chebyshev_distance(a: Coord, b: Coord) -> u8 {
    a.file().abs_diff(b.file()).max(a.rank().abs_diff(b.rank()))
}

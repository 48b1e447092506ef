//! Attack, check and pin detection.
//!
//! Only active colors project attacks. Pieces of an eliminated color stay on
//! the board as blockers, but they neither check nor pin.

use crate::game_state::chess_rules::pawn_capture_offsets;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;
use crate::move_generation::legal_move_shared::{
    DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, ORTHOGONAL_DIRECTIONS,
};

/// Per-color derived sets, recomputed after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionAnalysis {
    pub attacked: [SquareSet; 4],
    pub checks: [Vec<Check>; 4],
    pub pins: [Vec<Pin>; 4],
}

impl PositionAnalysis {
    pub fn compute(state: &PositionState) -> Self {
        let mut analysis = Self::default();
        for color in state.active_colors() {
            analysis.attacked[color.index()] = attack_set(state, color);
            analysis.checks[color.index()] = checks_against(state, color);
            analysis.pins[color.index()] = pins_against(state, color);
        }
        analysis
    }

    #[inline]
    pub fn in_check(&self, color: Color) -> bool {
        !self.checks[color.index()].is_empty()
    }
}

#[inline]
fn holds(state: &PositionState, coord: Coord, color: Color, kind: PieceKind) -> bool {
    state.piece_at(coord) == Some(Piece::new(kind, color))
}

/// Visit every piece of `color` attacking `target`. `visit` returns `true` to
/// stop early; the return value says whether it did. A piece on `transparent`
/// is treated as absent when tracing rays.
fn scan_attackers(
    state: &PositionState,
    target: Coord,
    color: Color,
    transparent: Option<Coord>,
    mut visit: impl FnMut(Coord) -> bool,
) -> bool {
    for (df, dr) in pawn_capture_offsets(color) {
        if let Some(from) = target.offset(-df, -dr) {
            if holds(state, from, color, PieceKind::Pawn) && visit(from) {
                return true;
            }
        }
    }

    for (df, dr) in KNIGHT_OFFSETS {
        if let Some(from) = target.offset(df, dr) {
            if holds(state, from, color, PieceKind::Knight) && visit(from) {
                return true;
            }
        }
    }

    for (df, dr) in KING_OFFSETS {
        if let Some(from) = target.offset(df, dr) {
            if holds(state, from, color, PieceKind::King) && visit(from) {
                return true;
            }
        }
    }

    let rays = ORTHOGONAL_DIRECTIONS
        .iter()
        .map(|d| (*d, true))
        .chain(DIAGONAL_DIRECTIONS.iter().map(|d| (*d, false)));
    for ((df, dr), orthogonal) in rays {
        let mut cursor = target;
        while let Some(next) = cursor.offset(df, dr) {
            cursor = next;
            if Some(next) == transparent {
                continue;
            }
            let Some(piece) = state.piece_at(next) else {
                continue;
            };
            let slides = if orthogonal {
                piece.kind.slides_orthogonally()
            } else {
                piece.kind.slides_diagonally()
            };
            if piece.color == color && slides && visit(next) {
                return true;
            }
            break;
        }
    }

    false
}

/// Whether any piece of `color` attacks `target`.
pub fn is_square_attacked_by(
    state: &PositionState,
    target: Coord,
    color: Color,
    transparent: Option<Coord>,
) -> bool {
    scan_attackers(state, target, color, transparent, |_| true)
}

/// Whether any active color other than `defender` attacks `target`.
pub fn is_attacked_by_opponents(
    state: &PositionState,
    target: Coord,
    defender: Color,
    transparent: Option<Coord>,
) -> bool {
    state
        .active_colors()
        .filter(|c| *c != defender)
        .any(|c| is_square_attacked_by(state, target, c, transparent))
}

/// All squares of `color` pieces attacking `target`.
pub fn attackers_of(state: &PositionState, target: Coord, color: Color) -> Vec<Coord> {
    let mut found = Vec::new();
    scan_attackers(state, target, color, None, |from| {
        found.push(from);
        false
    });
    found
}

/// Every square a piece of `color` attacks, own-occupied squares included.
pub fn attack_set(state: &PositionState, color: Color) -> SquareSet {
    let mut set = SquareSet::EMPTY;
    for (kind, from) in state.pieces_of(color) {
        match kind {
            PieceKind::Pawn => mark_steps(&mut set, from, &pawn_capture_offsets(color)),
            PieceKind::Knight => mark_steps(&mut set, from, &KNIGHT_OFFSETS),
            PieceKind::King => mark_steps(&mut set, from, &KING_OFFSETS),
            PieceKind::Bishop => mark_rays(state, &mut set, from, &DIAGONAL_DIRECTIONS),
            PieceKind::Rook => mark_rays(state, &mut set, from, &ORTHOGONAL_DIRECTIONS),
            PieceKind::Queen => {
                mark_rays(state, &mut set, from, &DIAGONAL_DIRECTIONS);
                mark_rays(state, &mut set, from, &ORTHOGONAL_DIRECTIONS);
            }
        }
    }
    set
}

fn mark_steps(set: &mut SquareSet, from: Coord, offsets: &[(i8, i8)]) {
    for &(df, dr) in offsets {
        if let Some(to) = from.offset(df, dr) {
            set.insert(to);
        }
    }
}

fn mark_rays(state: &PositionState, set: &mut SquareSet, from: Coord, directions: &[(i8, i8)]) {
    for &(df, dr) in directions {
        let mut cursor = from;
        while let Some(to) = cursor.offset(df, dr) {
            set.insert(to);
            if state.piece_at(to).is_some() {
                break;
            }
            cursor = to;
        }
    }
}

/// Checks given to `color`'s king by every other active color.
pub fn checks_against(state: &PositionState, color: Color) -> Vec<Check> {
    let Some(king) = state.king_square(color) else {
        return Vec::new();
    };
    state
        .active_colors()
        .filter(|c| *c != color)
        .flat_map(|attacker| attackers_of(state, king, attacker))
        .map(|checker| Check { checker, king })
        .collect()
}

/// Pieces of `color` that shield its king from an active enemy slider.
pub fn pins_against(state: &PositionState, color: Color) -> Vec<Pin> {
    let Some(king) = state.king_square(color) else {
        return Vec::new();
    };

    let rays = ORTHOGONAL_DIRECTIONS
        .iter()
        .map(|d| (*d, true))
        .chain(DIAGONAL_DIRECTIONS.iter().map(|d| (*d, false)));

    let mut pins = Vec::new();
    for ((df, dr), orthogonal) in rays {
        let mut shield: Option<Coord> = None;
        let mut cursor = king;
        while let Some(next) = cursor.offset(df, dr) {
            cursor = next;
            let Some(piece) = state.piece_at(next) else {
                continue;
            };
            if piece.color == color {
                if shield.is_some() {
                    break;
                }
                shield = Some(next);
                continue;
            }
            if let Some(pinned) = shield {
                let slides = if orthogonal {
                    piece.kind.slides_orthogonally()
                } else {
                    piece.kind.slides_diagonally()
                };
                if slides && state.is_active(piece.color) {
                    pins.push(Pin {
                        pinner: next,
                        pinned,
                    });
                }
            }
            break;
        }
    }
    pins
}

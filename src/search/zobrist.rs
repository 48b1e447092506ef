//! Zobrist hashing support for fast position identity and repetition tracking.
//!
//! Keys are drawn from a seeded `StdRng`, so hashes are reproducible across
//! runs. The tables are an ordinary value owned (through an `Arc`) by every
//! `Position` built from them; two positions compare hashes meaningfully only
//! when they share a table.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::chess_types::*;
use crate::game_state::undo_state::PositionState;

/// Seed used when the caller does not supply one.
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZobristKeys {
    /// `[piece.index() * GRID_SIZE + square]`
    piece_square: Vec<u64>,
    to_move: [u64; 4],
    /// `[color][castling subset]`
    castling: [[u64; 4]; 4],
    /// `[color][file or rank of the target]`
    en_passant: [[u64; BOARD_WIDTH]; 4],
    eliminated: [u64; 4],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new(DEFAULT_ZOBRIST_SEED)
    }
}

impl ZobristKeys {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let piece_square = (0..Piece::ALL.len() * GRID_SIZE)
            .map(|_| rng.random::<u64>())
            .collect();

        let mut to_move = [0u64; 4];
        for key in &mut to_move {
            *key = rng.random();
        }

        let mut castling = [[0u64; 4]; 4];
        for key in castling.iter_mut().flatten() {
            *key = rng.random();
        }

        let mut en_passant = [[0u64; BOARD_WIDTH]; 4];
        for key in en_passant.iter_mut().flatten() {
            *key = rng.random();
        }

        let mut eliminated = [0u64; 4];
        for key in &mut eliminated {
            *key = rng.random();
        }

        Self {
            piece_square,
            to_move,
            castling,
            en_passant,
            eliminated,
        }
    }

    #[inline]
    pub fn piece_square(&self, piece: Piece, coord: Coord) -> u64 {
        self.piece_square[piece.index() * GRID_SIZE + coord.index()]
    }

    #[inline]
    pub fn to_move(&self, color: Color) -> u64 {
        self.to_move[color.index()]
    }

    /// Key for `color`'s current subset of castling rights.
    #[inline]
    pub fn castling(&self, color: Color, rights: CastlingRights) -> u64 {
        self.castling[color.index()][rights.subset(color)]
    }

    /// Red and Yellow targets are keyed by file, Blue and Green by rank;
    /// the other coordinate is fixed by the owner's facing.
    #[inline]
    pub fn en_passant(&self, color: Color, target: Coord) -> u64 {
        let line = if color.advances_by_rank() {
            target.file()
        } else {
            target.rank()
        };
        self.en_passant[color.index()][line as usize]
    }

    #[inline]
    pub fn eliminated(&self, color: Color) -> u64 {
        self.eliminated[color.index()]
    }

    /// XOR of the castling keys for all four colors.
    pub fn castling_all(&self, rights: CastlingRights) -> u64 {
        Color::ALL
            .into_iter()
            .fold(0, |acc, color| acc ^ self.castling(color, rights))
    }

    /// XOR of the keys for every en-passant target currently set.
    pub fn en_passant_all(&self, targets: &[Option<Coord>; 4]) -> u64 {
        Color::ALL.into_iter().fold(0, |acc, color| match targets[color.index()] {
            Some(target) => acc ^ self.en_passant(color, target),
            None => acc,
        })
    }

    /// Full hash of `state`, computed from scratch.
    pub fn compute(&self, state: &PositionState) -> u64 {
        let mut key = 0u64;

        for coord in Coord::all() {
            if let Some(piece) = state.piece_at(coord) {
                key ^= self.piece_square(piece, coord);
            }
        }

        key ^= self.to_move(state.to_move);
        key ^= self.castling_all(state.castling_rights);
        key ^= self.en_passant_all(&state.en_passant);

        for color in state.eliminated.iter() {
            key ^= self.eliminated(color);
        }

        key
    }
}

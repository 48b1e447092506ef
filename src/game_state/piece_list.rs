//! Fixed-capacity location list for one (color, kind) pair.
//!
//! Removal swaps the last entry into the hole, so insert and remove are O(1)
//! and no allocation happens during search. Unused slots are kept zeroed so
//! two lists holding the same squares in the same order compare equal.

use crate::game_state::chess_types::Coord;

/// Upper bound on pieces of one kind and color.
pub const PIECE_LIST_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceList {
    squares: [Option<Coord>; PIECE_LIST_CAPACITY],
    len: u8,
}

impl Default for PieceList {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceList {
    pub const fn new() -> Self {
        Self {
            squares: [None; PIECE_LIST_CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == PIECE_LIST_CAPACITY
    }

    /// Panics when the list is full; callers validate piece counts on load.
    #[inline]
    pub fn push(&mut self, coord: Coord) {
        assert!(!self.is_full(), "piece list overflow at {coord}");
        self.squares[self.len()] = Some(coord);
        self.len += 1;
    }

    /// Panics when `coord` is not in the list: board and lists have diverged.
    pub fn remove(&mut self, coord: Coord) {
        let Some(slot) = self.position(coord) else {
            panic!("piece list does not contain {coord}");
        };
        let last = self.len() - 1;
        self.squares[slot] = self.squares[last];
        self.squares[last] = None;
        self.len -= 1;
    }

    /// Replace `from` with `to` in place, keeping the list order.
    pub fn relocate(&mut self, from: Coord, to: Coord) {
        let Some(slot) = self.position(from) else {
            panic!("piece list does not contain {from}");
        };
        self.squares[slot] = Some(to);
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        self.position(coord).is_some()
    }

    #[inline]
    pub fn first(&self) -> Option<Coord> {
        self.squares[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.squares[..self.len()].iter().flatten().copied()
    }

    fn position(&self, coord: Coord) -> Option<usize> {
        self.squares[..self.len()]
            .iter()
            .position(|entry| *entry == Some(coord))
    }
}

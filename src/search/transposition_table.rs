//! Fixed-size transposition table keyed by Zobrist hash.
//!
//! Power-of-two slot count, indexed by the low bits of the key. Replacement
//! prefers entries from a newer game ply, then deeper entries, and never lets
//! a shallower non-exact entry evict an exact one.

use crate::game_state::chess_types::Move;

/// Largest supported table size, as a power of two.
pub const MAX_TT_SIZE_LOG2: u32 = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub key: u64,
    pub best_move: Option<Move>,
    pub depth: i16,
    pub score: i32,
    pub node_type: NodeType,
    /// Game ply of the root position the entry was searched from.
    pub game_ply: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub lookups: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: Vec<Option<TTEntry>>,
    mask: usize,
    stats: TTStats,
}

impl TranspositionTable {
    /// Table with `2^size_log2` slots; the exponent is clamped to
    /// `MAX_TT_SIZE_LOG2`.
    pub fn new(size_log2: u32) -> Self {
        let count = 1usize << size_log2.min(MAX_TT_SIZE_LOG2);
        Self {
            entries: vec![None; count],
            mask: count - 1,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    #[inline]
    fn idx(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Entry stored for exactly `key`, if any.
    pub fn get(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.lookups += 1;
        let hit = self.entries[self.idx(key)].filter(|entry| entry.key == key);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Lookup without touching the counters.
    pub fn peek(&self, key: u64) -> Option<TTEntry> {
        self.entries[self.idx(key)].filter(|entry| entry.key == key)
    }

    pub fn put(&mut self, entry: TTEntry) {
        self.stats.stores += 1;
        let idx = self.idx(entry.key);
        let replace = match self.entries[idx] {
            None => true,
            Some(existing) => {
                entry.game_ply > existing.game_ply
                    || ((existing.node_type != NodeType::Exact
                        || entry.node_type == NodeType::Exact)
                        && entry.depth > existing.depth)
            }
        };
        if replace {
            self.entries[idx] = Some(entry);
        }
    }
}

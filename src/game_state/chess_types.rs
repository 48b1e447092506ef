//! Core value types for the four-player cross board.
//!
//! Coordinates are validated once at construction; every `Coord` in
//! circulation names one of the 160 playable squares. Pieces, colors and moves
//! are small `Copy` values so no per-square allocation ever happens.

use std::fmt;
use std::str::FromStr;

use crate::errors::CoordError;
use crate::utils::algebraic::{coord_to_algebraic, parse_algebraic_coord};

/// Width and height of the square grid the cross is cut from.
pub const BOARD_WIDTH: usize = 14;
/// Number of grid cells, corners included. Board arrays are indexed by `Coord::index`.
pub const GRID_SIZE: usize = BOARD_WIDTH * BOARD_WIDTH;
/// Side length of each removed corner block.
pub const CORNER_SIZE: usize = 3;
/// Number of playable squares.
pub const PLAYABLE_SQUARES: usize = GRID_SIZE - 4 * CORNER_SIZE * CORNER_SIZE;

/// Whether `(file, rank)` lies on the cross-shaped board.
#[inline]
pub const fn is_on_board(file: i8, rank: i8) -> bool {
    if file < 0 || rank < 0 || file >= BOARD_WIDTH as i8 || rank >= BOARD_WIDTH as i8 {
        return false;
    }
    let low = CORNER_SIZE as i8;
    let high = (BOARD_WIDTH - CORNER_SIZE) as i8;
    let file_in_wing = file < low || file >= high;
    let rank_in_wing = rank < low || rank >= high;
    !(file_in_wing && rank_in_wing)
}

/// A playable square, stored as its grid index `rank * 14 + file`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord(u8);

impl Coord {
    /// Build a coordinate, returning `None` for corner cells or out-of-range values.
    #[inline]
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        if file > i8::MAX as u8 || rank > i8::MAX as u8 {
            return None;
        }
        if is_on_board(file as i8, rank as i8) {
            Some(Self(rank * BOARD_WIDTH as u8 + file))
        } else {
            None
        }
    }

    /// Unchecked constructor for rule tables whose squares are known to be on the board.
    #[inline]
    pub(crate) const fn at(file: u8, rank: u8) -> Self {
        Self(rank * BOARD_WIDTH as u8 + file)
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        if index >= GRID_SIZE {
            return None;
        }
        Self::new((index % BOARD_WIDTH) as u8, (index / BOARD_WIDTH) as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % BOARD_WIDTH as u8
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / BOARD_WIDTH as u8
    }

    /// Step by `(d_file, d_rank)`, or `None` when the step leaves the cross.
    #[inline]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file() as i8 + d_file;
        let rank = self.rank() as i8 + d_rank;
        if is_on_board(file, rank) {
            Some(Self::at(file as u8, rank as u8))
        } else {
            None
        }
    }

    /// Every playable square in index order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..GRID_SIZE).filter_map(Coord::from_index)
    }

    /// `(0 + 0)` parity convention: `a1`-parity squares return `false`.
    #[inline]
    pub const fn is_light(self) -> bool {
        (self.file() + self.rank()) % 2 == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&coord_to_algebraic(*self))
    }
}

impl FromStr for Coord {
    type Err = CoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_algebraic_coord(s)
    }
}

/// The four sides, in turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Green,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Yellow, Color::Green];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Yellow => 2,
            Color::Green => 3,
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Color {
        Self::ALL[index % 4]
    }

    /// Next color in turn order, ignoring eliminations.
    #[inline]
    pub const fn next(self) -> Color {
        Self::from_index(self.index() + 1)
    }

    /// Upper-case turn letter used by the position text.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
            Color::Green => 'G',
        }
    }

    /// Color for either case of its letter.
    pub fn from_letter(ch: char) -> Option<Color> {
        match ch.to_ascii_uppercase() {
            'R' => Some(Color::Red),
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    /// Unit step a pawn of this color advances by, as `(d_file, d_rank)`.
    #[inline]
    pub const fn forward(self) -> (i8, i8) {
        match self {
            Color::Red => (0, 1),
            Color::Blue => (1, 0),
            Color::Yellow => (0, -1),
            Color::Green => (-1, 0),
        }
    }

    /// Whether this color's pawns advance along files (rank changes).
    #[inline]
    pub const fn advances_by_rank(self) -> bool {
        matches!(self, Color::Red | Color::Yellow)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Green => "Green",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Legal promotion targets, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    pub fn from_letter(ch: char) -> Option<PieceKind> {
        match ch.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'R' => Some(PieceKind::Rook),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }

    #[inline]
    pub const fn slides_orthogonally(self) -> bool {
        matches!(self, PieceKind::Rook | PieceKind::Queen)
    }

    #[inline]
    pub const fn slides_diagonally(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Queen)
    }
}

/// A colored piece. Two bytes, `Copy`; the full set is the fixed table [`Piece::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// Every (kind, color) combination, laid out so that `ALL[p.index()] == p`.
    pub const ALL: [Piece; 24] = {
        let mut table = [Piece::new(PieceKind::Pawn, Color::Red); 24];
        let mut color = 0;
        while color < 4 {
            let mut kind = 0;
            while kind < 6 {
                table[color * 6 + kind] = Piece::new(PieceKind::ALL[kind], Color::ALL[color]);
                kind += 1;
            }
            color += 1;
        }
        table
    };

    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }
}

/// Bit set over the four colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const EMPTY: ColorSet = ColorSet(0);

    #[inline]
    pub const fn contains(self, color: Color) -> bool {
        self.0 & (1 << color.index()) != 0
    }

    #[inline]
    pub fn insert(&mut self, color: Color) {
        self.0 |= 1 << color.index();
    }

    #[inline]
    pub fn remove(&mut self, color: Color) {
        self.0 &= !(1 << color.index());
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const BOTH: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    #[inline]
    const fn bit(self, color: Color) -> u8 {
        let offset = match self {
            CastleSide::KingSide => 0,
            CastleSide::QueenSide => 1,
        };
        1 << (2 * color.index() + offset)
    }
}

/// Castling rights, two bits per color (king-side low, queen-side high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0xFF);

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & side.bit(color) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, side: CastleSide, allowed: bool) {
        if allowed {
            self.0 |= side.bit(color);
        } else {
            self.0 &= !side.bit(color);
        }
    }

    #[inline]
    pub fn clear_color(&mut self, color: Color) {
        self.set(color, CastleSide::KingSide, false);
        self.set(color, CastleSide::QueenSide, false);
    }

    /// The two bits belonging to `color`, as a value in `0..4`.
    #[inline]
    pub const fn subset(self, color: Color) -> usize {
        ((self.0 >> (2 * color.index())) & 0b11) as usize
    }
}

/// A move as the legality filter sees it. Castling and en-passant are
/// inferred from the board, not tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
    pub promotion: Option<PieceKind>,
}

impl Move {
    #[inline]
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(from: Coord, to: Coord, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// Fixed-size bit set over grid indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SquareSet([u64; 4]);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet([0; 4]);

    #[inline]
    pub fn insert(&mut self, coord: Coord) {
        let index = coord.index();
        self.0[index / 64] |= 1u64 << (index % 64);
    }

    #[inline]
    pub fn contains(&self, coord: Coord) -> bool {
        let index = coord.index();
        self.0[index / 64] & (1u64 << (index % 64)) != 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|word| *word == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(move |coord| self.contains(*coord))
    }
}

/// A piece giving check, and the king it attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Check {
    pub checker: Coord,
    pub king: Coord,
}

/// A piece that may not leave the line between its king and `pinner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin {
    pub pinner: Coord,
    pub pinned: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    FiftyMove,
    Repetition,
    InsufficientMaterial,
}

/// Final result once the game has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win(Color),
    Draw(DrawReason),
}

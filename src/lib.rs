
pub mod board;
pub mod bonus;
pub mod clock;
pub mod config;
pub mod dictionary;
pub mod game;
pub mod letters;
pub mod player;
pub mod registry;
pub mod rules;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

pub use board::{Board, BoardError, SlotState};
pub use bonus::{Bonus, BonusKind};
pub use dictionary::Dictionary;
pub use game::{Game, GameError, GameEvent, TurnPhase};
pub use letters::{LetterBag, LetterSource};
pub use rules::PlayError;

static NEXT_LETTER_ID: AtomicU32 = AtomicU32::new(0);

/// Identifies one physical tile for the whole life of the process
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LetterId(pub u32);

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A letter tile
///
/// Two tiles showing the same character are still different tiles: equality
/// and hashing only look at the id.
#[derive(Copy, Clone)]
pub struct Letter {
    id: LetterId,
    character: char,
    points: u32,
}

impl Letter {
    pub fn new(character: char, points: u32) -> Self {
        Self {
            id: LetterId(NEXT_LETTER_ID.fetch_add(1, Ordering::Relaxed)),
            character: character.to_ascii_uppercase(),
            points,
        }
    }

    pub fn id(&self) -> LetterId {
        self.id
    }

    pub fn character(&self) -> char {
        self.character
    }

    pub fn points(&self) -> u32 {
        self.points
    }
}

impl PartialEq for Letter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Letter {}

impl std::hash::Hash for Letter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.character)
    }
}

impl fmt::Debug for Letter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}({}){}", self.character, self.points, self.id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Vertical,
    Horizontal,
}

impl Direction {
    pub fn perp(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// A slot on the board, rows and columns start at zero in the top left corner
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbours
    ///
    /// Neighbours past the top or left edge wrap around to huge coordinates,
    /// so a bounds checked lookup rejects them like any other outside slot.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        let h = Placement(self, Direction::Horizontal);
        let v = Placement(self, Direction::Vertical);
        vec![h.back().0, h.next().0, v.back().0, v.next().0].into_iter()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl std::ops::Index<Direction> for Position {
    type Output = usize;
    /// The coordinate that changes in that direction
    fn index(&self, dir: Direction) -> &Self::Output {
        match dir {
            Direction::Vertical => &self.row,
            Direction::Horizontal => &self.col,
        }
    }
}

impl std::ops::IndexMut<Direction> for Position {
    /// The coordinate that changes in that direction
    fn index_mut(&mut self, dir: Direction) -> &mut Self::Output {
        match dir {
            Direction::Vertical => &mut self.row,
            Direction::Horizontal => &mut self.col,
        }
    }
}

/// A position together with the direction used to walk a line through it
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Placement(pub Position, pub Direction);

impl Placement {
    pub fn next(mut self) -> Self {
        self.0[self.1] = self.0[self.1].saturating_add(1);
        self
    }

    pub fn back(mut self) -> Self {
        self.0[self.1] = self.0[self.1].wrapping_sub(1);
        self
    }

    /// A placement at the same position, but different direction
    pub fn perp(self) -> Self {
        Self(self.0, self.1.perp())
    }

    /// Tries to find the first position on the line formed by the given `positions`
    ///
    /// None if `positions` is empty or if contains at least 2 positions that are not on the same row/column
    ///
    /// Some(Err(p)) if `positions` contains only `p`
    pub fn find_alignment(positions: impl IntoIterator<Item = Position>) -> Option<Result<Placement, Position>> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let second = loop {
            let tmp = iter.next();
            if tmp != Some(first) {
                break tmp;
            }
        };
        let second = if let Some(s) = second { s } else { return Some(Err(first)) };
        let dir = if second.row == first.row {
            Direction::Horizontal
        } else if second.col == first.col {
            Direction::Vertical
        } else {
            return None;
        };
        let mut start = first;
        start[dir] = start[dir].min(second[dir]);

        for new in iter {
            if new[dir.perp()] != start[dir.perp()] {
                return None;
            } else {
                start[dir] = start[dir].min(new[dir])
            }
        }
        Some(Ok(Placement(start, dir)))
    }
}

#[test]
fn test_alignement() {
    let p1 = Position { row: 3, col: 4 };
    let p2 = Position { row: 4, col: 4 };
    let p3 = Position { row: 8, col: 4 };
    let p4 = Position { row: 3, col: 6 };

    assert_eq!(Placement::find_alignment(vec![]), None);
    assert_eq!(Placement::find_alignment(vec![p1]), Some(Err(p1)));
    assert_eq!(Placement::find_alignment(vec![p1, p1]), Some(Err(p1)));
    assert_eq!(
        Placement::find_alignment(vec![p2, p3, p1]),
        Some(Ok(Placement(p1, Direction::Vertical))),
    );
    assert_eq!(
        Placement::find_alignment(vec![p4, p1]),
        Some(Ok(Placement(p1, Direction::Horizontal))),
    );
    assert_eq!(Placement::find_alignment(vec![p1, p2, p4]), None);
}

#[test]
fn letters_are_distinguished_by_id() {
    let a1 = Letter::new('a', 1);
    let a2 = Letter::new('A', 1);
    assert_eq!(a1.character(), 'A');
    assert_eq!(a1.character(), a2.character());
    assert_ne!(a1, a2);
    assert!(a2.id() > a1.id());
    assert_eq!(a1, a1);
}

#[test]
fn neighbours_of_corner() {
    let corner = Position::new(0, 0);
    let around: Vec<_> = corner.neighbours().collect();
    assert_eq!(around.len(), 4);
    assert!(around.contains(&Position::new(0, 1)));
    assert!(around.contains(&Position::new(1, 0)));
    assert!(around.contains(&Position::new(usize::MAX, 0)));
}

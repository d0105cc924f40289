
use std::fmt;

use super::bonus::{self, BonusKind};
use super::{Letter, LetterId, Position};

/// Boards smaller than this cannot hold the bonus pattern
pub const MIN_BOARD_DIMENSION: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board dimension {0} is even, the board needs a single center slot")]
    EvenDimension(usize),
    #[error("board dimension {0} is smaller than the minimum of {min}", min = MIN_BOARD_DIMENSION)]
    TooSmall(usize),
    #[error("slot {0} is outside the board")]
    OutOfBounds(Position),
    #[error("slot {0} cannot be committed without a tile")]
    CommittedWithoutTile(Position),
    #[error("the bonus of slot {0} cannot change")]
    BonusChanged(Position),
    #[error("slot {0} is already occupied")]
    Occupied(Position),
    #[error("slot {0} holds a committed tile")]
    Locked(Position),
    #[error("slot {0} is empty")]
    Empty(Position),
}

/// The state of one slot
///
/// This is a plain value: the board is changed by replacing a whole slot,
/// never by editing one field through a reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SlotState {
    letter: Option<Letter>,
    committed: bool,
    bonus: BonusKind,
}

impl SlotState {
    fn empty(bonus: BonusKind) -> Self {
        Self { letter: None, committed: false, bonus }
    }

    pub fn is_occupied(&self) -> bool {
        self.letter.is_some()
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Occupied by a tile placed during the current turn
    pub fn is_placed(&self) -> bool {
        self.letter.is_some() && !self.committed
    }

    pub fn letter(&self) -> Option<Letter> {
        self.letter
    }

    pub fn bonus(&self) -> BonusKind {
        self.bonus
    }

    /// The same slot holding a tentatively placed `letter`
    pub fn with_letter(self, letter: Letter) -> Self {
        Self { letter: Some(letter), committed: false, ..self }
    }

    /// The same slot locked in
    pub fn locked(self) -> Self {
        Self { committed: true, ..self }
    }

    /// The same slot without any tile
    pub fn vacated(self) -> Self {
        Self::empty(self.bonus)
    }
}

/// The grid of slots, stored row-major
#[derive(Debug, Clone)]
pub struct Board {
    rows: usize,
    cols: usize,
    slots: Vec<SlotState>,
}

impl Board {
    pub fn new(rows: usize, cols: usize) -> Result<Self, BoardError> {
        for &dim in &[rows, cols] {
            if dim < MIN_BOARD_DIMENSION {
                return Err(BoardError::TooSmall(dim));
            }
            if dim % 2 == 0 {
                return Err(BoardError::EvenDimension(dim));
            }
        }
        let slots = bonus::layout(rows, cols).into_iter().map(SlotState::empty).collect();
        Ok(Self { rows, cols, slots })
    }

    pub fn square(size: usize) -> Result<Self, BoardError> {
        Self::new(size, size)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn center(&self) -> Position {
        Position { row: self.rows / 2, col: self.cols / 2 }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn index(&self, pos: Position) -> Result<usize, BoardError> {
        if self.contains(pos) {
            Ok(pos.row * self.cols + pos.col)
        } else {
            Err(BoardError::OutOfBounds(pos))
        }
    }

    pub fn get(&self, pos: Position) -> Result<SlotState, BoardError> {
        self.index(pos).map(|i| self.slots[i])
    }

    /// The letter at `pos`, None if the slot is empty or outside the board
    pub fn letter_at(&self, pos: Position) -> Option<Letter> {
        self.get(pos).ok().and_then(|s| s.letter)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).map(|s| s.is_occupied()).unwrap_or(false)
    }

    pub fn is_committed(&self, pos: Position) -> bool {
        self.get(pos).map(|s| s.is_committed()).unwrap_or(false)
    }

    /// Replace the whole state of a slot
    ///
    /// A committed slot keeps its tile for the rest of the game.
    pub fn set(&mut self, pos: Position, state: SlotState) -> Result<(), BoardError> {
        let i = self.index(pos)?;
        debug_assert!(!state.committed || state.letter.is_some(), "committed slot without tile at {}", pos);
        if state.committed && state.letter.is_none() {
            log::error!("refusing to commit the empty slot {}", pos);
            return Err(BoardError::CommittedWithoutTile(pos));
        }
        let current = self.slots[i];
        if current.committed && (!state.committed || state.letter != current.letter) {
            log::warn!("refusing to move the committed tile at {}", pos);
            return Err(BoardError::Locked(pos));
        }
        if state.bonus != current.bonus {
            log::error!("refusing to change the bonus of slot {}", pos);
            return Err(BoardError::BonusChanged(pos));
        }
        self.slots[i] = state;
        Ok(())
    }

    /// Put a tentative tile on an empty slot
    pub fn place(&mut self, pos: Position, letter: Letter) -> Result<(), BoardError> {
        let slot = self.get(pos)?;
        if slot.is_occupied() {
            return Err(BoardError::Occupied(pos));
        }
        self.set(pos, slot.with_letter(letter))
    }

    /// Remove a tentative tile, returning it
    pub fn take_back(&mut self, pos: Position) -> Result<Letter, BoardError> {
        let slot = self.get(pos)?;
        let letter = slot.letter.ok_or(BoardError::Empty(pos))?;
        if slot.committed {
            return Err(BoardError::Locked(pos));
        }
        self.set(pos, slot.vacated())?;
        Ok(letter)
    }

    /// Lock the tiles at `positions`, returning how many were newly committed
    ///
    /// Every position is checked before anything changes.
    pub fn commit(&mut self, positions: &[Position]) -> Result<usize, BoardError> {
        for &pos in positions {
            if !self.get(pos)?.is_occupied() {
                return Err(BoardError::CommittedWithoutTile(pos));
            }
        }
        let mut newly = 0;
        for &pos in positions {
            let slot = self.get(pos)?;
            if !slot.committed {
                self.set(pos, slot.locked())?;
                newly += 1;
            }
        }
        Ok(newly)
    }

    pub fn committed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.committed).count()
    }

    pub fn is_center_occupied(&self) -> bool {
        self.is_occupied(self.center())
    }

    /// Every slot in row-major order
    pub fn slots(&self) -> &[SlotState] {
        &self.slots
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows * cols).map(move |i| Position { row: i / cols, col: i % cols })
    }

    /// Positions of the tiles placed this turn, in row-major order
    pub fn placed_positions(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.slots[p.row * self.cols + p.col].is_placed()).collect()
    }

    pub fn placed_letter_ids(&self) -> Vec<LetterId> {
        self.slots.iter().filter(|s| s.is_placed()).filter_map(|s| s.letter).map(|l| l.id()).collect()
    }

    pub fn letter_ids(&self) -> Vec<LetterId> {
        self.slots.iter().filter_map(|s| s.letter).map(|l| l.id()).collect()
    }
}

impl fmt::Display for Board {
    /// Committed letters in upper case, placed ones in lower case, empty
    /// slots show their bonus
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.cols {
            write!(f, "{:>3}", col)?;
        }
        writeln!(f)?;
        for row in 0..self.rows {
            write!(f, "{:>3}", row)?;
            for col in 0..self.cols {
                let slot = self.slots[row * self.cols + col];
                match slot.letter {
                    Some(l) if slot.committed => write!(f, "  {}", l.character())?,
                    Some(l) => write!(f, "  {}", l.character().to_ascii_lowercase())?,
                    None => write!(f, " {}", slot.bonus.code())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[test]
fn rejects_bad_dimensions() {
    assert_eq!(Board::new(14, 15).unwrap_err(), BoardError::EvenDimension(14));
    assert_eq!(Board::new(15, 16).unwrap_err(), BoardError::EvenDimension(16));
    assert_eq!(Board::square(9).unwrap_err(), BoardError::TooSmall(9));
    assert_eq!(
        BoardError::TooSmall(9).to_string(),
        "board dimension 9 is smaller than the minimum of 11",
    );
    let board = Board::new(15, 13).unwrap();
    assert_eq!(board.center(), Position::new(7, 6));
    assert_eq!(board.slots().len(), 15 * 13);
}

#[test]
fn out_of_bounds_access() {
    let mut board = Board::square(15).unwrap();
    let outside = Position::new(15, 0);
    assert_eq!(board.get(outside).unwrap_err(), BoardError::OutOfBounds(outside));
    assert_eq!(board.place(outside, Letter::new('a', 1)).unwrap_err(), BoardError::OutOfBounds(outside));
    assert_eq!(board.letter_at(Position::new(usize::MAX, 3)), None);
}

#[test]
fn commit_counts_only_new_tiles() {
    let mut board = Board::square(15).unwrap();
    let a = Position::new(7, 7);
    let b = Position::new(7, 8);
    board.place(a, Letter::new('a', 1)).unwrap();
    board.place(b, Letter::new('t', 1)).unwrap();
    assert_eq!(board.placed_positions(), vec![a, b]);
    assert!(board.is_center_occupied());

    assert_eq!(board.commit(&[a]).unwrap(), 1);
    assert_eq!(board.committed_count(), 1);
    assert_eq!(board.commit(&[a, b]).unwrap(), 1);
    assert_eq!(board.committed_count(), 2);
    assert!(board.placed_positions().is_empty());

    let empty = Position::new(0, 0);
    assert_eq!(board.commit(&[empty]).unwrap_err(), BoardError::CommittedWithoutTile(empty));
    assert_eq!(board.take_back(a).unwrap_err(), BoardError::Locked(a));
}

#[test]
fn set_keeps_bonus_and_invariants() {
    let mut board = Board::square(15).unwrap();
    let corner = Position::new(0, 0);
    let slot = board.get(corner).unwrap();
    assert_eq!(slot.bonus(), BonusKind::TripleWord);

    let foreign = board.get(Position::new(7, 7)).unwrap();
    assert_eq!(board.set(corner, foreign).unwrap_err(), BoardError::BonusChanged(corner));

    let letter = Letter::new('q', 10);
    board.place(corner, letter).unwrap();
    assert_eq!(board.place(corner, Letter::new('z', 10)).unwrap_err(), BoardError::Occupied(corner));
    assert_eq!(board.placed_letter_ids(), vec![letter.id()]);
    assert_eq!(board.take_back(corner).unwrap(), letter);
    assert_eq!(board.get(corner).unwrap().bonus(), BonusKind::TripleWord);
    assert!(!board.is_occupied(corner));
}

#[test]
fn every_reachable_state_keeps_committed_occupied() {
    let mut board = Board::square(11).unwrap();
    for (i, pos) in board.positions().collect::<Vec<_>>().into_iter().enumerate() {
        if i % 3 == 0 {
            board.place(pos, Letter::new('e', 1)).unwrap();
        }
    }
    let placed = board.placed_positions();
    board.commit(&placed[..placed.len() / 2]).unwrap();
    assert!(board.slots().iter().all(|s| !s.is_committed() || s.is_occupied()));
}

#[test]
fn committed_tiles_stay() {
    let mut board = Board::square(15).unwrap();
    let center = board.center();
    board.place(center, Letter::new('a', 1)).unwrap();
    board.commit(&[center]).unwrap();
    let slot = board.get(center).unwrap();

    assert_eq!(board.set(center, slot.vacated()).unwrap_err(), BoardError::Locked(center));
    let swapped = slot.with_letter(Letter::new('b', 3)).locked();
    assert_eq!(board.set(center, swapped).unwrap_err(), BoardError::Locked(center));
    assert_eq!(board.committed_count(), 1);

    board.set(center, slot).unwrap();
    assert_eq!(board.get(center).unwrap(), slot);
}

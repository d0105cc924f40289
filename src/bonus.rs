
use super::Position;

/// The kind of bonus printed on a slot, fixed when the board is built
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BonusKind {
    None,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
    Center,
}

/// Multipliers applied while scoring a freshly placed tile
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bonus {
    pub letter: u32,
    pub word: u32,
}

impl BonusKind {
    pub fn multipliers(self) -> Bonus {
        match self {
            BonusKind::DoubleLetter => Bonus { letter: 2, word: 1 },
            BonusKind::TripleLetter => Bonus { letter: 3, word: 1 },
            BonusKind::DoubleWord => Bonus { letter: 1, word: 2 },
            BonusKind::TripleWord => Bonus { letter: 1, word: 3 },
            BonusKind::None | BonusKind::Center => Bonus { letter: 1, word: 1 },
        }
    }

    /// Two character code used when printing the board
    pub fn code(self) -> &'static str {
        match self {
            BonusKind::None => "..",
            BonusKind::DoubleLetter => "dl",
            BonusKind::TripleLetter => "tl",
            BonusKind::DoubleWord => "DW",
            BonusKind::TripleWord => "TW",
            BonusKind::Center => "**",
        }
    }
}

/// Bonus for the slot at `position` on a board whose last row and column are
/// `max_row` and `max_col`
///
/// The rules are tried in order and overlap near the center, so the order
/// matters: the ring around the center stays plain even where a diagonal or
/// an edge rule would also match.
///
/// Only the eight slots around the center are cleared, not the whole rows and
/// columns next to it. Both give the same square boards, but on a rectangular
/// board a diagonal can still put a double letter on those rows or columns.
pub fn bonus_at(position: Position, max_row: usize, max_col: usize) -> BonusKind {
    let Position { row, col } = position;
    let mid_row = max_row / 2;
    let mid_col = max_col / 2;

    if row == mid_row && col == mid_col {
        return BonusKind::Center;
    }

    let near = |a: usize, b: usize| if a > b { a - b <= 1 } else { b - a <= 1 };
    if near(row, mid_row) && near(col, mid_col) {
        return BonusKind::None;
    }

    let edge_row = row == 0 || row == max_row;
    let edge_col = col == 0 || col == max_col;
    if (edge_row && edge_col) || (row == mid_row && edge_col) || (edge_row && col == mid_col) {
        return BonusKind::TripleWord;
    }

    if row == col || row + col == max_row {
        return BonusKind::DoubleLetter;
    }

    if (col == mid_col && (row == 2 || row + 2 == max_row))
        || (row == mid_row && (col == 2 || col + 2 == max_col))
    {
        return BonusKind::TripleLetter;
    }

    let third_col = col == max_col / 3 || col == max_col - max_col / 3;
    let third_row = row == max_row / 3 || row == max_row - max_row / 3;
    if ((row == 2 || row + 2 == max_row) && third_col) || ((col == 2 || col + 2 == max_col) && third_row) {
        return BonusKind::DoubleWord;
    }

    BonusKind::None
}

/// The whole layout in row-major order
pub fn layout(rows: usize, cols: usize) -> Vec<BonusKind> {
    let mut out = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            out.push(bonus_at(Position { row, col }, rows - 1, cols - 1));
        }
    }
    out
}

#[test]
fn standard_board_bonuses() {
    let at = |row, col| bonus_at(Position { row, col }, 14, 14);

    assert_eq!(at(7, 7), BonusKind::Center);
    for &(row, col) in &[(6, 6), (6, 7), (6, 8), (7, 6), (7, 8), (8, 6), (8, 7), (8, 8)] {
        assert_eq!(at(row, col), BonusKind::None, "ring at ({}, {})", row, col);
    }

    for &(row, col) in &[(0, 0), (0, 14), (14, 0), (14, 14), (7, 0), (7, 14), (0, 7), (14, 7)] {
        assert_eq!(at(row, col), BonusKind::TripleWord);
    }

    assert_eq!(at(1, 1), BonusKind::DoubleLetter);
    assert_eq!(at(5, 9), BonusKind::DoubleLetter);
    assert_eq!(at(2, 2), BonusKind::DoubleLetter);

    for &(row, col) in &[(2, 7), (12, 7), (7, 2), (7, 12)] {
        assert_eq!(at(row, col), BonusKind::TripleLetter);
    }

    for &(row, col) in &[(2, 4), (2, 10), (12, 4), (12, 10), (4, 2), (4, 12), (10, 2), (10, 12)] {
        assert_eq!(at(row, col), BonusKind::DoubleWord);
    }

    assert_eq!(at(7, 9), BonusKind::None);
    assert_eq!(at(3, 5), BonusKind::None);
}

#[test]
fn layout_is_stable_and_symmetric() {
    let first = layout(15, 15);
    let second = layout(15, 15);
    assert_eq!(first, second);
    assert_eq!(first.len(), 225);

    for row in 0..15 {
        for col in 0..15 {
            let here = first[row * 15 + col];
            assert_eq!(here, first[col * 15 + row]);
            assert_eq!(here, first[(14 - row) * 15 + (14 - col)]);
        }
    }

    let centers = first.iter().filter(|&&b| b == BonusKind::Center).count();
    assert_eq!(centers, 1);
}

#[test]
fn rectangular_board_keeps_diagonals_next_to_center_rows() {
    // 15 rows, 21 columns: center is (7, 10)
    let at = |row, col| bonus_at(Position { row, col }, 14, 20);
    assert_eq!(at(7, 10), BonusKind::Center);
    assert_eq!(at(8, 9), BonusKind::None);
    assert_eq!(at(8, 8), BonusKind::DoubleLetter);
}

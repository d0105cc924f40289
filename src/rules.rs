
pub mod placement;
pub mod score;
pub mod word_finder;

use super::board::BoardError;

pub use placement::validate_placement;
pub use score::{word_score, words_share_tiles};
pub use word_finder::{find_words, word_line, FoundWord};

/// Why a play was refused
///
/// Everything except `Board` is something the player can fix; the message is
/// meant to be shown to them as is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlayError {
    #[error("no tiles provided, drag letter tiles from your rack onto the board")]
    NoTilesPlaced,
    #[error("tiles must form a single line or connect through a shared tile")]
    NotInLine,
    #[error("tiles must connect with at least one previously placed tile")]
    NotConnected,
    #[error("tiles are not contiguous")]
    NotContiguous,
    #[error("you must place a letter tile on the center square on the first move")]
    CenterNotCovered,
    #[error("words must consist of at least 2 letters")]
    TooShort,
    #[error("\"{0}\" is not a supported word")]
    InvalidWord(String),
    #[error("multi-words do not share a common letter tile")]
    NoSharedTile,
    #[error("the game is over")]
    GameOver,
    #[error(transparent)]
    Board(#[from] BoardError),
}

#[cfg(test)]
pub(crate) fn board_with(committed: &[(usize, usize, char)], placed: &[(usize, usize, char)]) -> crate::Board {
    use crate::{letters::LetterTable, Board, Letter, Position};

    let table = LetterTable::english();
    let letter = |c: char| Letter::new(c, table.points(c).unwrap());
    let mut board = Board::square(15).unwrap();
    let mut locked = vec![];
    for &(row, col, c) in committed {
        let pos = Position::new(row, col);
        board.place(pos, letter(c)).unwrap();
        locked.push(pos);
    }
    board.commit(&locked).unwrap();
    for &(row, col, c) in placed {
        board.place(Position::new(row, col), letter(c)).unwrap();
    }
    board
}

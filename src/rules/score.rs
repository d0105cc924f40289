
use std::collections::HashSet;

use super::FoundWord;
use crate::board::Board;
use crate::Position;

/// Score of the word lying on `positions`
///
/// Letter and word bonuses only count on slots whose tile is not committed
/// yet: once a tile is locked on a bonus slot, that bonus is spent for the
/// rest of the game.
pub fn word_score(board: &Board, positions: &[Position]) -> u32 {
    let mut word_score = 0;
    let mut word_multiplier = 1;

    for &pos in positions {
        let slot = match board.get(pos) {
            Ok(slot) => slot,
            Err(e) => {
                log::error!("scoring a word through {}: {}", pos, e);
                continue;
            }
        };
        let letter = match slot.letter() {
            Some(l) => l,
            None => continue,
        };
        if slot.is_committed() {
            word_score += letter.points();
        } else {
            let bonus = slot.bonus().multipliers();
            word_score += letter.points() * bonus.letter;
            word_multiplier *= bonus.word;
        }
    }

    word_score * word_multiplier
}

/// Whether every word meets at least one position of the words before it
pub fn words_share_tiles(words: &[FoundWord]) -> bool {
    let mut seen: HashSet<Position> = HashSet::new();
    for (i, word) in words.iter().enumerate() {
        if i > 0 && !word.positions.iter().any(|p| seen.contains(p)) {
            return false;
        }
        seen.extend(word.positions.iter().copied());
    }
    true
}

#[cfg(test)]
use super::board_with;

#[cfg(test)]
fn row(row: usize, cols: std::ops::Range<usize>) -> Vec<Position> {
    cols.map(|col| Position::new(row, col)).collect()
}

#[test]
fn word_bonus_is_spent_once_committed() {
    let mut board = board_with(&[], &[(2, 3, 'c'), (2, 4, 'a'), (2, 5, 't')]);
    let cat = row(2, 3..6);
    assert_eq!(word_score(&board, &cat), (3 + 1 + 1) * 2);
    assert_eq!(word_score(&board, &cat), word_score(&board, &cat));

    board.commit(&cat).unwrap();
    assert_eq!(word_score(&board, &cat), 3 + 1 + 1);
}

#[test]
fn letter_bonus() {
    let board = board_with(&[], &[(1, 1, 'q'), (1, 2, 'i')]);
    assert_eq!(word_score(&board, &row(1, 1..3)), 10 * 2 + 1);
}

#[test]
fn triple_word_corner_and_committed_neighbours() {
    let board = board_with(&[(0, 1, 'x'), (0, 2, 'i')], &[(0, 0, 'a')]);
    assert_eq!(word_score(&board, &row(0, 0..3)), (1 + 8 + 1) * 3);
}

#[test]
fn disjoint_words_do_not_share() {
    use crate::Direction;

    let word = |text: &str, positions: Vec<Position>| FoundWord {
        text: text.to_owned(),
        score: 0,
        positions,
        direction: Direction::Horizontal,
    };
    let apart = vec![word("AT", row(3, 3..5)), word("TO", row(9, 3..5))];
    assert!(!words_share_tiles(&apart));

    let crossing = vec![word("AT", row(3, 3..5)), word("TO", row(3, 4..6)), word("ON", row(9, 0..2))];
    assert!(!words_share_tiles(&crossing));
    assert!(words_share_tiles(&crossing[..2]));
    assert!(words_share_tiles(&[]));
}

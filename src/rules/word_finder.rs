
use std::collections::HashSet;

use super::score;
use crate::board::Board;
use crate::{Direction, Placement, Position};

/// A word made (or extended) by the current play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundWord {
    pub text: String,
    /// Points, computed while the new tiles still get their bonuses
    pub score: u32,
    /// Board positions in reading order
    pub positions: Vec<Position>,
    pub direction: Direction,
}

/// The full run of occupied slots through `place.0` along `place.1`
///
/// Runs left to right, or top to bottom.
pub fn word_line(board: &Board, place: Placement) -> Vec<Position> {
    let Placement(pos, dir) = place;
    let mut backward = vec![];
    let mut head = place.back();
    while board.is_occupied(head.0) {
        backward.push(head.0);
        head = head.back();
    }
    let mut line: Vec<Position> = backward.into_iter().rev().collect();
    line.push(pos);
    let mut head = place.next();
    while board.is_occupied(head.0) {
        line.push(head.0);
        head = head.next();
    }
    line.sort_unstable_by_key(|p| p[dir]);
    line
}

/// Every word formed by the tiles placed this turn
///
/// `tiles` is the connected group returned by the placement check; only its
/// uncommitted tiles start a scan. The main line comes first, then the cross
/// words in board order, so each word after the first meets an earlier one.
pub fn find_words(board: &Board, tiles: &[Position]) -> Vec<FoundWord> {
    let mut placed: Vec<Position> = tiles
        .iter()
        .copied()
        .filter(|&p| board.get(p).map(|s| s.is_placed()).unwrap_or(false))
        .collect();
    placed.sort_unstable();

    let axes = match Placement::find_alignment(placed.iter().copied()) {
        Some(Ok(Placement(_, dir))) => [dir, dir.perp()],
        _ => [Direction::Horizontal, Direction::Vertical],
    };

    let mut visited: HashSet<(Position, Direction)> = HashSet::new();
    let mut words = vec![];

    for &tile in &placed {
        for &dir in &axes {
            if visited.contains(&(tile, dir)) {
                continue;
            }
            let line = word_line(board, Placement(tile, dir));
            visited.extend(line.iter().map(|&p| (p, dir)));

            if line.len() <= 1 {
                continue;
            }
            if !line.iter().any(|&p| board.get(p).map(|s| s.is_placed()).unwrap_or(false)) {
                continue;
            }

            let text: String = line.iter().filter_map(|&p| board.letter_at(p)).map(|l| l.character()).collect();
            let score = score::word_score(board, &line);
            log::debug!("found {} for {} points at {:?}", text, score, line);
            words.push(FoundWord { text, score, positions: line, direction: dir });
        }
    }
    words
}

#[cfg(test)]
use super::board_with;

#[test]
fn extends_word() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(7, 9, 's')]);
    let tiles = super::validate_placement(&board, &board.placed_positions()).unwrap();
    let words = find_words(&board, &tiles);
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].text, "CATS");
    assert_eq!(
        words[0].positions,
        vec![Position::new(7, 6), Position::new(7, 7), Position::new(7, 8), Position::new(7, 9)],
    );
    assert_eq!(words[0].score, 3 + 1 + 1 + 1);
    assert_eq!(words[0].direction, Direction::Horizontal);
}

#[test]
fn single_tile_two_words() {
    let board = board_with(
        &[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't'), (5, 9, 'o'), (6, 9, 'n')],
        &[(7, 9, 's')],
    );
    let words = find_words(&board, &board.placed_positions());
    let texts: Vec<_> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, vec!["CATS", "ONS"]);

    let first: HashSet<_> = words[0].positions.iter().copied().collect();
    let second: HashSet<_> = words[1].positions.iter().copied().collect();
    let shared: Vec<_> = first.intersection(&second).copied().collect();
    assert_eq!(shared, vec![Position::new(7, 9)]);
    assert!(super::words_share_tiles(&words));
}

#[test]
fn vertical_reading_order() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(9, 7, 't'), (8, 7, 'n')]);
    let words = find_words(&board, &board.placed_positions());
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].text, "ANT");
    assert_eq!(words[0].direction, Direction::Vertical);
    assert_eq!(words[0].positions[0], Position::new(7, 7));
}

#[test]
fn main_line_then_cross_words() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(8, 7, 't'), (8, 8, 'o')]);
    let tiles = super::validate_placement(&board, &board.placed_positions()).unwrap();
    let words = find_words(&board, &tiles);
    let texts: Vec<_> = words.iter().map(|w| (w.text.as_str(), w.score)).collect();
    assert_eq!(texts, vec![("TO", 2), ("AT", 2), ("TO", 2)]);
    assert_eq!(words[0].direction, Direction::Horizontal);
    assert!(super::words_share_tiles(&words));
}

#[test]
fn first_turn_word() {
    let board = board_with(&[], &[(7, 7, 'h'), (7, 8, 'i')]);
    let words = find_words(&board, &board.placed_positions());
    assert_eq!(words.len(), 1);
    assert_eq!(words[0].text, "HI");
    assert_eq!(words[0].score, 5);
}

#[test]
fn line_stops_at_edges() {
    let board = board_with(&[], &[(0, 0, 'a'), (0, 1, 'x'), (0, 3, 'e')]);
    let line = word_line(&board, Placement(Position::new(0, 1), Direction::Horizontal));
    assert_eq!(line, vec![Position::new(0, 0), Position::new(0, 1)]);
    let line = word_line(&board, Placement(Position::new(0, 0), Direction::Vertical));
    assert_eq!(line, vec![Position::new(0, 0)]);
}


use std::collections::{BTreeSet, HashSet};

use super::PlayError;
use crate::board::{Board, BoardError};
use crate::{Direction, Placement, Position};

/// Every position reachable from `start` through orthogonal steps on
/// traversable positions
pub fn flood_fill(start: Position, traversable: impl Fn(Position) -> bool) -> HashSet<Position> {
    let mut reached = HashSet::new();
    let mut stack = vec![start];
    reached.insert(start);
    while let Some(pos) = stack.pop() {
        for next in pos.neighbours() {
            if traversable(next) && reached.insert(next) {
                stack.push(next);
            }
        }
    }
    reached
}

/// Committed tiles filling the whole gap between two placed tiles of the
/// same row or column
fn bridges(board: &Board, placed: &[Position]) -> HashSet<Position> {
    let mut found = HashSet::new();
    for (i, &a) in placed.iter().enumerate() {
        for &b in &placed[i + 1..] {
            let dir = if a.row == b.row {
                Direction::Horizontal
            } else if a.col == b.col {
                Direction::Vertical
            } else {
                continue;
            };
            let (low, high) = if a[dir] < b[dir] { (a, b) } else { (b, a) };
            let mut gap = vec![];
            let mut head = Placement(low, dir).next();
            while head.0[dir] < high[dir] {
                gap.push(head.0);
                head = head.next();
            }
            if gap.iter().all(|&p| board.is_occupied(p)) {
                found.extend(gap.into_iter().filter(|&p| board.is_committed(p)));
            }
        }
    }
    found
}

pub fn touches_committed(board: &Board, placed: &[Position]) -> bool {
    placed.iter().any(|p| p.neighbours().any(|n| board.is_committed(n)))
}

/// Check that the tiles placed this turn make one connected play
///
/// On success, returns the connected group in row-major order: the placed
/// tiles plus the committed tiles linking them.
pub fn validate_placement(board: &Board, placed: &[Position]) -> Result<Vec<Position>, PlayError> {
    let start = *placed.first().ok_or(PlayError::NoTilesPlaced)?;
    for &pos in placed {
        let slot = board.get(pos)?;
        if !slot.is_placed() {
            return Err(BoardError::Empty(pos).into());
        }
    }
    let placed_set: HashSet<Position> = placed.iter().copied().collect();
    let all_reached = |reached: &HashSet<Position>| placed_set.iter().all(|p| reached.contains(p));

    if board.committed_count() == 0 {
        let reached = flood_fill(start, |p| placed_set.contains(&p));
        if !all_reached(&reached) {
            return Err(PlayError::NotContiguous);
        }
        return Ok(reached.into_iter().collect::<BTreeSet<_>>().into_iter().collect());
    }

    let bridging = bridges(board, placed);
    let in_line = Placement::find_alignment(placed.iter().copied()).is_some();
    if !in_line {
        let linked = flood_fill(start, |p| placed_set.contains(&p) || bridging.contains(&p));
        if !all_reached(&linked) {
            return Err(PlayError::NotInLine);
        }
    }

    if !touches_committed(board, placed) {
        return Err(PlayError::NotConnected);
    }

    let attached: HashSet<Position> = placed
        .iter()
        .flat_map(|p| p.neighbours())
        .filter(|&n| board.is_committed(n))
        .collect();
    let reached = flood_fill(start, |p| {
        placed_set.contains(&p) || bridging.contains(&p) || attached.contains(&p)
    });
    if !all_reached(&reached) {
        log::debug!("placed tiles {:?} are split, reached only {:?}", placed, reached);
        return Err(PlayError::NotContiguous);
    }
    Ok(reached.into_iter().collect::<BTreeSet<_>>().into_iter().collect())
}

#[cfg(test)]
use super::board_with;

#[cfg(test)]
fn positions(list: &[(usize, usize)]) -> Vec<Position> {
    list.iter().map(|&(row, col)| Position::new(row, col)).collect()
}

#[test]
fn nothing_placed() {
    let board = board_with(&[], &[]);
    assert_eq!(validate_placement(&board, &[]), Err(PlayError::NoTilesPlaced));
}

#[test]
fn first_turn_adjacent_tiles() {
    let board = board_with(&[], &[(7, 7, 'a'), (7, 8, 't')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed), Ok(positions(&[(7, 7), (7, 8)])));
}

#[test]
fn first_turn_gap() {
    let board = board_with(&[], &[(7, 7, 'a'), (7, 9, 't')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed), Err(PlayError::NotContiguous));
}

#[test]
fn first_turn_cluster() {
    let board = board_with(&[], &[(7, 7, 'a'), (7, 8, 't'), (8, 8, 'o')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed).unwrap().len(), 3);
}

#[test]
fn extends_committed_word() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(7, 9, 's')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed), Ok(positions(&[(7, 8), (7, 9)])));
}

#[test]
fn bridged_through_committed_word() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(7, 5, 's'), (7, 9, 's')]);
    let placed = board.placed_positions();
    assert_eq!(
        validate_placement(&board, &placed),
        Ok(positions(&[(7, 5), (7, 6), (7, 7), (7, 8), (7, 9)])),
    );
}

#[test]
fn unbridged_gap_in_line() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(6, 6, 'o'), (6, 8, 'o')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed), Err(PlayError::NotContiguous));
}

#[test]
fn scattered_tiles() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(6, 6, 'o'), (8, 8, 'o')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed), Err(PlayError::NotInLine));
}

#[test]
fn not_touching_committed() {
    let board = board_with(&[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')], &[(2, 2, 'o'), (2, 3, 'x')]);
    let placed = board.placed_positions();
    assert_eq!(validate_placement(&board, &placed), Err(PlayError::NotConnected));
}

#[test]
fn corner_shape_after_first_turn() {
    let board = board_with(
        &[(7, 6, 'c'), (7, 7, 'a'), (7, 8, 't')],
        &[(8, 8, 'o'), (9, 8, 'n'), (9, 9, 'e')],
    );
    let placed = board.placed_positions();
    assert_eq!(
        validate_placement(&board, &placed),
        Ok(positions(&[(7, 8), (8, 8), (9, 8), (9, 9)])),
    );
}

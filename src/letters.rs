
use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use super::Letter;

/// Points and supply of one character
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct LetterSpec {
    pub points: u32,
    pub count: u32,
}

/// English distribution, no blanks
const ENGLISH: [(char, u32, u32); 26] = [
    ('A', 1, 9), ('B', 3, 2), ('C', 3, 2), ('D', 2, 4), ('E', 1, 12),
    ('F', 4, 2), ('G', 2, 3), ('H', 4, 2), ('I', 1, 9), ('J', 8, 1),
    ('K', 5, 1), ('L', 1, 4), ('M', 3, 2), ('N', 1, 6), ('O', 1, 8),
    ('P', 3, 2), ('Q', 10, 1), ('R', 1, 6), ('S', 1, 4), ('T', 1, 6),
    ('U', 1, 4), ('V', 4, 2), ('W', 4, 2), ('X', 8, 1), ('Y', 4, 2),
    ('Z', 10, 1),
];

/// The letters of a game, with their points and how many of each go in the bag
#[derive(Debug, Clone, PartialEq)]
pub struct LetterTable {
    specs: Vec<(char, LetterSpec)>,
}

impl LetterTable {
    pub fn english() -> Self {
        Self {
            specs: ENGLISH.iter().map(|&(c, points, count)| (c, LetterSpec { points, count })).collect(),
        }
    }

    /// Characters are upper-cased and kept in alphabetical order
    pub fn from_map(map: &HashMap<char, LetterSpec>) -> Self {
        let mut specs: Vec<_> = map.iter().map(|(c, s)| (c.to_ascii_uppercase(), *s)).collect();
        specs.sort_unstable_by_key(|(c, _)| *c);
        specs.dedup_by_key(|(c, _)| *c);
        Self { specs }
    }

    pub fn points(&self, character: char) -> Option<u32> {
        let character = character.to_ascii_uppercase();
        self.specs.iter().find(|(c, _)| *c == character).map(|(_, s)| s.points)
    }

    pub fn total_count(&self) -> usize {
        self.specs.iter().map(|(_, s)| s.count as usize).sum()
    }

    /// One fresh letter per unit of supply
    pub fn mint_all(&self) -> Vec<Letter> {
        let mut letters = Vec::with_capacity(self.total_count());
        for (c, spec) in &self.specs {
            for _ in 0..spec.count {
                letters.push(Letter::new(*c, spec.points));
            }
        }
        letters
    }
}

impl Default for LetterTable {
    fn default() -> Self {
        Self::english()
    }
}

/// Where new letters come from
///
/// Callers check `has_more` before drawing; drawing from an exhausted source
/// gives None.
pub trait LetterSource {
    fn draw_one(&mut self) -> Option<Letter>;
    fn has_more(&self) -> bool;
    fn remaining(&self) -> usize;
}

/// A bag picking letters uniformly at random
pub struct LetterBag {
    letters: Vec<Letter>,
    rng: ChaCha20Rng,
}

impl LetterBag {
    pub fn new(table: &LetterTable) -> Self {
        Self::with_rng(table, ChaCha20Rng::from_rng(&mut rand::rng()))
    }

    /// A bag drawing the same sequence for the same seed
    pub fn seeded(table: &LetterTable, seed: u64) -> Self {
        Self::with_rng(table, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(table: &LetterTable, rng: ChaCha20Rng) -> Self {
        let letters = table.mint_all();
        log::info!("letter bag filled with {} letters", letters.len());
        Self { letters, rng }
    }

}

impl LetterSource for LetterBag {
    fn draw_one(&mut self) -> Option<Letter> {
        if self.letters.is_empty() {
            log::debug!("draw from an empty letter bag");
            return None;
        }
        let i = self.rng.random_range(0..self.letters.len());
        let letter = self.letters.swap_remove(i);
        log::trace!("drew {:?}, {} letters left", letter, self.letters.len());
        Some(letter)
    }

    fn has_more(&self) -> bool {
        !self.letters.is_empty()
    }

    fn remaining(&self) -> usize {
        self.letters.len()
    }
}

impl std::fmt::Debug for LetterBag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "LetterBag[{} letters]", self.letters.len())
    }
}

#[test]
fn english_table() {
    let table = LetterTable::english();
    assert_eq!(table.total_count(), 98);
    assert_eq!(table.points('q'), Some(10));
    assert_eq!(table.points('E'), Some(1));
    assert_eq!(table.points('?'), None);
}

#[test]
fn custom_table() {
    let mut map = HashMap::new();
    map.insert('x', LetterSpec { points: 7, count: 2 });
    map.insert('a', LetterSpec { points: 1, count: 3 });
    let table = LetterTable::from_map(&map);
    assert_eq!(table.total_count(), 5);
    let minted = table.mint_all();
    assert_eq!(minted.iter().filter(|l| l.character() == 'X').count(), 2);
    assert!(minted.iter().all(|l| l.points() == table.points(l.character()).unwrap()));
}

#[test]
fn bag_draws_every_letter_once() {
    let table = LetterTable::english();
    let mut bag = LetterBag::seeded(&table, 7);
    let mut seen = std::collections::HashSet::new();
    while bag.has_more() {
        let letter = bag.draw_one().unwrap();
        assert!(seen.insert(letter.id()));
    }
    assert_eq!(seen.len(), 98);
    assert_eq!(bag.remaining(), 0);
    assert!(bag.draw_one().is_none());
}

#[test]
fn seeded_bags_agree() {
    let table = LetterTable::english();
    let mut a = LetterBag::seeded(&table, 42);
    let mut b = LetterBag::seeded(&table, 42);
    for _ in 0..20 {
        let (la, lb) = (a.draw_one().unwrap(), b.draw_one().unwrap());
        assert_eq!(la.character(), lb.character());
        assert_ne!(la, lb);
    }
}


use super::{Letter, LetterId};

#[derive(Debug, Clone)]
pub struct PlayerState {
    index: usize,
    name: String,
    rack: Vec<Letter>,
    score: u32,
    consecutive_passes: u32,
    best_word: Option<(String, u32)>,
}

impl PlayerState {
    pub fn new(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            rack: vec![],
            score: 0,
            consecutive_passes: 0,
            best_word: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rack(&self) -> &[Letter] {
        &self.rack
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn consecutive_passes(&self) -> u32 {
        self.consecutive_passes
    }

    /// The highest scoring word this player made, with its score
    pub fn best_word(&self) -> Option<(&str, u32)> {
        self.best_word.as_ref().map(|(w, s)| (w.as_str(), *s))
    }

    pub fn find_letter(&self, id: LetterId) -> Option<Letter> {
        self.rack.iter().copied().find(|l| l.id() == id)
    }

    pub fn give(&mut self, letter: Letter) {
        self.rack.push(letter);
    }

    /// Remove the tile with this id, never another tile showing the same character
    pub fn take(&mut self, id: LetterId) -> Option<Letter> {
        let i = self.rack.iter().position(|l| l.id() == id)?;
        Some(self.rack.remove(i))
    }

    /// Add a word's points, remembering it if it beats the best word so far
    pub fn record_word(&mut self, word: &str, points: u32) {
        self.score += points;
        let better = match &self.best_word {
            Some((_, best)) => points > *best,
            None => points > 0,
        };
        if better {
            self.best_word = Some((word.to_owned(), points));
        }
    }

    pub fn passed(&mut self) {
        self.consecutive_passes += 1;
    }

    pub fn played(&mut self) {
        self.consecutive_passes = 0;
    }
}

#[test]
fn rack_uses_ids() {
    let mut player = PlayerState::new(0, "Ada");
    let a1 = Letter::new('a', 1);
    let a2 = Letter::new('a', 1);
    player.give(a1);
    player.give(a2);
    assert_eq!(player.take(a2.id()), Some(a2));
    assert_eq!(player.rack(), &[a1]);
    assert_eq!(player.take(a2.id()), None);
    assert_eq!(player.find_letter(a1.id()), Some(a1));
}

#[test]
fn best_word_tracking() {
    let mut player = PlayerState::new(1, "Bo");
    player.record_word("CAT", 5);
    player.record_word("AT", 2);
    player.record_word("QUIZ", 22);
    player.record_word("ZIT", 22);
    assert_eq!(player.score(), 51);
    assert_eq!(player.best_word(), Some(("QUIZ", 22)));

    player.passed();
    player.passed();
    assert_eq!(player.consecutive_passes(), 2);
    player.played();
    assert_eq!(player.consecutive_passes(), 0);
}

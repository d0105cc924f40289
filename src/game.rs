
use std::time::Duration;

use super::board::{Board, BoardError};
use super::clock::{ClockSignal, TurnClock};
use super::config::GameRules;
use super::dictionary::Dictionary;
use super::letters::{LetterBag, LetterSource};
use super::player::PlayerState;
use super::rules::{self, FoundWord, PlayError};
use super::{Letter, LetterId, Position};

/// Where the current turn stands
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TurnPhase {
    WaitingForPlacement,
    Validating,
    Scoring,
    Committed,
    NextPlayer,
    GameOver,
}

/// Notifications for whoever presents the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LetterDrawn { player: usize, letter: LetterId },
    /// Emitted for every successful play, these tiles can no longer move
    TilesCommitted { player: usize, positions: Vec<Position>, letters: Vec<LetterId> },
    WordScored { player: usize, word: String, score: u32 },
    TilesReturned { player: usize, letters: Vec<LetterId> },
    Passed { player: usize, consecutive: u32 },
    TurnSwitched { previous: Option<usize>, next: usize },
    CountdownStarted { player: usize, remaining: Duration },
    GameOver(GameSummary),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestWord {
    pub player: usize,
    pub word: String,
    pub score: u32,
}

/// Final standings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// Name and score of every player, in turn order
    pub scores: Vec<(String, u32)>,
    /// None when every player has the same score
    pub winner: Option<usize>,
    pub best_word: Option<BestWord>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("letter {0} is not in the rack of the current player")]
    NotInRack(LetterId),
    #[error("letter {0} is already on the board")]
    AlreadyPlaced(LetterId),
    #[error("the game is over")]
    GameOver,
    #[error("at least one player is needed")]
    NoPlayers,
    #[error("the rack must hold at least one letter")]
    EmptyRack,
    #[error(transparent)]
    Board(#[from] BoardError),
}

/// One game: the board, the players and the turn sequence
pub struct Game<D, S> {
    board: Board,
    players: Vec<PlayerState>,
    current: usize,
    bag: S,
    dictionary: D,
    rack_size: usize,
    clock: TurnClock,
    phase: TurnPhase,
    started: bool,
}

impl<D: Dictionary> Game<D, LetterBag> {
    /// A game drawing from a fresh bag filled from `rules`
    pub fn from_rules(rules: &GameRules, dictionary: D) -> Result<Self, GameError> {
        let bag = match rules.seed {
            Some(seed) => LetterBag::seeded(&rules.letters, seed),
            None => LetterBag::new(&rules.letters),
        };
        Self::new(rules, dictionary, bag)
    }
}

impl<D: Dictionary, S: LetterSource> Game<D, S> {
    pub fn new(rules: &GameRules, dictionary: D, bag: S) -> Result<Self, GameError> {
        if rules.players.is_empty() {
            return Err(GameError::NoPlayers);
        }
        if rules.rack_size == 0 {
            return Err(GameError::EmptyRack);
        }
        let board = Board::new(rules.rows, rules.cols)?;
        let players = rules
            .players
            .iter()
            .enumerate()
            .map(|(i, name)| PlayerState::new(i, name.as_str()))
            .collect();
        Ok(Self {
            board,
            players,
            current: 0,
            bag,
            dictionary,
            rack_size: rules.rack_size,
            clock: TurnClock::new(rules.turn_limit, rules.countdown),
            phase: TurnPhase::WaitingForPlacement,
            started: false,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn current_player(&self) -> &PlayerState {
        &self.players[self.current]
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == TurnPhase::GameOver
    }

    pub fn letters_left(&self) -> usize {
        self.bag.remaining()
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    /// Letters of the current player that are not on the board
    pub fn available_letters(&self) -> Vec<Letter> {
        let placed = self.board.placed_letter_ids();
        self.current_player().rack().iter().copied().filter(|l| !placed.contains(&l.id())).collect()
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        log::debug!("turn phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Deal the racks and hand the first turn to the first player
    ///
    /// Only the first call does anything.
    pub fn start(&mut self) -> Vec<GameEvent> {
        let mut events = vec![];
        if self.started {
            return events;
        }
        self.started = true;

        let n_players = self.players.len();
        for i in 0..self.rack_size * n_players {
            if !self.bag.has_more() {
                break;
            }
            self.draw_for(i % n_players, &mut events);
        }
        log::info!("game started with {} players, {} letters left in the bag", n_players, self.bag.remaining());

        events.push(GameEvent::TurnSwitched { previous: None, next: 0 });
        if self.players[0].rack().is_empty() {
            self.finish(&mut events);
        }
        events
    }

    fn draw_for(&mut self, player: usize, events: &mut Vec<GameEvent>) {
        if let Some(letter) = self.bag.draw_one() {
            self.players[player].give(letter);
            events.push(GameEvent::LetterDrawn { player, letter: letter.id() });
        }
    }

    fn refill(&mut self, player: usize, events: &mut Vec<GameEvent>) {
        while self.players[player].rack().len() < self.rack_size && self.bag.has_more() {
            self.draw_for(player, events);
        }
    }

    /// Put a letter of the current player's rack on an empty slot
    pub fn place_letter(&mut self, letter: LetterId, pos: Position) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let tile = self.current_player().find_letter(letter).ok_or(GameError::NotInRack(letter))?;
        if self.board.placed_letter_ids().contains(&letter) {
            return Err(GameError::AlreadyPlaced(letter));
        }
        self.board.place(pos, tile)?;
        Ok(())
    }

    /// Pick a tile placed this turn back up
    pub fn take_back(&mut self, pos: Position) -> Result<Letter, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        Ok(self.board.take_back(pos)?)
    }

    /// Every check a play has to pass, in order, without touching the board
    fn check_play(&self) -> Result<(Vec<Position>, Vec<FoundWord>), PlayError> {
        let placed = self.board.placed_positions();
        if placed.is_empty() {
            return Err(PlayError::NoTilesPlaced);
        }

        let first_turn = self.board.committed_count() == 0;
        if first_turn && !self.board.is_center_occupied() {
            return Err(PlayError::CenterNotCovered);
        }

        let contiguous = rules::validate_placement(&self.board, &placed)?;

        if first_turn {
            if placed.len() < 2 {
                return Err(PlayError::TooShort);
            }
        } else if !rules::placement::touches_committed(&self.board, &placed) {
            return Err(PlayError::NotConnected);
        }

        let words = rules::find_words(&self.board, &contiguous);
        if words.is_empty() {
            return Err(PlayError::TooShort);
        }

        self.check_words(&words)?;
        Ok((placed, words))
    }

    /// Dictionary lookups, then the shared tile rule
    fn check_words(&self, words: &[FoundWord]) -> Result<(), PlayError> {
        for word in words {
            if !self.dictionary.is_valid_word(&word.text) {
                return Err(PlayError::InvalidWord(word.text.to_uppercase()));
            }
        }
        if words.len() > 1 && !rules::words_share_tiles(words) {
            return Err(PlayError::NoSharedTile);
        }
        Ok(())
    }

    /// Try to play the tiles placed on the board
    ///
    /// On failure nothing changes and the same player keeps the turn.
    pub fn attempt_play(&mut self) -> Result<Vec<GameEvent>, PlayError> {
        if self.is_over() {
            return Err(PlayError::GameOver);
        }
        self.set_phase(TurnPhase::Validating);
        let (placed, words) = match self.check_play() {
            Ok(play) => play,
            Err(e) => {
                log::debug!("play refused: {}", e);
                self.set_phase(TurnPhase::WaitingForPlacement);
                return Err(e);
            }
        };
        self.set_phase(TurnPhase::Scoring);

        let mut events = vec![];
        let player = self.current;
        let letters: Vec<LetterId> = placed
            .iter()
            .filter_map(|&p| self.board.letter_at(p))
            .map(|l| l.id())
            .collect();

        if let Err(e) = self.board.commit(&placed) {
            log::error!("committing validated tiles {:?}: {}", placed, e);
            self.set_phase(TurnPhase::WaitingForPlacement);
            return Err(e.into());
        }
        self.set_phase(TurnPhase::Committed);
        events.push(GameEvent::TilesCommitted { player, positions: placed, letters: letters.clone() });

        let state = &mut self.players[player];
        for word in words {
            log::info!("{} scores {} with {}", state.name(), word.score, word.text);
            state.record_word(&word.text, word.score);
            events.push(GameEvent::WordScored { player, word: word.text, score: word.score });
        }
        for id in letters {
            state.take(id);
        }
        state.played();

        self.switch_turn(&mut events);
        Ok(events)
    }

    /// Give up the turn, sending the tiles placed this turn back to the rack
    pub fn pass_turn(&mut self) -> Result<Vec<GameEvent>, GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        let mut events = vec![];
        let player = self.current;

        let mut returned = vec![];
        for pos in self.board.placed_positions() {
            returned.push(self.board.take_back(pos)?.id());
        }
        if !returned.is_empty() {
            events.push(GameEvent::TilesReturned { player, letters: returned });
        }

        self.players[player].passed();
        let consecutive = self.players[player].consecutive_passes();
        log::info!("{} passes ({} in a row)", self.players[player].name(), consecutive);
        events.push(GameEvent::Passed { player, consecutive });

        if self.players.iter().all(|p| p.consecutive_passes() >= 2) {
            self.finish(&mut events);
            return Ok(events);
        }
        self.switch_turn(&mut events);
        Ok(events)
    }

    /// Advance the turn clock, passing automatically once time runs out
    pub fn tick(&mut self, delta: Duration) -> Vec<GameEvent> {
        if self.is_over() || !self.started {
            return vec![];
        }
        match self.clock.tick(delta) {
            ClockSignal::Running => vec![],
            ClockSignal::CountdownStarted(remaining) => {
                vec![GameEvent::CountdownStarted { player: self.current, remaining }]
            }
            ClockSignal::Expired => {
                log::info!("{} ran out of time", self.current_player().name());
                self.pass_turn().unwrap_or_else(|e| {
                    log::error!("automatic pass failed: {}", e);
                    vec![]
                })
            }
        }
    }

    fn switch_turn(&mut self, events: &mut Vec<GameEvent>) {
        self.set_phase(TurnPhase::NextPlayer);
        let previous = self.current;
        let next = (previous + 1) % self.players.len();
        events.push(GameEvent::TurnSwitched { previous: Some(previous), next });

        self.refill(next, events);
        self.clock.reset();

        let went_out = self.players[previous].rack().is_empty() && !self.bag.has_more();
        if went_out || self.players[next].rack().is_empty() {
            self.finish(events);
            return;
        }
        self.current = next;
        self.set_phase(TurnPhase::WaitingForPlacement);
    }

    pub fn summary(&self) -> GameSummary {
        let scores: Vec<(String, u32)> = self.players.iter().map(|p| (p.name().to_owned(), p.score())).collect();

        let draw = scores.windows(2).all(|w| w[0].1 == w[1].1);
        let winner = if draw {
            None
        } else {
            let mut best = 0;
            for (i, (_, score)) in scores.iter().enumerate() {
                if *score > scores[best].1 {
                    best = i;
                }
            }
            Some(best)
        };

        let mut best_word: Option<BestWord> = None;
        for p in &self.players {
            if let Some((word, score)) = p.best_word() {
                if best_word.as_ref().map_or(true, |b| score > b.score) {
                    best_word = Some(BestWord { player: p.index(), word: word.to_owned(), score });
                }
            }
        }

        GameSummary { scores, winner, best_word }
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        self.set_phase(TurnPhase::GameOver);
        let summary = self.summary();
        log::info!("game over: {:?}", summary);
        events.push(GameEvent::GameOver(summary));
    }
}

#[cfg(test)]
struct Queue(Vec<Letter>);

#[cfg(test)]
impl LetterSource for Queue {
    fn draw_one(&mut self) -> Option<Letter> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.remove(0))
        }
    }
    fn has_more(&self) -> bool {
        !self.0.is_empty()
    }
    fn remaining(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
fn test_game(rack_size: usize, letters: &str) -> Game<fst::Set<Vec<u8>>, Queue> {
    let table = crate::letters::LetterTable::english();
    let queue = letters.chars().map(|c| Letter::new(c, table.points(c).unwrap())).collect();
    let dictionary = crate::dictionary::from_words(vec!["cat", "cats", "hi", "at", "to", "ta"]).unwrap();
    let rules = GameRules { rack_size, ..GameRules::default() };
    Game::new(&rules, dictionary, Queue(queue)).unwrap()
}

#[cfg(test)]
fn place_word(game: &mut Game<fst::Set<Vec<u8>>, Queue>, word: &str, row: usize, col: usize) {
    for (i, c) in word.chars().enumerate() {
        let id = game
            .available_letters()
            .into_iter()
            .find(|l| l.character() == c)
            .map(|l| l.id())
            .unwrap();
        game.place_letter(id, Position::new(row, col + i)).unwrap();
    }
}

#[test]
fn deals_round_robin() {
    let mut game = test_game(3, "CSAOTX");
    let events = game.start();
    assert_eq!(events.len(), 7);
    assert_eq!(events[6], GameEvent::TurnSwitched { previous: None, next: 0 });
    let rack: String = game.players()[0].rack().iter().map(|l| l.character()).collect();
    assert_eq!(rack, "CAT");
    let rack: String = game.players()[1].rack().iter().map(|l| l.character()).collect();
    assert_eq!(rack, "SOX");
    assert!(game.start().is_empty());
}

#[test]
fn first_move_must_cover_center() {
    let mut game = test_game(3, "CSAOTXEEE");
    game.start();
    place_word(&mut game, "C", 0, 0);
    place_word(&mut game, "A", 3, 3);
    assert_eq!(game.attempt_play(), Err(PlayError::CenterNotCovered));
    assert_eq!(game.phase(), TurnPhase::WaitingForPlacement);
    assert_eq!(game.board().committed_count(), 0);
    assert_eq!(game.board().placed_positions().len(), 2);
    assert_eq!(game.current_player().index(), 0);

    game.take_back(Position::new(0, 0)).unwrap();
    game.take_back(Position::new(3, 3)).unwrap();
    place_word(&mut game, "C", 7, 7);
    assert_eq!(game.attempt_play(), Err(PlayError::TooShort));
}

#[test]
fn full_game() {
    let mut game = test_game(3, "CSAOTXEEEEEE");
    game.start();

    place_word(&mut game, "CAT", 7, 6);
    let events = game.attempt_play().unwrap();
    match &events[0] {
        GameEvent::TilesCommitted { player: 0, positions, letters } => {
            assert_eq!(positions.len(), 3);
            assert_eq!(letters.len(), 3);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(events[1], GameEvent::WordScored { player: 0, word: "CAT".to_owned(), score: 5 });
    assert_eq!(events[2], GameEvent::TurnSwitched { previous: Some(0), next: 1 });
    assert_eq!(game.board().committed_count(), 3);
    assert!(game.players()[0].rack().is_empty());
    assert_eq!(game.current_player().index(), 1);

    place_word(&mut game, "S", 7, 9);
    let events = game.attempt_play().unwrap();
    assert!(events.contains(&GameEvent::WordScored { player: 1, word: "CATS".to_owned(), score: 6 }));
    let drawn = events.iter().filter(|e| matches!(e, GameEvent::LetterDrawn { player: 0, .. })).count();
    assert_eq!(drawn, 3);
    assert_eq!(game.board().committed_count(), 4);

    let events = game.pass_turn().unwrap();
    assert_eq!(events[0], GameEvent::Passed { player: 0, consecutive: 1 });

    let x = game.available_letters().into_iter().find(|l| l.character() == 'X').unwrap();
    game.place_letter(x.id(), Position::new(6, 9)).unwrap();
    match game.attempt_play() {
        Err(e @ PlayError::InvalidWord(_)) => assert_eq!(e.to_string(), "\"XS\" is not a supported word"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(game.board().committed_count(), 4);

    let events = game.pass_turn().unwrap();
    assert_eq!(events[0], GameEvent::TilesReturned { player: 1, letters: vec![x.id()] });
    assert!(!game.board().is_occupied(Position::new(6, 9)));

    game.pass_turn().unwrap();
    assert!(!game.is_over());
    let events = game.pass_turn().unwrap();
    assert!(game.is_over());
    match events.last() {
        Some(GameEvent::GameOver(summary)) => {
            assert_eq!(summary.winner, Some(1));
            assert_eq!(summary.scores[0].1, 5);
            assert_eq!(summary.scores[1].1, 6);
            assert_eq!(summary.best_word, Some(BestWord { player: 1, word: "CATS".to_owned(), score: 6 }));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(game.pass_turn(), Err(GameError::GameOver));
    assert_eq!(game.attempt_play(), Err(PlayError::GameOver));
}

#[test]
fn going_out_ends_the_game() {
    let mut game = test_game(2, "HAIT");
    game.start();
    place_word(&mut game, "HI", 7, 7);
    let events = game.attempt_play().unwrap();
    assert_eq!(events[2], GameEvent::TurnSwitched { previous: Some(0), next: 1 });
    match events.last() {
        Some(GameEvent::GameOver(summary)) => assert_eq!(summary.winner, Some(0)),
        other => panic!("unexpected {:?}", other),
    }
    assert!(game.is_over());
}

#[test]
fn all_pass_is_a_draw() {
    let mut game = test_game(1, "AB");
    game.start();
    for _ in 0..3 {
        game.pass_turn().unwrap();
    }
    let events = game.pass_turn().unwrap();
    match events.last() {
        Some(GameEvent::GameOver(summary)) => {
            assert_eq!(summary.winner, None);
            assert_eq!(summary.best_word, None);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn placing_rules() {
    let mut game = test_game(3, "CSAOTX");
    game.start();
    let theirs = game.players()[1].rack()[0].id();
    assert_eq!(game.place_letter(theirs, Position::new(7, 7)), Err(GameError::NotInRack(theirs)));

    let mine = game.players()[0].rack()[0].id();
    game.place_letter(mine, Position::new(7, 7)).unwrap();
    assert_eq!(game.place_letter(mine, Position::new(7, 8)), Err(GameError::AlreadyPlaced(mine)));

    let other = game.players()[0].rack()[1].id();
    let center = Position::new(7, 7);
    assert_eq!(game.place_letter(other, center), Err(GameError::Board(BoardError::Occupied(center))));
    assert_eq!(game.available_letters().len(), 2);
}

#[test]
fn clock_passes_the_turn() {
    let mut game = test_game(3, "CSAOTX");
    game.start();
    assert!(game.tick(Duration::from_secs(30)).is_empty());
    assert_eq!(
        game.tick(Duration::from_secs(31)),
        vec![GameEvent::CountdownStarted { player: 0, remaining: Duration::from_secs(29) }],
    );
    let events = game.tick(Duration::from_secs(30));
    assert_eq!(events[0], GameEvent::Passed { player: 0, consecutive: 1 });
    assert_eq!(events[1], GameEvent::TurnSwitched { previous: Some(0), next: 1 });
    assert_eq!(game.clock().elapsed(), Duration::from_secs(0));
}

#[test]
fn rejects_unplayable_rules() {
    let dictionary = || crate::dictionary::from_words(vec!["hi"]).unwrap();
    let rules = GameRules { players: vec![], ..GameRules::default() };
    assert!(matches!(Game::new(&rules, dictionary(), Queue(vec![])), Err(GameError::NoPlayers)));

    let rules = GameRules { rack_size: 0, ..GameRules::default() };
    assert!(matches!(Game::new(&rules, dictionary(), Queue(vec![])), Err(GameError::EmptyRack)));

    let rules = GameRules { rows: 14, ..GameRules::default() };
    assert!(matches!(
        Game::new(&rules, dictionary(), Queue(vec![])),
        Err(GameError::Board(BoardError::EvenDimension(14)))
    ));
}

#[test]
fn refused_plays_leave_the_board_alone() {
    let mut game = test_game(3, "CSAOTXEEEEEE");
    game.start();
    place_word(&mut game, "CAT", 7, 6);
    game.attempt_play().unwrap();
    let before = game.board().to_string();

    let s = game.available_letters().into_iter().find(|l| l.character() == 'S').unwrap();
    game.place_letter(s.id(), Position::new(0, 0)).unwrap();
    assert_eq!(game.attempt_play(), Err(PlayError::NotConnected));
    game.take_back(Position::new(0, 0)).unwrap();

    let o = game.available_letters().into_iter().find(|l| l.character() == 'O').unwrap();
    game.place_letter(s.id(), Position::new(6, 6)).unwrap();
    game.place_letter(o.id(), Position::new(8, 8)).unwrap();
    assert_eq!(game.attempt_play(), Err(PlayError::NotInLine));

    assert_eq!(game.board().committed_count(), 3);
    assert_eq!(game.current_player().index(), 1);
    assert_eq!(game.phase(), TurnPhase::WaitingForPlacement);
    game.take_back(Position::new(6, 6)).unwrap();
    game.take_back(Position::new(8, 8)).unwrap();
    assert_eq!(game.board().to_string(), before);
    assert_eq!(game.current_player().rack().len(), 3);
}

#[test]
fn words_must_share_a_tile() {
    use crate::Direction;

    let game = test_game(3, "CSAOTX");
    let word = |text: &str, row: usize| FoundWord {
        text: text.to_owned(),
        score: 2,
        positions: vec![Position::new(row, 3), Position::new(row, 4)],
        direction: Direction::Horizontal,
    };
    assert_eq!(game.check_words(&[word("AT", 3), word("TO", 9)]), Err(PlayError::NoSharedTile));
    assert_eq!(game.check_words(&[word("AT", 3), word("TO", 3)]), Ok(()));
    assert_eq!(
        game.check_words(&[word("AT", 3), word("XO", 3)]),
        Err(PlayError::InvalidWord("XO".to_owned())),
    );
}

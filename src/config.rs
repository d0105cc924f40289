
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use super::board::{BoardError, MIN_BOARD_DIMENSION};
use super::letters::{LetterSpec, LetterTable};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("at least one player is needed")]
    NoPlayers,
    #[error("the rack must hold at least one letter")]
    EmptyRack,
    #[error("no dictionary given")]
    NoDictionary,
}

/// Everything that can be set from the config file, the environment or the command line
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    /// Either a `.txt` file with one word per line, or a `.fst` file generated with `make_fst`
    pub dictionary: Option<PathBuf>,

    #[serde(default = "fifteen")]
    pub board_rows: usize,

    #[serde(default = "fifteen")]
    pub board_columns: usize,

    /// Reject even board dimensions instead of shrinking them by one
    #[serde(default)]
    pub strict_dimensions: bool,

    #[serde(default = "seven")]
    pub rack_size: usize,

    #[serde(default = "two_players")]
    pub players: Vec<String>,

    #[serde(default = "ninety")]
    pub turn_seconds: u64,

    #[serde(default = "thirty")]
    pub countdown_seconds: u64,

    /// Replaces the english letter distribution
    pub letters: Option<HashMap<char, LetterSpec>>,

    /// Makes the letter bag draw the same letters every game
    pub seed: Option<u64>,
}

fn fifteen() -> usize { 15 }
fn seven() -> usize { 7 }
fn ninety() -> u64 { 90 }
fn thirty() -> u64 { 30 }
fn two_players() -> Vec<String> {
    vec!["Player 1".to_owned(), "Player 2".to_owned()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary: None,
            board_rows: fifteen(),
            board_columns: fifteen(),
            strict_dimensions: false,
            rack_size: seven(),
            players: two_players(),
            turn_seconds: ninety(),
            countdown_seconds: thirty(),
            letters: None,
            seed: None,
        }
    }
}

/// Validated settings for one game
#[derive(Debug, Clone)]
pub struct GameRules {
    pub rows: usize,
    pub cols: usize,
    pub rack_size: usize,
    pub players: Vec<String>,
    pub turn_limit: Duration,
    pub countdown: Duration,
    pub letters: LetterTable,
    pub seed: Option<u64>,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            rows: fifteen(),
            cols: fifteen(),
            rack_size: seven(),
            players: two_players(),
            turn_limit: Duration::from_secs(ninety()),
            countdown: Duration::from_secs(thirty()),
            letters: LetterTable::english(),
            seed: None,
        }
    }
}

impl Settings {
    fn dimension(&self, dim: usize) -> Result<usize, ConfigError> {
        if dim < MIN_BOARD_DIMENSION {
            return Err(BoardError::TooSmall(dim).into());
        }
        if dim % 2 == 0 {
            if self.strict_dimensions {
                return Err(BoardError::EvenDimension(dim).into());
            }
            log::warn!("board dimension {} is even, using {}", dim, dim - 1);
            let dim = dim - 1;
            if dim < MIN_BOARD_DIMENSION {
                return Err(BoardError::TooSmall(dim).into());
            }
            return Ok(dim);
        }
        Ok(dim)
    }

    pub fn rules(&self) -> Result<GameRules, ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        if self.rack_size == 0 {
            return Err(ConfigError::EmptyRack);
        }
        Ok(GameRules {
            rows: self.dimension(self.board_rows)?,
            cols: self.dimension(self.board_columns)?,
            rack_size: self.rack_size,
            players: self.players.clone(),
            turn_limit: Duration::from_secs(self.turn_seconds),
            countdown: Duration::from_secs(self.countdown_seconds),
            letters: match &self.letters {
                Some(map) => LetterTable::from_map(map),
                None => LetterTable::english(),
            },
            seed: self.seed,
        })
    }
}

/// The config file, if any, then `WORDTILE_*` environment variables
///
/// Callers may set more values on the result before deserializing it.
pub fn sources(file: Option<&str>) -> Result<config::Config, ConfigError> {
    let mut s = config::Config::new();
    if let Some(f) = file {
        s.merge(config::File::with_name(f))?;
    }
    s.merge(config::Environment::with_prefix("WORDTILE"))?;
    Ok(s)
}

pub fn load_config(file: Option<&str>) -> Result<Settings, ConfigError> {
    Ok(sources(file)?.try_into()?)
}

#[test]
fn defaults() {
    let settings: Settings = config::Config::new().try_into().unwrap();
    let rules = settings.rules().unwrap();
    assert_eq!((rules.rows, rules.cols), (15, 15));
    assert_eq!(rules.rack_size, 7);
    assert_eq!(rules.players, vec!["Player 1", "Player 2"]);
    assert_eq!(rules.turn_limit, Duration::from_secs(90));
    assert_eq!(rules.letters, LetterTable::english());
}

#[test]
fn even_dimensions() {
    let mut c = config::Config::new();
    c.set::<i64>("board_rows", 14).unwrap();
    c.set::<i64>("board_columns", 17).unwrap();
    let settings: Settings = c.try_into().unwrap();
    let rules = settings.rules().unwrap();
    assert_eq!((rules.rows, rules.cols), (13, 17));

    let strict = Settings { strict_dimensions: true, ..settings };
    match strict.rules() {
        Err(ConfigError::Board(BoardError::EvenDimension(14))) => {}
        other => panic!("unexpected {:?}", other),
    }

    let tiny = Settings { board_rows: 10, ..Settings::default() };
    assert!(matches!(tiny.rules(), Err(ConfigError::Board(BoardError::TooSmall(10)))));
}

#[test]
fn needs_players() {
    let settings = Settings { players: vec![], ..Settings::default() };
    assert!(matches!(settings.rules(), Err(ConfigError::NoPlayers)));
}

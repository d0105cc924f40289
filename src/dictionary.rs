
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use fst::{Set, SetBuilder};
use rayon::prelude::*;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("reading the word list: {0}")]
    Io(#[from] std::io::Error),
    #[error("building the word set: {0}")]
    Fst(#[from] fst::Error),
    #[error("dictionary file {0} is neither .txt nor .fst")]
    UnknownFormat(String),
}

/// The words that can be played
pub trait Dictionary {
    /// Case-insensitive exact match
    fn is_valid_word(&self, word: &str) -> bool;
}

impl<D: AsRef<[u8]>> Dictionary for Set<D> {
    fn is_valid_word(&self, word: &str) -> bool {
        self.contains(word.to_lowercase())
    }
}

impl<T: Dictionary + ?Sized> Dictionary for &T {
    fn is_valid_word(&self, word: &str) -> bool {
        (**self).is_valid_word(word)
    }
}

impl<T: Dictionary + ?Sized> Dictionary for Arc<T> {
    fn is_valid_word(&self, word: &str) -> bool {
        (**self).is_valid_word(word)
    }
}

/// Trimmed, lower-cased, sorted and deduplicated, ready for an fst builder
pub fn normalize_words(words: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut words: Vec<String> = words
        .into_iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    words.par_sort_unstable();
    words.dedup();
    words
}

/// An in-memory dictionary from any list of words
pub fn from_words<S: Into<String>>(words: impl IntoIterator<Item = S>) -> Result<Set<Vec<u8>>, DictionaryError> {
    let words = normalize_words(words.into_iter().map(Into::into));
    let mut build = SetBuilder::memory();
    build.extend_iter(words)?;
    Ok(build.into_set())
}

pub fn read_word_list(path: &Path) -> Result<Vec<String>, DictionaryError> {
    let file = BufReader::new(File::open(path)?);
    let mut words = vec![];
    for line in file.lines() {
        words.push(line?);
    }
    Ok(words)
}

/// Load either a `.txt` file with one word per line, or a `.fst` file made by `make_fst`
pub fn load(path: &Path) -> Result<Set<Vec<u8>>, DictionaryError> {
    let start = Instant::now();
    let dictionary = match path.extension().and_then(|s| s.to_str()) {
        Some("fst") => Set::new(std::fs::read(path)?)?,
        Some("txt") => {
            let words = read_word_list(path)?;
            log::info!("{} words read in {:?}", words.len(), Instant::now() - start);
            from_words(words)?
        }
        _ => return Err(DictionaryError::UnknownFormat(path.display().to_string())),
    };
    log::info!("dictionary of {} words loaded in {:?}", dictionary.len(), Instant::now() - start);
    Ok(dictionary)
}

#[test]
fn lookups_ignore_case() {
    let dict = from_words(vec!["Cat", "cats", "  dog ", "cat", ""]).unwrap();
    assert_eq!(dict.len(), 3);
    assert!(dict.is_valid_word("CAT"));
    assert!(dict.is_valid_word("cAtS"));
    assert!(dict.is_valid_word("dog"));
    assert!(!dict.is_valid_word("ca"));
    assert!(!dict.is_valid_word(""));

    let shared = Arc::new(dict);
    assert!(shared.is_valid_word("Dog"));
    assert!((&shared).is_valid_word("Dog"));
}

#[test]
fn rejects_unknown_extension() {
    match load(Path::new("words.csv")) {
        Err(DictionaryError::UnknownFormat(name)) => assert_eq!(name, "words.csv"),
        other => panic!("unexpected {:?}", other.map(|s| s.len())),
    }
}


use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use super::dictionary::Dictionary;
use super::game::{Game, GameEvent};
use super::letters::LetterSource;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameId(pub u64);

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// Independent games running side by side, each behind its own lock
pub struct GameRegistry<D, S> {
    games: DashMap<GameId, Game<D, S>>,
    next_id: AtomicU64,
}

impl<D: Dictionary, S: LetterSource> GameRegistry<D, S> {
    pub fn new() -> Self {
        Self { games: DashMap::new(), next_id: AtomicU64::new(1) }
    }

    /// Start `game` and keep it, returning its id and the start events
    pub fn create(&self, mut game: Game<D, S>) -> (GameId, Vec<GameEvent>) {
        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let events = game.start();
        self.games.insert(id, game);
        log::info!("{} created, {} games running", id, self.games.len());
        (id, events)
    }

    /// Run `f` on one game, None if there is no such game
    pub fn with_game<R>(&self, id: GameId, f: impl FnOnce(&mut Game<D, S>) -> R) -> Option<R> {
        let mut game = self.games.get_mut(&id)?;
        Some(f(&mut *game))
    }

    pub fn remove(&self, id: GameId) -> Option<Game<D, S>> {
        self.games.remove(&id).map(|(_, game)| game)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.games.iter().map(|entry| *entry.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Drop every finished game, returning how many were dropped
    pub fn sweep_finished(&self) -> usize {
        let before = self.games.len();
        self.games.retain(|_, game| !game.is_over());
        let swept = before - self.games.len();
        if swept > 0 {
            log::debug!("swept {} finished games", swept);
        }
        swept
    }
}

impl<D, S> GameRegistry<D, S>
where
    D: Dictionary + Send + Sync,
    S: LetterSource + Send + Sync,
{
    /// Advance every game's clock, in parallel
    pub fn tick_all(&self, delta: Duration) -> Vec<(GameId, GameEvent)> {
        use rayon::prelude::*;

        let mut events: Vec<(GameId, GameEvent)> = self
            .ids()
            .into_par_iter()
            .flat_map(|id| {
                self.with_game(id, |game| game.tick(delta))
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |e| (id, e))
                    .collect::<Vec<_>>()
            })
            .collect();
        events.sort_by_key(|(id, _)| *id);
        events
    }
}

impl<D: Dictionary, S: LetterSource> Default for GameRegistry<D, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
fn registry_game(seed: u64) -> Game<fst::Set<Vec<u8>>, crate::LetterBag> {
    let dictionary = crate::dictionary::from_words(vec!["hi"]).unwrap();
    let rules = crate::config::GameRules { seed: Some(seed), ..Default::default() };
    Game::from_rules(&rules, dictionary).unwrap()
}

#[test]
fn games_are_independent() {
    let registry = GameRegistry::new();
    let (a, events) = registry.create(registry_game(1));
    let (b, _) = registry.create(registry_game(2));
    assert_ne!(a, b);
    assert_eq!(events.len(), 15);
    assert_eq!(registry.len(), 2);

    registry.with_game(a, |game| game.pass_turn().unwrap()).unwrap();
    assert_eq!(registry.with_game(a, |game| game.current_player().index()), Some(1));
    assert_eq!(registry.with_game(b, |game| game.current_player().index()), Some(0));
    assert!(registry.with_game(GameId(99), |_| ()).is_none());

    assert!(registry.remove(b).is_some());
    assert_eq!(registry.ids(), vec![a]);
}

#[test]
fn ticks_and_sweeps() {
    let registry = GameRegistry::new();
    let (a, _) = registry.create(registry_game(3));
    let (b, _) = registry.create(registry_game(4));

    let events = registry.tick_all(Duration::from_secs(61));
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].0, a);
    assert_eq!(events[1].0, b);

    for _ in 0..4 {
        registry.tick_all(Duration::from_secs(91));
    }
    assert!(registry.with_game(a, |game| game.is_over()).unwrap());
    assert_eq!(registry.sweep_finished(), 2);
    assert!(registry.is_empty());
}

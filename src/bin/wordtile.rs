
use std::io::{self, BufRead, Write};
use std::time::Instant;

use structopt::StructOpt;

use wordtile::config::{self, ConfigError, Settings};
use wordtile::{Dictionary, Game, GameEvent, LetterSource, Position};

#[derive(Debug, StructOpt)]
#[structopt(name = "wordtile", about = "Play a word tile game in the terminal")]
struct Opt {
    /// The config file, if not present only the environment and these flags are used
    #[structopt(short = "c", long = "config")]
    config: Option<String>,

    /// The dictionary of words that are allowed to be played.
    ///
    /// Either a `.txt` file with one word per line, or a `.fst` file generated with `make_fst`
    #[structopt(short = "d", long = "dictionary")]
    dict: Option<String>,

    /// Number of rows and columns of the board
    #[structopt(short = "s", long = "size")]
    size: Option<usize>,

    /// Player names, in turn order
    #[structopt(short = "p", long = "player")]
    players: Vec<String>,

    /// Seed for the letter bag, to replay the same draws
    #[structopt(long = "seed")]
    seed: Option<u64>,
}

fn load_config(opt: Opt) -> Result<Settings, ConfigError> {
    let mut s = config::sources(opt.config.as_deref())?;

    if let Some(d) = opt.dict {
        s.set("dictionary", d)?;
    }
    if let Some(size) = opt.size {
        s.set::<i64>("board_rows", size as i64)?;
        s.set::<i64>("board_columns", size as i64)?;
    }
    if !opt.players.is_empty() {
        s.set("players", opt.players)?;
    }

    let mut settings: Settings = s.try_into()?;
    // the full u64 range does not fit the config integers
    if let Some(seed) = opt.seed {
        settings.seed = Some(seed);
    }
    Ok(settings)
}

const HELP: &str = "\
commands:
  place <row> <col> <letter>   put a letter of your rack on the board
  take <row> <col>             pick a letter placed this turn back up
  play                         submit the letters placed this turn
  pass                         give up the turn
  board                        show the board
  rack                         show your letters
  help                         show this message
  quit";

fn main() {
    simple_logger::SimpleLogger::from_env().init().unwrap();

    let opt = Opt::from_args();
    let conf = load_config(opt).expect("config");
    let rules = conf.rules().expect("game rules");

    let dict = conf.dictionary.ok_or(ConfigError::NoDictionary).expect("dictionary");
    let start = Instant::now();
    let dictionary = wordtile::dictionary::load(&dict).expect("loading the dictionary");
    log::info!("dictionary ready in {:?}", Instant::now() - start);

    let game = Game::from_rules(&rules, dictionary).expect("creating the game");
    run(game).expect("terminal i/o");
}

fn run<D: Dictionary, S: LetterSource>(mut game: Game<D, S>) -> io::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    let events = game.start();
    show_events(&mut out, &game, &events)?;
    writeln!(out, "{}", HELP)?;
    prompt(&mut out, &game)?;

    let mut last_input = Instant::now();
    for line in stdin.lock().lines() {
        let line = line?;
        let now = Instant::now();
        let events = game.tick(now - last_input);
        last_input = now;
        show_events(&mut out, &game, &events)?;

        if !game.is_over() {
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                ["quit"] | ["exit"] => break,
                [] => {}
                ["help"] => writeln!(out, "{}", HELP)?,
                ["board"] => write!(out, "{}", game.board())?,
                ["rack"] => show_rack(&mut out, &game)?,
                ["place", row, col, letter] => match (row.parse::<usize>(), col.parse::<usize>(), letter.chars().next()) {
                    (Ok(row), Ok(col), Some(c)) => {
                        let c = c.to_ascii_uppercase();
                        match game.available_letters().into_iter().find(|l| l.character() == c) {
                            Some(l) => {
                                if let Err(e) = game.place_letter(l.id(), Position::new(row, col)) {
                                    writeln!(out, "{}", e)?;
                                }
                            }
                            None => writeln!(out, "no {} left in your rack", c)?,
                        }
                    }
                    _ => writeln!(out, "usage: place <row> <col> <letter>")?,
                },
                ["take", row, col] => match (row.parse::<usize>(), col.parse::<usize>()) {
                    (Ok(row), Ok(col)) => {
                        if let Err(e) = game.take_back(Position::new(row, col)) {
                            writeln!(out, "{}", e)?;
                        }
                    }
                    _ => writeln!(out, "usage: take <row> <col>")?,
                },
                ["play"] => match game.attempt_play() {
                    Ok(events) => show_events(&mut out, &game, &events)?,
                    Err(e) => writeln!(out, "{}", e)?,
                },
                ["pass"] => match game.pass_turn() {
                    Ok(events) => show_events(&mut out, &game, &events)?,
                    Err(e) => writeln!(out, "{}", e)?,
                },
                _ => writeln!(out, "unknown command, type help")?,
            }
        }

        if game.is_over() {
            break;
        }
        prompt(&mut out, &game)?;
    }
    Ok(())
}

fn prompt<D: Dictionary, S: LetterSource>(out: &mut impl Write, game: &Game<D, S>) -> io::Result<()> {
    write!(out, "{}> ", game.current_player().name())?;
    out.flush()
}

fn show_rack<D: Dictionary, S: LetterSource>(out: &mut impl Write, game: &Game<D, S>) -> io::Result<()> {
    let rack: Vec<String> = game
        .available_letters()
        .iter()
        .map(|l| format!("{}{}", l.character(), l.points()))
        .collect();
    writeln!(out, "{} letters left in the bag, your rack: {}", game.letters_left(), rack.join(" "))
}

fn show_events<D: Dictionary, S: LetterSource>(
    out: &mut impl Write,
    game: &Game<D, S>,
    events: &[GameEvent],
) -> io::Result<()> {
    let name = |i: usize| game.players()[i].name().to_owned();
    for event in events {
        match event {
            // too chatty, the rack command shows the result
            GameEvent::LetterDrawn { .. } => {}
            GameEvent::TilesCommitted { player, positions, .. } => {
                writeln!(out, "{} committed {} tiles", name(*player), positions.len())?
            }
            GameEvent::WordScored { player, word, score } => {
                writeln!(out, "{} scores {} with {}", name(*player), score, word)?
            }
            GameEvent::TilesReturned { letters, .. } => {
                writeln!(out, "{} tiles went back to the rack", letters.len())?
            }
            GameEvent::Passed { player, .. } => writeln!(out, "{} passes", name(*player))?,
            GameEvent::CountdownStarted { remaining, .. } => {
                writeln!(out, "{} seconds left", remaining.as_secs())?
            }
            GameEvent::TurnSwitched { next, .. } => {
                if !game.is_over() {
                    write!(out, "{}", game.board())?;
                    writeln!(out, "{} to play", name(*next))?;
                    show_rack(out, game)?;
                }
            }
            GameEvent::GameOver(summary) => {
                writeln!(out, "game over")?;
                for (player, score) in &summary.scores {
                    writeln!(out, "{:>20}: {}", player, score)?;
                }
                match summary.winner {
                    Some(i) => writeln!(out, "{} wins", name(i))?,
                    None => writeln!(out, "draw")?,
                }
                if let Some(best) = &summary.best_word {
                    writeln!(out, "best word: {} ({} points) by {}", best.word, best.score, name(best.player))?;
                }
            }
        }
    }
    Ok(())
}

#[test]
fn seed_keeps_its_full_range() {
    let opt = Opt {
        config: None,
        dict: None,
        size: Some(13),
        players: vec!["Ann".to_owned()],
        seed: Some(u64::MAX),
    };
    let settings = load_config(opt).unwrap();
    assert_eq!(settings.seed, Some(u64::MAX));
    assert_eq!(settings.board_rows, 13);
    assert_eq!(settings.players, vec!["Ann"]);
}

//! Quick Math entry point
//!
//! `play` runs the quiz in the terminal. `generate` writes a fresh catalog.
//!
//! The session lives on the main thread and is only touched from the event
//! loop. A ticker thread, a stdin reader and short-lived feedback timers feed
//! that loop through one channel.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use quick_math::catalog::generate::{GeneratorConfig, RuleClassifier, generate_catalog};
use quick_math::catalog::json;
use quick_math::consts::GEN_PER_TIER;
use quick_math::{
    AdvanceTicket, HighScoreStore, JsonFileStore, MemoryCatalog, MemoryStore, Session, Settings,
    Snapshot, Status, StoreError, SubmitOutcome,
};

const USAGE: &str = "\
usage:
  quick-math play [--catalog DIR] [--settings FILE] [--scores FILE] [--seed N]
  quick-math generate --out DIR [--per-tier N] [--seed N]";

#[derive(Debug, Default)]
struct PlayArgs {
    catalog: Option<PathBuf>,
    settings: Option<PathBuf>,
    scores: Option<PathBuf>,
    seed: Option<u64>,
}

#[derive(Debug)]
struct GenerateArgs {
    out: PathBuf,
    per_tier: usize,
    seed: Option<u64>,
}

#[derive(Debug)]
enum Command {
    Play(PlayArgs),
    Generate(GenerateArgs),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
    let sub = args.next().unwrap_or_else(|| "play".to_string());
    let mut play = PlayArgs::default();
    let mut out = None;
    let mut per_tier = GEN_PER_TIER;

    while let Some(flag) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
        match flag.as_str() {
            "--catalog" => play.catalog = Some(value()?.into()),
            "--settings" => play.settings = Some(value()?.into()),
            "--scores" => play.scores = Some(value()?.into()),
            "--out" => out = Some(PathBuf::from(value()?)),
            "--seed" => play.seed = Some(value()?.parse().map_err(|e| format!("--seed: {e}"))?),
            "--per-tier" => per_tier = value()?.parse().map_err(|e| format!("--per-tier: {e}"))?,
            other => return Err(format!("unknown flag {other}")),
        }
    }

    match sub.as_str() {
        "play" => Ok(Command::Play(play)),
        "generate" => Ok(Command::Generate(GenerateArgs {
            out: out.ok_or("generate needs --out DIR")?,
            per_tier,
            seed: play.seed,
        })),
        other => Err(format!("unknown command {other}")),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let result = match command {
        Command::Play(args) => play(args),
        Command::Generate(args) => generate(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn generate(args: GenerateArgs) -> Result<(), StoreError> {
    let mut rng = match args.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_rng(&mut rand::rng()),
    };
    let config = GeneratorConfig {
        per_tier: args.per_tier,
        ..GeneratorConfig::default()
    };
    let catalog = generate_catalog(&mut rng, &RuleClassifier, &config)?;
    json::save_dir(&catalog, &args.out)?;
    println!("Wrote {} problems to {}", catalog.len(), args.out.display());
    Ok(())
}

enum Event {
    Tick,
    Input(String),
    Advance(AdvanceTicket),
    Ended(Snapshot),
    InputClosed,
}

fn load_catalog(args: &PlayArgs) -> Result<MemoryCatalog, StoreError> {
    match &args.catalog {
        Some(dir) => json::load_dir(dir),
        None => {
            log::info!("No catalog given, generating one in memory");
            let mut rng = Pcg32::from_rng(&mut rand::rng());
            generate_catalog(&mut rng, &RuleClassifier, &GeneratorConfig::default())
        }
    }
}

fn play(args: PlayArgs) -> Result<(), StoreError> {
    let settings = args
        .settings
        .as_deref()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    settings.validate()?;

    let catalog = load_catalog(&args)?;
    let empty = catalog.empty_tiers();
    if !empty.is_empty() {
        log::warn!("Catalog tiers {empty:?} are empty; reaching them will end the session");
    }

    let store: Box<dyn HighScoreStore> = match &args.scores {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let best = store.load().unwrap_or_else(|e| {
        log::info!("No saved high score ({e})");
        0
    });

    let tick_interval = settings.tick_interval();
    let mut session = match args.seed {
        Some(seed) => Session::new(catalog, settings, seed),
        None => Session::from_entropy(catalog, settings),
    }?
    .with_high_score(best);

    let (tx, rx) = mpsc::channel();
    let ended = tx.clone();
    session.subscribe(move |snap: &Snapshot| {
        if snap.is_game_over() {
            let _ = ended.send(Event::Ended(snap.clone()));
        }
    });
    spawn_ticker(tx.clone(), tick_interval);
    spawn_input(tx.clone());

    render(&session.snapshot());
    for event in rx {
        match event {
            Event::Tick => {
                session.tick();
                let t = session.time_remaining();
                if session.status() != Status::GameOver && (t <= 5 || t % 10 == 0) {
                    println!("  {t}s left");
                }
            }
            Event::Input(line) => {
                let line = line.trim();
                if line.eq_ignore_ascii_case("q") {
                    break;
                }
                if session.status() == Status::GameOver {
                    if line.eq_ignore_ascii_case("r") {
                        session.restart()?;
                        render(&session.snapshot());
                    }
                    continue;
                }
                let Some(answer) = pick_option(&session.snapshot(), line) else {
                    println!("Pick an option from 1 to 4");
                    continue;
                };
                match session.submit_answer(answer) {
                    SubmitOutcome::Feedback { correct, ticket } => {
                        print_feedback(correct, session.question().correct_answer);
                        schedule_advance(tx.clone(), ticket);
                    }
                    SubmitOutcome::GameOver { correct } => {
                        print_feedback(correct, session.question().correct_answer);
                    }
                    SubmitOutcome::Ignored => {}
                }
            }
            Event::Advance(ticket) => {
                if session.advance(ticket)? {
                    render(&session.snapshot());
                }
            }
            Event::Ended(snap) => {
                println!("\nGame Over");
                println!("Your score: {}   High score: {}", snap.score, snap.high_score);
                match store.record(snap.high_score) {
                    Ok(true) => println!("New high score!"),
                    Ok(false) => {}
                    Err(e) => log::warn!("Could not save high score: {e}"),
                }
                println!("[r]estart or [q]uit");
            }
            Event::InputClosed => break,
        }
        let _ = io::stdout().flush();
    }
    Ok(())
}

/// Map "1".."4" to the option shown at that position
fn pick_option(snap: &Snapshot, line: &str) -> Option<i64> {
    let index: usize = line.parse().ok()?;
    snap.question.options.get(index.checked_sub(1)?).copied()
}

fn render(snap: &Snapshot) {
    println!();
    println!(
        "Score: {}   High score: {}   Time: {}",
        snap.score, snap.high_score, snap.time_remaining
    );
    println!("  {}", snap.question.prompt());
    let options: Vec<String> = snap
        .question
        .options
        .iter()
        .enumerate()
        .map(|(i, o)| format!("{}) {}", i + 1, o))
        .collect();
    println!("  {}", options.join("   "));
}

fn print_feedback(correct: bool, answer: i64) {
    if correct {
        println!("Correct!");
    } else {
        println!("Wrong, it was {answer}");
    }
}

fn spawn_ticker(tx: Sender<Event>, interval: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            if tx.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

fn spawn_input(tx: Sender<Event>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Input(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::InputClosed);
    });
}

fn schedule_advance(tx: Sender<Event>, ticket: AdvanceTicket) {
    thread::spawn(move || {
        thread::sleep(ticket.delay());
        let _ = tx.send(Event::Advance(ticket));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_play() {
        let Command::Play(play) = parse_args(args(&["play", "--seed", "7", "--catalog", "cat"])).unwrap() else {
            panic!("expected play");
        };
        assert_eq!(play.seed, Some(7));
        assert_eq!(play.catalog, Some(PathBuf::from("cat")));
        assert!(matches!(parse_args(args(&[])).unwrap(), Command::Play(_)));
    }

    #[test]
    fn test_parse_generate() {
        let Command::Generate(g) = parse_args(args(&["generate", "--out", "data", "--per-tier", "10"])).unwrap()
        else {
            panic!("expected generate");
        };
        assert_eq!(g.out, PathBuf::from("data"));
        assert_eq!(g.per_tier, 10);
        assert!(parse_args(args(&["generate"])).is_err());
        assert!(parse_args(args(&["play", "--seed"])).is_err());
        assert!(parse_args(args(&["play", "--bogus"])).is_err());
    }
}

//! Headless desk runner
//!
//! Plays a full session with a fixed decision strategy and prints the
//! ending with its statistics.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use equality_corp::cases::ContentPools;
use equality_corp::core::error::Result;
use equality_corp::decision::match_rules;
use equality_corp::narrative::NarrativeCatalog;
use equality_corp::progression::Phase;
use equality_corp::rules::{builtin_rule_catalog, load_rule_catalog};
use equality_corp::{Decision, GameConfig, GameSession, SessionEvent};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Strategy {
    /// Always give the expected verdict
    ByTheBook,
    /// Expected verdict, except refuse whatever an unethical rule enforces
    Conscience,
    /// Always the opposite of the expected verdict
    Contrarian,
    /// Uniform random verdicts
    CoinFlip,
}

/// Headless Equality Corp session
#[derive(Parser, Debug)]
#[command(name = "desk_sim")]
#[command(about = "Autoplay a full hiring-desk session and report the ending")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Decision strategy
    #[arg(long, value_enum, default_value_t = Strategy::ByTheBook)]
    strategy: Strategy,

    /// TOML file with configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML rule catalog replacing the built-in rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// TOML content pools replacing the built-in applicant data
    #[arg(long)]
    content: Option<PathBuf>,

    /// TOML narrative catalog replacing the built-in emails and dialogue
    #[arg(long)]
    narrative: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

#[derive(Serialize)]
struct RunResult {
    seed: u64,
    strategy: String,
    ending: String,
    title: String,
    final_loyalty: i32,
    final_conscience: i32,
    final_inequality: i32,
    total_earnings: i64,
    final_balance: i64,
    days_worked: u32,
    decisions: u32,
    correct: u32,
    accuracy: f32,
    settlements: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("equality_corp=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => GameConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => GameConfig::default(),
    };

    let catalog = match &args.rules {
        Some(path) => load_rule_catalog(path)?,
        None => builtin_rule_catalog()?,
    };
    let pools = match &args.content {
        Some(path) => ContentPools::load(path)?,
        None => ContentPools::builtin()?,
    };
    let narrative = match &args.narrative {
        Some(path) => NarrativeCatalog::load(path)?,
        None => NarrativeCatalog::builtin()?,
    };

    let mut session = GameSession::new(config, catalog, pools, narrative, seed)?;
    // Separate stream so strategy draws do not shift case generation
    let mut strategy_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut settlements = 0;

    while session.phase() != Phase::Ending {
        if session.phase() == Phase::DocumentReview {
            let decision = choose(&session, args.strategy, &mut strategy_rng);
            session.submit_decision(decision)?;
        } else {
            if session.phase() == Phase::EmailBriefing {
                let ids: Vec<String> = session
                    .inbox()
                    .emails
                    .iter()
                    .map(|e| e.email.id.clone())
                    .collect();
                for id in ids {
                    session.read_email(&id);
                }
            }
            session.advance_phase()?;
        }

        settlements += session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Settlement { .. }))
            .count() as u32;
    }

    let stats = session.ending_statistics();
    let cumulative = session.progression().cumulative();
    let outcome = session.ending().map(|o| format!("{:?}", o)).unwrap_or_default();

    let result = RunResult {
        seed,
        strategy: format!("{:?}", args.strategy),
        title: session
            .ending_text()
            .map(|t| t.title.clone())
            .unwrap_or_else(|| outcome.clone()),
        ending: outcome,
        final_loyalty: stats.final_loyalty,
        final_conscience: stats.final_conscience,
        final_inequality: stats.final_inequality,
        total_earnings: stats.total_earnings,
        final_balance: stats.final_balance,
        days_worked: stats.days_worked,
        decisions: cumulative.total,
        correct: cumulative.correct,
        accuracy: cumulative.accuracy(),
        settlements,
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => {
            println!("Desk Session Result");
            println!("===================");
            println!("Seed: {}", result.seed);
            println!("Strategy: {}", result.strategy);
            println!("Ending: {} ({})", result.title, result.ending);
            println!(
                "Loyalty {} / Conscience {} / Inequality {}",
                result.final_loyalty, result.final_conscience, result.final_inequality
            );
            println!(
                "Decisions: {}/{} correct ({:.1}%)",
                result.correct,
                result.decisions,
                result.accuracy * 100.0
            );
            println!(
                "Earnings: {} KRW, balance {} KRW after {} settlement(s)",
                result.total_earnings, result.final_balance, result.settlements
            );
            println!("Days worked: {}", result.days_worked);
        }
    }

    Ok(())
}

fn choose(session: &GameSession, strategy: Strategy, rng: &mut ChaCha8Rng) -> Decision {
    let Some(case) = session.current_case() else {
        return Decision::Reject;
    };
    let expected = case.canonical_decision;

    match strategy {
        Strategy::ByTheBook => expected,
        Strategy::Contrarian => opposite(expected),
        Strategy::CoinFlip => {
            if rng.gen_bool(0.5) {
                Decision::Approve
            } else {
                Decision::Reject
            }
        }
        Strategy::Conscience => {
            let active = session.active_rules();
            let matched = match_rules(&case.record, &active);
            match matched.primary_rule {
                Some(rule) if !rule.ethical && !case.record.has_error() => opposite(expected),
                _ => expected,
            }
        }
    }
}

fn opposite(decision: Decision) -> Decision {
    match decision {
        Decision::Approve => Decision::Reject,
        Decision::Reject => Decision::Approve,
    }
}

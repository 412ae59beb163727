//! Duel example: a seeded single-player battle against recorded solves
//!
//! This example demonstrates:
//! - Loading a difficulty profile and a scramble bank from JSON
//! - Driving a battle through `Progression`
//! - Reading the per-round narrative
//!
//! Run with `RUST_LOG=cubeduel=debug` to see the state machine events.

use cubeduel::progression::{RoundReport, Setup, Submission};
use cubeduel::source::ScrambleBank;
use cubeduel::*;

const BANK: &str = r#"[
    {"scr": "R U2 F' L D2 B R2 U' F2", "rest": 11.84},
    {"scr": "D' L2 B U R' F2 D L' U2", "rest": 12.31},
    {"scr": "F R' U L2 D B2 R U' L'"}
]"#;

fn main() -> Result<(), DuelError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let profile = DifficultyProfile::from_json(r#"{"time_mean": 11.2, "time_std": 0.9}"#)?;
    println!("Profile: {}", profile.to_json()?);

    let bank = ScrambleBank::from_json(BANK)?;
    let config = MatchConfig::new(profile).with_seed(2024);
    let mut battle = Progression::with_source(config, bank);
    battle.start(Setup::Solo {
        player_name: "Ana".into(),
    })?;

    let my_times = [10.92, 12.40, 11.05, 9.87, 11.61, 10.33, 12.02, 10.75];
    let mut assisted = false;
    for &time in my_times.iter().cycle().take(40) {
        println!("\n=== Round {} ===", battle.round());
        println!("Scramble: {}", battle.scramble().unwrap_or("?"));

        // Use one assist on a bad round.
        let submission = if time > 12.0 && !assisted {
            assisted = true;
            Submission::Assist
        } else {
            Submission::Time(time)
        };

        let Some(entry) = battle.submit(submission)? else {
            continue;
        };
        if let RoundReport::Duel(outcome) = &entry.report {
            println!("{}", outcome.narrative.render());
        }

        if battle.phase() == Phase::GameOver {
            break;
        }
        battle.finish_round()?;
    }

    println!("\nResult: {:?}", battle.result());
    println!("Personal best: {:?}", battle.personal_best_single());
    println!("Assists left: {:?}", battle.assists_left());
    Ok(())
}

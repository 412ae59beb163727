//! Infinite run example: quirks, power-ups and bosses
//!
//! This example demonstrates:
//! - Starting an infinite run with a persisted best round
//! - Handling power-up offers between encounters
//! - Inspecting the active modifiers each turn

use cubeduel::progression::{Arena, RoundReport, Setup, Submission};
use cubeduel::sampler::sample;
use cubeduel::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), DuelError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut battle = Progression::new(MatchConfig::default().with_seed(7));
    battle.start(Setup::Infinite {
        player_name: "Ana".into(),
        best_round: 3,
    })?;

    // A simulated player who averages 12.5s.
    let mut hands = StdRng::seed_from_u64(99);

    for _ in 0..200 {
        if let Some(Arena::Infinite { run, .. }) = battle.arena() {
            let modifiers: Vec<&str> = run.active_modifiers().iter().map(|m| m.name()).collect();
            println!(
                "\nRound {} vs {} ({} HP) | modifiers: {}",
                run.round(),
                run.opponent().name,
                run.opponent().combatant.hp,
                modifiers.join(", ")
            );
            if let Some(ai_time) = run.revealed_ai_time() {
                println!("AI will solve in {:.2}s", ai_time);
            }
        }

        let time = sample(&mut hands, 12.5, 1.0).max(6.0);
        let Some(entry) = battle.submit(Submission::Time(time))? else {
            continue;
        };
        let RoundReport::Infinite(report) = &entry.report else {
            continue;
        };
        println!("{}", report.outcome.round.narrative.render());

        if report.run_over {
            break;
        }
        if let Some(first) = report.offer.first() {
            let names: Vec<&str> = report.offer.iter().map(|p| p.name()).collect();
            println!("Offer: {}", names.join(" / "));
            println!("Taking {}", first.name());
            battle.choose_power_up(0)?;
        }
        battle.finish_round()?;
    }

    println!("\nRun over. Best round: {:?}", battle.best_round());
    Ok(())
}

//! Play a seeded bracket to completion and print every round.
//!
//! Run with `cargo run --example playthrough -- 6 42` (player count, seed).

use knockout::{MatchState, SeededRandom, Tournament};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let players: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(6);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(42);

    let mut cup = Tournament::new(players, &mut SeededRandom::new(seed))?;
    println!(
        "{} players, bracket of {}, {} byes, {} rounds\n",
        cup.player_count(),
        cup.bracket_size(),
        cup.byes(),
        cup.rounds_count()
    );

    // Lower id wins every played match
    loop {
        let next = cup
            .playable_matches()
            .first()
            .and_then(|m| m.occupants().map(|(a, b)| (m.id, a.id.min(b.id), a.id)));
        let Some((id, winner, a)) = next else {
            break;
        };
        let (score_a, score_b) = if winner == a { (2, 1) } else { (1, 2) };
        cup.submit_result(id, winner, score_a, score_b)?;
    }

    for (round, matches) in cup.rounds().iter().enumerate() {
        println!("{}", cup.round_name(round));
        for m in matches {
            let (a, b) = m
                .occupants()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .unwrap_or_default();
            let note = match (m.state(), &m.result) {
                (MatchState::Completed, Some(r)) => format!("{}-{}", r.score_a, r.score_b),
                (MatchState::ByeResolved, _) => "bye".to_string(),
                _ => String::new(),
            };
            println!("  {} {a} vs {b} {note}", m.id);
        }
    }

    if let Some(champion) = cup.champion() {
        println!("\nChampion: {champion}");
    }

    Ok(())
}

/// Property-based tests for bracket sizing, seeding, and progression
///
/// These tests verify the bracket invariants across a wide range of player
/// counts, seeds, and randomly chosen match winners.
use knockout::bracket::{BracketSize, MatchState, addressing};
use knockout::seeding::{SeededRandom, Seeder};
use knockout::tournament::{Submission, Tournament, TournamentStatus};
use proptest::prelude::*;
use std::collections::HashSet;

// Player counts that keep a full playthrough cheap
fn small_player_count() -> impl Strategy<Value = usize> {
    2usize..=64
}

proptest! {
    #[test]
    fn test_bracket_size_is_smallest_power_of_two(n in 2usize..=4096) {
        let size = BracketSize::for_players(n).unwrap();

        prop_assert!(size.bracket_size.is_power_of_two());
        prop_assert!(size.bracket_size >= n);
        prop_assert!(size.bracket_size / 2 < n, "bracket must be the smallest power of two");
        prop_assert_eq!(size.byes, size.bracket_size - n);
        prop_assert!(size.byes < n);
        prop_assert_eq!(1usize << size.rounds, size.bracket_size);
    }

    #[test]
    fn test_total_matches_is_bracket_size_minus_one(n in 2usize..=4096) {
        let size = BracketSize::for_players(n).unwrap();
        let per_round: usize = (0..size.rounds).map(|r| size.matches_in_round(r)).sum();

        prop_assert_eq!(size.total_matches(), size.bracket_size - 1);
        prop_assert_eq!(per_round, size.bracket_size - 1);
    }

    #[test]
    fn test_match_ids_are_dense_and_unique(n in 2usize..=512) {
        let size = BracketSize::for_players(n).unwrap();
        let mut seen = HashSet::new();

        for round in 0..size.rounds {
            for slot in 0..size.matches_in_round(round) {
                let id = addressing::match_id(size.rounds, round, slot).unwrap();
                prop_assert!((id.0 as usize) < size.total_matches());
                prop_assert!(seen.insert(id));
                prop_assert_eq!(addressing::locate(size.rounds, id), Some((round, slot)));
            }
        }
        prop_assert_eq!(seen.len(), size.total_matches());
    }

    #[test]
    fn test_seeding_is_permutation(n in 2usize..=256, seed in any::<u64>()) {
        let size = BracketSize::for_players(n).unwrap();
        let seeded = Seeder::seed(&size, &mut SeededRandom::new(seed));

        let mut seeded_ids: Vec<_> = seeded.iter().map(|p| p.id).collect();
        let mut roster_ids: Vec<_> = Seeder::roster(&size).iter().map(|p| p.id).collect();
        seeded_ids.sort_unstable();
        roster_ids.sort_unstable();

        prop_assert_eq!(seeded_ids, roster_ids);
        prop_assert_eq!(seeded.iter().filter(|p| p.is_bye).count(), size.byes);
    }

    #[test]
    fn test_random_winners_converge_on_one_champion(
        n in small_player_count(),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<bool>(), 64),
    ) {
        let mut cup = Tournament::new(n, &mut SeededRandom::new(seed)).unwrap();
        let mut submitted = 0usize;

        loop {
            let next = cup.playable_matches().first().map(|m| (*m).clone());
            let Some(m) = next else {
                break;
            };
            let (a, b) = m.occupants().unwrap();
            let winner = if picks[submitted % picks.len()] { a.id } else { b.id };
            let outcome = cup.submit_result(m.id, winner, 1, 0).unwrap();
            prop_assert_eq!(outcome, Submission::Recorded);

            submitted += 1;
            prop_assert!(submitted <= cup.total_matches(), "bracket must terminate");
        }

        prop_assert_eq!(cup.status(), TournamentStatus::ChampionDecided);
        let champion = cup.champion().unwrap();
        prop_assert!(!champion.is_bye);
        prop_assert!(cup.matches().all(|m| matches!(
            m.state(),
            MatchState::Completed | MatchState::ByeResolved
        )));
        prop_assert_eq!(submitted, n - 1, "every played match eliminates one real player");
    }

    #[test]
    fn test_resubmission_is_idempotent(seed in any::<u64>(), n in 2usize..=16) {
        let mut cup = Tournament::new(n, &mut SeededRandom::new(seed)).unwrap();
        let m = cup.playable_matches()[0].clone();
        let (a, _) = m.occupants().unwrap();
        let winner = a.id;

        cup.submit_result(m.id, winner, 4, 2).unwrap();
        let snapshot = cup.clone();

        prop_assert_eq!(cup.submit_result(m.id, winner, 4, 2).unwrap(), Submission::Unchanged);
        prop_assert_eq!(cup, snapshot);
    }
}

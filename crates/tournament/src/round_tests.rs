use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

use crate::elo::RatingParams;

/// `n` entrants where id `i` holds seed `i + 1`
fn seeded(n: usize) -> Vec<Entrant> {
    (0..n)
        .map(|i| {
            let mut e = Entrant::new(format!("E{}", i + 1), 1000.0 - i as f64);
            e.seed = Some(i as u32 + 1);
            e
        })
        .collect()
}

fn ids(seeds: &[u32]) -> Vec<EntrantId> {
    seeds.iter().map(|&s| EntrantId(s as usize - 1)).collect()
}

fn seed_pairs(round: &Round, arena: &[Entrant]) -> Vec<(u32, Option<u32>)> {
    round
        .matches()
        .iter()
        .map(|m| {
            let (a, b) = m.entrants();
            (
                arena[a.index()].seed().unwrap(),
                b.map(|b| arena[b.index()].seed().unwrap()),
            )
        })
        .collect()
}

#[test]
fn test_odd_round_rejected() {
    assert!(matches!(
        Round::new("first", 5, 0),
        Err(TournamentError::InvalidRound { .. })
    ));
    assert!(Round::new("first", 2, 3).is_err());
    assert!(Round::new("first", 5, 1).is_ok());
}

#[test]
fn test_fold_pairing_eight() {
    let arena = seeded(8);
    let mut round = Round::new("quarters", 8, 0).unwrap();
    round
        .pair(ids(&[1, 2, 3, 4, 5, 6, 7, 8]), None, &arena)
        .unwrap();

    assert_eq!(
        seed_pairs(&round, &arena),
        vec![(1, Some(8)), (2, Some(7)), (3, Some(6)), (4, Some(5))]
    );
}

#[test]
fn test_best_seed_gets_bye() {
    let arena = seeded(5);
    let mut round = Round::new("opening", 5, 1).unwrap();
    // Shuffled input gets sorted because the round has byes
    round.pair(ids(&[4, 2, 5, 1, 3]), None, &arena).unwrap();

    assert_eq!(
        seed_pairs(&round, &arena),
        vec![(1, None), (2, Some(5)), (3, Some(4))]
    );
}

#[test]
fn test_no_sort_without_byes() {
    let arena = seeded(4);
    let mut round = Round::new("semis", 4, 0).unwrap();
    round.pair(ids(&[1, 4, 2, 3]), None, &arena).unwrap();

    // Fold applies to the given order, not to seeds
    assert_eq!(seed_pairs(&round, &arena), vec![(1, Some(3)), (4, Some(2))]);
}

#[test]
fn test_sort_override() {
    let arena = seeded(4);
    let mut sorted = Round::new("semis", 4, 0).unwrap();
    sorted.pair(ids(&[1, 4, 2, 3]), Some(true), &arena).unwrap();
    assert_eq!(seed_pairs(&sorted, &arena), vec![(1, Some(4)), (2, Some(3))]);

    let mut unsorted = Round::new("opening", 4, 2).unwrap();
    unsorted.pair(ids(&[3, 4, 1, 2]), Some(false), &arena).unwrap();
    assert_eq!(
        seed_pairs(&unsorted, &arena),
        vec![(3, None), (4, None), (1, Some(2))]
    );
}

#[test]
fn test_every_entrant_in_exactly_one_match() {
    let arena = seeded(12);
    let mut round = Round::new("opening", 12, 4).unwrap();
    round.pair(ids(&(1..=12).collect::<Vec<_>>()), None, &arena).unwrap();

    let matches = round.matches();
    assert_eq!(matches.len(), 4 + 4);
    assert!(matches[..4].iter().all(Match::is_bye));
    assert!(matches[4..].iter().all(|m| !m.is_bye()));

    let mut seen = HashSet::new();
    for m in matches {
        let (a, b) = m.entrants();
        assert!(seen.insert(a));
        if let Some(b) = b {
            assert!(seen.insert(b));
        }
    }
    assert_eq!(seen.len(), 12);
}

#[test]
fn test_pair_twice_fails() {
    let arena = seeded(2);
    let mut round = Round::new("final", 2, 0).unwrap();
    round.pair(ids(&[1, 2]), None, &arena).unwrap();

    let err = round.pair(ids(&[1, 2]), None, &arena).unwrap_err();
    assert!(matches!(err, TournamentError::AlreadyPaired(_)));
}

#[test]
fn test_size_mismatch() {
    let arena = seeded(3);
    let mut round = Round::new("final", 2, 0).unwrap();

    let err = round.pair(ids(&[1, 2, 3]), None, &arena).unwrap_err();
    assert!(matches!(
        err,
        TournamentError::SizeMismatch { expected: 2, got: 3, .. }
    ));
    assert!(!round.is_paired());
}

#[test]
fn test_is_finished_after_all_matches() {
    let mut arena = seeded(5);
    let params = RatingParams::default();
    let mut round = Round::new("opening", 5, 1).unwrap();
    assert!(!round.is_finished());

    round.pair(ids(&[1, 2, 3, 4, 5]), None, &arena).unwrap();
    assert!(!round.is_finished());

    round
        .find_match_mut(EntrantId(1), EntrantId(4))
        .unwrap()
        .set_winner(EntrantId(1), &mut arena, &params)
        .unwrap();
    assert!(!round.is_finished());

    round
        .find_match_mut(EntrantId(2), EntrantId(3))
        .unwrap()
        .set_winner(EntrantId(3), &mut arena, &params)
        .unwrap();
    assert!(round.is_finished());
    assert_eq!(round.winners(), ids(&[1, 2, 4]));
}

#[test]
fn test_bye_leaves_rating_alone() {
    let arena = seeded(3);
    let mut round = Round::new("opening", 3, 1).unwrap();
    round.pair(ids(&[1, 2, 3]), None, &arena).unwrap();

    assert_eq!(round.winners(), ids(&[1]));
    assert_eq!(arena[0].rating(), arena[0].original_rating());
}

#[test]
fn test_pick_pending_match() {
    let mut arena = seeded(8);
    let params = RatingParams::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut round = Round::new("quarters", 8, 0).unwrap();

    assert!(matches!(
        round.pick_pending_match(&mut rng),
        Err(TournamentError::RoundNotPaired(_))
    ));

    round.pair(ids(&[1, 2, 3, 4, 5, 6, 7, 8]), None, &arena).unwrap();

    for _ in 0..4 {
        let (a, _) = round.pick_pending_match(&mut rng).unwrap().entrants();
        let m = round.matches.iter_mut().find(|m| m.entrants().0 == a).unwrap();
        assert!(!m.is_resolved());
        m.set_winner(a, &mut arena, &params).unwrap();
    }

    assert!(round.is_finished());
    assert!(matches!(
        round.pick_pending_match(&mut rng),
        Err(TournamentError::RoundFinished(_))
    ));
}

#[test]
fn test_pick_is_deterministic_with_seeded_rng() {
    let arena = seeded(8);
    let mut round = Round::new("quarters", 8, 0).unwrap();
    round.pair(ids(&[1, 2, 3, 4, 5, 6, 7, 8]), None, &arena).unwrap();

    let first = round
        .pick_pending_match(&mut StdRng::seed_from_u64(42))
        .unwrap()
        .clone();
    let second = round
        .pick_pending_match(&mut StdRng::seed_from_u64(42))
        .unwrap()
        .clone();
    assert_eq!(first, second);
}

#[test]
fn test_find_match() {
    let arena = seeded(4);
    let mut round = Round::new("semis", 4, 0).unwrap();
    round.pair(ids(&[1, 2, 3, 4]), None, &arena).unwrap();

    assert!(round.find_match(EntrantId(3), EntrantId(0)).is_some());
    assert!(round.find_match(EntrantId(0), EntrantId(1)).is_none());
}

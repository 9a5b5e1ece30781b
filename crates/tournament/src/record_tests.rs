use super::*;

const RECORD: &str = "\
# Autumn play-off
:tournament 4 Autumn Cup
:round semis 4 0
:round final 2 0

# Albums
Abbey Road 3.0
Pet Sounds 1.0
Kind of Blue 2.0
Blue Train 2.5

:round semis
  1 Abbey Road beat   4 Pet Sounds
";

#[test]
fn test_parse_header_and_entrants() {
    let record = TournamentRecord::parse(RECORD).unwrap();

    assert_eq!(record.name, "Autumn Cup");
    assert_eq!(
        record.rounds,
        vec![
            RoundSpec { name: "semis".into(), size: 4, byes: 0 },
            RoundSpec { name: "final".into(), size: 2, byes: 0 },
        ]
    );
    assert_eq!(record.entrants.len(), 4);
    assert_eq!(record.entrants[2], ("Kind of Blue".to_string(), 2.0));
    assert_eq!(record.params, None);
    assert_eq!(
        record.results,
        vec![
            RecordEntry::RoundMarker { line: 12, name: "semis".into() },
            RecordEntry::Result {
                line: 13,
                winner: SeedName { seed: 1, name: "Abbey Road".into() },
                loser: SeedName { seed: 4, name: "Pet Sounds".into() },
            },
        ]
    );
}

#[test]
fn test_parse_rating_directive() {
    let text = ":tournament 2 Duel\n:round final 2 0\n:rating 100 16\nA 1500\nB 1400\n";
    let record = TournamentRecord::parse(text).unwrap();

    assert_eq!(record.params, Some(RatingParams::new(100.0, 16.0).unwrap()));
    let tournament = record.replay().unwrap();
    assert_eq!(tournament.params().speed, 16.0);
}

#[test]
fn test_replay_reconstructs_state() {
    let tournament = TournamentRecord::parse(RECORD).unwrap().replay().unwrap();

    assert_eq!(tournament.name(), "Autumn Cup");
    assert_eq!(tournament.current_round(), Some(0));
    let abbey = tournament.lookup_entrant("Abbey Road", 1).unwrap();
    assert!(tournament.entrant(abbey).rating() > 3.0);

    let semis = &tournament.rounds()[0];
    assert_eq!(semis.matches().iter().filter(|m| m.is_resolved()).count(), 1);
}

#[test]
fn test_replay_to_completion() {
    let text = format!(
        "{RECORD}  2 Blue Train beat   3 Kind of Blue\n:round final\n  2 Blue Train beat   1 Abbey Road\n"
    );
    let tournament = TournamentRecord::parse(&text).unwrap().replay().unwrap();

    assert!(tournament.is_complete());
    let champion = tournament.champion().unwrap();
    assert_eq!(tournament.entrant(champion).name, "Blue Train");
}

#[test]
fn test_replay_rejects_result_from_future_round() {
    // Final result recorded before the semis are over
    let text = format!("{RECORD}  1 Abbey Road beat   2 Blue Train\n");
    let err = TournamentRecord::parse(&text).unwrap().replay().unwrap_err();

    match err {
        TournamentError::Replay { line, source } => {
            assert_eq!(line, 14);
            assert!(matches!(*source, TournamentError::NoSuchMatch(..)));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_replay_rejects_wrong_seed() {
    let text = format!("{RECORD}  3 Blue Train beat   2 Kind of Blue\n");
    let err = TournamentRecord::parse(&text).unwrap().replay().unwrap_err();

    assert!(matches!(
        err,
        TournamentError::Replay { source, .. }
            if matches!(*source, TournamentError::SeedNameMismatch { seed: 3, .. })
    ));
}

#[test]
fn test_replay_rejects_misplaced_round_marker() {
    let text = format!("{RECORD}:round final\n");
    let err = TournamentRecord::parse(&text).unwrap().replay().unwrap_err();

    assert!(matches!(err, TournamentError::MalformedRecord { line: 14, .. }));
}

#[test]
fn test_parse_errors() {
    let cases = [
        "",
        "Abbey Road 3.0\n",
        ":tournament x Cup\n",
        ":tournament 2 Cup\n:round final 2\nA 1\nB 2\n",
        ":tournament 2 Cup\n:round final 2 0\nA 1\n",
        ":tournament 1 Cup\n:round final 1 1\nA high\n",
        ":tournament 2 Cup\n:round final 2 0\nA 1\nB 2\n  1 A defeated   2 B\n",
        ":tournament 2 Cup\n:round final 2 0\nA 1\nB 2\none A beat   2 B\n",
        ":tournament 2 Cup\n:round final 2 0\n:rating 0 0.2\nA 1\nB 2\n",
    ];
    for text in cases {
        assert!(
            matches!(
                TournamentRecord::parse(text),
                Err(TournamentError::MalformedRecord { .. })
            ),
            "expected parse failure for {text:?}"
        );
    }
}

#[test]
fn test_odd_round_fails_replay() {
    let text = ":tournament 3 Cup\n:round first 3 0\nA 1\nB 2\nC 3\n";
    let err = TournamentRecord::parse(text).unwrap().replay().unwrap_err();
    assert!(matches!(err, TournamentError::InvalidRound { .. }));
}

#[test]
fn test_round_header_must_chain() {
    let text = ":tournament 4 Cup\n:round semis 4 0\n:round final 4 0\nA 4\nB 3\nC 2\nD 1\n";
    let err = TournamentRecord::parse(text).unwrap_err();

    assert!(matches!(err, TournamentError::MalformedRecord { line: 3, .. }));
}

#[test]
fn test_round_header_chain_counts_byes() {
    let text = ":tournament 5 Cup\n:round opening 5 1\n:round semis 3 1\n:round final 2 0\nA 5\nB 4\nC 3\nD 2\nE 1\n";
    let record = TournamentRecord::parse(text).unwrap();

    assert_eq!(record.rounds[0].advancing(), 3);
    assert_eq!(record.rounds[1].advancing(), 2);
    assert!(record.replay().is_ok());
}

#[test]
fn test_format_result() {
    let tournament = TournamentRecord::parse(RECORD).unwrap().replay().unwrap();
    let semis = &tournament.rounds()[0];

    let resolved = semis.matches().iter().find(|m| m.is_resolved()).unwrap();
    assert_eq!(
        format_result(&tournament, resolved).unwrap(),
        "  1 Abbey Road beat   4 Pet Sounds"
    );

    let pending = semis.matches().iter().find(|m| !m.is_resolved()).unwrap();
    assert_eq!(format_result(&tournament, pending), None);
}

#[test]
fn test_append_and_reload() {
    let path = std::env::temp_dir().join(format!("knockout-record-{}.txt", std::process::id()));
    // No trailing newline, so append has to add one
    fs::write(&path, RECORD.trim_end()).unwrap();

    append_result(&path, "  2 Blue Train beat   3 Kind of Blue").unwrap();
    let tournament = load_tournament(&path, RatingParams::default()).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(tournament.current_round(), Some(1));
    assert!(tournament.rounds()[1].is_paired());
}

use super::*;
use crate::kata::{scores_from, JUDGES};
use crate::matches::{MatchId, MatchUpdate};

fn people(n: usize) -> Vec<Competitor> {
    (0..n)
        .map(|i| Competitor::new(((b'a' + i as u8) as char).to_string()))
        .collect()
}

fn kumite(n: usize) -> Division {
    Division::build(EventFormat::Kumite, &people(n)).unwrap()
}

#[test]
fn test_bracket_kind() {
    assert_eq!(bracket_kind(EventFormat::Kumite, 2), Ok(BracketKind::TwoPerson));
    assert_eq!(bracket_kind(EventFormat::Kumite, 3), Ok(BracketKind::RoundRobin));
    assert_eq!(bracket_kind(EventFormat::Kumite, 4), Ok(BracketKind::Elimination));
    assert_eq!(bracket_kind(EventFormat::Kumite, 17), Ok(BracketKind::Elimination));
    assert!(matches!(
        bracket_kind(EventFormat::Kumite, 1),
        Err(BracketError::WrongEntrantCount { got: 1, .. })
    ));
    assert_eq!(bracket_kind(EventFormat::Kata, 1), Ok(BracketKind::Kata));
}

#[test]
fn test_build_picks_format() {
    assert_eq!(kumite(2).kind(), BracketKind::TwoPerson);
    assert_eq!(kumite(3).kind(), BracketKind::RoundRobin);
    assert_eq!(kumite(6).kind(), BracketKind::Elimination);

    let kata = Division::build(EventFormat::Kata, &people(2)).unwrap();
    assert_eq!(kata.kind(), BracketKind::Kata);
    assert_eq!(kata.format(), EventFormat::Kata);
    assert!(kata.bracket().kumite().is_none());
    assert!(kata.bracket().kata().is_some_and(KataBracket::is_built));

    assert!(Division::build(EventFormat::Kumite, &people(0)).is_err());
    assert!(Division::build(EventFormat::Kata, &[]).is_err());
}

#[test]
fn test_build_rejects_duplicates() {
    let roster = vec![Competitor::new("a"), Competitor::new("a")];
    assert_eq!(
        Division::build(EventFormat::Kumite, &roster),
        Err(BracketError::DuplicateEntrant("a".to_string()))
    );
}

#[test]
fn test_status_transitions() {
    let mut division = kumite(2);
    assert_eq!(division.status(), DivisionStatus::Ready);

    let bracket = division.bracket_mut().kumite_mut().unwrap();
    bracket
        .save_match(MatchId(0), MatchUpdate::done().points(3, 0))
        .unwrap();
    assert_eq!(division.status(), DivisionStatus::Started);

    let bracket = division.bracket_mut().kumite_mut().unwrap();
    bracket
        .save_match(MatchId(1), MatchUpdate::done().points(0, 1))
        .unwrap();
    assert_eq!(division.status(), DivisionStatus::Done);
    assert_eq!(division.status().to_string(), "Done");

    let winners = division.get_winners();
    assert_eq!(winners[0], Placing::new(1, Some(Competitor::new("a"))));
    assert_eq!(winners[1], Placing::new(2, Some(Competitor::new("b"))));
}

#[test]
fn test_kata_status_and_winners() {
    let mut division = Division::build(EventFormat::Kata, &people(2)).unwrap();
    assert_eq!(division.status(), DivisionStatus::Ready);

    let kata = division.bracket_mut().kata_mut().unwrap();
    let a = kata.find_match(0, &Competitor::new("a")).unwrap().id;
    let b = kata.find_match(0, &Competitor::new("b")).unwrap().id;
    kata.score_match(a, scores_from(&[7.0; JUDGES]).unwrap()).unwrap();
    assert_eq!(division.status(), DivisionStatus::Started);

    let kata = division.bracket_mut().kata_mut().unwrap();
    kata.score_match(b, scores_from(&[8.0; JUDGES]).unwrap()).unwrap();
    assert_eq!(division.status(), DivisionStatus::Done);
    assert_eq!(
        division.get_winners(),
        vec![
            Placing::new(1, Some(Competitor::new("b"))),
            Placing::new(2, Some(Competitor::new("a"))),
        ]
    );
}

#[test]
fn test_add_entrant() {
    let mut division = Division::build(EventFormat::Kata, &people(2)).unwrap();
    division.add_entrant(Competitor::new("late")).unwrap();
    assert_eq!(division.entrants().len(), 3);
    assert!(division
        .bracket()
        .kata()
        .unwrap()
        .find_match(0, &Competitor::new("late"))
        .is_some());

    // A rejected entrant doesn't reach the roster
    assert!(division.add_entrant(Competitor::new("late")).is_err());
    assert_eq!(division.entrants().len(), 3);

    let mut division = kumite(4);
    assert_eq!(
        division.add_entrant(Competitor::new("late")),
        Err(BracketError::LateEntryClosed(BracketKind::Elimination))
    );
    assert_eq!(division.entrants().len(), 4);
}

#[test]
fn test_next_up() {
    let division = kumite(4);
    assert_eq!(
        division.next_up().as_deref(),
        Some("Semi-finals, Match 1: a vs d")
    );

    let division = Division::build(EventFormat::Kata, &people(3)).unwrap();
    assert_eq!(division.next_up().as_deref(), Some("Round 1: a"));
}

#[test]
fn test_serde_round_trip() {
    let mut division = kumite(3);
    let bracket = division.bracket_mut().kumite_mut().unwrap();
    bracket
        .save_match(MatchId(0), MatchUpdate::done().points(2, 1))
        .unwrap();

    let json = serde_json::to_string(&division).unwrap();
    assert!(json.contains("\"kind\":\"round_robin\""));
    let restored: Division = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, division);
}

use super::*;
use bracket_core::{BracketError, BracketKind, DivisionStatus, EventFormat, Placing, Side};

fn kumite_division(entrants: &[&str], results: Vec<ResultConfig>) -> DivisionConfig {
    DivisionConfig {
        name: "Kumite".to_string(),
        format: EventFormat::Kumite,
        entrants: entrants.iter().map(|s| s.to_string()).collect(),
        results,
    }
}

fn bout(round: u32, order: i32, aka_points: u16, shiro_points: u16) -> ResultConfig {
    ResultConfig::Kumite(KumiteResult {
        round,
        order,
        aka_points,
        shiro_points,
        aka_warnings: 0,
        shiro_warnings: 0,
        winner: None,
        aka_disqualified: None,
        shiro_disqualified: None,
        done: true,
    })
}

fn panel(entrant: &str, round: u32, value: f64) -> ResultConfig {
    ResultConfig::Kata(KataResult {
        entrant: entrant.to_string(),
        round,
        scores: vec![value; 5],
    })
}

fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

#[test]
fn test_run_elimination() {
    let config = kumite_division(
        &["a", "b", "c", "d"],
        vec![bout(1, 0, 3, 1), bout(1, 1, 0, 2), bout(0, -1, 1, 0), bout(0, 0, 0, 4)],
    );
    let runner = DivisionRunner::new(RunConfig::default());
    let division = runner.run_division(&config, &mut seeded(1)).unwrap();

    assert_eq!(division.kind(), BracketKind::Elimination);
    assert_eq!(division.status(), DivisionStatus::Done);
    assert_eq!(
        division.get_winners(),
        vec![
            Placing::new(1, Some(Competitor::new("c"))),
            Placing::new(2, Some(Competitor::new("a"))),
            Placing::new(3, Some(Competitor::new("d"))),
        ]
    );
}

#[test]
fn test_run_kata() {
    let config = DivisionConfig {
        name: "Kata".to_string(),
        format: EventFormat::Kata,
        entrants: vec!["a".to_string(), "b".to_string()],
        results: vec![panel("a", 0, 8.0), panel("b", 0, 8.0), panel("b", 1, 9.0), panel("a", 1, 7.0)],
    };
    let runner = DivisionRunner::new(RunConfig::default());
    let division = runner.run_division(&config, &mut seeded(1)).unwrap();

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
fn test_referee_decision_and_disqualification() {
    let mut decided = bout(0, 0, 2, 2);
    if let ResultConfig::Kumite(r) = &mut decided {
        r.winner = Some(Side::Shiro);
    }
    let mut forfeit = bout(0, 1, 5, 0);
    if let ResultConfig::Kumite(r) = &mut forfeit {
        r.aka_disqualified = Some(true);
    }
    let config = kumite_division(&["a", "b"], vec![decided, forfeit]);

    let runner = DivisionRunner::new(RunConfig::default());
    let division = runner.run_division(&config, &mut seeded(1)).unwrap();
    let bracket = division.bracket().kumite().unwrap();
    let first = bracket.get_match(0, 0).unwrap().unwrap();
    assert_eq!(first.winner(), Some(Competitor::new("b")));
    // b is disqualified in the second match: the series goes to a
    assert_eq!(
        division.get_winners(),
        vec![
            Placing::new(1, Some(Competitor::new("a"))),
            Placing::new(2, Some(Competitor::Disqualified)),
        ]
    );
}

#[test]
fn test_rejected_result_reports_division() {
    // Final before the semi-finals
    let config = kumite_division(&["a", "b", "c", "d"], vec![bout(0, 0, 1, 0)]);
    let runner = DivisionRunner::new(RunConfig::default());
    let err = runner.run_division(&config, &mut seeded(1)).unwrap_err();

    assert!(err.to_string().contains("Division Kumite: result 1 rejected"));
    assert!(matches!(
        err.root_cause().downcast_ref::<BracketError>(),
        Some(BracketError::PredecessorNotDone(_))
    ));
}

#[test]
fn test_result_for_wrong_format() {
    let config = kumite_division(&["a", "b", "c"], vec![panel("a", 0, 8.0)]);
    let runner = DivisionRunner::new(RunConfig::default());
    assert!(runner.run_division(&config, &mut seeded(1)).is_err());

    let config = kumite_division(&["a", "b", "c"], vec![bout(0, 5, 1, 0)]);
    let err = runner.run_division(&config, &mut seeded(1)).unwrap_err();
    assert_eq!(
        err.root_cause().downcast_ref::<BracketError>(),
        Some(&BracketError::InvalidMatchIndex(5))
    );

    // A series tie-break that was never needed
    let config = kumite_division(&["a", "b"], vec![bout(0, 5, 1, 0)]);
    let err = runner.run_division(&config, &mut seeded(1)).unwrap_err();
    assert!(format!("{:#}", err).contains("no match at round 0, order 5"));
}

#[test]
fn test_shuffle_is_reproducible() {
    let entrants: Vec<&str> = vec!["a", "b", "c", "d", "e", "f", "g", "h"];
    let config = kumite_division(&entrants, Vec::new());
    let runner = DivisionRunner::new(RunConfig {
        shuffle: true,
        seed: Some(42),
    });

    let first = runner.run_division(&config, &mut seeded(42)).unwrap();
    let second = runner.run_division(&config, &mut seeded(42)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.entrants().len(), 8);
}

#[test]
fn test_merged_config() {
    let mut scenario = Scenario::default();
    scenario.tournament.shuffle = true;
    scenario.tournament.seed = Some(3);

    let merged = RunConfig::default().merged(&scenario);
    assert!(merged.shuffle);
    assert_eq!(merged.seed, Some(3));

    let cli = RunConfig {
        shuffle: false,
        seed: Some(9),
    };
    assert_eq!(cli.merged(&scenario).seed, Some(9));
}

#[test]
fn test_run_scenario() {
    let mut scenario = Scenario::default();
    scenario.tournament.name = "Club Day".to_string();
    scenario.divisions.push(kumite_division(&["a", "b", "c"], vec![bout(0, 0, 1, 0)]));

    let results = DivisionRunner::new(RunConfig::default()).run(&scenario).unwrap();
    assert_eq!(results.name, "Club Day");
    assert_eq!(results.divisions.len(), 1);
    assert_eq!(results.divisions[0].status, DivisionStatus::Started);
}

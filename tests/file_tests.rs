mod common;

use common::*;
use drr_scheduler::*;
use std::fs;

#[test]
fn solution_file_reproduces_the_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("english.sol");

    let mut model = fixed_model(Scheme::English, vec![], assignment(4, &ENGLISH_FOUR));
    model.optimize().unwrap();
    model.write_solution(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("objective value: 0\n"));
    assert!(text.contains("\nw_0_0 0 1\n"));

    let solution = read_solution(&path).unwrap();
    assert_eq!(solution.len(), 72);
    let table = FixtureTable::decode(4, &solution).unwrap();
    assert_eq!(table, model.fixture_table().unwrap());
}

#[test]
fn solution_needs_an_optimal_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("none.sol");
    let model = fixed_model(Scheme::English, vec![], Vec::new());
    assert!(matches!(model.write_solution(&path), Err(ScheduleError::ModelNotReady { .. })));
    assert!(!path.exists());
}

#[test]
fn problem_file_lists_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("english.lp");

    let model = fixed_model(Scheme::English, vec![0], Vec::new());
    model.write_problem(&path).unwrap();

    let lp = fs::read_to_string(&path).unwrap();
    assert!(lp.starts_with("Minimize\n obj: +1 w_0_0"));
    assert!(lp.contains(" english_last_0_1: +1 x_0_1_2 -1 x_1_0_3 = 0\n"));
    assert!(lp.contains(" top_team_2_0_2: "));
    let rows = lp
        .lines()
        .skip_while(|l| *l != "Subject To")
        .skip(1)
        .take_while(|l| *l != "Binary")
        .count();
    assert_eq!(rows, model.constraints().len());
    assert!(lp.ends_with(" w_3_4\nEnd\n"));
}

#[test]
fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_solution(dir.path().join("absent.sol"));
    assert!(matches!(err, Err(ScheduleError::Io(_))));
    assert!(matches!(TeamNames::read(dir.path().join("absent.txt")), Err(ScheduleError::Io(_))));
}

#[test]
fn named_table_from_a_solution_file() {
    let dir = tempfile::tempdir().unwrap();
    let names_path = dir.path().join("names.txt");
    fs::write(&names_path, "Ajax\nBenfica\nCeltic\nDinamo\n").unwrap();

    let mut model = fixed_model(Scheme::English, vec![], assignment(4, &ENGLISH_FOUR));
    model.optimize().unwrap();
    let names = TeamNames::read(&names_path).unwrap();
    let text = format_schedule(&model.fixture_table().unwrap(), Some(&names));

    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Team"));
    assert!(lines[1].starts_with("Ajax"));
    assert!(lines[1].contains("@Dinamo"));
}

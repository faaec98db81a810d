//! Solution files and the fixture table decoded from a solution.
//!
//! A solution file has one `<name> <value> [<objective coefficient>]` line per
//! variable, preceded by an `objective value:` header.

use crate::error::{Result, ScheduleError};
use crate::vars::{check_dimensions, RoundId, TeamId, MATCH_PREFIX};
use log::*;
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Values at or below this count as 0.
pub const EPSILON: f64 = 1e-6;

/// Variable name to value.
pub type SolutionMap = BTreeMap<String, f64>;

/// Reads the match variables of a solution file; every other line is skipped.
pub fn parse_solution(reader: impl BufRead) -> Result<SolutionMap> {
    let mut solution = SolutionMap::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty()
            || line.starts_with("objective value")
            || !line.starts_with(MATCH_PREFIX)
        {
            continue;
        }

        let mut fields = line.split_whitespace();
        let name = fields.next().unwrap_or_default();
        let value = fields
            .next()
            .ok_or_else(|| malformed(idx, format!("no value for {}", name)))?;
        let value = value
            .parse::<f64>()
            .map_err(|e| malformed(idx, format!("value '{}' of {}: {}", value, name, e)))?;
        solution.insert(name.to_string(), value);
    }
    Ok(solution)
}

pub fn read_solution(path: impl AsRef<Path>) -> Result<SolutionMap> {
    let file = File::open(path.as_ref())?;
    parse_solution(BufReader::new(file))
}

/// Writes `(name, value, objective coefficient)` rows under an objective header.
pub fn write_solution<'a>(
    out: &mut impl Write,
    objective: f64,
    rows: impl IntoIterator<Item = (&'a str, f64, i64)>,
) -> std::io::Result<()> {
    writeln!(out, "objective value: {}", objective)?;
    for (name, value, coef) in rows {
        writeln!(out, "{} {} {}", name, value, coef)?;
    }
    Ok(())
}

fn malformed(idx: usize, reason: String) -> ScheduleError {
    ScheduleError::MalformedSolution { line: idx + 1, reason }
}

/// `x_<i>_<j>_<k>` to `(i, j, k)`.
pub fn parse_match_name(name: &str) -> Option<(TeamId, TeamId, RoundId)> {
    let mut parts = name.strip_prefix(MATCH_PREFIX)?.split('_');
    let i = parts.next()?.parse().ok()?;
    let j = parts.next()?.parse().ok()?;
    let k = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((i, j, k))
}

/// One team's game in one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fixture {
    Home(TeamId),
    Away(TeamId),
}

impl Fixture {
    pub fn opponent(self) -> TeamId {
        match self {
            Fixture::Home(t) | Fixture::Away(t) => t,
        }
    }

    pub fn is_home(self) -> bool {
        matches!(self, Fixture::Home(_))
    }
}

/// The opponent's index when hosting, `@` and the index when visiting.
impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fixture::Home(t) => write!(f, "{}", t),
            Fixture::Away(t) => write!(f, "@{}", t),
        }
    }
}

/// Team x round grid of fixtures.
#[derive(Clone, Debug, PartialEq)]
pub struct FixtureTable {
    teams: usize,
    rounds: usize,
    cells: Vec<Option<Fixture>>,
}

impl FixtureTable {
    pub fn empty(teams: usize) -> Result<FixtureTable> {
        let rounds = 2 * teams.saturating_sub(1);
        check_dimensions(teams, rounds)?;
        Ok(FixtureTable {
            teams,
            rounds,
            cells: vec![None; teams * rounds],
        })
    }

    /// Builds the grid from the match variables of `solution` that are set.
    ///
    /// Cells with no match stay empty (see [`ensure_complete`](Self::ensure_complete)).
    /// A set variable outside the grid, or two matches for the same team and round,
    /// is an error.
    pub fn decode(teams: usize, solution: &SolutionMap) -> Result<FixtureTable> {
        let mut table = FixtureTable::empty(teams)?;
        for (name, value) in solution.iter() {
            if !name.starts_with(MATCH_PREFIX) || *value <= EPSILON {
                continue;
            }
            let (i, j, k) = parse_match_name(name).ok_or_else(|| {
                ScheduleError::DecodeInvariantViolation(format!(
                    "'{}' is not a match variable name",
                    name
                ))
            })?;
            if i >= teams || j >= teams || i == j || k >= table.rounds {
                return Err(ScheduleError::DecodeInvariantViolation(format!(
                    "{} does not fit {} teams over {} rounds",
                    name, teams, table.rounds
                )));
            }
            table.place(i, k, Fixture::Home(j))?;
            table.place(j, k, Fixture::Away(i))?;
        }
        Ok(table)
    }

    /// Records a fixture, refusing to overwrite a different one.
    pub fn place(&mut self, team: TeamId, round: RoundId, fixture: Fixture) -> Result<()> {
        let idx = team * self.rounds + round;
        match self.cells[idx] {
            Some(existing) if existing != fixture => {
                Err(ScheduleError::DecodeInvariantViolation(format!(
                    "team {} has both {} and {} in round {}",
                    team, existing, fixture, round
                )))
            }
            _ => {
                self.cells[idx] = Some(fixture);
                Ok(())
            }
        }
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn get(&self, team: TeamId, round: RoundId) -> Option<Fixture> {
        if team >= self.teams || round >= self.rounds {
            return None;
        }
        self.cells[team * self.rounds + round]
    }

    pub fn row(&self, team: TeamId) -> &[Option<Fixture>] {
        &self.cells[team * self.rounds..(team + 1) * self.rounds]
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Fails on the first team/round without a fixture.
    pub fn ensure_complete(&self) -> Result<()> {
        for team in 0..self.teams {
            for round in 0..self.rounds {
                if self.get(team, round).is_none() {
                    warn!("team {} has no fixture in round {}", team, round);
                    return Err(ScheduleError::DecodeInvariantViolation(format!(
                        "team {} has no fixture in round {}",
                        team, round
                    )));
                }
            }
        }
        Ok(())
    }

    fn venue(&self, team: TeamId, round: RoundId) -> Option<bool> {
        self.get(team, round).map(Fixture::is_home)
    }

    /// Double-rounds where `team` is home then away.
    pub fn home_away_sequences(&self, team: TeamId) -> usize {
        (0..self.rounds)
            .step_by(2)
            .filter(|k| {
                self.venue(team, *k) == Some(true) && self.venue(team, k + 1) == Some(false)
            })
            .count()
    }

    /// Double-rounds where `team` is away twice.
    pub fn away_breaks(&self, team: TeamId) -> usize {
        (0..self.rounds)
            .step_by(2)
            .filter(|k| {
                self.venue(team, *k) == Some(false) && self.venue(team, k + 1) == Some(false)
            })
            .count()
    }

    pub fn total_away_breaks(&self) -> usize {
        (0..self.teams).map(|t| self.away_breaks(t)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parses_match_names() {
        assert_eq!(parse_match_name("x_3_10_17"), Some((3, 10, 17)));
        assert_eq!(parse_match_name("y_3_4"), None);
        assert_eq!(parse_match_name("x_3_4"), None);
        assert_eq!(parse_match_name("x_3_4_5_6"), None);
        assert_eq!(parse_match_name("x_a_4_5"), None);
    }

    #[test]
    fn solution_lines_keep_only_match_variables() {
        let text = "objective value: 0\n\
                    x_0_1_0 1 (obj:0)\n\
                    \n\
                    y_0_0 1 0\n\
                    w_1_0 0 1\n\
                    x_1_0_1   0.9999999   0\n";
        let sol = parse_solution(Cursor::new(text)).unwrap();
        assert_eq!(sol.len(), 2);
        assert_eq!(sol["x_0_1_0"], 1.0);
        assert!((sol["x_1_0_1"] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_unreadable_value() {
        let err = parse_solution(Cursor::new("objective value: 0\nx_0_1_0 one 0\n"));
        assert!(matches!(err, Err(ScheduleError::MalformedSolution { line: 2, .. })));
    }

    #[test]
    fn written_solution_reads_back() {
        let mut buf = Vec::new();
        write_solution(&mut buf, 0.0, vec![("x_0_1_0", 1.0, 0), ("w_0_0", 0.0, 1)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("objective value: 0\n"));
        let sol = parse_solution(Cursor::new(text)).unwrap();
        assert_eq!(sol.len(), 1);
    }

    #[test]
    fn decodes_the_two_team_map() {
        let mut sol = SolutionMap::new();
        for (i, j) in vec![(0, 1), (1, 0)] {
            for k in 0..2 {
                sol.insert(format!("x_{}_{}_{}", i, j, k), 0.0);
            }
        }
        sol.insert("x_0_1_0".to_string(), 1.0);

        let table = FixtureTable::decode(2, &sol).unwrap();
        assert_eq!(table.get(0, 0), Some(Fixture::Home(1)));
        assert_eq!(table.get(1, 0), Some(Fixture::Away(0)));
        assert_eq!(table.get(0, 0).unwrap().to_string(), "1");
        assert_eq!(table.get(1, 0).unwrap().to_string(), "@0");
        // round 1 has nothing scheduled
        assert_eq!(table.get(0, 1), None);
        assert!(!table.is_complete());
        assert!(matches!(table.ensure_complete(), Err(ScheduleError::DecodeInvariantViolation(_))));
    }

    #[test]
    fn noise_below_epsilon_is_zero() {
        let mut sol = SolutionMap::new();
        sol.insert("x_0_1_0".to_string(), 1e-9);
        sol.insert("x_1_0_1".to_string(), 0.99999);
        let table = FixtureTable::decode(2, &sol).unwrap();
        assert_eq!(table.get(0, 0), None);
        assert_eq!(table.get(1, 1), Some(Fixture::Home(0)));
    }

    #[test]
    fn double_booking_is_a_violation() {
        let mut sol = SolutionMap::new();
        sol.insert("x_0_1_0".to_string(), 1.0);
        sol.insert("x_0_2_0".to_string(), 1.0);
        let err = FixtureTable::decode(4, &sol);
        assert!(matches!(err, Err(ScheduleError::DecodeInvariantViolation(_))));

        let mut outside = SolutionMap::new();
        outside.insert("x_0_5_0".to_string(), 1.0);
        assert!(matches!(
            FixtureTable::decode(4, &outside),
            Err(ScheduleError::DecodeInvariantViolation(_))
        ));
    }

    #[test]
    fn counts_breaks_and_sequences() {
        let mut table = FixtureTable::empty(2).unwrap();
        table.place(0, 0, Fixture::Home(1)).unwrap();
        table.place(1, 0, Fixture::Away(0)).unwrap();
        table.place(0, 1, Fixture::Away(1)).unwrap();
        table.place(1, 1, Fixture::Home(0)).unwrap();
        assert!(table.is_complete());
        assert_eq!(table.home_away_sequences(0), 1);
        assert_eq!(table.home_away_sequences(1), 0);
        assert_eq!(table.total_away_breaks(), 0);
        assert_eq!(table.row(1), &[Some(Fixture::Away(0)), Some(Fixture::Home(0))]);
    }
}

//! Problem configuration and its up-front validation.

use crate::error::{Result, ScheduleError};
use crate::scheme::Scheme;
use crate::vars::{check_dimensions, TeamId};
use itertools::Itertools;

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleConfig {
    pub teams: usize,
    pub scheme: Scheme,
    /// Teams that ordinary teams may not meet in consecutive rounds.
    pub top_teams: Vec<TeamId>,
    /// Show engine progress at info level.
    pub verbose: bool,
}

impl ScheduleConfig {
    pub fn new(teams: usize, scheme: Scheme) -> Self {
        ScheduleConfig {
            teams,
            scheme,
            top_teams: Vec::new(),
            verbose: false,
        }
    }

    pub fn with_top_teams(mut self, top_teams: impl IntoIterator<Item = TeamId>) -> Self {
        self.top_teams = top_teams.into_iter().collect();
        self
    }

    /// Checks the whole configuration without allocating anything.
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let rounds = 2 * self.teams.saturating_sub(1);
        check_dimensions(self.teams, rounds)?;

        if let Some(team) = self.top_teams.iter().copied().find(|t| *t >= self.teams) {
            return Err(ScheduleError::InvalidTopTeamSet {
                team,
                teams: self.teams,
            });
        }
        self.scheme.check(self.teams)?;

        Ok(ValidatedConfig {
            teams: self.teams,
            rounds,
            scheme: self.scheme,
            top_teams: self.top_teams.iter().copied().sorted().dedup().collect(),
        })
    }
}

/// A configuration that passed [`ScheduleConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedConfig {
    pub teams: usize,
    pub rounds: usize,
    pub scheme: Scheme,
    /// Sorted, without duplicates.
    pub top_teams: Vec<TeamId>,
}

impl ValidatedConfig {
    pub fn is_top(&self, team: TeamId) -> bool {
        self.top_teams.binary_search(&team).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_and_normalises_top_teams() {
        let cfg = ScheduleConfig::new(10, Scheme::Mirrored).with_top_teams(vec![2, 1, 2]);
        let valid = cfg.validate().unwrap();
        assert_eq!(valid.rounds, 18);
        assert_eq!(valid.top_teams, vec![1, 2]);
        assert!(valid.is_top(1) && !valid.is_top(0));
    }

    #[test]
    fn rejects_odd_team_count() {
        let err = ScheduleConfig::new(9, Scheme::Mirrored).validate();
        assert!(matches!(err, Err(ScheduleError::InvalidDimension { teams: 9, rounds: 16 })));
    }

    #[test]
    fn rejects_top_team_outside_range() {
        let err = ScheduleConfig::new(10, Scheme::French).with_top_teams(vec![3, 10]).validate();
        assert!(matches!(err, Err(ScheduleError::InvalidTopTeamSet { team: 10, teams: 10 })));
    }

    #[test]
    fn rejects_min_max_out_of_range() {
        for (c, d) in vec![(0, 12), (6, 5)] {
            let err = ScheduleConfig::new(10, Scheme::MinMax { c, d }).validate();
            assert!(
                matches!(err, Err(ScheduleError::InvalidSchemeParameters(_))),
                "c={} d={}",
                c,
                d
            );
        }
    }
}

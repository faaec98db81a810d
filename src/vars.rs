//! Decision variables of the schedule model, stored in flat arrays.
//!
//! - `x[i,j,k]`: team i hosts team j in round k (i != j).
//! - `y[i,k]`, k even: team i plays home in k and away in k+1.
//! - `w[i,k]`, k even: team i plays away in both k and k+1.

use crate::error::{Result, ScheduleError};
use crate::linear::Var;
use std::ops::Range;

pub type TeamId = usize;
pub type RoundId = usize;

/// Name prefix of the match variables.
pub const MATCH_PREFIX: &str = "x_";

pub fn match_name(i: TeamId, j: TeamId, k: RoundId) -> String {
    format!("x_{}_{}_{}", i, j, k)
}

/// Ordered pairs `(i, j)` with `i != j`.
pub fn ordered_pairs(teams: usize) -> impl Iterator<Item = (TeamId, TeamId)> {
    (0..teams).flat_map(move |i| (0..teams).filter(move |j| *j != i).map(move |j| (i, j)))
}

/// Unordered pairs `(i, j)` with `i < j`.
pub fn unordered_pairs(teams: usize) -> impl Iterator<Item = (TeamId, TeamId)> {
    (0..teams).flat_map(move |i| ((i + 1)..teams).map(move |j| (i, j)))
}

/// Checks `teams`/`rounds` before anything is allocated.
pub fn check_dimensions(teams: usize, rounds: usize) -> Result<()> {
    if teams < 2 || teams % 2 != 0 || rounds != 2 * (teams - 1) {
        return Err(ScheduleError::InvalidDimension { teams, rounds });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct VarSpace {
    teams: usize,
    rounds: usize,
    x: Vec<Var>,
    y: Vec<Var>,
    w: Vec<Var>,
}

impl VarSpace {
    /// Allocates every variable through `new_var`, which receives the variable's name.
    /// The diagonal `x[i,i,k]` has no slot at all.
    pub fn allocate(
        teams: usize,
        rounds: usize,
        mut new_var: impl FnMut(String) -> Var,
    ) -> Result<VarSpace> {
        check_dimensions(teams, rounds)?;

        let mut x = Vec::with_capacity(teams * (teams - 1) * rounds);
        for (i, j) in ordered_pairs(teams) {
            for k in 0..rounds {
                x.push(new_var(match_name(i, j, k)));
            }
        }

        let mut y = Vec::with_capacity(teams * rounds / 2);
        let mut w = Vec::with_capacity(teams * rounds / 2);
        for i in 0..teams {
            for k in (0..rounds).step_by(2) {
                y.push(new_var(format!("y_{}_{}", i, k)));
                w.push(new_var(format!("w_{}_{}", i, k)));
            }
        }

        Ok(VarSpace { teams, rounds, x, y, w })
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Rounds of the first leg, `[0, N-1)`.
    pub fn first_leg(&self) -> Range<RoundId> {
        0..(self.teams - 1)
    }

    /// Rounds of the second leg, `[N-1, K)`.
    pub fn second_leg(&self) -> Range<RoundId> {
        (self.teams - 1)..self.rounds
    }

    /// First rounds of the double-rounds `{k, k+1}`.
    pub fn double_round_starts(&self) -> impl Iterator<Item = RoundId> + Clone {
        (0..self.rounds).step_by(2)
    }

    fn x_offset(&self, i: TeamId, j: TeamId, k: RoundId) -> usize {
        assert!(i != j, "no match variable for team {} against itself", i);
        assert!(i < self.teams && j < self.teams && k < self.rounds);
        let col = if j > i { j - 1 } else { j };
        (i * (self.teams - 1) + col) * self.rounds + k
    }

    fn pair_offset(&self, i: TeamId, k: RoundId) -> usize {
        assert!(k % 2 == 0, "double-rounds start on even rounds, got {}", k);
        assert!(i < self.teams && k < self.rounds);
        i * (self.rounds / 2) + k / 2
    }

    pub fn x(&self, i: TeamId, j: TeamId, k: RoundId) -> Var {
        self.x[self.x_offset(i, j, k)]
    }

    pub fn y(&self, i: TeamId, k: RoundId) -> Var {
        self.y[self.pair_offset(i, k)]
    }

    pub fn w(&self, i: TeamId, k: RoundId) -> Var {
        self.w[self.pair_offset(i, k)]
    }

    /// `x[i,j,k]` and `x[j,i,k]`: every meeting of the pair in round k.
    pub fn meetings(&self, i: TeamId, j: TeamId, k: RoundId) -> [Var; 2] {
        [self.x(i, j, k), self.x(j, i, k)]
    }

    /// Team i at home in round k, one variable per opponent.
    pub fn hosting(&self, i: TeamId, k: RoundId) -> impl Iterator<Item = Var> + '_ {
        (0..self.teams).filter(move |j| *j != i).map(move |j| self.x(i, j, k))
    }

    /// Team i away in round k, one variable per opponent.
    pub fn visiting(&self, i: TeamId, k: RoundId) -> impl Iterator<Item = Var> + '_ {
        (0..self.teams).filter(move |j| *j != i).map(move |j| self.x(j, i, k))
    }

    pub fn num_match_vars(&self) -> usize {
        self.x.len()
    }

    pub fn num_aux_vars(&self) -> usize {
        self.y.len() + self.w.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn space(teams: usize) -> (VarSpace, Vec<String>) {
        let mut names = Vec::new();
        let vars = VarSpace::allocate(teams, 2 * (teams - 1), |name| {
            names.push(name);
            Var(names.len() - 1)
        })
        .unwrap();
        (vars, names)
    }

    #[test]
    fn sizes_and_unique_names() {
        let (vars, names) = space(6);
        assert_eq!(vars.rounds(), 10);
        assert_eq!(vars.num_match_vars(), 6 * 5 * 10);
        assert_eq!(vars.num_aux_vars(), 2 * 6 * 5);
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn offsets_match_names() {
        let (vars, names) = space(4);
        for (i, j) in ordered_pairs(4) {
            for k in 0..6 {
                assert_eq!(names[vars.x(i, j, k).index()], match_name(i, j, k));
            }
        }
        assert_eq!(names[vars.y(3, 4).index()], "y_3_4");
        assert_eq!(names[vars.w(1, 2).index()], "w_1_2");
    }

    #[test]
    fn legs_split_the_rounds() {
        let (vars, _) = space(4);
        assert_eq!(vars.first_leg(), 0..3);
        assert_eq!(vars.second_leg(), 3..6);
        assert_eq!(vars.double_round_starts().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn rejects_bad_dimensions_before_allocating() {
        let mut calls = 0;
        let err = VarSpace::allocate(9, 16, |_| {
            calls += 1;
            Var(calls)
        });
        assert!(matches!(err, Err(ScheduleError::InvalidDimension { teams: 9, .. })));
        assert_eq!(calls, 0);

        assert!(check_dimensions(10, 20).is_err());
        assert!(check_dimensions(0, 0).is_err());
        assert!(check_dimensions(2, 2).is_ok());
    }

    #[test]
    #[should_panic]
    fn diagonal_has_no_variable() {
        let (vars, _) = space(4);
        vars.x(2, 2, 0);
    }

    #[test]
    fn pair_iterators() {
        assert_eq!(ordered_pairs(3).count(), 6);
        assert_eq!(
            unordered_pairs(4).collect::<Vec<_>>(),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }
}

//! Constraint families of the base model. Each encoder appends its rows to `out`
//! and touches nothing else.

use crate::linear::{Constraint, LinearExpr, Relation};
use crate::vars::{ordered_pairs, unordered_pairs, TeamId, VarSpace};
use itertools::iproduct;

/// Every pair meets once per leg, and each team hosts each other team once.
pub fn double_round_robin(vars: &VarSpace, out: &mut Vec<Constraint>) {
    // One meeting per leg. The sum covers both venues, so (i,j) and (j,i) give
    // the same row; emit it once per unordered pair.
    for (i, j) in unordered_pairs(vars.teams()) {
        for (leg, rounds) in vec![("first", vars.first_leg()), ("second", vars.second_leg())] {
            let meetings = rounds.flat_map(|k| vars.meetings(i, j, k).to_vec());
            out.push(Constraint::new(
                format!("meet_{}_leg_{}_{}", leg, i, j),
                LinearExpr::sum(meetings),
                Relation::Eq,
                1,
            ));
        }
    }

    // i hosts j exactly once; together with the legs the two meetings get
    // opposite venues.
    for (i, j) in ordered_pairs(vars.teams()) {
        out.push(Constraint::new(
            format!("host_once_{}_{}", i, j),
            LinearExpr::sum((0..vars.rounds()).map(|k| vars.x(i, j, k))),
            Relation::Eq,
            1,
        ));
    }
}

/// Every team plays exactly one match in every round.
pub fn compactness(vars: &VarSpace, out: &mut Vec<Constraint>) {
    for (j, k) in iproduct!(0..vars.teams(), 0..vars.rounds()) {
        out.push(Constraint::new(
            format!("one_match_{}_{}", j, k),
            LinearExpr::sum(vars.hosting(j, k).chain(vars.visiting(j, k))),
            Relation::Eq,
            1,
        ));
    }
}

/// An ordinary team never meets the same top team in two consecutive rounds.
pub fn top_teams(vars: &VarSpace, top: &[TeamId], out: &mut Vec<Constraint>) {
    if top.is_empty() {
        return;
    }
    let ordinary = (0..vars.teams()).filter(|t| !top.contains(t)).collect::<Vec<_>>();
    for (i, j) in iproduct!(ordinary.iter().copied(), top.iter().copied()) {
        for k in 0..(vars.rounds() - 1) {
            let window = vars
                .meetings(i, j, k)
                .iter()
                .chain(vars.meetings(i, j, k + 1).iter())
                .copied()
                .collect::<Vec<_>>();
            out.push(Constraint::new(
                format!("top_team_{}_{}_{}", i, j, k),
                LinearExpr::sum(window),
                Relation::Le,
                1,
            ));
        }
    }
}

/// Home-then-away sequences: `y[i,k]` is 1 exactly when team i is home in k and
/// away in k+1, and every team has between N/2-1 and N/2 of them.
pub fn balance(vars: &VarSpace, out: &mut Vec<Constraint>) {
    let half = vars.teams() as i64 / 2;
    for i in 0..vars.teams() {
        let sequences = LinearExpr::sum(vars.double_round_starts().map(|k| vars.y(i, k)));
        out.push(Constraint::new(
            format!("ha_min_{}", i),
            sequences.clone(),
            Relation::Ge,
            half - 1,
        ));
        out.push(Constraint::new(format!("ha_max_{}", i), sequences, Relation::Le, half));

        for k in vars.double_round_starts() {
            let y = vars.y(i, k);
            // home in k and away in k+1 forces y up
            out.push(Constraint::new(
                format!("ha_link_{}_{}", i, k),
                LinearExpr::sum(vars.hosting(i, k).chain(vars.visiting(i, k + 1))).minus(y),
                Relation::Le,
                1,
            ));
            // y only when i is home in k
            out.push(Constraint::new(
                format!("ha_home_{}_{}", i, k),
                LinearExpr::sum(vars.hosting(i, k)).minus(y),
                Relation::Ge,
                0,
            ));
            // ... and away in k+1
            out.push(Constraint::new(
                format!("ha_away_{}_{}", i, k),
                LinearExpr::sum(vars.visiting(i, k + 1)).minus(y),
                Relation::Ge,
                0,
            ));
        }
    }
}

/// Away breaks: `w[i,k]` is 1 exactly when team i is away in both k and k+1.
pub fn away_breaks(vars: &VarSpace, out: &mut Vec<Constraint>) {
    for (i, k) in iproduct!(0..vars.teams(), vars.double_round_starts()) {
        let w = vars.w(i, k);
        out.push(Constraint::new(
            format!("ab_link_{}_{}", i, k),
            LinearExpr::sum(vars.visiting(i, k).chain(vars.visiting(i, k + 1))).minus(w),
            Relation::Le,
            1,
        ));
        out.push(Constraint::new(
            format!("ab_first_{}_{}", i, k),
            LinearExpr::sum(vars.visiting(i, k)).minus(w),
            Relation::Ge,
            0,
        ));
        out.push(Constraint::new(
            format!("ab_second_{}_{}", i, k),
            LinearExpr::sum(vars.visiting(i, k + 1)).minus(w),
            Relation::Ge,
            0,
        ));
    }
}

/// Total number of away breaks, to be minimised.
pub fn away_break_count(vars: &VarSpace) -> LinearExpr {
    LinearExpr::sum(
        iproduct!(0..vars.teams(), vars.double_round_starts()).map(|(i, k)| vars.w(i, k)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::Var;

    fn space(teams: usize) -> VarSpace {
        let mut next = 0;
        VarSpace::allocate(teams, 2 * (teams - 1), |_| {
            next += 1;
            Var(next - 1)
        })
        .unwrap()
    }

    fn encoded(f: impl Fn(&VarSpace, &mut Vec<Constraint>), vars: &VarSpace) -> Vec<Constraint> {
        let mut out = Vec::new();
        f(vars, &mut out);
        out
    }

    #[test]
    fn family_sizes() {
        let vars = space(6);
        assert_eq!(encoded(double_round_robin, &vars).len(), 15 * 2 + 30);
        assert_eq!(encoded(compactness, &vars).len(), 6 * 10);
        assert_eq!(encoded(balance, &vars).len(), 6 * 2 + 6 * 5 * 3);
        assert_eq!(encoded(away_breaks, &vars).len(), 6 * 5 * 3);
        assert_eq!(away_break_count(&vars).terms().len(), 30);
        // every team pairs with every double-round start
        assert!(away_break_count(&vars).terms().contains(&(vars.w(5, 8), 1)));
        assert!(encoded(away_breaks, &vars).iter().any(|c| c.name == "ab_link_5_8"));
    }

    #[test]
    fn top_team_windows_stop_before_last_round() {
        let vars = space(4);
        let mut out = Vec::new();
        top_teams(&vars, &[1, 2], &mut out);
        // ordinary {0, 3} x top {1, 2} x rounds 0..5
        assert_eq!(out.len(), 2 * 2 * 5);
        assert!(out.iter().all(|c| c.expr.terms().len() == 4 && c.rhs == 1));
        assert!(out.iter().any(|c| c.name == "top_team_3_2_4"));
        assert!(!out.iter().any(|c| c.name == "top_team_3_2_5"));

        let mut none = Vec::new();
        top_teams(&vars, &[], &mut none);
        assert!(none.is_empty());
    }

    #[test]
    fn compactness_row_touches_every_opponent_both_ways() {
        let vars = space(4);
        let rows = encoded(compactness, &vars);
        let row = rows.iter().find(|c| c.name == "one_match_2_3").unwrap();
        assert_eq!(row.expr.terms().len(), 6);
        assert!(row.expr.terms().contains(&(vars.x(2, 0, 3), 1)));
        assert!(row.expr.terms().contains(&(vars.x(0, 2, 3), 1)));
    }
}

//! The symmetric double round-robin schemes, and the constraints each one adds.

use crate::error::{Result, ScheduleError};
use crate::linear::{Constraint, LinearExpr, Relation};
use crate::vars::{ordered_pairs, unordered_pairs, VarSpace};
use std::fmt;
use std::str::FromStr;

/// How the second leg relates to the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    /// No symmetry; only the base constraints apply.
    Unconstrained,
    Mirrored,
    French,
    English,
    Inverted,
    BackToBack,
    /// Meetings of a pair are more than `c` rounds apart, and an away meeting has the
    /// home meeting within `d` rounds.
    MinMax { c: usize, d: usize },
}

/// The scheme without its parameters, as named on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeKind {
    None,
    Mirrored,
    French,
    English,
    Inverted,
    BackToBack,
    MinMax,
}

impl SchemeKind {
    pub const NAMES: [&'static str; 7] = [
        "none",
        "mirrored",
        "french",
        "english",
        "inverted",
        "back-to-back",
        "min-max",
    ];
}

impl FromStr for SchemeKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SchemeKind::None),
            "mirrored" => Ok(SchemeKind::Mirrored),
            "french" => Ok(SchemeKind::French),
            "english" => Ok(SchemeKind::English),
            "inverted" => Ok(SchemeKind::Inverted),
            "back-to-back" | "b2b" => Ok(SchemeKind::BackToBack),
            "min-max" | "minmax" => Ok(SchemeKind::MinMax),
            other => Err(format!(
                "unknown scheme '{}', expected one of {}",
                other,
                SchemeKind::NAMES.join(", ")
            )),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Unconstrained => write!(f, "none"),
            Scheme::Mirrored => write!(f, "mirrored"),
            Scheme::French => write!(f, "french"),
            Scheme::English => write!(f, "english"),
            Scheme::Inverted => write!(f, "inverted"),
            Scheme::BackToBack => write!(f, "back-to-back"),
            Scheme::MinMax { c, d } => write!(f, "min-max(c={}, d={})", c, d),
        }
    }
}

impl Scheme {
    /// Builds the scheme from the flat surface (name plus optional c/d).
    /// c and d belong to min-max only, and min-max needs both.
    pub fn from_parts(kind: SchemeKind, c: Option<usize>, d: Option<usize>) -> Result<Scheme> {
        let plain = match kind {
            SchemeKind::None => Scheme::Unconstrained,
            SchemeKind::Mirrored => Scheme::Mirrored,
            SchemeKind::French => Scheme::French,
            SchemeKind::English => Scheme::English,
            SchemeKind::Inverted => Scheme::Inverted,
            SchemeKind::BackToBack => Scheme::BackToBack,
            SchemeKind::MinMax => {
                return match (c, d) {
                    (Some(c), Some(d)) => Ok(Scheme::MinMax { c, d }),
                    _ => Err(ScheduleError::InvalidSchemeParameters(
                        "min-max needs both c and d".to_string(),
                    )),
                }
            }
        };
        if c.is_some() || d.is_some() {
            return Err(ScheduleError::InvalidSchemeParameters(format!(
                "c and d only apply to min-max, not to {}",
                plain
            )));
        }
        Ok(plain)
    }

    /// Range checks against the team count: 1 <= c <= N and c <= d <= 2(N-1).
    pub fn check(&self, teams: usize) -> Result<()> {
        if let Scheme::MinMax { c, d } = *self {
            let rounds = 2 * teams.saturating_sub(1);
            if !(1 <= c && c <= teams) {
                return Err(ScheduleError::InvalidSchemeParameters(format!(
                    "c={} is outside [1, {}]",
                    c, teams
                )));
            }
            if !(c <= d && d <= rounds) {
                return Err(ScheduleError::InvalidSchemeParameters(format!(
                    "d={} is outside [{}, {}]",
                    d, c, rounds
                )));
            }
        }
        Ok(())
    }

    /// Back-to-back replaces the two legs by its own pairing, so the leg coverage
    /// constraints do not apply.
    pub fn uses_legs(&self) -> bool {
        *self != Scheme::BackToBack
    }

    /// Adds the scheme's constraints on top of the base model.
    pub fn encode(&self, vars: &VarSpace, out: &mut Vec<Constraint>) {
        match *self {
            Scheme::Unconstrained => {}
            Scheme::Mirrored => mirrored(vars, out),
            Scheme::French => french(vars, out),
            Scheme::English => english(vars, out),
            Scheme::Inverted => inverted(vars, out),
            Scheme::BackToBack => back_to_back(vars, out),
            Scheme::MinMax { c, d } => min_max(vars, c, d, out),
        }
    }
}

// Round k of the first leg is replayed with swapped venues in round k + (N-1).
fn mirrored(vars: &VarSpace, out: &mut Vec<Constraint>) {
    let n = vars.teams();
    for (i, j) in ordered_pairs(n) {
        for k in vars.first_leg() {
            out.push(Constraint::equal_vars(
                format!("mirrored_{}_{}_{}", i, j, k),
                vars.x(i, j, k),
                vars.x(j, i, k + n - 1),
            ));
        }
    }
}

// Round 0 is replayed last; rounds 1..N-1 are shifted by N-2.
fn french(vars: &VarSpace, out: &mut Vec<Constraint>) {
    let n = vars.teams();
    for (i, j) in ordered_pairs(n) {
        out.push(Constraint::equal_vars(
            format!("french_first_{}_{}", i, j),
            vars.x(i, j, 0),
            vars.x(j, i, 2 * n - 3),
        ));
        for k in 1..(n - 1) {
            out.push(Constraint::equal_vars(
                format!("french_{}_{}_{}", i, j, k),
                vars.x(i, j, k),
                vars.x(j, i, k + n - 2),
            ));
        }
    }
}

// The last round of the first leg opens the second; rounds 1..N-2 are shifted by N.
fn english(vars: &VarSpace, out: &mut Vec<Constraint>) {
    let n = vars.teams();
    for (i, j) in ordered_pairs(n) {
        out.push(Constraint::equal_vars(
            format!("english_last_{}_{}", i, j),
            vars.x(i, j, n - 2),
            vars.x(j, i, n - 1),
        ));
        for k in 1..n.saturating_sub(2) {
            out.push(Constraint::equal_vars(
                format!("english_{}_{}_{}", i, j, k),
                vars.x(i, j, k),
                vars.x(j, i, k + n),
            ));
        }
    }
}

// The second leg is the first one played backwards.
fn inverted(vars: &VarSpace, out: &mut Vec<Constraint>) {
    let k_total = vars.rounds();
    for (i, j) in ordered_pairs(vars.teams()) {
        for k in vars.first_leg() {
            out.push(Constraint::equal_vars(
                format!("inverted_{}_{}_{}", i, j, k),
                vars.x(i, j, k),
                vars.x(j, i, k_total - 1 - k),
            ));
        }
    }
}

// Each double-round {k, k+1} plays the same pairing twice, venues swapped.
fn back_to_back(vars: &VarSpace, out: &mut Vec<Constraint>) {
    for (i, j) in ordered_pairs(vars.teams()) {
        for k in vars.double_round_starts() {
            out.push(Constraint::equal_vars(
                format!("back_to_back_{}_{}_{}", i, j, k),
                vars.x(i, j, k),
                vars.x(j, i, k + 1),
            ));
        }
    }
}

fn min_max(vars: &VarSpace, c: usize, d: usize, out: &mut Vec<Constraint>) {
    let k_total = vars.rounds();

    // At most one meeting of a pair in any c+1 consecutive rounds.
    for (i, j) in unordered_pairs(vars.teams()) {
        for k in 0..k_total.saturating_sub(c) {
            let window = (k..=(k + c)).flat_map(|q| vars.meetings(i, j, q).to_vec());
            out.push(Constraint::new(
                format!("min_max_gap_{}_{}_{}", i, j, k),
                LinearExpr::sum(window),
                Relation::Le,
                1,
            ));
        }
    }

    // If j hosts i in round k, i hosts j somewhere within d rounds of k.
    for (i, j) in ordered_pairs(vars.teams()) {
        for k in 0..k_total {
            let lo = k.saturating_sub(d);
            let hi = (k + d + 1).min(k_total);
            let nearby = (lo..hi).filter(|q| *q != k).map(|q| vars.x(i, j, q));
            out.push(Constraint::new(
                format!("min_max_return_{}_{}_{}", i, j, k),
                LinearExpr::sum(nearby).minus(vars.x(j, i, k)),
                Relation::Ge,
                0,
            ));
        }
    }
}

//! Linear expressions and constraints over binary variables, and their LP-format text form.

use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;

/// Handle of a binary variable, issued by a [`SolverEngine`](crate::engine::SolverEngine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(pub usize);

impl Var {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Eq => "=",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Integer-weighted sum of binary variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(Var, i64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sum(vars: impl IntoIterator<Item = Var>) -> Self {
        LinearExpr {
            terms: vars.into_iter().map(|v| (v, 1)).collect(),
        }
    }

    pub fn term(mut self, var: Var, coef: i64) -> Self {
        self.terms.push((var, coef));
        self
    }

    pub fn plus(self, var: Var) -> Self {
        self.term(var, 1)
    }

    pub fn minus(self, var: Var) -> Self {
        self.term(var, -1)
    }

    pub fn terms(&self) -> &[(Var, i64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Merges repeated variables and drops zero coefficients.
    pub fn compact(&self) -> LinearExpr {
        let terms = self
            .terms
            .iter()
            .copied()
            .sorted_by_key(|(v, _)| *v)
            .coalesce(|(v1, c1), (v2, c2)| {
                if v1 == v2 {
                    Ok((v1, c1 + c2))
                } else {
                    Err(((v1, c1), (v2, c2)))
                }
            })
            .filter(|(_, c)| *c != 0)
            .collect();
        LinearExpr { terms }
    }

    pub fn eval(&self, value: impl Fn(Var) -> f64) -> f64 {
        self.terms.iter().map(|(v, c)| *c as f64 * value(*v)).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: i64,
}

impl Constraint {
    pub fn new(name: impl Into<String>, expr: LinearExpr, relation: Relation, rhs: i64) -> Self {
        Constraint {
            name: name.into(),
            expr,
            relation,
            rhs,
        }
    }

    /// `lhs == rhs`, written as `lhs - rhs == 0`.
    pub fn equal_vars(name: impl Into<String>, lhs: Var, rhs: Var) -> Self {
        Constraint::new(name, LinearExpr::new().plus(lhs).minus(rhs), Relation::Eq, 0)
    }

    pub fn is_satisfied_by(&self, value: impl Fn(Var) -> f64) -> bool {
        const TOLERANCE: f64 = 1e-6;
        let lhs = self.expr.eval(value);
        let rhs = self.rhs as f64;
        match self.relation {
            Relation::Eq => (lhs - rhs).abs() <= TOLERANCE,
            Relation::Le => lhs <= rhs + TOLERANCE,
            Relation::Ge => lhs >= rhs - TOLERANCE,
        }
    }
}

/// Renders a 0-1 program in CPLEX LP format.
pub fn emit_lp(
    variables: &[(String, Var)],
    constraints: &[Constraint],
    objective: &LinearExpr,
    sense: Sense,
) -> String {
    let names: HashMap<Var, &str> = variables.iter().map(|(n, v)| (*v, n.as_str())).collect();
    let mut out = String::new();
    match sense {
        Sense::Minimize => out.push_str("Minimize\n obj: "),
        Sense::Maximize => out.push_str("Maximize\n obj: "),
    }
    out.push_str(&fmt_lin(objective, &names));
    out.push('\n');
    out.push_str("Subject To\n");
    for c in constraints {
        out.push_str(&format!(
            " {}: {} {} {}\n",
            c.name,
            fmt_lin(&c.expr, &names),
            c.relation,
            c.rhs
        ));
    }
    out.push_str("Binary\n");
    for (name, _) in variables {
        out.push_str(&format!(" {}\n", name));
    }
    out.push_str("End\n");
    out
}

fn fmt_lin(e: &LinearExpr, names: &HashMap<Var, &str>) -> String {
    let parts = e
        .terms()
        .iter()
        .map(|(v, c)| {
            let name = names.get(v).copied().unwrap_or("?");
            match *c {
                1 => format!("+1 {}", name),
                -1 => format!("-1 {}", name),
                c => format!("{:+} {}", c, name),
            }
        })
        .collect::<Vec<_>>();
    if parts.is_empty() {
        "+0".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_merges_and_drops_zero_terms() {
        let e = LinearExpr::new()
            .plus(Var(2))
            .plus(Var(0))
            .minus(Var(2))
            .plus(Var(0));
        assert_eq!(e.compact().terms(), &[(Var(0), 2)]);
    }

    #[test]
    fn satisfaction_uses_relation() {
        let c = Constraint::new("c", LinearExpr::sum(vec![Var(0), Var(1)]), Relation::Le, 1);
        assert!(c.is_satisfied_by(|v| if v == Var(0) { 1.0 } else { 0.0 }));
        assert!(!c.is_satisfied_by(|_| 1.0));

        let eq = Constraint::equal_vars("e", Var(0), Var(1));
        assert!(eq.is_satisfied_by(|_| 1.0));
        assert!(!eq.is_satisfied_by(|v| v.index() as f64));
    }

    #[test]
    fn lp_text_lists_rows_and_binaries() {
        let vars = vec![("a".to_string(), Var(0)), ("b".to_string(), Var(1))];
        let cons = vec![Constraint::equal_vars("link", Var(0), Var(1))];
        let lp = emit_lp(&vars, &cons, &LinearExpr::sum(vec![Var(1)]), Sense::Minimize);
        assert!(lp.starts_with("Minimize\n obj: +1 b\n"));
        assert!(lp.contains(" link: +1 a -1 b = 0\n"));
        assert!(lp.contains("Binary\n a\n b\n"));
        assert!(lp.ends_with("End\n"));
    }
}

use super::{SolverEngine, SolverStatus};
use crate::linear::{Constraint, LinearExpr, Relation, Sense, Var};
use log::*;
use satcoder::constraints::*;
use satcoder::solvers::cadical::Cadical;
use satcoder::symbolic::*;
use satcoder::*;
use std::time::{Duration, Instant};

/// The SAT engine on the CaDiCaL backend.
pub type CadicalEngine = SatEngine<<Cadical as SatSolverWithCore>::Lit, Cadical>;

impl CadicalEngine {
    pub fn cadical() -> Self {
        SatEngine::new(Cadical::new())
    }
}

/// 0-1 engine on top of an incremental SAT solver.
///
/// Every linear constraint is turned into a cardinality constraint over literals:
/// a term `-x` is rewritten as `!x - 1`, so `sum(pos) - sum(neg) <= b` becomes
/// `count(pos ++ !neg) <= b + |neg|`. Cardinalities are encoded with unit clauses,
/// at-most-one/exactly-one, or a totalizer on the bound.
///
/// Optimisation is a descending linear search: take any model, then ask for a
/// strictly cheaper one through an assumption on a totalizer over the objective
/// literals, until the solver answers unsat. With a time limit the descent stops
/// at the first solver call past the deadline and the engine reports `Limit`.
pub struct SatEngine<L: Lit, S> {
    solver: S,
    lits: Vec<Bool<L>>,
    num_constraints: usize,
    // Constraints that no assignment can satisfy.
    contradictions: Vec<String>,
    // Objective as a multiset of (variable, polarity); the cost is the number of
    // entries that hold, plus `objective_offset`.
    objective: Vec<(Var, bool)>,
    objective_offset: i64,
    maximize: bool,
    incumbent: Option<Vec<bool>>,
    status: SolverStatus,
    solving_time: Duration,
    time_limit: Option<Duration>,
    verbose: bool,
}

impl<L: Lit, S: SatInstance<L> + SatSolverWithCore<Lit = L>> SatEngine<L, S> {
    pub fn new(solver: S) -> Self {
        SatEngine {
            solver,
            lits: Vec::new(),
            num_constraints: 0,
            contradictions: Vec::new(),
            objective: Vec::new(),
            objective_offset: 0,
            maximize: false,
            incumbent: None,
            status: SolverStatus::Unsolved,
            solving_time: Duration::default(),
            time_limit: None,
            verbose: false,
        }
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn num_variables(&self) -> usize {
        self.lits.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.num_constraints
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Literals to count and the adjusted bound for `expr <rel> rhs`. The flag is
    /// false when a literal occurs more than once (a coefficient other than +-1).
    fn cardinality(&self, expr: &LinearExpr, rhs: i64) -> (Vec<Bool<L>>, i64, bool) {
        let mut lits = Vec::new();
        let mut bound = rhs;
        let mut distinct = true;
        for (var, coef) in expr.compact().terms().iter().copied() {
            let lit = self.lits[var.index()];
            distinct &= coef.abs() == 1;
            if coef > 0 {
                lits.extend(std::iter::repeat(lit).take(coef as usize));
            } else {
                lits.extend(std::iter::repeat(!lit).take((-coef) as usize));
                bound -= coef;
            }
        }
        (lits, bound, distinct)
    }

    fn at_most(&mut self, name: &str, lits: Vec<Bool<L>>, max: i64, distinct: bool) {
        if max < 0 {
            warn!("constraint {} allows fewer than zero true literals", name);
            self.contradictions.push(name.to_string());
            return;
        }
        let max = max as usize;
        if max >= lits.len() {
            return;
        }

        if max == 0 {
            for l in lits {
                SatInstance::add_clause(&mut self.solver, vec![!l]);
            }
        } else if max == 1 && distinct {
            self.solver.assert_at_most_one(lits);
        } else {
            let tot = Totalizer::count(&mut self.solver, lits, max as u32);
            if let Some(exceeded) = tot.rhs().get(max).copied() {
                SatInstance::add_clause(&mut self.solver, vec![!exceeded]);
            }
        }
    }

    fn at_least(&mut self, name: &str, lits: Vec<Bool<L>>, min: i64, distinct: bool) {
        if min <= 0 {
            return;
        }
        let n = lits.len() as i64;
        if min > n {
            warn!("constraint {} needs {} true literals out of {}", name, min, n);
            self.contradictions.push(name.to_string());
            return;
        }

        if min == 1 {
            SatInstance::add_clause(&mut self.solver, lits);
        } else {
            // at least `min` lits is at most `n - min` of their negations
            let negated = lits.into_iter().map(|l| !l).collect();
            self.at_most(name, negated, n - min, distinct);
        }
    }

    fn solve(&mut self, assumptions: Vec<Bool<L>>) -> Option<Vec<bool>> {
        match self.solver.solve_with_assumptions(assumptions.into_iter()) {
            SatResultWithCore::Sat(model) => {
                Some(self.lits.iter().map(|l| model.value(l)).collect())
            }
            SatResultWithCore::Unsat(_) => None,
        }
    }

    fn cost(&self, values: &[bool]) -> usize {
        self.objective
            .iter()
            .filter(|(v, positive)| values[v.index()] == *positive)
            .count()
    }

    fn progress(&self) -> Level {
        if self.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    fn out_of_time(&self, start: Instant) -> bool {
        match self.time_limit {
            Some(limit) => start.elapsed() >= limit,
            None => false,
        }
    }

    fn search(&mut self, start: Instant) -> SolverStatus {
        let level = self.progress();
        if !self.contradictions.is_empty() {
            log!(level, "{} constraints cannot hold, skipping search", self.contradictions.len());
            return SolverStatus::Infeasible;
        }

        log!(
            level,
            "Solving with {} variables, {} constraints, {} objective literals",
            self.lits.len(),
            self.num_constraints,
            self.objective.len()
        );

        if self.out_of_time(start) {
            log!(level, "Time limit reached before the first solve.");
            return SolverStatus::Limit;
        }
        let mut best = match self.solve(Vec::new()) {
            Some(values) => values,
            None => {
                log!(level, "No feasible assignment.");
                return SolverStatus::Infeasible;
            }
        };
        let mut cost = self.cost(&best);
        log!(level, "First incumbent, cost {}", cost);

        if cost > 0 {
            let objective_lits = self
                .objective
                .iter()
                .map(|(v, positive)| {
                    let l = self.lits[v.index()];
                    if *positive {
                        l
                    } else {
                        !l
                    }
                })
                .collect::<Vec<_>>();
            let tot = Totalizer::count(&mut self.solver, objective_lits, cost as u32);

            while cost > 0 {
                if self.out_of_time(start) {
                    log!(level, "Time limit reached, best cost {}", cost);
                    self.incumbent = Some(best);
                    return SolverStatus::Limit;
                }
                // rhs()[b] holds when at least b+1 objective literals are true
                let cheaper = match tot.rhs().get(cost - 1).copied() {
                    Some(l) => !l,
                    None => break,
                };
                match self.solve(vec![cheaper]) {
                    Some(values) => {
                        cost = self.cost(&values);
                        debug!("Improved incumbent, cost {}", cost);
                        best = values;
                    }
                    None => break,
                }
            }
        }

        log!(level, "Optimal cost {}", cost);
        self.incumbent = Some(best);
        SolverStatus::Optimal
    }
}

impl<L: Lit, S: SatInstance<L> + SatSolverWithCore<Lit = L>> SolverEngine for SatEngine<L, S> {
    fn add_binary_variable(&mut self, _name: &str) -> Var {
        let var = Var(self.lits.len());
        self.lits.push(SatInstance::new_var(&mut self.solver));
        var
    }

    fn add_linear_constraint(&mut self, constraint: &Constraint) {
        self.num_constraints += 1;
        let (lits, bound, distinct) = self.cardinality(&constraint.expr, constraint.rhs);
        let name = constraint.name.as_str();
        match constraint.relation {
            Relation::Le => self.at_most(name, lits, bound, distinct),
            Relation::Ge => self.at_least(name, lits, bound, distinct),
            Relation::Eq if bound == 1 && distinct && !lits.is_empty() => {
                self.solver.assert_exactly_one(lits);
            }
            Relation::Eq => {
                self.at_least(name, lits.clone(), bound, distinct);
                self.at_most(name, lits, bound, distinct);
            }
        }
    }

    fn set_objective(&mut self, expr: &LinearExpr, sense: Sense) {
        self.maximize = sense == Sense::Maximize;
        self.objective.clear();
        self.objective_offset = 0;
        for (var, coef) in expr.compact().terms().iter().copied() {
            // maximising f is minimising -f
            let coef = if self.maximize { -coef } else { coef };
            if coef > 0 {
                self.objective.extend(std::iter::repeat((var, true)).take(coef as usize));
            } else {
                self.objective.extend(std::iter::repeat((var, false)).take((-coef) as usize));
                self.objective_offset += coef;
            }
        }
    }

    fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    fn presolve(&mut self) -> SolverStatus {
        self.status = if self.contradictions.is_empty() {
            SolverStatus::Presolved
        } else {
            for name in self.contradictions.iter() {
                warn!("presolve: {} is unsatisfiable", name);
            }
            SolverStatus::Infeasible
        };
        self.status
    }

    fn optimize(&mut self) -> SolverStatus {
        let start = Instant::now();
        self.status = self.search(start);
        self.solving_time = start.elapsed();
        self.status
    }

    fn status(&self) -> SolverStatus {
        self.status
    }

    fn value(&self, var: Var) -> f64 {
        match self.incumbent.as_ref().and_then(|values| values.get(var.index()).copied()) {
            Some(true) => 1.0,
            _ => 0.0,
        }
    }

    fn objective_value(&self) -> f64 {
        let cost = self.incumbent.as_ref().map(|v| self.cost(v)).unwrap_or(0) as i64
            + self.objective_offset;
        if self.maximize {
            -cost as f64
        } else {
            cost as f64
        }
    }

    fn solving_time(&self) -> Duration {
        self.solving_time
    }
}

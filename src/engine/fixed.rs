use super::{SolverEngine, SolverStatus};
use crate::linear::{Constraint, LinearExpr, Sense, Var};
use log::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Engine that does no search: it holds a fixed assignment (by variable name) and
/// `optimize` only checks that assignment against every constraint it was given.
/// Variables missing from the assignment are 0.
#[derive(Debug, Default)]
pub struct FixedEngine {
    assignment: HashMap<String, f64>,
    values: Vec<f64>,
    names: Vec<String>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
    violated: Vec<String>,
    status: Option<SolverStatus>,
    solving_time: Duration,
}

impl FixedEngine {
    pub fn new(assignment: impl IntoIterator<Item = (String, f64)>) -> Self {
        FixedEngine {
            assignment: assignment.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Names of the constraints the assignment broke in the last `optimize`.
    pub fn violated(&self) -> &[String] {
        &self.violated
    }
}

impl SolverEngine for FixedEngine {
    fn add_binary_variable(&mut self, name: &str) -> Var {
        let var = Var(self.values.len());
        self.values.push(self.assignment.get(name).copied().unwrap_or(0.0));
        self.names.push(name.to_string());
        var
    }

    fn add_linear_constraint(&mut self, constraint: &Constraint) {
        self.constraints.push(constraint.clone());
    }

    fn set_objective(&mut self, expr: &LinearExpr, _sense: Sense) {
        self.objective = expr.clone();
    }

    fn presolve(&mut self) -> SolverStatus {
        self.status = Some(SolverStatus::Presolved);
        SolverStatus::Presolved
    }

    fn optimize(&mut self) -> SolverStatus {
        let start = Instant::now();
        let values = &self.values;
        self.violated = self
            .constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(|v| values[v.index()]))
            .map(|c| c.name.clone())
            .collect();
        for name in self.violated.iter().take(10) {
            debug!("fixed assignment violates {}", name);
        }

        let status = if self.violated.is_empty() {
            SolverStatus::Optimal
        } else {
            SolverStatus::Infeasible
        };
        self.solving_time = start.elapsed();
        self.status = Some(status);
        status
    }

    fn status(&self) -> SolverStatus {
        self.status.unwrap_or(SolverStatus::Unsolved)
    }

    fn value(&self, var: Var) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }

    fn objective_value(&self) -> f64 {
        self.objective.eval(|v| self.value(v))
    }

    fn solving_time(&self) -> Duration {
        self.solving_time
    }
}

//! The narrow interface the model talks to. Everything past it (search, propagation,
//! bounding) is the engine's business.

use crate::linear::{Constraint, LinearExpr, Sense, Var};
use std::fmt;
use std::time::Duration;

mod fixed;
mod sat;

pub use fixed::FixedEngine;
pub use sat::{CadicalEngine, SatEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverStatus {
    Unsolved,
    Presolved,
    Optimal,
    Infeasible,
    /// Stopped by a resource limit before optimality was proven.
    Limit,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SolverStatus::Unsolved => "unsolved",
            SolverStatus::Presolved => "presolved",
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Limit => "limit",
        })
    }
}

pub trait SolverEngine {
    fn add_binary_variable(&mut self, name: &str) -> Var;

    fn add_linear_constraint(&mut self, constraint: &Constraint);

    fn set_objective(&mut self, expr: &LinearExpr, sense: Sense);

    /// Whether search progress is reported at info level. Quiet by default.
    fn set_verbose(&mut self, _verbose: bool) {}

    fn presolve(&mut self) -> SolverStatus;

    /// Blocks until the engine reaches a terminal status.
    fn optimize(&mut self) -> SolverStatus;

    fn status(&self) -> SolverStatus;

    /// Value of `var` in the best known assignment; 0 when there is none.
    fn value(&self, var: Var) -> f64;

    fn objective_value(&self) -> f64;

    fn solving_time(&self) -> Duration;
}

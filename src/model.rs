//! The scheduling model: builds the 0-1 program into an engine and gates access to
//! the results on the engine's status.

use crate::config::{ScheduleConfig, ValidatedConfig};
use crate::decode::{write_solution, FixtureTable, SolutionMap};
use crate::encode;
use crate::engine::{SolverEngine, SolverStatus};
use crate::error::{Result, ScheduleError};
use crate::linear::{emit_lp, Constraint, LinearExpr, Sense, Var};
use crate::vars::VarSpace;
use log::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

pub struct ScheduleModel<E> {
    config: ValidatedConfig,
    vars: VarSpace,
    variables: Vec<(String, Var)>,
    constraints: Vec<Constraint>,
    objective: LinearExpr,
    engine: E,
    status: SolverStatus,
}

impl<E: SolverEngine> ScheduleModel<E> {
    /// Validates `config`, then creates every variable, constraint and the objective
    /// in `engine`. Nothing is allocated when validation fails.
    pub fn new(config: &ScheduleConfig, mut engine: E) -> Result<Self> {
        let level = if config.verbose { Level::Info } else { Level::Debug };
        let verbose = config.verbose;
        let config = config.validate()?;
        engine.set_verbose(verbose);
        info!(
            "Building {} model for {} teams, {} rounds, top teams {:?}",
            config.scheme, config.teams, config.rounds, config.top_teams
        );

        let mut variables = Vec::new();
        let vars = VarSpace::allocate(config.teams, config.rounds, |name| {
            let var = engine.add_binary_variable(&name);
            variables.push((name, var));
            var
        })?;

        let mut constraints = Vec::new();
        let out = &mut constraints;
        if config.scheme.uses_legs() {
            encode_family(level, "double round robin", out, |out| {
                encode::double_round_robin(&vars, out)
            });
        }
        encode_family(level, "compactness", out, |out| encode::compactness(&vars, out));
        encode_family(level, "top teams", out, |out| {
            encode::top_teams(&vars, &config.top_teams, out)
        });
        encode_family(level, "balance", out, |out| encode::balance(&vars, out));
        encode_family(level, "away breaks", out, |out| encode::away_breaks(&vars, out));
        encode_family(level, "symmetric scheme", out, |out| config.scheme.encode(&vars, out));

        for c in constraints.iter() {
            engine.add_linear_constraint(c);
        }

        let objective = encode::away_break_count(&vars);
        engine.set_objective(&objective, Sense::Minimize);

        info!("Model has vars {} constraints {}", variables.len(), constraints.len());

        Ok(ScheduleModel {
            config,
            vars,
            variables,
            constraints,
            objective,
            engine,
            status: SolverStatus::Unsolved,
        })
    }

    pub fn status(&self) -> SolverStatus {
        self.status
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn vars(&self) -> &VarSpace {
        &self.vars
    }

    /// Every variable with its name, in creation order.
    pub fn variables(&self) -> &[(String, Var)] {
        &self.variables
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn presolve(&mut self) -> Result<()> {
        self.status = self.engine.presolve();
        info!("Presolve finished, status {}", self.status);
        if self.status == SolverStatus::Infeasible {
            return Err(ScheduleError::InfeasibleModel { stage: "presolve" });
        }
        Ok(())
    }

    /// Runs the engine to a terminal status. Anything other than optimal is an error,
    /// `NotOptimal` when the engine stopped on a limit; there is no retry.
    pub fn optimize(&mut self) -> Result<()> {
        self.status = self.engine.optimize();
        info!(
            "Optimisation finished, status {} after {:.2}s",
            self.status,
            self.engine.solving_time().as_secs_f64()
        );
        match self.status {
            SolverStatus::Optimal => Ok(()),
            SolverStatus::Infeasible => Err(ScheduleError::InfeasibleModel { stage: "optimize" }),
            status => Err(ScheduleError::NotOptimal { status }),
        }
    }

    fn ensure_optimal(&self) -> Result<()> {
        if self.status != SolverStatus::Optimal {
            return Err(ScheduleError::ModelNotReady { status: self.status });
        }
        Ok(())
    }

    pub fn objective_value(&self) -> Result<f64> {
        self.ensure_optimal()?;
        Ok(self.engine.objective_value())
    }

    pub fn value(&self, var: Var) -> Result<f64> {
        self.ensure_optimal()?;
        Ok(self.engine.value(var))
    }

    /// Values of all variables, by name.
    pub fn best_solution(&self) -> Result<SolutionMap> {
        self.ensure_optimal()?;
        Ok(self
            .variables
            .iter()
            .map(|(name, var)| (name.clone(), self.engine.value(*var)))
            .collect())
    }

    pub fn solving_time(&self) -> Result<Duration> {
        self.ensure_optimal()?;
        Ok(self.engine.solving_time())
    }

    /// The solved schedule. Fails when a cell stays empty.
    pub fn fixture_table(&self) -> Result<FixtureTable> {
        let table = FixtureTable::decode(self.config.teams, &self.best_solution()?)?;
        table.ensure_complete()?;
        Ok(table)
    }

    /// Writes the 0-1 program in LP format.
    pub fn write_problem(&self, path: impl AsRef<Path>) -> Result<()> {
        let lp = emit_lp(&self.variables, &self.constraints, &self.objective, Sense::Minimize);
        std::fs::write(path.as_ref(), lp)?;
        info!("Wrote problem to {:?}", path.as_ref());
        Ok(())
    }

    /// Writes the solved assignment as a solution file.
    pub fn write_solution(&self, path: impl AsRef<Path>) -> Result<()> {
        let objective = self.objective_value()?;
        let mut coefs: HashMap<Var, i64> = HashMap::new();
        for (var, coef) in self.objective.terms() {
            *coefs.entry(*var).or_insert(0) += *coef;
        }
        let rows = self.variables.iter().map(|(name, var)| {
            (name.as_str(), self.engine.value(*var), coefs.get(var).copied().unwrap_or(0))
        });

        let mut out = BufWriter::new(File::create(path.as_ref())?);
        write_solution(&mut out, objective, rows)?;
        out.flush()?;
        info!("Wrote solution to {:?}", path.as_ref());
        Ok(())
    }
}

fn encode_family(
    level: Level,
    name: &str,
    out: &mut Vec<Constraint>,
    f: impl FnOnce(&mut Vec<Constraint>),
) {
    let before = out.len();
    f(out);
    log!(level, " - {}: {} constraints", name, out.len() - before);
}

//! Double round-robin league scheduling as a 0-1 integer program.
//!
//! Every team meets every other team twice, once at home and once away, one game per
//! round, over 2(N-1) rounds. On top of that the model can keep ordinary teams from
//! meeting a top team in consecutive rounds, bounds each team's home-away sequences,
//! ties the second leg to the first through one of several symmetric schemes, and
//! minimises the number of away breaks.
//!
//! The model only builds the program and reads back the answer; search is delegated
//! to a [`SolverEngine`].
//!
//! ```no_run
//! use drr_scheduler::{CadicalEngine, Scheme, ScheduleConfig, ScheduleModel};
//!
//! let config = ScheduleConfig::new(10, Scheme::Mirrored).with_top_teams(vec![1, 2]);
//! let mut model = ScheduleModel::new(&config, CadicalEngine::cadical())?;
//! model.optimize()?;
//! println!("away breaks: {}", model.objective_value()?);
//! let table = model.fixture_table()?;
//! # Ok::<(), drr_scheduler::ScheduleError>(())
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod engine;
pub mod error;
pub mod format;
pub mod linear;
pub mod model;
pub mod scheme;
pub mod vars;
pub mod verify;

pub use config::{ScheduleConfig, ValidatedConfig};
pub use decode::{parse_solution, read_solution, Fixture, FixtureTable, SolutionMap};
pub use engine::{CadicalEngine, FixedEngine, SatEngine, SolverEngine, SolverStatus};
pub use error::{Result, ScheduleError};
pub use format::{format_schedule, TeamNames};
pub use linear::{Constraint, LinearExpr, Relation, Sense, Var};
pub use model::ScheduleModel;
pub use scheme::{Scheme, SchemeKind};
pub use vars::{RoundId, TeamId, VarSpace};
pub use verify::verify_schedule;

//! Error taxonomy for model construction, solving and decoding.

use crate::engine::SolverStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScheduleError>;

#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Odd team count, fewer than two teams, or a round count other than 2(N-1).
    #[error("invalid dimension: {teams} teams, {rounds} rounds (need even N >= 2, 2(N-1) rounds)")]
    InvalidDimension { teams: usize, rounds: usize },

    #[error("top team {team} is not a team index in [0, {teams})")]
    InvalidTopTeamSet { team: usize, teams: usize },

    #[error("invalid scheme parameters: {0}")]
    InvalidSchemeParameters(String),

    /// A result accessor was used before the model reached `optimal`.
    #[error("model is not optimal, current status is {status}")]
    ModelNotReady { status: SolverStatus },

    #[error("no feasible schedule exists ({stage} proved infeasibility)")]
    InfeasibleModel { stage: &'static str },

    #[error("optimisation ended with status {status}")]
    NotOptimal { status: SolverStatus },

    #[error("decoded schedule is inconsistent: {0}")]
    DecodeInvariantViolation(String),

    #[error("malformed solution at line {line}: {reason}")]
    MalformedSolution { line: usize, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

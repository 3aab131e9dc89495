//! Errors raised by the layout engine.

use tether_core::RegionId;
use thiserror::Error;

use crate::cassowary::SolverError;
use crate::engine::ConstraintId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("Unknown region: {0}")]
    UnknownRegion(RegionId),

    #[error("Constraint {0} is not active")]
    UnknownConstraint(ConstraintId),

    #[error("Unsatisfiable required constraint: {constraint}")]
    Unsatisfiable { constraint: String },

    #[error(transparent)]
    Solver(#[from] SolverError),
}

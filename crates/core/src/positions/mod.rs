//! Positions module - domain models, the order ledger, and lifecycle
//! services.

mod ledger;
mod positions_model;
mod positions_service;
mod positions_traits;

pub use ledger::*;
pub use positions_model::*;
pub use positions_service::PositionService;
pub use positions_traits::{PositionRepositoryTrait, PositionServiceTrait};

#[cfg(test)]
pub(crate) mod fixtures;
#[cfg(test)]
mod positions_model_tests;

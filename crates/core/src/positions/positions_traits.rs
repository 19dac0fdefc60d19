//! Repository and service traits for positions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::positions_model::{Order, Position};
use crate::errors::Result;

/// Storage contract for position aggregates. A position is stored and
/// deleted whole, together with its owned orders; there is no partial
/// deletion.
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    async fn create(&self, position: Position) -> Result<Position>;

    async fn update(&self, position: Position) -> Result<Position>;

    /// Removes the whole aggregate. Returns the number of records removed.
    async fn delete(&self, position_id: &str) -> Result<usize>;

    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;

    fn get_by_id(&self, position_id: &str) -> Result<Position>;

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Position>>;
}

/// Service contract for position lifecycle operations.
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    async fn create_position(&self, position: Position) -> Result<Position>;

    /// Appends an order to an active position. Closed positions are frozen.
    async fn add_order(&self, position_id: &str, order: Order) -> Result<Position>;

    /// Transitions the position to closed. Terminal and one-directional.
    async fn close_position(
        &self,
        position_id: &str,
        date_closed: DateTime<Utc>,
    ) -> Result<Position>;

    fn get_position(&self, position_id: &str) -> Result<Position>;

    fn list_positions(&self, portfolio_id: &str) -> Result<Vec<Position>>;
}

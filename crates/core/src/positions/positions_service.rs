use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;

use super::positions_model::{Order, Position};
use super::positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
use crate::errors::Result;

/// Service for managing position lifecycle.
pub struct PositionService {
    repository: Arc<dyn PositionRepositoryTrait>,
}

impl PositionService {
    pub fn new(repository: Arc<dyn PositionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    async fn create_position(&self, position: Position) -> Result<Position> {
        position.validate()?;
        debug!(
            "Creating position {} in portfolio {}",
            position.id, position.portfolio
        );
        self.repository.create(position).await
    }

    async fn add_order(&self, position_id: &str, order: Order) -> Result<Position> {
        let mut position = self.repository.get_by_id(position_id)?;
        position.add_order(order)?;
        self.repository.update(position).await
    }

    async fn close_position(
        &self,
        position_id: &str,
        date_closed: DateTime<Utc>,
    ) -> Result<Position> {
        let mut position = self.repository.get_by_id(position_id)?;
        position.close(date_closed)?;
        debug!("Closed position {}", position_id);
        self.repository.update(position).await
    }

    fn get_position(&self, position_id: &str) -> Result<Position> {
        self.repository.get_by_id(position_id)
    }

    fn list_positions(&self, portfolio_id: &str) -> Result<Vec<Position>> {
        self.repository.list_by_portfolio(portfolio_id)
    }
}

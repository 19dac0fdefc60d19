use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;

use coinfolio_core::errors::{PositionError, Result};
use coinfolio_core::positions::{Position, PositionRepositoryTrait};

/// In-memory position store. Single-key operations only, so a concurrent
/// map is enough; no cross-record ordering is required here.
#[derive(Default)]
pub struct MemoryPositionRepository {
    positions: DashMap<String, Position>,
}

impl MemoryPositionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PositionRepositoryTrait for MemoryPositionRepository {
    async fn create(&self, position: Position) -> Result<Position> {
        self.positions.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    async fn update(&self, position: Position) -> Result<Position> {
        if !self.positions.contains_key(&position.id) {
            return Err(PositionError::NotFound(position.id.clone()).into());
        }
        self.positions.insert(position.id.clone(), position.clone());
        Ok(position)
    }

    async fn delete(&self, position_id: &str) -> Result<usize> {
        Ok(self.positions.remove(position_id).map_or(0, |_| 1))
    }

    async fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let ids: Vec<String> = self
            .positions
            .iter()
            .filter(|entry| entry.value().portfolio == portfolio_id)
            .map(|entry| entry.key().clone())
            .collect();
        for id in &ids {
            self.positions.remove(id);
        }
        debug!(
            "Removed {} positions for portfolio {}",
            ids.len(),
            portfolio_id
        );
        Ok(ids.len())
    }

    fn get_by_id(&self, position_id: &str) -> Result<Position> {
        self.positions
            .get(position_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PositionError::NotFound(position_id.to_string()).into())
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Position>> {
        let mut positions: Vec<Position> = self
            .positions
            .iter()
            .filter(|entry| entry.value().portfolio == portfolio_id)
            .map(|entry| entry.value().clone())
            .collect();
        // Deterministic listing order for consumers that sort stably on top.
        positions.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(positions)
    }
}

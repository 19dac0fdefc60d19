use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use uuid::Uuid;

use coinfolio_core::errors::{Error, PortfolioError, Result};
use coinfolio_core::portfolios::{
    NewPortfolio, Portfolio, PortfolioRepositoryTrait, PortfolioUpdate,
};

/// In-memory portfolio store.
///
/// Pin switches touch two records, so the whole map sits behind one
/// `RwLock`: the unpin-then-pin sequence commits under a single write
/// guard and readers can never observe zero or two pinned portfolios for
/// a user.
#[derive(Default)]
pub struct MemoryPortfolioRepository {
    portfolios: RwLock<HashMap<String, Portfolio>>,
}

impl MemoryPortfolioRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> Error {
        Error::Repository("portfolio store lock poisoned".to_string())
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for MemoryPortfolioRepository {
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        let now = Utc::now();
        let portfolio = Portfolio {
            id: new_portfolio
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_portfolio.name,
            user_id: new_portfolio.user_id,
            total_value: Decimal::ZERO,
            is_pinned: false,
            created_at: now,
            updated_at: now,
            day_change: None,
            day_change_percent: None,
            top_holdings: None,
            base_currency: new_portfolio.base_currency,
            risk_profile: new_portfolio.risk_profile,
            target_allocations: new_portfolio.target_allocations,
            initial_investment: new_portfolio.initial_investment,
            is_public: new_portfolio.is_public,
        };

        let mut portfolios = self.portfolios.write().map_err(|_| Self::lock_poisoned())?;
        portfolios.insert(portfolio.id.clone(), portfolio.clone());
        debug!("Created portfolio {} ({})", portfolio.id, portfolio.name);
        Ok(portfolio)
    }

    async fn update(&self, update: PortfolioUpdate) -> Result<Portfolio> {
        let mut portfolios = self.portfolios.write().map_err(|_| Self::lock_poisoned())?;
        let portfolio = portfolios
            .get_mut(&update.id)
            .ok_or_else(|| PortfolioError::NotFound(update.id.clone()))?;

        if let Some(name) = update.name {
            portfolio.name = name;
        }
        if let Some(total_value) = update.total_value {
            portfolio.total_value = total_value;
        }
        portfolio.day_change = update.day_change.or(portfolio.day_change);
        portfolio.day_change_percent = update.day_change_percent.or(portfolio.day_change_percent);
        if let Some(top_holdings) = update.top_holdings {
            portfolio.top_holdings = Some(top_holdings);
        }
        if let Some(base_currency) = update.base_currency {
            portfolio.base_currency = Some(base_currency);
        }
        if let Some(risk_profile) = update.risk_profile {
            portfolio.risk_profile = Some(risk_profile);
        }
        if let Some(target_allocations) = update.target_allocations {
            portfolio.target_allocations = Some(target_allocations);
        }
        if let Some(initial_investment) = update.initial_investment {
            portfolio.initial_investment = Some(initial_investment);
        }
        if let Some(is_public) = update.is_public {
            portfolio.is_public = Some(is_public);
        }
        portfolio.updated_at = Utc::now();

        Ok(portfolio.clone())
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let mut portfolios = self.portfolios.write().map_err(|_| Self::lock_poisoned())?;
        Ok(portfolios.remove(portfolio_id).map_or(0, |_| 1))
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let portfolios = self.portfolios.read().map_err(|_| Self::lock_poisoned())?;
        portfolios
            .get(portfolio_id)
            .cloned()
            .ok_or_else(|| PortfolioError::NotFound(portfolio_id.to_string()).into())
    }

    fn list_by_user(&self, user_id: &str) -> Result<Vec<Portfolio>> {
        let portfolios = self.portfolios.read().map_err(|_| Self::lock_poisoned())?;
        let mut list: Vec<Portfolio> = portfolios
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn set_pinned(&self, user_id: &str, portfolio_id: &str) -> Result<Portfolio> {
        let mut portfolios = self.portfolios.write().map_err(|_| Self::lock_poisoned())?;

        match portfolios.get(portfolio_id) {
            Some(p) if p.user_id == user_id => {}
            _ => return Err(PortfolioError::NotFound(portfolio_id.to_string()).into()),
        }

        // A double pin means an earlier switch was applied non-atomically
        // by some other writer. Surface it instead of papering over it.
        let pinned_count = portfolios
            .values()
            .filter(|p| p.user_id == user_id && p.is_pinned)
            .count();
        if pinned_count > 1 {
            return Err(PortfolioError::PinnedPortfolioConflict {
                user_id: user_id.to_string(),
                pinned_count,
            }
            .into());
        }

        // Unpin-then-pin under the same write guard: one atomic unit.
        let now = Utc::now();
        for portfolio in portfolios
            .values_mut()
            .filter(|p| p.user_id == user_id)
        {
            let pin = portfolio.id == portfolio_id;
            if portfolio.is_pinned != pin {
                portfolio.is_pinned = pin;
                portfolio.updated_at = now;
            }
        }

        portfolios
            .get(portfolio_id)
            .cloned()
            .ok_or_else(|| PortfolioError::NotFound(portfolio_id.to_string()).into())
    }

    fn get_pinned(&self, user_id: &str) -> Result<Option<Portfolio>> {
        let portfolios = self.portfolios.read().map_err(|_| Self::lock_poisoned())?;
        Ok(portfolios
            .values()
            .find(|p| p.user_id == user_id && p.is_pinned)
            .cloned())
    }
}

//! Provider serving the static catalog with simulated latency

use super::traits::{ProviderError, ReportDataProvider};
use crate::catalog::{Catalog, Department, IssueTypeOption};
use async_trait::async_trait;
use std::time::Duration;

/// Serves departments and issue types from a [`Catalog`] after a fixed delay,
/// standing in for network calls of the same shape.
pub struct CatalogProvider {
    catalog: Catalog,
    delay: Duration,
}

impl CatalogProvider {
    /// Default simulated latency
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(catalog: Catalog, delay: Duration) -> Self {
        Self { catalog, delay }
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ReportDataProvider for CatalogProvider {
    async fn load_departments(&self) -> Result<Vec<Department>, ProviderError> {
        self.simulate_latency().await;
        Ok(self.catalog.departments())
    }

    async fn load_issue_types(
        &self,
        department: &Department,
    ) -> Result<Vec<IssueTypeOption>, ProviderError> {
        self.simulate_latency().await;
        self.catalog
            .issue_types(department)
            .map(<[IssueTypeOption]>::to_vec)
            .ok_or_else(|| ProviderError::UnknownDepartment(department.id().to_string()))
    }
}

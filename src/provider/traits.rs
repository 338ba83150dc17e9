//! Trait abstraction for data providers to enable mocking in tests

use crate::catalog::{Department, IssueTypeOption};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("unknown department {0}")]
    UnknownDepartment(String),
    /// Reported by network-backed providers
    #[allow(dead_code)]
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

/// Source of the department list and the per-department issue types.
///
/// Implementations may be slow; callers run them off the UI loop.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportDataProvider: Send + Sync {
    /// Load the enumerated department set, in display order
    async fn load_departments(&self) -> Result<Vec<Department>, ProviderError>;

    /// Load the issue types scoped to a department, in display order
    async fn load_issue_types(
        &self,
        department: &Department,
    ) -> Result<Vec<IssueTypeOption>, ProviderError>;
}

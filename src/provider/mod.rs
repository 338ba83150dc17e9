//! Data providers feeding the report form

mod catalog_provider;
mod traits;

pub use catalog_provider::CatalogProvider;
pub use traits::{ProviderError, ReportDataProvider};

#[cfg(test)]
pub use traits::MockReportDataProvider;

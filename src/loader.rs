//! Background loading of provider data
//!
//! Every request runs on its own task and reports back over a channel that the
//! UI loop drains between frames. Each event carries the ticket of the request
//! that produced it, so the form can drop results overtaken by a newer request.

use crate::catalog::{Department, IssueTypeOption};
use crate::provider::{ProviderError, ReportDataProvider};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Identifies one load request; later requests get larger tickets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

#[cfg(test)]
impl LoadTicket {
    pub(crate) fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

/// Completion of a load request
#[derive(Debug)]
pub enum LoadEvent {
    Departments {
        ticket: LoadTicket,
        result: Result<Vec<Department>, ProviderError>,
    },
    IssueTypes {
        ticket: LoadTicket,
        department: Department,
        result: Result<Vec<IssueTypeOption>, ProviderError>,
    },
}

/// Spawns provider calls and hands out tickets
pub struct Loader {
    provider: Arc<dyn ReportDataProvider>,
    tx: mpsc::UnboundedSender<LoadEvent>,
    next_ticket: u64,
}

impl Loader {
    pub fn new(
        provider: Arc<dyn ReportDataProvider>,
    ) -> (Self, mpsc::UnboundedReceiver<LoadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let loader = Self {
            provider,
            tx,
            next_ticket: 0,
        };
        (loader, rx)
    }

    fn issue_ticket(&mut self) -> LoadTicket {
        self.next_ticket += 1;
        LoadTicket(self.next_ticket)
    }

    /// Start loading the department list
    pub fn request_departments(&mut self) -> LoadTicket {
        let ticket = self.issue_ticket();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tracing::debug!(?ticket, "loading departments");

        tokio::spawn(async move {
            let result = provider.load_departments().await;
            // Send only fails once the app has shut down
            let _ = tx.send(LoadEvent::Departments { ticket, result });
        });

        ticket
    }

    /// Start loading the issue types for `department`
    pub fn request_issue_types(&mut self, department: Department) -> LoadTicket {
        let ticket = self.issue_ticket();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tracing::debug!(?ticket, department = %department, "loading issue types");

        tokio::spawn(async move {
            let result = provider.load_issue_types(&department).await;
            let _ = tx.send(LoadEvent::IssueTypes {
                ticket,
                department,
                result,
            });
        });

        ticket
    }
}

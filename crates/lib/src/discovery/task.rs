//! Scheduling a discovery operation on an [`OperationQueue`](crate::task::OperationQueue).

use std::sync::Arc;

use async_trait::async_trait;

use super::{DiscoveryOutcome, UserDiscoveryOperation};
use crate::{
    task::{CancelToken, Operation},
    transport::DiscoveryTransport,
};

/// What a scheduled discovery produces.
#[derive(Debug)]
pub struct DiscoveryReport {
    /// The terminal outcome
    pub outcome: DiscoveryOutcome,
    /// Total number of matches, when requested and reported
    pub overall_count: Option<u64>,
}

/// A discovery operation bound to the transport it will run against.
pub struct DiscoveryTask {
    operation: UserDiscoveryOperation,
    transport: Arc<dyn DiscoveryTransport>,
}

impl DiscoveryTask {
    pub fn new(operation: UserDiscoveryOperation, transport: Arc<dyn DiscoveryTransport>) -> Self {
        Self {
            operation,
            transport,
        }
    }
}

impl UserDiscoveryOperation {
    /// Bind this operation to a transport so it can be queued.
    pub fn into_task(self, transport: Arc<dyn DiscoveryTransport>) -> DiscoveryTask {
        DiscoveryTask::new(self, transport)
    }
}

#[async_trait]
impl Operation for DiscoveryTask {
    type Output = DiscoveryReport;

    fn name(&self) -> &'static str {
        "user_discovery"
    }

    async fn run(&mut self, cancel: &CancelToken) -> DiscoveryReport {
        let outcome = self
            .operation
            .execute(self.transport.as_ref(), cancel)
            .await;
        DiscoveryReport {
            outcome,
            overall_count: self.operation.overall_count(),
        }
    }
}

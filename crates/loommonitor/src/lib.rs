//! Execution-test monitoring for the loom workflow editor
//!
//! Starts a test run against the external execution service and consumes
//! its live status stream into a read-only view. The service owns the
//! execution; this crate only watches it. The status channel gets bounded
//! reconnects with backoff; the run itself is never retried from here.

mod execution;
mod monitor;
mod service;
mod view;

pub use execution::{
    Execution, ExecutionId, ExecutionLogEntry, ExecutionStatus, LogLevel, StatusEvent,
};
pub use monitor::{ExecutionHandle, ExecutionMonitor, MonitorError, RetryPolicy};
pub use service::{ExecutionService, ServiceError, StatusStream};
pub use view::ExecutionView;

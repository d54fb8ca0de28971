//! Execution contexts.
//!
//! - [`Executor`]: anything work can be posted onto (never runs it inline)
//! - [`Strand`]: serial FIFO context driven by one tokio task
//! - [`StrandTask`]: handle to a future hosted on a strand ([`Strand::spawn`])
//! - [`StrandConfig`]: strand settings
//! - [`current_executor`]: the caller's strand or runtime, used when no context is given

mod config;
#[allow(clippy::module_inception)]
mod executor;
mod strand;
mod task;

pub use config::StrandConfig;
pub use executor::{current_executor, Executor, ExecutorRef, Work};
pub use strand::Strand;
pub use task::{StrandClosed, StrandTask};

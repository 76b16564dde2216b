//! Read-through orchestration of cacheable members

mod memoized;
#[allow(clippy::module_inception)]
mod orchestrator;

pub use memoized::MemoizedMethod;
pub use orchestrator::{CacheOrchestrator, InvalidationTarget};

//! Store drivers, registry and orchestration

pub mod cache;
pub mod invoker;
pub mod logging;
pub mod orchestrator;
pub mod registry;

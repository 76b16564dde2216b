//! Invoker implementations

mod container;

pub use container::InstanceContainer;

//! Ports (trait boundaries) for external dependencies.
//!
//! The interfaces between the solver core and infrastructure. The traits are
//! owned by the domain and implemented by adapters in the adapters module.

pub mod repository;

pub use repository::PolicyRepository;

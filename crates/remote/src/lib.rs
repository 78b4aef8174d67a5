//! Access to the external REST collaborator that stores projects, tasks and
//! users.
//!
//! - [`backend`]: one trait per collection, mockable under `test-utils`
//! - [`client::RestClient`]: the reqwest implementation used in production
//! - `memory::InMemoryBackend`: a network-free implementation for tests

pub mod backend;
pub mod client;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use backend::{HealthProbe, ProjectBackend, TaskBackend, UserBackend};
pub use client::RestClient;

#[cfg(any(test, feature = "test-utils"))]
pub use backend::{MockHealthProbe, MockProjectBackend, MockTaskBackend, MockUserBackend};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryBackend;

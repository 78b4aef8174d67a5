//! User Service Library
//!
//! This crate provides the user directory used by managers to administer
//! accounts, and the profile operations available to every signed-in user.

pub mod service;

pub use crate::service::{
    PasswordChange, ProfileManager, ProfileService, UserDirectory, UserService,
};

#[cfg(any(test, feature = "test-utils"))]
pub use crate::service::{MockProfileService, MockUserService};

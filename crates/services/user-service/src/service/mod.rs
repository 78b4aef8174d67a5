mod profile;
mod user_directory;

pub use profile::{PasswordChange, ProfileManager, ProfileService};
pub use user_directory::{UserDirectory, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use profile::MockProfileService;
#[cfg(any(test, feature = "test-utils"))]
pub use user_directory::MockUserService;

//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::{SessionService, SessionStorage, SessionStore};
use board_service_lib::{BoardService, ProjectBoard};
use common::EmailLock;
use remote::{HealthProbe, ProjectBackend, TaskBackend, UserBackend};
use user_service_lib::{ProfileManager, ProfileService, UserDirectory, UserService};

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionService>,
    pub users: Arc<dyn UserService>,
    pub profiles: Arc<dyn ProfileService>,
    pub board: Arc<dyn BoardService>,
    pub probe: Arc<dyn HealthProbe>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Wire every service to one backend that serves all three collections.
    ///
    /// The session store and the user directory share one [`EmailLock`], so a
    /// registration and a manager's add cannot both claim an email.
    pub fn from_backend<B>(
        backend: Arc<B>,
        storage: Arc<dyn SessionStorage>,
        config: GatewayConfig,
    ) -> Self
    where
        B: UserBackend + ProjectBackend + TaskBackend + HealthProbe + 'static,
    {
        let users: Arc<dyn UserBackend> = backend.clone();
        let projects: Arc<dyn ProjectBackend> = backend.clone();
        let tasks: Arc<dyn TaskBackend> = backend.clone();
        let email_lock = EmailLock::new();

        Self {
            sessions: Arc::new(
                SessionStore::new(users.clone(), storage).with_email_lock(email_lock.clone()),
            ),
            users: Arc::new(UserDirectory::new(users.clone()).with_email_lock(email_lock)),
            profiles: Arc::new(ProfileManager::new(users.clone())),
            board: Arc::new(ProjectBoard::new(projects, tasks, users)),
            probe: backend,
            config,
        }
    }
}

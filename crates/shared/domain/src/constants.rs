//! Domain-level constants.
//!
//! These constants define business rules and wire vocabulary shared with the
//! external REST collaborator.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_USUARIO: &str = "usuario";

/// Manager role: creates projects and tasks, manages users
pub const ROLE_GERENTE: &str = "gerente";

// =============================================================================
// Task Vocabulary
// =============================================================================

pub const STATUS_PENDIENTE: &str = "pendiente";
pub const STATUS_EN_PROGRESO: &str = "en progreso";
pub const STATUS_FINALIZADO: &str = "finalizado";

pub const PRIORITY_BAJA: &str = "baja";
pub const PRIORITY_MEDIA: &str = "media";
pub const PRIORITY_ALTA: &str = "alta";

// =============================================================================
// Project Status Labels
// =============================================================================

pub const PROJECT_SIN_INICIAR: &str = "sin iniciar";
pub const PROJECT_EN_PROGRESO: &str = "en progreso";
pub const PROJECT_COMPLETADO: &str = "completado";

// =============================================================================
// Dashboard
// =============================================================================

/// Number of completed tasks listed on the dashboard
pub const LATEST_DONE_LIMIT: usize = 5;

/// Project name shown when a task references a project that no longer exists
pub const UNKNOWN_PROJECT_NAME: &str = "Proyecto desconocido";

/// Assignee name shown when a task's user cannot be found
pub const UNASSIGNED_NAME: &str = "No asignado";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

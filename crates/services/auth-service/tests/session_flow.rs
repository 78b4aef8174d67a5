//! Register, sign out and sign back in through the public API.

use std::sync::Arc;

use auth_service_lib::{
    MemorySessionStorage, Registration, SessionService, SessionStore,
};
use domain::{AccessGuard, GuardDecision, Role, Route};
use remote::InMemoryBackend;
use tokio_test::assert_ok;

#[tokio::test]
async fn registered_user_can_log_back_in_and_is_guarded_by_role() {
    let backend = Arc::new(InMemoryBackend::new());
    let store = SessionStore::new(backend, Arc::new(MemorySessionStorage::new()));

    let issued = assert_ok!(
        store
            .register(Registration {
                name: "Marta".into(),
                email: "marta@example.com".into(),
                password: "largo-y-seguro".into(),
                role: Role::Usuario,
            })
            .await
    );
    assert_ok!(store.logout(&issued.token).await);
    assert!(!assert_ok!(store.is_authenticated(&issued.token).await));

    let again = assert_ok!(store.login("MARTA@example.com", "largo-y-seguro").await);
    assert_ne!(again.token, issued.token);

    let state = assert_ok!(store.resolve(&again.token).await);
    assert_eq!(
        AccessGuard::evaluate(state.clone(), Some(Role::Gerente)),
        GuardDecision::Redirect(Route::Dashboard)
    );
    assert!(AccessGuard::evaluate(state, None).is_allowed());
}

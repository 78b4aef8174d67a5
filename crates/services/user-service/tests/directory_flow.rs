//! Directory and profile working over the same users collection.

use std::sync::Arc;

use domain::{NewUser, Role, UserChanges};
use remote::InMemoryBackend;
use tokio_test::{assert_err, assert_ok};
use user_service_lib::{
    PasswordChange, ProfileManager, ProfileService, UserDirectory, UserService,
};

#[tokio::test]
async fn manager_created_user_can_change_own_password() {
    let backend = Arc::new(InMemoryBackend::new());
    let directory = UserDirectory::new(backend.clone());
    let profiles = ProfileManager::new(backend);

    let user = assert_ok!(
        directory
            .add(NewUser {
                name: "Pablo".into(),
                email: "pablo@example.com".into(),
                password: "temporal-123".into(),
                role: Role::Usuario,
            })
            .await
    );

    assert_ok!(
        profiles
            .change_password(
                &user.id,
                PasswordChange {
                    current: "temporal-123".into(),
                    new: "definitiva-456".into(),
                    confirm: "definitiva-456".into(),
                },
            )
            .await
    );

    // A later edit without a password must not reset the new one.
    let edited = assert_ok!(
        directory
            .update(
                &user.id,
                UserChanges {
                    name: "Pablo R.".into(),
                    email: "pablo@example.com".into(),
                    password: None,
                    role: Role::Usuario,
                },
            )
            .await
    );
    assert_eq!(edited.name, "Pablo R.");

    assert_err!(
        profiles
            .change_password(
                &user.id,
                PasswordChange {
                    current: "temporal-123".into(),
                    new: "otra-mas-789".into(),
                    confirm: "otra-mas-789".into(),
                },
            )
            .await
    );
}

//! Managers adding the same account at once.

use std::sync::Arc;

use common::AppError;
use domain::{NewUser, Role};
use remote::InMemoryBackend;
use user_service_lib::{UserDirectory, UserService};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_store_one_account_per_email() {
    let backend = Arc::new(InMemoryBackend::new());
    let directory = Arc::new(UserDirectory::new(backend.clone()));

    let handles: Vec<_> = ["sofia@example.com", "SOFIA@example.com", "Sofia@Example.com"]
        .into_iter()
        .map(|email| {
            let directory = directory.clone();
            tokio::spawn(async move {
                directory
                    .add(NewUser {
                        name: "Sofía".into(),
                        email: email.into(),
                        password: "temporal-123".into(),
                        role: Role::Usuario,
                    })
                    .await
            })
        })
        .collect();

    let mut added = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => added += 1,
            Err(AppError::DuplicateEmail(_)) => {}
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(added, 1);
    assert_eq!(backend.user_snapshot().await.len(), 1);
    assert_eq!(directory.users().await.len(), 1);
}

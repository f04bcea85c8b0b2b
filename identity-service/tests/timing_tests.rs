mod common;

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use identity_service::domain::identity::models::AuthenticationOutcome;
use identity_service::domain::identity::models::LoginCommand;
use identity_service::domain::identity::models::RegisterCommand;
use identity_service::domain::identity::models::RejectionReason;
use identity_service::domain::identity::ports::IdentityServicePort;
use identity_service::outbound::repositories::InMemoryIdentityRepository;

const TRIALS: usize = 30;

async fn mean_duration<S: IdentityServicePort>(service: &S, identifier: &str) -> Duration {
    let mut total = Duration::ZERO;
    for _ in 0..TRIALS {
        let started = Instant::now();
        let outcome = service
            .authenticate(LoginCommand::new(identifier, "wrongsecret"))
            .await
            .expect("Authentication should not fault");
        total += started.elapsed();

        assert_eq!(
            outcome,
            AuthenticationOutcome::Rejected(RejectionReason::InvalidCredentials)
        );
    }
    total / TRIALS as u32
}

#[tokio::test]
async fn test_unknown_identifier_costs_the_same_as_wrong_secret() {
    let service = common::identity_service(Arc::new(InMemoryIdentityRepository::new()));
    service
        .register(RegisterCommand::new("a@x.com", "correcthorse1"))
        .await
        .expect("Registration failed");

    // Warm up both paths
    mean_duration(&service, "a@x.com").await;
    mean_duration(&service, "nobody@x.com").await;

    let wrong_secret = mean_duration(&service, "a@x.com").await;
    let unknown = mean_duration(&service, "nobody@x.com").await;

    let ratio = wrong_secret.as_secs_f64() / unknown.as_secs_f64();
    assert!(
        (0.5..2.0).contains(&ratio),
        "wrong secret took {:?}, unknown identifier took {:?}",
        wrong_secret,
        unknown
    );
}

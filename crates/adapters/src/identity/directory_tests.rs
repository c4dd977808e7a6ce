// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

const CA: &str = "/DC=org/CN=Test CA";

fn resolver() -> DirectoryResolver {
    let config = Config::parse(
        r#"
apps = ["detox"]

[[users]]
id = 10
name = "alice"
subject = "/CN=alice"
issuer = "/DC=org/CN=Test CA"
authorized = true

[[users]]
id = 11
name = "robot"
subject = "/CN=robot"
issuer = "/DC=org/CN=Test CA"
authorized = true
can_impersonate = true

[[users]]
id = 12
name = "guest"
subject = "/CN=guest"
issuer = "/DC=org/CN=Test CA"

[[services]]
id = 2
name = "dynamo"
"#,
    )
    .unwrap();
    DirectoryResolver::from_config(&config)
}

#[tokio::test]
async fn resolves_interactive_user() {
    let identity = resolver()
        .resolve(&Credential::new("/CN=alice", CA))
        .await
        .unwrap();
    assert_eq!(
        identity,
        ClientIdentity::new(10, "alice", 1, "user").with_authorized(true)
    );
    assert!(identity.is_interactive());
}

#[tokio::test]
async fn resolves_configured_service() {
    let identity = resolver()
        .resolve(&Credential::new("/CN=alice", CA).with_service("dynamo"))
        .await
        .unwrap();
    assert_eq!(identity.service_id.0, 2);
    assert_eq!(identity.service_name, "dynamo");
}

#[tokio::test]
async fn unauthorized_user_resolves_without_authorization() {
    let identity = resolver()
        .resolve(&Credential::new("/CN=guest", CA))
        .await
        .unwrap();
    assert!(!identity.authorized);
}

#[parameterized(
    unknown_subject = { Credential::new("/CN=mallory", CA) },
    wrong_issuer = { Credential::new("/CN=alice", "/CN=Other CA") },
    unknown_service = { Credential::new("/CN=alice", CA).with_service("cron") },
    impersonation_not_allowed = { Credential::new("/CN=alice", CA).with_as_user("guest") },
    unknown_target = { Credential::new("/CN=robot", CA).with_as_user("nobody") },
)]
fn rejected_credentials(credential: Credential) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let result = rt.block_on(resolver().resolve(&credential));
    assert_eq!(result, Err(IdentityError::UnknownUser));
}

#[tokio::test]
async fn impersonation_takes_target_identity() {
    let identity = resolver()
        .resolve(
            &Credential::new("/CN=robot", CA)
                .with_service("dynamo")
                .with_as_user("guest"),
        )
        .await
        .unwrap();
    assert_eq!(identity.user_id.0, 12);
    assert_eq!(identity.user_name, "guest");
    assert_eq!(identity.service_name, "dynamo");
    assert!(!identity.authorized);
}

// End-to-end authorization tests: the token round-trip, the route
// guard's decision table and the central policy all working off the
// same session data.

mod common;

use common::session_with_role;
use gymdesk_backend::auth::{decide, route_decision, Action, Role, RouteDecision};
use gymdesk_backend::services::TokenService;
use gymdesk_backend::types::internal::Session;

const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

fn round_trip(session: &Session) -> Session {
    let tokens = TokenService::new(TEST_SECRET.to_string());
    let token = tokens.issue_session(session).unwrap();
    let claims = tokens.validate_session(&token).unwrap();
    Session::from_claims(claims).unwrap()
}

#[tokio::test]
async fn trainer_token_is_redirected_off_restricted_prefixes() {
    let trainer = round_trip(&session_with_role(Role::Trainer));

    for path in ["/billing", "/reports", "/leads"] {
        assert_eq!(
            route_decision(path, Some(&trainer)),
            RouteDecision::RedirectHome,
            "trainer must never reach {path}"
        );
    }

    // The same session still reaches its own surfaces.
    assert_eq!(route_decision("/members", Some(&trainer)), RouteDecision::Allow);
    assert_eq!(route_decision("/workouts", Some(&trainer)), RouteDecision::Allow);
}

#[tokio::test]
async fn missing_session_redirects_to_login_everywhere_but_auth_pages() {
    for path in ["/", "/members", "/staff", "/billing/payments"] {
        assert_eq!(route_decision(path, None), RouteDecision::RedirectLogin);
    }
    assert_eq!(route_decision("/login", None), RouteDecision::Allow);
    assert_eq!(route_decision("/api/public/health", None), RouteDecision::Allow);
}

#[tokio::test]
async fn present_session_is_bounced_off_login() {
    let session = round_trip(&session_with_role(Role::Admin));
    assert_eq!(route_decision("/login", Some(&session)), RouteDecision::RedirectHome);
}

#[tokio::test]
async fn policy_decisions_survive_the_token_round_trip() {
    let receptionist = round_trip(&session_with_role(Role::Receptionist));
    assert!(decide(
        receptionist.role,
        &receptionist.permissions,
        Action::CreatePayment
    ));
    assert!(!decide(
        receptionist.role,
        &receptionist.permissions,
        Action::ManageStaff
    ));

    let trainer = round_trip(&session_with_role(Role::Trainer));
    assert!(!decide(trainer.role, &trainer.permissions, Action::ViewBilling));
    assert!(decide(trainer.role, &trainer.permissions, Action::ManageWorkouts));
}

#[tokio::test]
async fn permissions_are_frozen_at_issue_time() {
    // A CUSTOM-role session carries whatever set it was issued with;
    // later edits to the user record do not reach this token.
    let mut session = session_with_role(Role::Custom);
    session.permissions = vec![gymdesk_backend::auth::Permission::ViewBilling];

    let restored = round_trip(&session);
    assert!(decide(restored.role, &restored.permissions, Action::ViewBilling));
    assert!(!decide(restored.role, &restored.permissions, Action::ViewMembers));
}

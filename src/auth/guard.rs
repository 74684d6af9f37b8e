use std::sync::Arc;

use poem::http::{header, StatusCode};
use poem::{Endpoint, IntoResponse, Middleware, Request, Response};

use crate::auth::Role;
use crate::services::TokenService;
use crate::types::internal::Session;

/// Name of the session cookie carrying the signed JWT.
pub const SESSION_COOKIE: &str = "session";

const PUBLIC_API_PREFIX: &str = "/api/public";
const AUTH_PAGES: &[&str] = &["/login", "/register"];
const ADMIN_PREFIXES: &[&str] = &["/settings", "/staff"];
const TRAINER_RESTRICTED: &[&str] = &["/billing", "/reports", "/leads"];

/// Outcome of the guard for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectHome,
    RedirectLogin,
}

/// The guard's decision table, evaluated in order with first match wins.
/// Pure over (path, session) so it can be exercised without HTTP.
pub fn route_decision(path: &str, session: Option<&Session>) -> RouteDecision {
    if path.starts_with(PUBLIC_API_PREFIX) {
        return RouteDecision::Allow;
    }

    let is_auth_page = AUTH_PAGES.iter().any(|p| path.starts_with(p));

    if is_auth_page && session.is_some() {
        return RouteDecision::RedirectHome;
    }
    if !is_auth_page && session.is_none() {
        return RouteDecision::RedirectLogin;
    }

    let role = session.map(|s| s.role);

    // Admin-only prefixes: the check is literally role == ADMIN.
    if ADMIN_PREFIXES.iter().any(|p| path.starts_with(p)) && role != Some(Role::Admin) {
        return RouteDecision::RedirectHome;
    }

    if role == Some(Role::Trainer) && TRAINER_RESTRICTED.iter().any(|p| path.starts_with(p)) {
        return RouteDecision::RedirectHome;
    }

    RouteDecision::Allow
}

/// Extract the raw session cookie value from the Cookie header, if any.
fn session_cookie(req: &Request) -> Option<&str> {
    let raw = req.headers().get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(|value| value.trim())
}

/// Resolve the session for a request. An absent, malformed, expired or
/// unparseable token all collapse to "no session" - the guard redirects,
/// it never errors.
pub fn resolve_session(tokens: &TokenService, req: &Request) -> Option<Session> {
    let value = session_cookie(req)?;
    let claims = tokens.validate_session(value).ok()?;
    Session::from_claims(claims)
}

/// Middleware applying the decision table before any handler runs.
pub struct SessionGuard {
    tokens: Arc<TokenService>,
}

impl SessionGuard {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<E: Endpoint> Middleware<E> for SessionGuard {
    type Output = SessionGuardEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        SessionGuardEndpoint {
            inner: ep,
            tokens: self.tokens.clone(),
        }
    }
}

pub struct SessionGuardEndpoint<E> {
    inner: E,
    tokens: Arc<TokenService>,
}

impl<E: Endpoint> Endpoint for SessionGuardEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let session = resolve_session(&self.tokens, &req);

        match route_decision(req.uri().path(), session.as_ref()) {
            RouteDecision::Allow => {
                let resp = self.inner.call(req).await?;
                Ok(resp.into_response())
            }
            RouteDecision::RedirectHome => Ok(redirect_to("/")),
            RouteDecision::RedirectLogin => Ok(redirect_to("/login")),
        }
    }
}

fn redirect_to(location: &str) -> Response {
    Response::builder()
        .status(StatusCode::FOUND)
        .header(header::LOCATION, location)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Permission;

    fn session_with_role(role: Role) -> Session {
        Session {
            user_id: "u-1".to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
            permissions: Vec::new(),
            avatar: None,
        }
    }

    #[test]
    fn public_api_is_always_allowed() {
        assert_eq!(route_decision("/api/public/health", None), RouteDecision::Allow);
        let admin = session_with_role(Role::Admin);
        assert_eq!(
            route_decision("/api/public/health", Some(&admin)),
            RouteDecision::Allow
        );
    }

    #[test]
    fn logged_in_users_are_bounced_off_auth_pages() {
        let session = session_with_role(Role::Receptionist);
        assert_eq!(route_decision("/login", Some(&session)), RouteDecision::RedirectHome);
        assert_eq!(route_decision("/register", Some(&session)), RouteDecision::RedirectHome);
    }

    #[test]
    fn anonymous_requests_redirect_to_login() {
        for path in ["/", "/members", "/leads/abc/edit", "/api/notifications/check"] {
            assert_eq!(route_decision(path, None), RouteDecision::RedirectLogin);
        }
    }

    #[test]
    fn anonymous_requests_may_visit_auth_pages() {
        assert_eq!(route_decision("/login", None), RouteDecision::Allow);
        assert_eq!(route_decision("/register", None), RouteDecision::Allow);
    }

    #[test]
    fn admin_prefixes_require_exactly_the_admin_role() {
        let admin = session_with_role(Role::Admin);
        let super_admin = session_with_role(Role::SuperAdmin);
        let receptionist = session_with_role(Role::Receptionist);

        assert_eq!(route_decision("/settings", Some(&admin)), RouteDecision::Allow);
        assert_eq!(route_decision("/staff/new", Some(&admin)), RouteDecision::Allow);
        // SUPER_ADMIN is redirected too: the table matches ADMIN literally.
        assert_eq!(
            route_decision("/settings", Some(&super_admin)),
            RouteDecision::RedirectHome
        );
        assert_eq!(
            route_decision("/staff", Some(&receptionist)),
            RouteDecision::RedirectHome
        );
    }

    #[test]
    fn trainers_are_redirected_off_restricted_prefixes() {
        let trainer = session_with_role(Role::Trainer);
        for path in ["/billing", "/billing/payments/new", "/reports", "/leads", "/leads/x/edit"] {
            assert_eq!(
                route_decision(path, Some(&trainer)),
                RouteDecision::RedirectHome,
                "trainer should be redirected from {path}"
            );
        }
        assert_eq!(route_decision("/members", Some(&trainer)), RouteDecision::Allow);
        assert_eq!(route_decision("/workouts", Some(&trainer)), RouteDecision::Allow);
    }

    #[test]
    fn other_roles_reach_restricted_prefixes() {
        let receptionist = Session {
            permissions: vec![Permission::ViewBilling],
            ..session_with_role(Role::Receptionist)
        };
        assert_eq!(route_decision("/billing", Some(&receptionist)), RouteDecision::Allow);
        assert_eq!(route_decision("/leads", Some(&receptionist)), RouteDecision::Allow);
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        // An anonymous request to /settings hits rule 3 (login redirect),
        // not the admin rule.
        assert_eq!(route_decision("/settings", None), RouteDecision::RedirectLogin);
    }
}

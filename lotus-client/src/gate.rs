//! Role-based access gate
//!
//! Pure decision over the current session and the roles a page requires.

use shared::Session;
use shared::models::Role;

use crate::nav::{AppRoute, LOGIN_PATH, home_route};

/// Outcome of an access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render the protected content
    Allow,
    /// No session: go to the login page, then come back to `return_to`
    RedirectToLogin { return_to: String },
    /// Wrong role: go to the role's landing page
    RedirectHome { path: &'static str },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Where to navigate, `None` when allowed
    pub fn redirect_path(&self) -> Option<&str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToLogin { .. } => Some(LOGIN_PATH),
            AccessDecision::RedirectHome { path } => Some(*path),
        }
    }
}

/// Decide whether `session` may open `requested_path` guarded by `required`
pub fn check_access(
    required: &[Role],
    session: Option<&Session>,
    requested_path: &str,
) -> AccessDecision {
    let Some(session) = session else {
        return AccessDecision::RedirectToLogin {
            return_to: requested_path.to_string(),
        };
    };

    let role = session.role();
    if required.contains(&role) {
        AccessDecision::Allow
    } else {
        tracing::debug!(role = %role, path = %requested_path, "Access denied, redirecting home");
        AccessDecision::RedirectHome {
            path: home_route(role).path(),
        }
    }
}

/// `check_access` on a known route
pub fn check_route(route: AppRoute, session: Option<&Session>) -> AccessDecision {
    check_access(route.allowed_roles(), session, route.path())
}

/// Gate an arbitrary path; unknown paths send the user home (or to login)
pub fn check_path(path: &str, session: Option<&Session>) -> AccessDecision {
    match AppRoute::from_path(path) {
        Some(route) => check_access(route.allowed_roles(), session, path),
        None => match session {
            Some(s) => AccessDecision::RedirectHome {
                path: home_route(s.role()).path(),
            },
            None => AccessDecision::RedirectToLogin {
                return_to: path.to_string(),
            },
        },
    }
}

/// Where to go right after login: the remembered page if the new session
/// may open it, otherwise the role's landing page.
pub fn post_login_redirect(session: &Session, return_to: Option<&str>) -> String {
    if let Some(path) = return_to
        && check_path(path, Some(session)).is_allowed()
    {
        return path.to_string();
    }
    home_route(session.role()).path().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::UserInfo;

    fn session(role: Role) -> Session {
        Session {
            user: UserInfo {
                user_id: "u".into(),
                name: "U".into(),
                role,
                branch_id: Some("b1".into()),
            },
            token: "t".into(),
        }
    }

    #[test]
    fn test_no_session_remembers_path() {
        let decision = check_route(AppRoute::Reports, None);
        assert_eq!(
            decision,
            AccessDecision::RedirectToLogin { return_to: "/admin/reports".into() }
        );
        assert_eq!(decision.redirect_path(), Some(LOGIN_PATH));
    }

    #[test]
    fn test_every_role_on_every_route() {
        for role in Role::ALL {
            let s = session(role);
            for route in AppRoute::ALL {
                let decision = check_route(route, Some(&s));
                if route.allowed_roles().contains(&role) {
                    assert_eq!(decision, AccessDecision::Allow, "{role} on {}", route.path());
                } else {
                    assert_eq!(
                        decision,
                        AccessDecision::RedirectHome { path: home_route(role).path() },
                        "{role} on {}",
                        route.path()
                    );
                }
            }
        }
    }

    #[test]
    fn test_check_path_unknown() {
        let pos = session(Role::Pos);
        assert_eq!(
            check_path("/does-not-exist", Some(&pos)),
            AccessDecision::RedirectHome { path: "/pos/billing" }
        );
        assert!(matches!(
            check_path("/does-not-exist", None),
            AccessDecision::RedirectToLogin { .. }
        ));
    }

    #[test]
    fn test_post_login_redirect() {
        let manager = session(Role::Manager);
        assert_eq!(post_login_redirect(&manager, Some("/manager/inventory")), "/manager/inventory");
        assert_eq!(post_login_redirect(&manager, Some("/admin/branches")), "/manager/dashboard");
        assert_eq!(post_login_redirect(&manager, None), "/manager/dashboard");
    }
}

//! Pure navigation guard.
//!
//! Routing decisions depend only on the session phase and the requested
//! route, so the guard is a plain function: the caller applies the decision
//! however its navigation layer works.

use sb_types::routes::Route;

use crate::session::SessionPhase;

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested route.
    Allow,
    /// Navigate elsewhere. `resume` carries the originally requested route
    /// when it should be revisited after a successful login.
    Redirect { to: Route, resume: Option<Route> },
}

/// Decide whether `requested` may be rendered in the current phase.
///
/// Anything short of `Authenticated` bounces to the login route with the
/// request remembered for after login. Admin-only routes additionally
/// require the admin flag; non-admins land on their own home instead, with
/// nothing to resume.
pub fn decide(phase: &SessionPhase, requested: Route, admin_only: bool) -> RouteDecision {
    let identity = match phase {
        SessionPhase::Authenticated(identity) => identity,
        SessionPhase::Anonymous | SessionPhase::Authenticating => {
            return RouteDecision::Redirect {
                to: Route::Login,
                resume: Some(requested),
            };
        }
    };
    if admin_only && !identity.is_admin {
        return RouteDecision::Redirect {
            to: Route::default_home(identity.is_admin),
            resume: None,
        };
    }
    RouteDecision::Allow
}

//! Route guard: maps a navigation intent plus session state to an allowed
//! view or a redirect.
//!
//! Pure decision logic; rendering and redirecting are the caller's job.

use crate::api::types::ROLE_ADMIN;
use crate::session::{Session, SessionPhase};

/// A navigable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The sign-in view. The only route reachable without a session.
    Login,
    /// Default landing view (stats + expiring items).
    Dashboard,
    /// Item listing, filtering, and editing.
    Items,
    /// Read-only category listing.
    Categories,
    /// Category administration (create/update/delete).
    CategoryAdmin,
    /// Account administration.
    UserAdmin,
    /// Photo and CSV uploads.
    Files,
}

impl Route {
    /// Returns whether this view requires a signed-in session.
    pub fn requires_auth(self) -> bool {
        !matches!(self, Route::Login)
    }

    /// Returns the role required on top of authentication, if any.
    pub fn required_role(self) -> Option<&'static str> {
        match self {
            Route::CategoryAdmin | Route::UserAdmin => Some(ROLE_ADMIN),
            _ => None,
        }
    }

    /// Human-readable view name for messages.
    pub fn label(self) -> &'static str {
        match self {
            Route::Login => "sign-in",
            Route::Dashboard => "overview",
            Route::Items => "items",
            Route::Categories => "categories",
            Route::CategoryAdmin => "category administration",
            Route::UserAdmin => "user administration",
            Route::Files => "uploads",
        }
    }
}

/// Outcome of a navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Rehydration has not settled; show a placeholder, navigate nowhere.
    Loading,
    /// Render the requested view.
    Render(Route),
    /// Not signed in; the original destination is discarded.
    RedirectToLogin,
    /// Signed in but the view is not available (login view, or a missing
    /// role); land on the default view instead.
    RedirectToDashboard,
}

/// Decides what to do with a navigation intent.
///
/// Evaluated on every navigation; must never redirect while the session is
/// still initializing, so an already-authenticated user never sees a flash
/// of the sign-in view.
pub fn decide(route: Route, session: &Session) -> RouteDecision {
    if session.phase() == SessionPhase::Initializing {
        return RouteDecision::Loading;
    }

    let authenticated = session.is_authenticated();

    if route == Route::Login {
        return if authenticated {
            RouteDecision::RedirectToDashboard
        } else {
            RouteDecision::Render(route)
        };
    }

    if route.requires_auth() && !authenticated {
        return RouteDecision::RedirectToLogin;
    }

    if let Some(required) = route.required_role() {
        let granted = session
            .user()
            .is_some_and(|user| user.roles.iter().any(|role| role == required));
        if !granted {
            // Role misses bounce to the overview, not to sign-in.
            return RouteDecision::RedirectToDashboard;
        }
    }

    RouteDecision::Render(route)
}

//! Application route model.
//!
//! URL routes survive from the browser front-end as a closed enum so guard
//! decisions and redirect targets stay typed. Unknown paths collapse to
//! `Home`, matching the application's catch-all redirect.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Navigable application route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Login,
    Signup,
    Services,
    Bookings,
    Rooms,
    Analytics,
}

impl Route {
    /// URL path for this route.
    pub fn as_path(&self) -> &str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Services => "/services",
            Route::Bookings => "/bookings",
            Route::Rooms => "/rooms",
            Route::Analytics => "/analytics",
        }
    }

    /// Parse a URL path, tolerating a trailing slash. Anything unknown maps
    /// to `Home` (the catch-all).
    pub fn parse(path: &str) -> Self {
        let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        match trimmed {
            "/" => Route::Home,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            "/services" => Route::Services,
            "/bookings" => Route::Bookings,
            "/rooms" => Route::Rooms,
            "/analytics" => Route::Analytics,
            _ => Route::Home,
        }
    }

    /// Landing route after authentication: admins get the dashboard,
    /// everyone else their bookings.
    pub fn default_home(is_admin: bool) -> Self {
        if is_admin { Route::Analytics } else { Route::Bookings }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_path())
    }
}

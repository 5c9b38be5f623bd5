//! Client routes and the session guard

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::session::SessionContext;

/// Views reachable by path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Login,
    Register,
    Dashboard,
    IncomingPatients,
    MyInfo,
    BedAvailability,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Register,
        Route::Dashboard,
        Route::IncomingPatients,
        Route::MyInfo,
        Route::BedAvailability,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
            Route::IncomingPatients => "/incoming-patients",
            Route::MyInfo => "/my-info",
            Route::BedAvailability => "/bed-availability",
        }
    }

    /// Everything except login and register needs a session
    pub fn is_protected(self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = crate::DashboardError;

    /// `/` (or an empty path) redirects to the dashboard
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        if path.is_empty() || path == "/" {
            return Ok(Route::Dashboard);
        }
        Route::ALL
            .into_iter()
            .find(|r| r.path() == path)
            .ok_or_else(|| crate::DashboardError::UnknownRoute(s.to_string()))
    }
}

/// Decide which view actually renders for a requested route
///
/// Only the presence of a non-empty token is checked; it is never validated.
pub fn resolve(requested: Route, session: &SessionContext) -> Route {
    if requested.is_protected() && !session.is_authenticated() {
        tracing::debug!("No session for {}, redirecting to /login", requested);
        Route::Login
    } else {
        requested
    }
}

/// Parse a path and run it through the guard
pub fn navigate(path: &str, session: &SessionContext) -> crate::Result<Route> {
    let requested: Route = path.parse()?;
    Ok(resolve(requested, session))
}

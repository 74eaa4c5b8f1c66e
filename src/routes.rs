//! Portal routes and the authentication guard

use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    ForgotPassword,
    Dashboard,
    Students,
    Assessments,
    Infirmary,
    Inventory,
    Reports,
    Settings,
    Profile,
}

/// Outcome of checking a route against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(Route),
}

impl Route {
    pub const ALL: [Route; 10] = [
        Route::Login,
        Route::ForgotPassword,
        Route::Dashboard,
        Route::Students,
        Route::Assessments,
        Route::Infirmary,
        Route::Inventory,
        Route::Reports,
        Route::Settings,
        Route::Profile,
    ];

    /// Entries shown in the sidebar, in order
    pub const NAVIGATION: [Route; 8] = [
        Route::Dashboard,
        Route::Students,
        Route::Assessments,
        Route::Infirmary,
        Route::Inventory,
        Route::Reports,
        Route::Settings,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::ForgotPassword => "/forgot-password",
            Route::Dashboard => "/",
            Route::Students => "/ahana/students",
            Route::Assessments => "/ahana/assessments",
            Route::Infirmary => "/ahana/infirmary",
            Route::Inventory => "/ahana/inventory",
            Route::Reports => "/ahana/reports",
            Route::Settings => "/settings",
            Route::Profile => "/profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::ForgotPassword => "Forgot Password",
            Route::Dashboard => "Dashboard",
            Route::Students => "Students",
            Route::Assessments => "Assessments",
            Route::Infirmary => "Infirmary",
            Route::Inventory => "Inventory",
            Route::Reports => "Reports",
            Route::Settings => "Settings",
            Route::Profile => "Profile",
        }
    }

    /// Match a path, ignoring a trailing slash and any query string
    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::ForgotPassword)
    }

    /// Private routes need `isAuthenticated == "true"`
    pub fn guard<S: SessionStore>(&self, session: &Session<S>) -> Guard {
        if self.is_public() || session.is_authenticated() {
            Guard::Allow
        } else {
            Guard::Redirect(Route::Login)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{keys, MemorySessionStore};

    #[test]
    fn test_paths_round_trip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/ahana/students/"), Some(Route::Students));
        assert_eq!(Route::from_path("/ahana/reports?class=5"), Some(Route::Reports));
        assert_eq!(Route::from_path(""), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/nowhere"), None);
    }

    #[test]
    fn test_guard_redirects_without_flag() {
        let session = Session::new(MemorySessionStore::new());
        assert_eq!(Route::Login.guard(&session), Guard::Allow);
        assert_eq!(Route::ForgotPassword.guard(&session), Guard::Allow);
        assert_eq!(Route::Students.guard(&session), Guard::Redirect(Route::Login));

        session.store().set(keys::IS_AUTHENTICATED, "TRUE").unwrap();
        assert_eq!(Route::Dashboard.guard(&session), Guard::Redirect(Route::Login));

        session.store().set(keys::IS_AUTHENTICATED, "true").unwrap();
        assert_eq!(Route::Inventory.guard(&session), Guard::Allow);
    }
}

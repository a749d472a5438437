//! Auth session state and route gating
//!
//! The player views sit behind a guard: while the session is still being
//! restored nothing renders, guests are sent to the login page, and signed-in
//! users are kept away from it.

use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Auth service user id
    pub id: String,

    /// Login email
    pub email: Option<String>,

    /// Display name chosen at sign-up
    pub username: Option<String>,
}

/// Current-user presence and loading flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    loading: bool,
    user: Option<SessionUser>,
}

impl AuthSession {
    /// Session that is still restoring a stored login
    pub fn restoring() -> Self {
        Self {
            loading: true,
            user: None,
        }
    }

    /// Settled session without a user
    pub fn signed_out() -> Self {
        Self {
            loading: false,
            user: None,
        }
    }

    /// Settled session with a user
    pub fn signed_in(user: SessionUser) -> Self {
        Self {
            loading: false,
            user: Some(user),
        }
    }

    /// Whether the session is still being restored
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current user, if any
    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Whether a user is present
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Settle the restore with whatever user was found
    pub fn finish_loading(&mut self, user: Option<SessionUser>) {
        self.loading = false;
        self.user = user;
    }

    /// Record a successful sign-in
    pub fn sign_in(&mut self, user: SessionUser) {
        self.loading = false;
        self.user = Some(user);
    }

    /// Drop the current user
    pub fn sign_out(&mut self) {
        self.loading = false;
        self.user = None;
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::restoring()
    }
}

/// Who may see a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone
    Public,
    /// Signed-in users only
    RequiresAuth,
    /// Guests only (login page)
    GuestOnly,
}

/// Application pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Landing,
    /// `/auth`
    Auth,
    /// `/dashboard`
    Dashboard,
    /// `/explore`
    Explore,
    /// `/about`
    About,
    /// `/player`
    Player,
    /// `/test` (upload harness)
    UploadTest,
    /// Anything else
    NotFound,
}

impl Route {
    /// Match a URL path to a route
    ///
    /// Query strings, fragments and a trailing slash are ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Landing,
            "/auth" => Route::Auth,
            "/dashboard" => Route::Dashboard,
            "/explore" => Route::Explore,
            "/about" => Route::About,
            "/player" => Route::Player,
            "/test" => Route::UploadTest,
            _ => Route::NotFound,
        }
    }

    /// Canonical path
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Auth => "/auth",
            Route::Dashboard => "/dashboard",
            Route::Explore => "/explore",
            Route::About => "/about",
            Route::Player => "/player",
            Route::UploadTest => "/test",
            Route::NotFound => "/404",
        }
    }

    /// Access policy for this route
    pub fn access(&self) -> AccessPolicy {
        match self {
            Route::Auth => AccessPolicy::GuestOnly,
            Route::Dashboard | Route::Explore => AccessPolicy::RequiresAuth,
            Route::Landing
            | Route::About
            | Route::Player
            | Route::UploadTest
            | Route::NotFound => AccessPolicy::Public,
        }
    }
}

/// Outcome of gating a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still restoring; show the loading screen
    Loading,
    /// Render the requested page
    Render,
    /// Navigate elsewhere
    Redirect {
        /// Target route
        to: Route,
        /// Page the user originally asked for, to return to after login
        from: Option<Route>,
    },
}

/// Decide what to show for `route` given the session
pub fn guard(route: Route, session: &AuthSession) -> GuardDecision {
    let policy = route.access();
    if policy == AccessPolicy::Public {
        return GuardDecision::Render;
    }

    if session.is_loading() {
        return GuardDecision::Loading;
    }

    match (policy, session.is_authenticated()) {
        (AccessPolicy::RequiresAuth, false) => GuardDecision::Redirect {
            to: Route::Auth,
            from: Some(route),
        },
        (AccessPolicy::GuestOnly, true) => GuardDecision::Redirect {
            to: Route::Landing,
            from: None,
        },
        _ => GuardDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: "u1".to_string(),
            email: Some("dj@example.com".to_string()),
            username: Some("dj".to_string()),
        }
    }

    #[test]
    fn paths_map_to_routes() {
        assert_eq!(Route::from_path("/"), Route::Landing);
        assert_eq!(Route::from_path("/explore/"), Route::Explore);
        assert_eq!(Route::from_path("/auth?next=/dashboard"), Route::Auth);
        assert_eq!(Route::from_path("/player#top"), Route::Player);
        assert_eq!(Route::from_path("/nope"), Route::NotFound);
    }

    #[test]
    fn loading_session_blocks_gated_routes_only() {
        let session = AuthSession::restoring();
        assert_eq!(guard(Route::Dashboard, &session), GuardDecision::Loading);
        assert_eq!(guard(Route::Auth, &session), GuardDecision::Loading);
        assert_eq!(guard(Route::Player, &session), GuardDecision::Render);
    }

    #[test]
    fn guests_are_sent_to_login_with_origin() {
        let session = AuthSession::signed_out();
        assert_eq!(
            guard(Route::Explore, &session),
            GuardDecision::Redirect {
                to: Route::Auth,
                from: Some(Route::Explore),
            }
        );
        assert_eq!(guard(Route::Auth, &session), GuardDecision::Render);
    }

    #[test]
    fn signed_in_users_skip_login_page() {
        let session = AuthSession::signed_in(user());
        assert_eq!(
            guard(Route::Auth, &session),
            GuardDecision::Redirect {
                to: Route::Landing,
                from: None,
            }
        );
        assert_eq!(guard(Route::Dashboard, &session), GuardDecision::Render);
    }

    #[test]
    fn session_transitions() {
        let mut session = AuthSession::default();
        assert!(session.is_loading());

        session.finish_loading(None);
        assert!(!session.is_loading());
        assert!(!session.is_authenticated());

        session.sign_in(user());
        assert_eq!(session.user().map(|u| u.id.as_str()), Some("u1"));

        session.sign_out();
        assert!(session.user().is_none());
    }
}

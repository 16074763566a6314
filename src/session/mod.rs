pub mod auth;
pub mod handlers;
pub mod signing;
pub mod storage;
pub mod theme;


pub use auth::*;
pub use handlers::*;
pub use storage::*;
pub use theme::*;

use axum::http::HeaderMap;

/// Per-request view of the client's session and theme cookies.
#[derive(Debug, Clone)]
pub struct Visitor {
    pub role: Role,
    pub theme: Theme,
    pub jar: CookieJar,
}

impl Visitor {
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Self {
        let mut jar = cookie_jar(headers);
        let role = Session::new(&mut jar, secret).role();
        let theme = ThemeState::new(&mut jar, system_preference(headers)).init_theme();

        Self { role, theme, jar }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Cookie jar with the session cookie marked `HttpOnly`.
pub fn cookie_jar(headers: &HeaderMap) -> CookieJar {
    CookieJar::from_headers(headers).with_policy(SESSION_KEY, SESSION_COOKIE_POLICY)
}

/// Check the session cookie and return the visitor's role
pub fn current_role(headers: &HeaderMap, secret: &str) -> Role {
    let mut jar = cookie_jar(headers);
    Session::new(&mut jar, secret).role()
}

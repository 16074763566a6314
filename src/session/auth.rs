use super::signing::{sign_value, verify_signed_value};
use super::storage::{ClientStorage, CookiePolicy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

pub const SESSION_KEY: &str = "photoshare_session";

pub const SESSION_COOKIE_POLICY: CookiePolicy = CookiePolicy {
    max_age_secs: 60 * 60 * 24 * 7,
    http_only: true,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Anonymous,
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "anonymous",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Role::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anonymous" => Ok(Role::Anonymous),
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    pub role: Option<Role>,
}

impl AuthOutcome {
    fn granted(role: Role) -> Self {
        Self {
            success: true,
            role: Some(role),
        }
    }

    fn denied() -> Self {
        Self {
            success: false,
            role: None,
        }
    }
}

/// The two shared passphrases. Compared in plaintext.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub admin_password: String,
    pub user_password: String,
}

impl Credentials {
    pub fn new(admin_password: impl Into<String>, user_password: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            user_password: user_password.into(),
        }
    }

    /// Admin secret is checked first, so a passphrase equal to both grants admin.
    pub fn role_for(&self, password: &str) -> Option<Role> {
        if password.is_empty() {
            return None;
        }
        if password == self.admin_password {
            Some(Role::Admin)
        } else if password == self.user_password {
            Some(Role::User)
        } else {
            None
        }
    }
}

/// Session role persisted in client storage as a single signed value.
pub struct Session<'a, S: ClientStorage + ?Sized> {
    storage: &'a mut S,
    secret: &'a str,
}

impl<'a, S: ClientStorage + ?Sized> Session<'a, S> {
    pub fn new(storage: &'a mut S, secret: &'a str) -> Self {
        Self { storage, secret }
    }

    pub fn role(&self) -> Role {
        let Some(stored) = self.storage.get(SESSION_KEY) else {
            return Role::Anonymous;
        };

        match verify_signed_value(self.secret, &stored).map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            _ => {
                warn!("Ignoring session value with an invalid signature");
                Role::Anonymous
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    pub fn authenticate(&mut self, credentials: &Credentials, password: &str) -> AuthOutcome {
        let Some(role) = credentials.role_for(password) else {
            warn!("Authentication failed - invalid password");
            return AuthOutcome::denied();
        };

        match sign_value(self.secret, role.as_str()) {
            Ok(signed) => {
                self.storage.set(SESSION_KEY, &signed);
                info!("Authentication successful as {}", role);
                AuthOutcome::granted(role)
            }
            Err(e) => {
                warn!("Failed to sign session: {}", e);
                AuthOutcome::denied()
            }
        }
    }

    pub fn logout(&mut self) {
        self.storage.remove(SESSION_KEY);
    }
}

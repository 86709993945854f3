//! Secrets read from environment variables.
//!
//! Nothing here is written to config.toml. `LOGIN_PASSWORD` gates the login
//! endpoint; `SERVICE_ROLE_KEY`, when set, gates the privileged table-action
//! endpoint. `ANON_KEY` is exposed to the browser build and only carried here
//! so the server can report whether it is configured.

/// Runtime secrets. Empty variables count as unset.
#[derive(Clone, Default)]
pub struct Secrets {
    /// Shared back-office password
    pub login_password: Option<String>,
    /// Public key handed to the browser
    pub anon_key: Option<String>,
    /// Privileged key for table actions
    pub service_role_key: Option<String>,
}

// Keep secret values out of logs
impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("login_password", &self.login_password.is_some())
            .field("anon_key", &self.anon_key.is_some())
            .field("service_role_key", &self.service_role_key.is_some())
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Secrets {
    /// Reads `LOGIN_PASSWORD`, `ANON_KEY` and `SERVICE_ROLE_KEY`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            login_password: non_empty_var("LOGIN_PASSWORD"),
            anon_key: non_empty_var("ANON_KEY"),
            service_role_key: non_empty_var("SERVICE_ROLE_KEY"),
        }
    }

    /// Whether `candidate` matches the configured login password.
    /// Always false when no password is configured.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.login_password
            .as_deref()
            .is_some_and(|expected| expected == candidate)
    }

    /// Whether an `Authorization` header value carries the service-role key.
    /// Always true when no key is configured.
    #[must_use]
    pub fn authorizes_service_role(&self, header: Option<&str>) -> bool {
        let Some(expected) = self.service_role_key.as_deref() else {
            return true;
        };
        header
            .and_then(|h| h.strip_prefix("Bearer "))
            .is_some_and(|token| token.trim() == expected)
    }
}

//! Router configuration.
//!
//! ```
//! use spa_navigator::{RouterConfig, Session};
//!
//! let config = RouterConfig::new()
//!     .max_redirects(3)
//!     .session(Session::authenticated())
//!     .on_token(|token| println!("received token of {} bytes", token.len()));
//!
//! assert_eq!(config.max_redirects, 3);
//! assert_eq!(config.token_param, "token");
//! ```

use crate::resolve::Session;
use std::fmt;
use std::rc::Rc;

/// Maximum redirect hops per resolution.
///
/// Two hops cover every legitimate chain (root → default → logged-out);
/// anything longer means the route policy is misconfigured.
pub const MAX_REDIRECT_DEPTH: usize = 2;

/// Query parameter stripped from the address on every resolution.
pub const DEFAULT_TOKEN_PARAM: &str = "token";

/// Hook receiving a token stripped from the address.
pub type TokenHandler = Rc<dyn Fn(&str)>;

/// Options fixed for the lifetime of a [`Router`](crate::Router).
#[derive(Clone)]
pub struct RouterConfig {
    /// Redirect hops allowed before resolution is declared a loop.
    pub max_redirects: usize,
    /// Name of the query parameter carrying an auth token.
    pub token_param: String,
    /// Receives the stripped token, for an external auth collaborator.
    pub on_token: Option<TokenHandler>,
    /// Session at startup.
    pub session: Session,
}

impl RouterConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the redirect hop limit
    pub fn max_redirects(mut self, hops: usize) -> Self {
        self.max_redirects = hops;
        self
    }

    /// Set the name of the token query parameter
    pub fn token_param(mut self, name: impl Into<String>) -> Self {
        self.token_param = name.into();
        self
    }

    /// Hand stripped tokens to `handler`
    pub fn on_token<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.on_token = Some(Rc::new(handler));
        self
    }

    /// Set the session at startup
    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_redirects: MAX_REDIRECT_DEPTH,
            token_param: DEFAULT_TOKEN_PARAM.to_string(),
            on_token: None,
            session: Session::anonymous(),
        }
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("max_redirects", &self.max_redirects)
            .field("token_param", &self.token_param)
            .field("on_token", &self.on_token.is_some())
            .field("session", &self.session)
            .finish()
    }
}

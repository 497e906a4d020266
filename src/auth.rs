//! Login session: authentication, remember-me persistence and restore.
//!
//! With remember-me the token and user go to the durable store; without it
//! they go to the session store and are forgotten at exit. `rememberMe`
//! itself always lives in the durable store so the next start knows where to
//! look.

use crate::api::types::{AuthUser, Credentials};
use crate::api::CatalogClient;
use crate::error::{CatalogError, CatalogResult};
use crate::storage::{KeyValueStore, Stores};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "user";
pub const REMEMBER_ME_KEY: &str = "rememberMe";

/// Shown for every non-validation login failure, whatever the cause.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your details and try again.";

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
  pub token: String,
  pub user: AuthUser,
  pub remember_me: bool,
}

#[derive(Clone)]
pub struct SessionManager {
  stores: Stores,
}

impl SessionManager {
  pub fn new(stores: Stores) -> Self {
    Self { stores }
  }

  /// Per-field problems with the login form.
  pub fn validate(username: &str, password: &str) -> Vec<CatalogError> {
    let mut errors = Vec::new();
    if username.trim().is_empty() {
      errors.push(CatalogError::validation("username", "username is required"));
    }
    if password.is_empty() {
      errors.push(CatalogError::validation("password", "password is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
      errors.push(CatalogError::validation(
        "password",
        format!("password must be at least {} characters", MIN_PASSWORD_LEN),
      ));
    }
    errors
  }

  /// Authenticate and persist the session.
  ///
  /// Any failure clears stored session state.
  pub async fn login(
    &self,
    client: &CatalogClient,
    username: &str,
    password: &str,
    remember_me: bool,
  ) -> CatalogResult<Session> {
    if let Some(err) = Self::validate(username, password).into_iter().next() {
      return Err(err);
    }

    let credentials = Credentials {
      username: username.trim().to_string(),
      password: password.to_string(),
    };

    match client.login(&credentials).await {
      Ok(user) if !user.token.is_empty() => {
        tracing::info!(username = %user.username, remember_me, "logged in");
        Ok(self.start(user, remember_me))
      }
      Ok(_) => {
        tracing::warn!("login response carried no token");
        self.clear();
        Err(CatalogError::Server {
          status: 200,
          message: "missing token".to_string(),
        })
      }
      Err(e) => {
        tracing::warn!(error = %e, "login failed");
        self.clear();
        Err(e)
      }
    }
  }

  /// Store a freshly authenticated user in the scope remember-me selects.
  pub fn start(&self, user: AuthUser, remember_me: bool) -> Session {
    let (keep, other) = if remember_me {
      (&self.stores.durable, &self.stores.session)
    } else {
      (&self.stores.session, &self.stores.durable)
    };

    let user_json = serde_json::to_string(&user).unwrap_or_else(|_| "null".to_string());
    write(&**keep, AUTH_TOKEN_KEY, &user.token);
    write(&**keep, USER_KEY, &user_json);
    remove(&**other, AUTH_TOKEN_KEY);
    remove(&**other, USER_KEY);
    write(
      &*self.stores.durable,
      REMEMBER_ME_KEY,
      if remember_me { "true" } else { "false" },
    );

    Session {
      token: user.token.clone(),
      user,
      remember_me,
    }
  }

  /// Pick up a session left by a previous login.
  pub fn restore(&self) -> Option<Session> {
    let remember_me = read(&*self.stores.durable, REMEMBER_ME_KEY).as_deref() == Some("true");
    let scope = if remember_me {
      &self.stores.durable
    } else {
      &self.stores.session
    };

    let token = read(&**scope, AUTH_TOKEN_KEY).filter(|t| !t.is_empty())?;

    let raw_user = read(&*self.stores.durable, USER_KEY)
      .or_else(|| read(&*self.stores.session, USER_KEY))
      .unwrap_or_else(|| "null".to_string());

    match serde_json::from_str::<Option<AuthUser>>(&raw_user) {
      Ok(user) => {
        let user = user.unwrap_or_default();
        tracing::debug!(username = %user.username, "restored session");
        Some(Session {
          token,
          user,
          remember_me,
        })
      }
      Err(e) => {
        tracing::warn!(error = %e, "stored user is unreadable, clearing session");
        self.clear();
        None
      }
    }
  }

  pub fn logout(&self) {
    tracing::info!("logged out");
    self.clear();
  }

  fn clear(&self) {
    for store in [&self.stores.durable, &self.stores.session] {
      remove(&**store, AUTH_TOKEN_KEY);
      remove(&**store, USER_KEY);
    }
    remove(&*self.stores.durable, REMEMBER_ME_KEY);
  }
}

/// Message for the login banner: the field problem for validation errors,
/// a generic text for everything else.
pub fn failure_message(err: &CatalogError) -> String {
  match err {
    CatalogError::Validation { message, .. } => message.clone(),
    _ => LOGIN_FAILED_MESSAGE.to_string(),
  }
}

fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
  store
    .get(key)
    .map_err(|e| tracing::warn!(key, error = %e, "failed to read session key"))
    .ok()
    .flatten()
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) {
  if let Err(e) = store.set(key, value) {
    tracing::warn!(key, error = %e, "failed to write session key");
  }
}

fn remove(store: &dyn KeyValueStore, key: &str) {
  if let Err(e) = store.remove(key) {
    tracing::warn!(key, error = %e, "failed to remove session key");
  }
}

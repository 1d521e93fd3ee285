//! Authenticated session state kept in the cookie session.
//!
//! The bearer token lives under [`TOKEN_KEY`] and the verified account under
//! [`USER_KEY`]. An account whose email is not verified is never stored, so
//! such a session holds a token but is not authenticated.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{ApiError, AuthApi, AuthResponse, HttpApiClient, LoginRequest, RegisterRequest};
use crate::domain::types::BearerToken;
use crate::domain::user::User;

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "authUser";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to persist session: {0}")]
    Store(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Key/value storage backing the auth session.
pub trait SessionStore {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T>;
    fn store<T: Serialize>(&self, key: &str, value: &T) -> SessionResult<()>;
    fn delete(&self, key: &str);
}

impl SessionStore for Session {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get::<T>(key).unwrap_or_else(|err| {
            log::warn!("Discarding unreadable session value {key}: {err}");
            None
        })
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> SessionResult<()> {
        self.insert(key, value)
            .map_err(|err| SessionError::Store(err.to_string()))
    }

    fn delete(&self, key: &str) {
        self.remove(key);
    }
}

/// Session storage held in memory, used outside of a request.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: RefCell<HashMap<String, String>>,
}

impl SessionStore for MemorySession {
    fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .borrow()
            .get(key)
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    fn store<T: Serialize>(&self, key: &str, value: &T) -> SessionResult<()> {
        let raw = serde_json::to_string(value).map_err(|err| SessionError::Store(err.to_string()))?;
        self.values.borrow_mut().insert(key.to_string(), raw);
        Ok(())
    }

    fn delete(&self, key: &str) {
        self.values.borrow_mut().remove(key);
    }
}

/// The signed-in builder as seen by this request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthSession {
    user: Option<User>,
    token: Option<BearerToken>,
}

impl AuthSession {
    /// Reads the session, discarding any stored account that is not verified.
    pub fn load<S: SessionStore>(store: &S) -> Self {
        let token = store.load::<BearerToken>(TOKEN_KEY);
        let user = store
            .load::<User>(USER_KEY)
            .filter(|user| token.is_some() && user.is_verified());
        Self { user, token }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn set_token<S: SessionStore>(&mut self, store: &S, token: BearerToken) -> SessionResult<()> {
        store.store(TOKEN_KEY, &token)?;
        self.token = Some(token);
        Ok(())
    }

    /// Caches the account only when its email is verified.
    fn set_user<S: SessionStore>(&mut self, store: &S, user: User) -> SessionResult<()> {
        if user.is_verified() {
            store.store(USER_KEY, &user)?;
            self.user = Some(user);
        } else {
            store.delete(USER_KEY);
            self.user = None;
        }
        Ok(())
    }

    fn accept<S: SessionStore>(&mut self, store: &S, response: AuthResponse) -> SessionResult<()> {
        self.set_token(store, response.token)?;
        self.set_user(store, response.user)
    }

    /// Resolves a stored token into an account.
    ///
    /// A verified account populates the session, an unverified one leaves it
    /// token-only, and a failed lookup clears the token.
    pub async fn bootstrap<S, A>(store: &S, api: &A) -> Self
    where
        S: SessionStore,
        A: AuthApi + ?Sized,
    {
        let mut session = Self::load(store);
        if session.user.is_some() {
            return session;
        }
        let Some(token) = session.token.clone() else {
            return session;
        };

        match api.current_user(&token).await {
            Ok(user) => {
                if let Err(err) = session.set_user(store, user) {
                    log::error!("Failed to cache the current user: {err}");
                }
            }
            Err(err) => {
                log::info!("Stored token rejected, clearing session: {err}");
                session.clear(store);
            }
        }
        session
    }

    /// Signs in. On an unverified email the token is kept for resending the
    /// verification link and the error is returned.
    pub async fn login<S, A>(store: &S, api: &A, request: &LoginRequest) -> SessionResult<Self>
    where
        S: SessionStore,
        A: AuthApi + ?Sized,
    {
        let mut session = Self::default();
        match api.login(request).await {
            Ok(response) => {
                session.accept(store, response)?;
                Ok(session)
            }
            Err(ApiError::EmailNotVerified { user, token }) => {
                store.delete(USER_KEY);
                match &token {
                    Some(token) => session.set_token(store, token.clone())?,
                    // A token left by an earlier sign-in must not outlive this one.
                    None => store.delete(TOKEN_KEY),
                }
                Err(ApiError::EmailNotVerified { user, token }.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Creates an account and keeps its token; the account itself is only
    /// cached once verified.
    pub async fn register<S, A>(store: &S, api: &A, request: &RegisterRequest) -> SessionResult<Self>
    where
        S: SessionStore,
        A: AuthApi + ?Sized,
    {
        let response = api.register(request).await?;
        let mut session = Self::default();
        session.accept(store, response)?;
        Ok(session)
    }

    /// Notifies the backend and clears the session whatever it answers.
    pub async fn logout<S, A>(store: &S, api: &A)
    where
        S: SessionStore,
        A: AuthApi + ?Sized,
    {
        let mut session = Self::load(store);
        if let Some(token) = &session.token {
            if let Err(err) = api.logout(token).await {
                log::warn!("Logout error: {err}");
            }
        }
        session.clear(store);
    }

    pub fn clear<S: SessionStore>(&mut self, store: &S) {
        store.delete(TOKEN_KEY);
        store.delete(USER_KEY);
        self.user = None;
        self.token = None;
    }

    fn into_builder(self) -> Option<AuthenticatedBuilder> {
        match (self.user, self.token) {
            (Some(user), Some(token)) => Some(AuthenticatedBuilder { user, token }),
            _ => None,
        }
    }
}

/// A verified builder with their bearer token.
///
/// Extraction fails with 401 Unauthorized, which the redirect middleware turns
/// into a redirect to the sign-in page.
#[derive(Clone, Debug)]
pub struct AuthenticatedBuilder {
    pub user: User,
    pub token: BearerToken,
}

impl FromRequest for AuthenticatedBuilder {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session = req.get_session();
        let api = req.app_data::<web::Data<HttpApiClient>>().cloned();

        Box::pin(async move {
            let auth = match api {
                Some(api) => AuthSession::bootstrap(&session, api.get_ref()).await,
                None => AuthSession::load(&session),
            };
            auth.into_builder()
                .ok_or_else(|| ErrorUnauthorized("Authentication required"))
        })
    }
}

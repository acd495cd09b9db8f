// ============================
// crates/backend-lib/src/context.rs
// ============================
//! Per-request identity and session transport.
//!
//! A `RequestContext` is built once per HTTP request and passed explicitly
//! to every resolver. Resolvers record cookie changes on it; the router
//! applies them to the response.
use parking_lot::Mutex;
use shopfront_common::{PermissionSet, User, UserId};

use crate::auth::AuthService;
use crate::error::AppError;
use crate::storage::Storage;

/// The signed-in user as seen by the policy layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub permissions: PermissionSet,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            permissions: user.permissions.clone(),
        }
    }
}

/// Cookie change requested by a resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Store this session token on the client
    Set(String),
    /// Remove the session token from the client
    Clear,
}

/// Out-of-band channel from resolvers to the cookie layer
#[derive(Debug, Default)]
pub struct SessionCookies {
    pending: Mutex<Option<SessionUpdate>>,
    started_for: Mutex<Option<UserId>>,
}

impl SessionCookies {
    /// Start a session for `user` carried by `token`
    pub fn set(&self, user: UserId, token: String) {
        *self.pending.lock() = Some(SessionUpdate::Set(token));
        *self.started_for.lock() = Some(user);
    }

    pub fn clear(&self) {
        *self.pending.lock() = Some(SessionUpdate::Clear);
        *self.started_for.lock() = None;
    }

    /// The user a session was started for during this request
    pub fn started_for(&self) -> Option<UserId> {
        *self.started_for.lock()
    }

    /// The last requested change, if any
    pub fn pending(&self) -> Option<SessionUpdate> {
        self.pending.lock().clone()
    }

    pub fn take(&self) -> Option<SessionUpdate> {
        self.pending.lock().take()
    }
}

/// Identity and session transport for one request
#[derive(Debug, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
    session: SessionCookies,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            session: SessionCookies::default(),
        }
    }

    /// Build the context from the session token presented with a request.
    ///
    /// A missing, invalid or expired token, or one naming a deleted user,
    /// yields an anonymous context. Only storage failures are errors.
    pub async fn resolve(
        token: Option<&str>,
        auth: &dyn AuthService,
        storage: &dyn Storage,
    ) -> Result<Self, AppError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(Self::anonymous());
        };

        let Ok(user_id) = auth.verify_session_token(token) else {
            return Ok(Self::anonymous());
        };

        match storage.user(user_id).await? {
            Some(user) => Ok(Self::authenticated(Identity::from(&user))),
            None => {
                tracing::debug!(%user_id, "session token names an unknown user");
                Ok(Self::anonymous())
            },
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn session(&self) -> &SessionCookies {
        &self.session
    }

    /// True when the caller is `user`, either through the presented cookie
    /// or a session started earlier in this request
    pub fn acts_as(&self, user: UserId) -> bool {
        self.identity.as_ref().is_some_and(|identity| identity.id == user)
            || self.session.started_for() == Some(user)
    }
}

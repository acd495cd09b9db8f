// ============================
// crates/backend-lib/src/resolvers/users.rs
// ============================
//! Account operations: signup, signin, password reset and permissions.
use chrono::Utc;
use metrics::counter;
use shopfront_common::{Permission, PermissionSet, User, UserId};
use tracing::{debug, error, info, instrument, warn};

use super::Resolvers;
use crate::auth::permissions::{authorize, MANAGE_PERMISSIONS};
use crate::auth::{consume_reset_token, generate_reset_token, require_identity};
use crate::context::RequestContext;
use crate::error::AppError;
use crate::mail::reset_email;
use crate::metrics::{
    MAIL_FAILED, MAIL_SENT, RESET_COMPLETED, RESET_REQUESTED, SIGNIN_FAILURE, SIGNIN_SUCCESS,
    SIGNUP,
};
use crate::storage::{NewUser, UserChanges};
use crate::validation::{
    normalize_email, validate_name, validate_password, validate_password_confirmation,
};

pub const GOODBYE_MESSAGE: &str = "Goodbye!";
pub const THANKS_MESSAGE: &str = "Thanks!";

impl Resolvers {
    /// Create an account with `{USER}` and sign it in
    #[instrument(skip(self, ctx, password))]
    pub async fn signup(
        &self,
        ctx: &RequestContext,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = normalize_email(email)?;
        let name = validate_name(name)?.to_string();
        let password = self.auth.hash_password(validate_password(password)?).await?;

        let user = self
            .storage
            .create_user(NewUser {
                name,
                email,
                password,
                permissions: PermissionSet::default_user(),
            })
            .await?;

        self.start_session(ctx, &user)?;
        counter!(SIGNUP).increment(1);
        info!(user_id = %user.id, "user signed up");
        Ok(user)
    }

    /// Check credentials and sign the user in
    #[instrument(skip(self, ctx, password))]
    pub async fn signin(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.storage.user_by_email(&email).await? else {
            counter!(SIGNIN_FAILURE).increment(1);
            debug!("signin for unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.auth.verify_password(&user.password, password).await {
            counter!(SIGNIN_FAILURE).increment(1);
            warn!(user_id = %user.id, "signin with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.start_session(ctx, &user)?;
        counter!(SIGNIN_SUCCESS).increment(1);
        info!(user_id = %user.id, "user signed in");
        Ok(user)
    }

    /// Drop the session cookie
    pub fn signout(&self, ctx: &RequestContext) -> &'static str {
        ctx.session().clear();
        GOODBYE_MESSAGE
    }

    /// Store a fresh reset token on the account and mail the reset link.
    ///
    /// The reply is the same whether or not the email belongs to anyone.
    #[instrument(skip(self))]
    pub async fn request_reset(&self, email: &str) -> Result<&'static str, AppError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.storage.user_by_email(&email).await? else {
            debug!("reset requested for unknown email");
            return Ok(THANKS_MESSAGE);
        };

        let token = generate_reset_token(Utc::now());
        self.storage
            .update_user(
                user.id,
                UserChanges {
                    reset_token: Some(Some(token.clone())),
                    ..UserChanges::default()
                },
            )
            .await?;
        counter!(RESET_REQUESTED).increment(1);
        info!(user_id = %user.id, expires_at = %token.expires_at, "reset token issued");

        // The reply is the same whether or not delivery succeeds
        let sent = match reset_email(
            &self.settings.mail.from,
            &user.email,
            &self.settings.reset_url(),
            &token.token,
        ) {
            Ok(mail) => self.mailer.send(mail).await,
            Err(e) => Err(e),
        };
        match sent {
            Ok(receipt) => {
                counter!(MAIL_SENT).increment(1);
                debug!(user_id = %user.id, detail = %receipt.detail, "reset mail sent");
            },
            Err(e) => {
                counter!(MAIL_FAILED).increment(1);
                error!(user_id = %user.id, "failed to send reset mail: {e}");
            },
        }
        Ok(THANKS_MESSAGE)
    }

    /// Set a new password using a mailed reset token, then sign the user in
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        ctx: &RequestContext,
        reset_token: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AppError> {
        validate_password_confirmation(password, confirm_password)?;
        let password = validate_password(password)?;

        let user = consume_reset_token(self.storage.as_ref(), reset_token, Utc::now()).await?;
        let hash = self.auth.hash_password(password).await?;
        let user = self
            .storage
            .update_user(
                user.id,
                UserChanges {
                    password: Some(hash),
                    reset_token: Some(None),
                    ..UserChanges::default()
                },
            )
            .await?;

        self.start_session(ctx, &user)?;
        counter!(RESET_COMPLETED).increment(1);
        info!(user_id = %user.id, "password reset");
        Ok(user)
    }

    /// Replace a user's whole permission set
    #[instrument(skip(self, ctx))]
    pub async fn update_permissions(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        permissions: Vec<Permission>,
    ) -> Result<User, AppError> {
        let identity = require_identity(ctx)?;
        authorize(identity, MANAGE_PERMISSIONS)?;

        let permissions = PermissionSet::from_iter(permissions);
        if permissions.is_empty() {
            return Err(AppError::ValidationFailed(
                "A user needs at least one permission".to_string(),
            ));
        }

        self.fetch_user(user_id).await?;
        let user = self
            .storage
            .update_user(
                user_id,
                UserChanges {
                    permissions: Some(permissions),
                    ..UserChanges::default()
                },
            )
            .await?;

        info!(
            user_id = %user.id,
            changed_by = %identity.id,
            permissions = ?user.permissions,
            "permissions updated"
        );
        Ok(user)
    }

    /// Every account; admin only
    pub async fn users(&self, ctx: &RequestContext) -> Result<Vec<User>, AppError> {
        let identity = require_identity(ctx)?;
        authorize(identity, MANAGE_PERMISSIONS)?;
        Ok(self.storage.users().await?)
    }

    pub async fn user(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.storage.user(id).await?)
    }

    /// The signed-in user, or `None` for anonymous callers
    pub async fn me(&self, ctx: &RequestContext) -> Result<Option<User>, AppError> {
        match ctx.identity() {
            Some(identity) => Ok(self.storage.user(identity.id).await?),
            None => Ok(None),
        }
    }

    fn start_session(&self, ctx: &RequestContext, user: &User) -> Result<(), AppError> {
        let token = self.auth.issue_session_token(user.id)?;
        ctx.session().set(user.id, token);
        Ok(())
    }
}

use async_trait::async_trait;

use crate::{
    auth::{
        Claims, NewAccount, Role, TokenBundle,
        jwt::{JwtKeys, decode_token, encode_token, make_access_claims},
        password::{hash_password, verify_password},
    },
    config::AuthConfig,
    db::dao::{NewUser, RefreshTokenDao},
    db::entities::user,
    error::AppError,
    services::user_service::{EMAIL_TAKEN, USERNAME_TAKEN, UserService},
};

use super::{AuthProvider, AuthProviderId};

const ACCESS_TTL_SECS: usize = 15 * 60; // 15 minutes
const REFRESH_TTL_DAYS: i64 = 30;

#[derive(Clone)]
pub struct LocalAuthProvider {
    user_service: UserService,
    refresh_token_dao: RefreshTokenDao,
    jwt: JwtKeys,
}

impl LocalAuthProvider {
    pub fn new(
        user_service: UserService,
        refresh_token_dao: RefreshTokenDao,
        jwt: JwtKeys,
    ) -> Self {
        Self {
            user_service,
            refresh_token_dao,
            jwt,
        }
    }

    async fn issue_tokens(&self, user: &user::Model) -> Result<TokenBundle, AppError> {
        let roles = Role::try_from(user.role.as_str())
            .unwrap_or(Role::User)
            .grants();
        let claims = make_access_claims(&user.id, roles.clone(), ACCESS_TTL_SECS);
        let access_token = encode_token(&self.jwt, &claims)?;

        let refresh = self
            .refresh_token_dao
            .create_refresh_token(&user.id, Some(REFRESH_TTL_DAYS))
            .await?;

        Ok(TokenBundle {
            access_token,
            refresh_token: refresh.token,
            token_type: "Bearer",
            expires_in: ACCESS_TTL_SECS,
            roles,
        })
    }
}

fn ensure_active(user: &user::Model) -> Result<(), AppError> {
    if user.is_active {
        Ok(())
    } else {
        Err(AppError::forbidden("Account is not active"))
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn id(&self) -> AuthProviderId {
        AuthProviderId::Local
    }

    async fn register(&self, account: NewAccount) -> Result<user::Model, AppError> {
        if self
            .user_service
            .find_by_email(&account.email)
            .await?
            .is_some()
        {
            return Err(AppError::validation("error", EMAIL_TAKEN));
        }

        if self
            .user_service
            .find_by_username(&account.username)
            .await?
            .is_some()
        {
            return Err(AppError::validation("username", USERNAME_TAKEN));
        }

        let password_hash = hash_password(&account.password)?;
        let user = self
            .user_service
            .create_user(NewUser {
                username: account.username,
                email: account.email,
                first_name: account.first_name,
                last_name: account.last_name,
                password_hash,
                role: Role::User.as_str().to_string(),
                is_active: false,
                mobile_number: account.mobile_number,
                blood_group: account.blood_group,
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AppError> {
        let Some(user) = self.user_service.find_by_username(username).await? else {
            tracing::warn!(username, "login rejected: unknown user");
            return Err(AppError::unauthorized("Invalid credentials"));
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(username, "login rejected: wrong password");
            return Err(AppError::unauthorized("Invalid credentials"));
        }

        if let Err(err) = ensure_active(&user) {
            tracing::warn!(username, "login rejected: account not active");
            return Err(err);
        }

        let now = chrono::Utc::now().fixed_offset();
        self.user_service.set_last_login(&user.id, &now).await?;

        self.issue_tokens(&user).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        let token = self
            .refresh_token_dao
            .find_by_token(refresh_token)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if token.expires_at < chrono::Utc::now().fixed_offset() || token.revoked {
            return Err(AppError::unauthorized("Refresh token expired"));
        }

        let user = self
            .user_service
            .find_by_id(&token.user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;
        ensure_active(&user)?;

        self.refresh_token_dao.revoke_token(refresh_token).await?;

        self.issue_tokens(&user).await
    }

    async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        decode_token(&self.jwt, access_token)
    }

    async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        if let Some(existing) = self.user_service.find_by_email(&cfg.admin_email).await? {
            tracing::info!("admin user already present: {}", existing.username);
            return Ok(());
        }

        let hash = hash_password(&cfg.admin_password)
            .map_err(|e| anyhow::anyhow!("admin seed hash error: {e}"))?;
        let user = self
            .user_service
            .create_user(NewUser {
                username: cfg.admin_username.clone(),
                email: cfg.admin_email.clone(),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: hash,
                role: Role::Admin.as_str().to_string(),
                is_active: true,
                mobile_number: None,
                blood_group: None,
            })
            .await?;
        tracing::info!("seeded admin user {}", user.username);
        Ok(())
    }
}

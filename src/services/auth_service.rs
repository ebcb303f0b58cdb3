use crate::{
    auth::{Claims, NewAccount, TokenBundle, providers::AuthProviders},
    config::AuthConfig,
    db::entities::user,
    error::AppError,
};

#[derive(Clone, Copy)]
pub struct AuthService<'a> {
    providers: &'a AuthProviders,
}

impl<'a> AuthService<'a> {
    pub fn new(providers: &'a AuthProviders) -> Self {
        Self { providers }
    }

    pub async fn register(&self, account: NewAccount) -> Result<user::Model, AppError> {
        self.providers.active()?.register(account).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenBundle, AppError> {
        self.providers.active()?.login(username, password).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
        self.providers.active()?.refresh(refresh_token).await
    }

    pub async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
        self.providers.active()?.verify(access_token).await
    }

    pub async fn seed_admin(&self, cfg: &AuthConfig) -> anyhow::Result<()> {
        self.providers.active()?.seed_admin(cfg).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::{
        auth::{Role, providers::AuthProviderId},
        db::dao::user_dao::tests::user_model,
    };

    use super::*;

    struct DelegatingProvider;

    fn bundle(access_token: String) -> TokenBundle {
        TokenBundle {
            access_token,
            refresh_token: "refresh".to_string(),
            token_type: "Bearer",
            expires_in: 900,
            roles: vec![Role::User],
        }
    }

    #[async_trait]
    impl crate::auth::providers::AuthProvider for DelegatingProvider {
        fn id(&self) -> AuthProviderId {
            AuthProviderId::Local
        }

        async fn register(&self, account: NewAccount) -> Result<user::Model, AppError> {
            Ok(user_model(Uuid::nil(), &account.username))
        }

        async fn login(&self, username: &str, _password: &str) -> Result<TokenBundle, AppError> {
            Ok(bundle(format!("login:{username}")))
        }

        async fn refresh(&self, refresh_token: &str) -> Result<TokenBundle, AppError> {
            Ok(bundle(format!("refresh:{refresh_token}")))
        }

        async fn verify(&self, access_token: &str) -> Result<Claims, AppError> {
            Ok(Claims {
                sub: access_token.to_string(),
                exp: 100,
                iat: 10,
                roles: vec![Role::User],
            })
        }
    }

    #[tokio::test]
    async fn delegates_to_the_active_provider() {
        let providers = AuthProviders::new(AuthProviderId::Local)
            .with_provider(Arc::new(DelegatingProvider))
            .expect("provider registration should succeed");
        let service = AuthService::new(&providers);

        let user = service
            .register(NewAccount {
                username: "karim".to_string(),
                email: "karim@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                password: "password123".to_string(),
                mobile_number: None,
                blood_group: None,
            })
            .await
            .expect("register should succeed");
        assert_eq!(user.username, "karim");

        let login = service
            .login("karim", "password123")
            .await
            .expect("login should succeed");
        assert_eq!(login.access_token, "login:karim");

        let refreshed = service
            .refresh("refresh-token-1")
            .await
            .expect("refresh should succeed");
        assert_eq!(refreshed.access_token, "refresh:refresh-token-1");

        let claims = service
            .verify("subject-1")
            .await
            .expect("verify should succeed");
        assert_eq!(claims.sub, "subject-1");
    }

    #[tokio::test]
    async fn missing_provider_is_an_internal_error() {
        let providers = AuthProviders::new(AuthProviderId::Local);
        let err = AuthService::new(&providers)
            .login("karim", "password123")
            .await
            .expect_err("no provider registered");

        assert!(matches!(err, AppError::Internal(_)));
    }
}

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    auth::{Role, TokenBundle},
    dto::{LoginRequest, RegistrationRequest, UserView},
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
    pub roles: Vec<Role>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .with_state(state)
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegistrationRequest>,
) -> ApiResult<UserView> {
    let account = body.into_account()?;
    let services = ServiceContext::from_state(state.as_ref());
    let user = services.auth(&state.auth_providers).register(account).await?;
    JsonApiResponse::created(user.into())
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<TokenResponse> {
    let (username, password) = body.into_credentials()?;
    let services = ServiceContext::from_state(state.as_ref());
    let tokens = services
        .auth(&state.auth_providers)
        .login(&username, &password)
        .await?;
    JsonApiResponse::ok(tokens.into())
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<TokenResponse> {
    let services = ServiceContext::from_state(state.as_ref());
    let tokens = services
        .auth(&state.auth_providers)
        .refresh(&body.refresh_token)
        .await?;
    JsonApiResponse::ok(tokens.into())
}

impl From<TokenBundle> for TokenResponse {
    fn from(bundle: TokenBundle) -> Self {
        Self {
            access_token: bundle.access_token,
            refresh_token: bundle.refresh_token,
            token_type: bundle.token_type,
            expires_in: bundle.expires_in,
            roles: bundle.roles,
        }
    }
}

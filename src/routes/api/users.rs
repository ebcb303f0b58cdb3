use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{UpdateMeRequest, UserView},
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/users/{id}", get(get_user))
        .with_state(state)
}

async fn me(State(state): State<Arc<AppState>>, claims: AuthGuard) -> ApiResult<UserView> {
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .get(&claims.user_id()?)
        .await?;
    JsonApiResponse::ok(user.into())
}

async fn update_me(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<UpdateMeRequest>,
) -> ApiResult<UserView> {
    let changes = body.into_changes()?;
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .update_identity(&claims.user_id()?, changes)
        .await?;
    JsonApiResponse::ok(user.into())
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    _claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<UserView> {
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .get(&id)
        .await?;
    JsonApiResponse::ok(user.into())
}

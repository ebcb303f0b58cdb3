use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    routing::{delete, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    auth::AdminRole,
    dto::UserView,
    middleware::AuthRoleGuard,
    response::{ApiResult, JsonApiResponse},
    services::ServiceContext,
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: Uuid,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/users/{id}/activate", post(activate_user))
        .route("/admin/users/{id}", delete(delete_user))
        .with_state(state)
}

async fn activate_user(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { claims, .. }: AuthRoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserView> {
    let user = ServiceContext::from_state(state.as_ref())
        .user()
        .activate(&id)
        .await?;
    tracing::info!(admin = %claims.sub, user_id = %id, "admin activated user");
    JsonApiResponse::ok(user.into())
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthRoleGuard { claims, .. }: AuthRoleGuard<AdminRole>,
    Path(id): Path<Uuid>,
) -> ApiResult<Deleted> {
    ServiceContext::from_state(state.as_ref())
        .user()
        .delete(&id)
        .await?;
    tracing::info!(admin = %claims.sub, user_id = %id, "admin deleted user");
    JsonApiResponse::ok(Deleted { id })
}

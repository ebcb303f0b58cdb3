use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    auth::Claims,
    db::dao::PaginatedResponse,
    dto::{CreateDonorProfileRequest, DonorProfilePatch, DonorProfileView, DonorSearchQuery},
    middleware::AuthGuard,
    response::{ApiResult, JsonApiResponse},
    services::{Caller, ServiceContext},
    state::AppState,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/donors", get(search).post(create))
        .route("/donors/me", get(get_mine).patch(update_mine))
        .route("/donors/{id}", get(get_one).patch(update_one))
        .with_state(state)
}

async fn create(
    State(state): State<Arc<AppState>>,
    claims: Option<Claims>,
    Json(body): Json<CreateDonorProfileRequest>,
) -> ApiResult<DonorProfileView> {
    let caller = claims.as_ref().map(Caller::from_claims).transpose()?;
    let draft = body.into_draft()?;
    let record = ServiceContext::from_state(state.as_ref())
        .donor_profile()
        .create(caller, draft)
        .await?;
    JsonApiResponse::created(record.into())
}

async fn search(
    State(state): State<Arc<AppState>>,
    _claims: AuthGuard,
    Query(query): Query<DonorSearchQuery>,
) -> ApiResult<PaginatedResponse<DonorProfileView>> {
    let (filters, page, page_size) = query.into_search()?;
    let found = ServiceContext::from_state(state.as_ref())
        .donor_profile()
        .search(filters, page, page_size)
        .await?;
    JsonApiResponse::ok(found.map(DonorProfileView::from))
}

async fn get_mine(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
) -> ApiResult<DonorProfileView> {
    let record = ServiceContext::from_state(state.as_ref())
        .donor_profile()
        .get_for_user(&claims.user_id()?)
        .await?;
    JsonApiResponse::ok(record.into())
}

async fn get_one(
    State(state): State<Arc<AppState>>,
    _claims: AuthGuard,
    Path(id): Path<Uuid>,
) -> ApiResult<DonorProfileView> {
    let record = ServiceContext::from_state(state.as_ref())
        .donor_profile()
        .get(&id)
        .await?;
    JsonApiResponse::ok(record.into())
}

async fn update_mine(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Json(body): Json<DonorProfilePatch>,
) -> ApiResult<DonorProfileView> {
    let caller = Caller::from_claims(&claims)?;
    let changes = body.into_changes()?;
    let record = ServiceContext::from_state(state.as_ref())
        .donor_profile()
        .update_for_user(caller, changes)
        .await?;
    JsonApiResponse::ok(record.into())
}

async fn update_one(
    State(state): State<Arc<AppState>>,
    claims: AuthGuard,
    Path(id): Path<Uuid>,
    Json(body): Json<DonorProfilePatch>,
) -> ApiResult<DonorProfileView> {
    let caller = Caller::from_claims(&claims)?;
    let changes = body.into_changes()?;
    let record = ServiceContext::from_state(state.as_ref())
        .donor_profile()
        .update(caller, &id, changes)
        .await?;
    JsonApiResponse::ok(record.into())
}

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};

use crate::api::error::ApiError;
use crate::api::models::{views, DataResponse, ExchangeView, ExchangesQuery};
use crate::api::state::AppState;

/// Merged live + custom snapshot, sorted and id-assigned.
pub async fn list_exchanges(
    State(state): State<AppState>,
    query: Result<Query<ExchangesQuery>, QueryRejection>,
) -> Result<Json<DataResponse<Vec<ExchangeView>>>, ApiError> {
    let Query(query) = query?;
    let records = state.service.snapshot(query.sort_by, query.descending).await?;
    Ok(Json(DataResponse::success(views(&records))))
}

/// Top venues by volume from the alternative provider.
pub async fn list_alternative_exchanges(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<ExchangeView>>>, ApiError> {
    let records = state.service.alternative_snapshot().await?;
    Ok(Json(DataResponse::success(views(&records))))
}

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::api::error::ApiError;
use crate::api::models::{HistoryQuery, HistoryResponse, STATUS_SUCCESS};
use crate::api::state::AppState;

pub async fn get_price_history(
    State(state): State<AppState>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let history = state.service.history(query.days, query.daily_close).await?;
    let body = HistoryResponse { status: STATUS_SUCCESS, history: &history };
    Ok(Json(body).into_response())
}

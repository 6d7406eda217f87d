use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::error::ApiError;
use crate::api::models::{DataResponse, DepthView};
use crate::api::state::AppState;

pub async fn get_depth(
    State(state): State<AppState>,
    Path(exchange): Path<String>,
) -> Result<Json<DataResponse<DepthView>>, ApiError> {
    let report = state.service.depth(&exchange).await?;
    Ok(Json(DataResponse::success(DepthView::from(report))))
}

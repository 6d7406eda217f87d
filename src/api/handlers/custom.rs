use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::api::error::ApiError;
use crate::api::models::{views, DataResponse, ExchangeView, MessageResponse};
use crate::api::state::AppState;
use crate::market_data::store::{CustomRecordInput, CustomRecordPatch};

pub async fn create_custom_exchange(
    State(state): State<AppState>,
    payload: Result<Json<CustomRecordInput>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(input) = payload?;
    input.validate()?;

    let record = state.service.store().put(input);
    Ok(Json(MessageResponse::success(format!(
        "exchange {} added or updated",
        record.exchange
    ))))
}

pub async fn list_custom_exchanges(State(state): State<AppState>) -> Json<DataResponse<Vec<ExchangeView>>> {
    Json(DataResponse::success(views(&state.service.store().list())))
}

pub async fn update_custom_exchange(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<CustomRecordPatch>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(patch) = payload?;
    patch.validate()?;

    let record = state.service.store().patch(&name, patch)?;
    let message = format!("exchange {} updated", name);
    Ok(Json(MessageResponse::success(message).with_data(ExchangeView::from(&record))))
}

pub async fn delete_custom_exchange(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.store().delete(&name)?;
    Ok(Json(MessageResponse::success(format!("exchange {} deleted", name))))
}

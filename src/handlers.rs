// region:    --- Imports
use crate::catalog::commands as catalog;
use crate::error::ShopError;
use crate::inventory::commands::{self, AddBucksCommand, PurchaseCommand};
use crate::message_broker::EventPublisher;
use crate::query;
use crate::scheduler::{DropScheduler, StdDropRandom};
use crate::shop::model::{ItemUpdate, NewItem};
use crate::store::ShopStore;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- App State
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ShopStore>,
    pub publisher: Arc<dyn EventPublisher>,
    pub scheduler: Arc<DropScheduler>,
}

/// 라우터 설정
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/drops", post(handle_trigger_drop))
        .route("/drops/active", get(handle_get_active_drops))
        .route("/rotations", post(handle_rotate))
        .route("/stats", get(handle_get_stats))
        .route("/items", get(handle_get_items).post(handle_add_item))
        .route("/items/hero", get(handle_get_hero_items))
        .route("/items/:id", get(handle_get_item).patch(handle_update_item))
        .route("/items/:id/popularity", get(handle_get_item_popularity))
        .route("/inventory/:user_id", get(handle_get_inventory))
        .route("/inventory/:user_id/purchase", post(handle_purchase))
        .route("/inventory/:user_id/bucks", post(handle_add_bucks))
        .with_state(state)
}
// endregion: --- App State

// region:    --- Command Handlers

/// 수동 드롭 요청
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerDropCommand {
    pub item_id: Option<String>,
    pub duration_hours: Option<i32>,
}

/// 잘못된 JSON 본문은 INVALID_ARGUMENT 로 응답
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ShopError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("{:<12} --> 요청 본문 오류: {}", "Handler", rejection.body_text());
        ShopError::from(rejection)
    })
}

/// 수동 드롭 생성 (관리자)
pub async fn handle_trigger_drop(
    State(state): State<AppState>,
    payload: Result<Json<TriggerDropCommand>, JsonRejection>,
) -> impl IntoResponse {
    let cmd = match json_body(payload) {
        Ok(cmd) => cmd,
        Err(e) => return e.into_response(),
    };
    info!("{:<12} --> 수동 드롭 요청: {:?}", "Handler", cmd);
    let mut random = StdDropRandom::new();
    match state
        .scheduler
        .create_drop(
            cmd.item_id.as_deref(),
            cmd.duration_hours,
            Utc::now(),
            &mut random,
        )
        .await
    {
        Ok(drop_id) => Json(serde_json::json!({
            "success": true,
            "dropId": drop_id
        }))
        .into_response(),
        Err(e) => {
            error!("{:<12} --> 드롭 생성 실패: {:?}", "Handler", e);
            e.into_response()
        }
    }
}

/// 로테이션 즉시 실행 (관리자)
pub async fn handle_rotate(State(state): State<AppState>) -> impl IntoResponse {
    info!("{:<12} --> 로테이션 수동 실행", "Handler");
    let mut random = StdDropRandom::new();
    match state.scheduler.rotate(Utc::now(), &mut random).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("{:<12} --> 로테이션 실패: {:?}", "Handler", e);
            e.into_response()
        }
    }
}

/// 구매
pub async fn handle_purchase(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<PurchaseCommand>, JsonRejection>,
) -> impl IntoResponse {
    let cmd = match json_body(payload) {
        Ok(cmd) => cmd,
        Err(e) => return e.into_response(),
    };
    match commands::handle_purchase(
        state.store.as_ref(),
        state.publisher.as_ref(),
        &user_id,
        cmd,
        Utc::now(),
    )
    .await
    {
        Ok(inventory) => Json(inventory).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 허바 벅스 충전
pub async fn handle_add_bucks(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<AddBucksCommand>, JsonRejection>,
) -> impl IntoResponse {
    let cmd = match json_body(payload) {
        Ok(cmd) => cmd,
        Err(e) => return e.into_response(),
    };
    match commands::handle_add_bucks(state.store.as_ref(), &user_id, cmd).await {
        Ok(balance) => Json(serde_json::json!({ "hubbaBucks": balance })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 상품 등록 (관리자)
pub async fn handle_add_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> impl IntoResponse {
    let item = match json_body(payload) {
        Ok(item) => item,
        Err(e) => return e.into_response(),
    };
    match catalog::handle_add_item(state.store.as_ref(), item, Utc::now()).await {
        Ok(item) => (StatusCode::CREATED, Json(item)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 상품 수정 (관리자)
pub async fn handle_update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    payload: Result<Json<ItemUpdate>, JsonRejection>,
) -> impl IntoResponse {
    let update = match json_body(payload) {
        Ok(update) => update,
        Err(e) => return e.into_response(),
    };
    match catalog::handle_update_item(state.store.as_ref(), &item_id, update, Utc::now()).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 샵 통계 조회
pub async fn handle_get_stats(State(state): State<AppState>) -> impl IntoResponse {
    match query::handlers::shop_stats(state.store.as_ref()).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemsFilter {
    pub category: Option<String>,
}

/// 상품 목록 조회
pub async fn handle_get_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemsFilter>,
) -> impl IntoResponse {
    match query::handlers::list_items(state.store.as_ref(), filter.category.as_deref()).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 히어로 아이템 조회
pub async fn handle_get_hero_items(State(state): State<AppState>) -> impl IntoResponse {
    match query::handlers::hero_items(state.store.as_ref()).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 상품 조회
pub async fn handle_get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    match query::handlers::get_item(state.store.as_ref(), &item_id).await {
        Ok(item) => Json(item).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 상품 인기도 조회
pub async fn handle_get_item_popularity(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> impl IntoResponse {
    match query::handlers::item_popularity(state.store.as_ref(), &item_id).await {
        Ok(popularity) => Json(popularity).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 활성 드롭 조회
pub async fn handle_get_active_drops(State(state): State<AppState>) -> impl IntoResponse {
    match query::handlers::active_drops(state.store.as_ref()).await {
        Ok(drops) => Json(drops).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 인벤토리 조회
pub async fn handle_get_inventory(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    match commands::get_inventory(state.store.as_ref(), &user_id).await {
        Ok(inventory) => Json(inventory).into_response(),
        Err(e) => e.into_response(),
    }
}

// endregion: --- Query Handlers

// region:    --- Imports
use crate::error::ShopError;
use crate::shop::model::{ItemDrop, ItemPopularity, ShopItem, ShopStats};
use crate::store::ShopStore;
use chrono::Utc;
use tracing::{error, info};

// endregion: --- Imports

// region:    --- Query Handlers

/// 샵 통계 조회
pub async fn shop_stats(store: &dyn ShopStore) -> Result<ShopStats, ShopError> {
    info!("{:<12} --> 샵 통계 조회", "Query");
    store.shop_stats(Utc::now()).await.map_err(|e| {
        error!("{:<12} --> 샵 통계 조회 실패: {:?}", "Query", e);
        e
    })
}

/// 상품 목록 조회 (카테고리 지정 시 필터)
pub async fn list_items(
    store: &dyn ShopStore,
    category: Option<&str>,
) -> Result<Vec<ShopItem>, ShopError> {
    match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(category) => {
            info!("{:<12} --> 카테고리별 상품 조회: {}", "Query", category);
            store.items_by_category(category).await
        }
        None => {
            info!("{:<12} --> 모든 상품 조회", "Query");
            store.all_items().await
        }
    }
}

/// 히어로 아이템 조회
pub async fn hero_items(store: &dyn ShopStore) -> Result<Vec<ShopItem>, ShopError> {
    info!("{:<12} --> 히어로 아이템 조회", "Query");
    store.hero_items().await
}

/// 활성 드롭 조회
pub async fn active_drops(store: &dyn ShopStore) -> Result<Vec<ItemDrop>, ShopError> {
    info!("{:<12} --> 활성 드롭 조회", "Query");
    store.active_drops().await
}

/// 상품 조회
pub async fn get_item(store: &dyn ShopStore, item_id: &str) -> Result<ShopItem, ShopError> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", item_id);
    store
        .get_item(item_id)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("item {item_id}")))
}

/// 상품 인기도 조회
pub async fn item_popularity(
    store: &dyn ShopStore,
    item_id: &str,
) -> Result<ItemPopularity, ShopError> {
    info!("{:<12} --> 상품 인기도 조회 id: {}", "Query", item_id);
    store
        .item_popularity(item_id)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("popularity {item_id}")))
}

// endregion: --- Query Handlers

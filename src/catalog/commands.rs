/// 상품 카탈로그 관리 커맨드 (관리자)
/// 1. 상품 등록
/// 2. 상품 수정
// region:    --- Imports
use crate::error::ShopError;
use crate::shop::model::{ItemUpdate, NewItem, ShopItem};
use crate::store::ShopStore;
use chrono::{DateTime, Utc};
use tracing::info;

// endregion: --- Imports

// region:    --- Commands
fn require_text(value: &str, name: &str) -> Result<String, ShopError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ShopError::InvalidArgument(format!("{name} is required")));
    }
    Ok(value.to_string())
}

fn require_price(price: i64) -> Result<i64, ShopError> {
    if price < 0 {
        return Err(ShopError::InvalidArgument(format!(
            "price must not be negative: {price}"
        )));
    }
    Ok(price)
}

/// 1. 상품 등록
pub async fn handle_add_item(
    store: &dyn ShopStore,
    item: NewItem,
    now: DateTime<Utc>,
) -> Result<ShopItem, ShopError> {
    info!("{:<12} --> 상품 등록 요청: {}", "Command", item.item_id);
    let item = NewItem {
        item_id: require_text(&item.item_id, "itemId")?,
        name: require_text(&item.name, "name")?,
        brand: require_text(&item.brand, "brand")?,
        item_type: require_text(&item.item_type, "type")?,
        category: require_text(&item.category, "category")?,
        price: require_price(item.price)?,
        ..item
    };
    store.add_item(&item, now).await
}

/// 2. 상품 수정
pub async fn handle_update_item(
    store: &dyn ShopStore,
    item_id: &str,
    update: ItemUpdate,
    now: DateTime<Utc>,
) -> Result<ShopItem, ShopError> {
    info!("{:<12} --> 상품 수정 요청: {} {:?}", "Command", item_id, update);
    let item_id = require_text(item_id, "itemId")?;
    if update.is_empty() {
        return Err(ShopError::InvalidArgument(
            "at least one field must be updated".to_string(),
        ));
    }

    let trimmed = |value: Option<String>, name: &str| -> Result<Option<String>, ShopError> {
        value.map(|v| require_text(&v, name)).transpose()
    };
    let update = ItemUpdate {
        name: trimmed(update.name, "name")?,
        brand: trimmed(update.brand, "brand")?,
        item_type: trimmed(update.item_type, "type")?,
        category: trimmed(update.category, "category")?,
        price: update.price.map(require_price).transpose()?,
        ..update
    };

    store
        .update_item(&item_id, &update, now)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("item {item_id}")))
}

// endregion: --- Commands

/// 인벤토리 관련 커맨드 처리
/// 1. 구매
/// 2. 허바 벅스 충전
// region:    --- Imports
use crate::error::ShopError;
use crate::message_broker::EventPublisher;
use crate::shop::events::ShopEvent;
use crate::shop::model::UserInventory;
use crate::store::ShopStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands
/// 구매 명령
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCommand {
    pub item_id: Option<String>,
}

/// 충전 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AddBucksCommand {
    pub amount: i64,
}

fn require(value: Option<&str>, name: &str) -> Result<String, ShopError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ShopError::InvalidArgument(format!("{name} is required")))
}

/// 인벤토리 조회
pub async fn get_inventory(
    store: &dyn ShopStore,
    user_id: &str,
) -> Result<UserInventory, ShopError> {
    let user_id = require(Some(user_id), "userId")?;
    info!("{:<12} --> 인벤토리 조회: {}", "Command", user_id);
    store.inventory(&user_id).await
}

/// 1. 구매
pub async fn handle_purchase(
    store: &dyn ShopStore,
    publisher: &dyn EventPublisher,
    user_id: &str,
    cmd: PurchaseCommand,
    now: DateTime<Utc>,
) -> Result<UserInventory, ShopError> {
    info!("{:<12} --> 구매 요청 처리 시작: {:?}", "Command", cmd);
    let user_id = require(Some(user_id), "userId")?;
    let item_id = require(cmd.item_id.as_deref(), "itemId")?;

    let inventory = store.purchase_item(&user_id, &item_id, now).await?;

    // 방금 추가된 아이템의 결제 금액
    let price = inventory
        .items
        .iter()
        .rev()
        .find(|i| i.item_id == item_id)
        .map(|i| i.price)
        .unwrap_or_default();

    let event = ShopEvent::ItemPurchased {
        user_id,
        item_id,
        price,
        timestamp: now,
    };
    if let Err(e) = publisher.publish(&event).await {
        warn!("{:<12} --> 구매 이벤트 발행 실패: {}", "Command", e);
    }

    Ok(inventory)
}

/// 2. 허바 벅스 충전
pub async fn handle_add_bucks(
    store: &dyn ShopStore,
    user_id: &str,
    cmd: AddBucksCommand,
) -> Result<i64, ShopError> {
    info!("{:<12} --> 허바 벅스 충전: {} +{}", "Command", user_id, cmd.amount);
    let user_id = require(Some(user_id), "userId")?;
    if cmd.amount <= 0 {
        return Err(ShopError::InvalidArgument(format!(
            "amount must be positive: {}",
            cmd.amount
        )));
    }
    store.add_hubba_bucks(&user_id, cmd.amount).await
}

// endregion: --- Commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 샵 이벤트 (Kafka 로 발행)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ShopEvent {
    // 드롭 생성 이벤트
    DropCreated {
        drop_id: String,
        item_id: String,
        duration_hours: i32,
        timestamp: DateTime<Utc>,
    },
    // 드롭 만료 이벤트
    DropsExpired {
        count: usize,
        timestamp: DateTime<Utc>,
    },
    // 구매 이벤트
    ItemPurchased {
        user_id: String,
        item_id: String,
        price: i64,
        timestamp: DateTime<Utc>,
    },
}

impl ShopEvent {
    /// 메시지 키
    pub fn key(&self) -> String {
        match self {
            ShopEvent::DropCreated { item_id, .. } => item_id.clone(),
            ShopEvent::DropsExpired { .. } => "rotation".to_string(),
            ShopEvent::ItemPurchased { user_id, .. } => user_id.clone(),
        }
    }
}

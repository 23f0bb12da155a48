/// 구매 분석 컨슈머
/// 구매 이벤트를 받아 구매 이력을 남기고 상품 인기도를 갱신한다.
// region:    --- Imports
use crate::error::ShopError;
use crate::message_broker::KafkaConsumer;
use crate::shop::events::ShopEvent;
use crate::shop::model::PurchaseRecord;
use crate::store::ShopStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Purchase Consumer
pub struct PurchaseConsumer {
    store: Arc<dyn ShopStore>,
    kafka_consumer: Arc<KafkaConsumer>,
    topic: String,
}

impl PurchaseConsumer {
    pub fn new(store: Arc<dyn ShopStore>, kafka_consumer: Arc<KafkaConsumer>, topic: &str) -> Self {
        Self {
            store,
            kafka_consumer,
            topic: topic.to_string(),
        }
    }

    /// 이벤트 소비 시작
    pub async fn start(&self) {
        let store = Arc::clone(&self.store);
        if let Err(e) = self
            .kafka_consumer
            .consume_events(&self.topic, move |event| {
                let store = Arc::clone(&store);
                Box::pin(async move {
                    if let Err(e) = process_event(store.as_ref(), event, Utc::now()).await {
                        error!("{:<12} --> 이벤트 처리 오류: {:?}", "Analytics", e);
                    }
                    Ok(())
                })
            })
            .await
        {
            error!("{:<12} --> 이벤트 소비 오류: {:?}", "Analytics", e);
        }
    }
}

/// 이벤트 처리
pub async fn process_event(
    store: &dyn ShopStore,
    event: ShopEvent,
    now: DateTime<Utc>,
) -> Result<(), ShopError> {
    match event {
        ShopEvent::ItemPurchased {
            user_id,
            item_id,
            price,
            timestamp,
        } => {
            let record = PurchaseRecord {
                user_id,
                item_id,
                price,
                purchased_at: timestamp,
                recorded_at: now,
            };
            store.record_purchase(&record).await?;
            info!(
                "{:<12} --> 구매 기록: user={}, item={}",
                "Analytics", record.user_id, record.item_id
            );
        }
        other => debug!("{:<12} --> 처리 대상 아님: {:?}", "Analytics", other),
    }
    Ok(())
}
// endregion: --- Purchase Consumer

/// 샵 저장소
/// 스케줄러와 핸들러는 이 트레이트만 바라보며, 모든 상태는 저장소에만 존재한다.
// region:    --- Imports
use crate::error::ShopError;
use crate::shop::model::{
    ItemDrop, ItemPopularity, ItemUpdate, NewDrop, NewItem, PromotionOutcome, PurchaseRecord,
    ShopItem, ShopStats, UserInventory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;
pub mod postgres;

pub use memory::MemoryShopStore;
pub use postgres::PostgresShopStore;

// endregion: --- Imports

// region:    --- Shop Store Trait
#[async_trait]
pub trait ShopStore: Send + Sync {
    /// 활성 드롭 전체
    async fn active_drops(&self) -> Result<Vec<ItemDrop>, ShopError>;

    /// 드롭 비활성화 및 히어로 해제 (하나의 배치로 원자적 처리)
    async fn deactivate_drops(
        &self,
        drops: &[ItemDrop],
        now: DateTime<Utc>,
    ) -> Result<(), ShopError>;

    /// 드롭 대상 상품 (히어로 아님, 재고 있음)
    async fn eligible_items(&self) -> Result<Vec<ShopItem>, ShopError>;

    /// 드롭 생성 및 아이템 승격 (하나의 배치로 원자적 처리)
    async fn promote_item(&self, drop: &NewDrop) -> Result<PromotionOutcome, ShopError>;

    async fn shop_stats(&self, now: DateTime<Utc>) -> Result<ShopStats, ShopError>;

    async fn all_items(&self) -> Result<Vec<ShopItem>, ShopError>;

    async fn hero_items(&self) -> Result<Vec<ShopItem>, ShopError>;

    async fn items_by_category(&self, category: &str) -> Result<Vec<ShopItem>, ShopError>;

    async fn get_item(&self, item_id: &str) -> Result<Option<ShopItem>, ShopError>;

    /// 상품 등록 (같은 item_id 가 있으면 AlreadyExists)
    async fn add_item(&self, item: &NewItem, now: DateTime<Utc>) -> Result<ShopItem, ShopError>;

    /// 상품 수정, 없는 상품이면 None
    async fn update_item(
        &self,
        item_id: &str,
        update: &ItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<ShopItem>, ShopError>;

    /// 인벤토리 조회 (없으면 시작 잔액으로 생성)
    async fn inventory(&self, user_id: &str) -> Result<UserInventory, ShopError>;

    /// 구매 처리: 잔액 차감 및 인벤토리 추가
    async fn purchase_item(
        &self,
        user_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UserInventory, ShopError>;

    /// 허바 벅스 충전 후 잔액 반환
    async fn add_hubba_bucks(&self, user_id: &str, amount: i64) -> Result<i64, ShopError>;

    /// 구매 이력 기록 및 인기도 갱신
    async fn record_purchase(&self, record: &PurchaseRecord) -> Result<(), ShopError>;

    async fn item_popularity(&self, item_id: &str) -> Result<Option<ItemPopularity>, ShopError>;
}
// endregion: --- Shop Store Trait

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use hubba_shop::config::Config;
use hubba_shop::error::ShopError;
use hubba_shop::message_broker::RecordingPublisher;
use hubba_shop::scheduler::{DropRandom, DropScheduler};
use hubba_shop::shop::model::{
    ItemDrop, ItemPopularity, ItemUpdate, NewDrop, NewItem, PromotionOutcome, PurchaseRecord,
    Rarity, ShopItem, ShopStats, UserInventory,
};
use hubba_shop::store::{MemoryShopStore, ShopStore};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};

static TRACING: Once = Once::new();

/// 트레이싱 초기화
pub fn init_tracing() {
    TRACING.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .without_time()
            .with_target(false)
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// 고정 기준 시각
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost/hubba_test".to_string()),
        _ => None,
    })
    .unwrap()
}

/// 테스트용 상품 생성
pub fn item(item_id: &str, rarity: Rarity) -> ShopItem {
    ShopItem {
        item_id: item_id.to_string(),
        name: format!("{item_id} deck"),
        brand: "Hubba".to_string(),
        item_type: "deck".to_string(),
        category: "decks".to_string(),
        price: 500,
        rarity,
        in_stock: true,
        is_hero_item: false,
        is_limited_time: false,
        available_until: None,
        created_at: base_time() - Duration::days(30),
        updated_at: base_time() - Duration::days(30),
    }
}

/// 히어로 상태의 상품 생성
pub fn hero_item(item_id: &str, rarity: Rarity, until: DateTime<Utc>) -> ShopItem {
    ShopItem {
        is_hero_item: true,
        is_limited_time: true,
        available_until: Some(until),
        ..item(item_id, rarity)
    }
}

/// 테스트용 활성 드롭 생성
pub fn active_drop(drop_id: &str, item_id: &str, start: DateTime<Utc>, hours: i32) -> ItemDrop {
    ItemDrop {
        drop_id: drop_id.to_string(),
        item_id: item_id.to_string(),
        drop_date: start,
        is_active: true,
        rotation_duration: hours,
        rarity_weight: 0.42,
    }
}

pub struct Harness {
    pub store: Arc<MemoryShopStore>,
    pub publisher: Arc<RecordingPublisher>,
    pub scheduler: DropScheduler,
}

pub fn harness(store: MemoryShopStore) -> Harness {
    init_tracing();
    let store = Arc::new(store);
    let publisher = Arc::new(RecordingPublisher::default());
    let scheduler = DropScheduler::new(store.clone(), publisher.clone(), &test_config());
    Harness {
        store,
        publisher,
        scheduler,
    }
}

/// 정해진 순서대로 값을 돌려주는 난수
pub struct ScriptedRandom {
    pub count: usize,
    pub draws: VecDeque<f64>,
    pub picks: VecDeque<usize>,
}

impl ScriptedRandom {
    pub fn new(count: usize, draws: &[f64], picks: &[usize]) -> Self {
        Self {
            count,
            draws: draws.iter().copied().collect(),
            picks: picks.iter().copied().collect(),
        }
    }
}

impl DropRandom for ScriptedRandom {
    fn drop_count(&mut self) -> usize {
        self.count
    }

    fn rarity_draw(&mut self) -> f64 {
        self.draws.pop_front().expect("rarity draw 부족")
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0) % len
    }

    fn tie_break(&mut self) -> f64 {
        0.5
    }
}

/// 지정한 횟수만큼 저장소 오류를 내는 저장소
/// 나머지 호출은 메모리 저장소로 넘긴다.
pub struct FailingStore {
    pub inner: MemoryShopStore,
    read_failures: Mutex<usize>,
    promotions_before_failure: Mutex<Option<usize>>,
}

impl FailingStore {
    pub fn new(inner: MemoryShopStore) -> Self {
        Self {
            inner,
            read_failures: Mutex::new(0),
            promotions_before_failure: Mutex::new(None),
        }
    }

    /// 처음 n 번의 조회(active_drops, eligible_items)를 실패시킨다
    pub fn failing_reads(self, n: usize) -> Self {
        *self.read_failures.lock().unwrap() = n;
        self
    }

    /// n 번 승격에 성공한 뒤부터 승격을 실패시킨다
    pub fn failing_promotions_after(self, n: usize) -> Self {
        *self.promotions_before_failure.lock().unwrap() = Some(n);
        self
    }

    fn read(&self) -> Result<(), ShopError> {
        let mut remaining = self.read_failures.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(ShopError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    fn promotion(&self) -> Result<(), ShopError> {
        match self.promotions_before_failure.lock().unwrap().as_mut() {
            Some(0) => Err(ShopError::from(sqlx::Error::PoolTimedOut)),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ShopStore for FailingStore {
    async fn active_drops(&self) -> Result<Vec<ItemDrop>, ShopError> {
        self.read()?;
        self.inner.active_drops().await
    }

    async fn deactivate_drops(
        &self,
        drops: &[ItemDrop],
        now: DateTime<Utc>,
    ) -> Result<(), ShopError> {
        self.inner.deactivate_drops(drops, now).await
    }

    async fn eligible_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        self.read()?;
        self.inner.eligible_items().await
    }

    async fn promote_item(&self, drop: &NewDrop) -> Result<PromotionOutcome, ShopError> {
        self.promotion()?;
        self.inner.promote_item(drop).await
    }

    async fn shop_stats(&self, now: DateTime<Utc>) -> Result<ShopStats, ShopError> {
        self.inner.shop_stats(now).await
    }

    async fn all_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        self.inner.all_items().await
    }

    async fn hero_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        self.inner.hero_items().await
    }

    async fn items_by_category(&self, category: &str) -> Result<Vec<ShopItem>, ShopError> {
        self.inner.items_by_category(category).await
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<ShopItem>, ShopError> {
        self.inner.get_item(item_id).await
    }

    async fn add_item(&self, item: &NewItem, now: DateTime<Utc>) -> Result<ShopItem, ShopError> {
        self.inner.add_item(item, now).await
    }

    async fn update_item(
        &self,
        item_id: &str,
        update: &ItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<ShopItem>, ShopError> {
        self.inner.update_item(item_id, update, now).await
    }

    async fn inventory(&self, user_id: &str) -> Result<UserInventory, ShopError> {
        self.inner.inventory(user_id).await
    }

    async fn purchase_item(
        &self,
        user_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UserInventory, ShopError> {
        self.inner.purchase_item(user_id, item_id, now).await
    }

    async fn add_hubba_bucks(&self, user_id: &str, amount: i64) -> Result<i64, ShopError> {
        self.inner.add_hubba_bucks(user_id, amount).await
    }

    async fn record_purchase(&self, record: &PurchaseRecord) -> Result<(), ShopError> {
        self.inner.record_purchase(record).await
    }

    async fn item_popularity(&self, item_id: &str) -> Result<Option<ItemPopularity>, ShopError> {
        self.inner.item_popularity(item_id).await
    }
}

/// 실패하는 저장소 위의 스케줄러
pub fn failing_scheduler(
    store: FailingStore,
) -> (Arc<FailingStore>, Arc<RecordingPublisher>, DropScheduler) {
    init_tracing();
    let store = Arc::new(store);
    let publisher = Arc::new(RecordingPublisher::default());
    let scheduler = DropScheduler::new(store.clone(), publisher.clone(), &test_config());
    (store, publisher, scheduler)
}

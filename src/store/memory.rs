/// 메모리 저장소
/// Postgres 구현과 같은 규칙을 따르며, 테스트와 로컬 실행에 사용한다.
// region:    --- Imports
use super::ShopStore;
use crate::error::ShopError;
use crate::shop::model::{
    InventoryItem, ItemDrop, ItemPopularity, ItemUpdate, NewDrop, NewItem, PromotionOutcome,
    PurchaseRecord, ShopItem, ShopStats, UserInventory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

// endregion: --- Imports

// region:    --- Memory Shop Store
#[derive(Default)]
struct MemoryState {
    items: BTreeMap<String, ShopItem>,
    drops: Vec<ItemDrop>,
    inventories: HashMap<String, UserInventory>,
    purchases: Vec<PurchaseRecord>,
    popularity: HashMap<String, ItemPopularity>,
    writes: usize,
}

#[derive(Default)]
pub struct MemoryShopStore {
    state: Mutex<MemoryState>,
}

impl MemoryShopStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 상품 목록으로 저장소 생성
    pub fn with_items(items: Vec<ShopItem>) -> Self {
        let state = MemoryState {
            items: items
                .into_iter()
                .map(|item| (item.item_id.clone(), item))
                .collect(),
            ..MemoryState::default()
        };
        Self {
            state: Mutex::new(state),
        }
    }

    /// 드롭 직접 추가 (쓰기 횟수에 포함하지 않음)
    pub async fn insert_drop(&self, drop: ItemDrop) {
        self.state.lock().await.drops.push(drop);
    }

    /// 상품 직접 추가 (쓰기 횟수에 포함하지 않음)
    pub async fn insert_item(&self, item: ShopItem) {
        self.state
            .lock()
            .await
            .items
            .insert(item.item_id.clone(), item);
    }

    pub async fn drops(&self) -> Vec<ItemDrop> {
        self.state.lock().await.drops.clone()
    }

    pub async fn drop_by_id(&self, drop_id: &str) -> Option<ItemDrop> {
        self.state
            .lock()
            .await
            .drops
            .iter()
            .find(|d| d.drop_id == drop_id)
            .cloned()
    }

    pub async fn purchases(&self) -> Vec<PurchaseRecord> {
        self.state.lock().await.purchases.clone()
    }

    /// 커밋된 쓰기 배치 수
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.writes
    }
}

#[async_trait]
impl ShopStore for MemoryShopStore {
    async fn active_drops(&self) -> Result<Vec<ItemDrop>, ShopError> {
        let state = self.state.lock().await;
        Ok(state.drops.iter().filter(|d| d.is_active).cloned().collect())
    }

    async fn deactivate_drops(
        &self,
        drops: &[ItemDrop],
        now: DateTime<Utc>,
    ) -> Result<(), ShopError> {
        let mut state = self.state.lock().await;
        for expired in drops {
            let Some(drop) = state
                .drops
                .iter_mut()
                .find(|d| d.drop_id == expired.drop_id && d.is_active)
            else {
                continue;
            };
            drop.is_active = false;
            if let Some(item) = state.items.get_mut(&expired.item_id) {
                item.is_hero_item = false;
                item.is_limited_time = false;
                item.available_until = None;
                item.updated_at = now;
            }
        }
        state.writes += 1;
        Ok(())
    }

    async fn eligible_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.is_eligible_for_drop())
            .cloned()
            .collect())
    }

    async fn promote_item(&self, drop: &NewDrop) -> Result<PromotionOutcome, ShopError> {
        let mut state = self.state.lock().await;
        let item = match state.items.get_mut(&drop.item_id) {
            Some(item) => item,
            None => return Ok(PromotionOutcome::ItemNotFound),
        };
        if item.is_hero_item {
            return Ok(PromotionOutcome::AlreadyPromoted);
        }

        item.is_hero_item = true;
        item.is_limited_time = true;
        item.available_until = Some(drop.available_until());
        item.updated_at = drop.drop_date;

        state.drops.push(drop.clone().into_drop());
        state.writes += 1;
        Ok(PromotionOutcome::Created(drop.drop_id.clone()))
    }

    async fn shop_stats(&self, now: DateTime<Utc>) -> Result<ShopStats, ShopError> {
        let state = self.state.lock().await;
        let mut stats = ShopStats::empty(now);
        stats.total_items = state.items.len() as i64;
        stats.active_drops = state.drops.iter().filter(|d| d.is_active).count() as i64;
        for item in state.items.values() {
            *stats.items_by_rarity.entry(item.rarity).or_insert(0) += 1;
        }
        Ok(stats)
    }

    async fn all_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        let state = self.state.lock().await;
        let mut items: Vec<ShopItem> = state.items.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn hero_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        let state = self.state.lock().await;
        let mut items: Vec<ShopItem> = state
            .items
            .values()
            .filter(|item| item.is_hero_item)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.available_until.cmp(&b.available_until));
        Ok(items)
    }

    async fn items_by_category(&self, category: &str) -> Result<Vec<ShopItem>, ShopError> {
        let state = self.state.lock().await;
        let mut items: Vec<ShopItem> = state
            .items
            .values()
            .filter(|item| item.category == category)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<ShopItem>, ShopError> {
        Ok(self.state.lock().await.items.get(item_id).cloned())
    }

    async fn add_item(&self, item: &NewItem, now: DateTime<Utc>) -> Result<ShopItem, ShopError> {
        let mut state = self.state.lock().await;
        if state.items.contains_key(&item.item_id) {
            return Err(ShopError::AlreadyExists(item.item_id.clone()));
        }
        let created = item.clone().into_item(now);
        state.items.insert(created.item_id.clone(), created.clone());
        state.writes += 1;
        Ok(created)
    }

    async fn update_item(
        &self,
        item_id: &str,
        update: &ItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<ShopItem>, ShopError> {
        let mut state = self.state.lock().await;
        let Some(item) = state.items.get_mut(item_id) else {
            return Ok(None);
        };
        update.apply(item, now);
        let updated = item.clone();
        state.writes += 1;
        Ok(Some(updated))
    }

    async fn inventory(&self, user_id: &str) -> Result<UserInventory, ShopError> {
        let mut state = self.state.lock().await;
        let inventory = state
            .inventories
            .entry(user_id.to_string())
            .or_insert_with(|| UserInventory::new(user_id));
        Ok(inventory.clone())
    }

    async fn purchase_item(
        &self,
        user_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UserInventory, ShopError> {
        let mut state = self.state.lock().await;

        let item = state
            .items
            .get(item_id)
            .cloned()
            .ok_or_else(|| ShopError::NotFound(format!("item {item_id}")))?;
        if !item.in_stock {
            return Err(ShopError::OutOfStock(item.item_id));
        }

        let inventory = state
            .inventories
            .entry(user_id.to_string())
            .or_insert_with(|| UserInventory::new(user_id));
        if inventory.hubba_bucks < item.price {
            return Err(ShopError::InsufficientFunds {
                balance: inventory.hubba_bucks,
                price: item.price,
            });
        }

        inventory.hubba_bucks -= item.price;
        inventory.items.push(InventoryItem {
            item_id: item.item_id,
            price: item.price,
            purchased_at: now,
        });
        let inventory = inventory.clone();
        state.writes += 1;
        Ok(inventory)
    }

    async fn add_hubba_bucks(&self, user_id: &str, amount: i64) -> Result<i64, ShopError> {
        let mut state = self.state.lock().await;
        let inventory = state
            .inventories
            .entry(user_id.to_string())
            .or_insert_with(|| UserInventory::new(user_id));
        let balance = inventory.hubba_bucks.checked_add(amount).ok_or_else(|| {
            ShopError::InvalidArgument(format!("amount overflows balance: {amount}"))
        })?;
        inventory.hubba_bucks = balance;
        state.writes += 1;
        Ok(balance)
    }

    async fn record_purchase(&self, record: &PurchaseRecord) -> Result<(), ShopError> {
        let mut state = self.state.lock().await;
        state.purchases.push(record.clone());
        state
            .popularity
            .entry(record.item_id.clone())
            .and_modify(|p| {
                p.purchases += 1;
                p.last_purchased = record.recorded_at;
            })
            .or_insert_with(|| ItemPopularity {
                item_id: record.item_id.clone(),
                purchases: 1,
                last_purchased: record.recorded_at,
            });
        state.writes += 1;
        Ok(())
    }

    async fn item_popularity(&self, item_id: &str) -> Result<Option<ItemPopularity>, ShopError> {
        Ok(self.state.lock().await.popularity.get(item_id).cloned())
    }
}
// endregion: --- Memory Shop Store

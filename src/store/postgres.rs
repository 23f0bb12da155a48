// region:    --- Imports
use super::ShopStore;
use crate::database::DatabaseManager;
use crate::error::ShopError;
use crate::query::queries;
use crate::shop::model::{
    InventoryItem, ItemDrop, ItemPopularity, ItemUpdate, NewDrop, NewItem, PromotionOutcome,
    PurchaseRecord, Rarity, ShopItem, ShopStats, UserInventory, STARTING_HUBBA_BUCKS,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Shop Store
/// Postgres 저장소 구현체
pub struct PostgresShopStore {
    db_manager: Arc<DatabaseManager>,
}

impl PostgresShopStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }

    /// 상품 목록 조회
    async fn fetch_items(
        &self,
        sql: String,
        bind: Option<String>,
    ) -> Result<Vec<ShopItem>, ShopError> {
        self.db_manager
            .transaction(move |tx| {
                Box::pin(async move {
                    let mut query = sqlx::query_as::<sqlx::Postgres, ShopItem>(&sql);
                    if let Some(value) = bind {
                        query = query.bind(value);
                    }
                    query.fetch_all(&mut **tx).await
                })
            })
            .await
            .map_err(ShopError::from)
    }
}

#[async_trait]
impl ShopStore for PostgresShopStore {
    async fn active_drops(&self) -> Result<Vec<ItemDrop>, ShopError> {
        let drops = sqlx::query_as::<_, ItemDrop>(queries::GET_ACTIVE_DROPS)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(drops)
    }

    async fn deactivate_drops(
        &self,
        drops: &[ItemDrop],
        now: DateTime<Utc>,
    ) -> Result<(), ShopError> {
        // 트랜잭션 시작
        let mut tx = self.db_manager.pool().begin().await?;

        for drop in drops {
            let deactivated = sqlx::query(queries::DEACTIVATE_DROP)
                .bind(&drop.drop_id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            // 다른 실행이 이미 내린 드롭이면 그 사이 재승격됐을 수 있으므로 상품은 건드리지 않는다
            if deactivated == 0 {
                debug!("{:<12} --> 이미 비활성화된 드롭: {}", "Store", drop.drop_id);
                continue;
            }

            sqlx::query(queries::CLEAR_HERO_ITEM)
                .bind(&drop.item_id)
                .bind(now)
                .execute(&mut *tx)
                .await?;
        }

        // 트랜잭션 커밋
        tx.commit().await?;
        debug!("{:<12} --> 드롭 {}개 비활성화 커밋", "Store", drops.len());
        Ok(())
    }

    async fn eligible_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        self.fetch_items(queries::get_eligible_items(), None).await
    }

    async fn promote_item(&self, drop: &NewDrop) -> Result<PromotionOutcome, ShopError> {
        let mut tx = self.db_manager.pool().begin().await?;

        // 히어로 아이템이 아닌 경우에만 승격
        let updated = sqlx::query(queries::PROMOTE_ITEM)
            .bind(&drop.item_id)
            .bind(drop.available_until())
            .bind(drop.drop_date)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if updated == 0 {
            let exists: bool = sqlx::query_scalar(queries::ITEM_EXISTS)
                .bind(&drop.item_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback().await?;
            return Ok(if exists {
                PromotionOutcome::AlreadyPromoted
            } else {
                PromotionOutcome::ItemNotFound
            });
        }

        sqlx::query(queries::INSERT_DROP)
            .bind(&drop.drop_id)
            .bind(&drop.item_id)
            .bind(drop.drop_date)
            .bind(drop.rotation_duration)
            .bind(drop.rarity_weight)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PromotionOutcome::Created(drop.drop_id.clone()))
    }

    async fn shop_stats(&self, now: DateTime<Utc>) -> Result<ShopStats, ShopError> {
        let pool = self.db_manager.pool();
        let mut stats = ShopStats::empty(now);

        stats.total_items = sqlx::query_scalar(queries::COUNT_ITEMS)
            .fetch_one(pool)
            .await?;
        stats.active_drops = sqlx::query_scalar(queries::COUNT_ACTIVE_DROPS)
            .fetch_one(pool)
            .await?;

        let counts = sqlx::query_as::<_, (Rarity, i64)>(queries::COUNT_ITEMS_BY_RARITY)
            .fetch_all(pool)
            .await?;
        for (rarity, count) in counts {
            stats.items_by_rarity.insert(rarity, count);
        }

        Ok(stats)
    }

    async fn all_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        self.fetch_items(queries::get_all_items(), None).await
    }

    async fn hero_items(&self) -> Result<Vec<ShopItem>, ShopError> {
        self.fetch_items(queries::get_hero_items(), None).await
    }

    async fn items_by_category(&self, category: &str) -> Result<Vec<ShopItem>, ShopError> {
        self.fetch_items(queries::get_items_by_category(), Some(category.to_string()))
            .await
    }

    async fn get_item(&self, item_id: &str) -> Result<Option<ShopItem>, ShopError> {
        let item = sqlx::query_as::<_, ShopItem>(&queries::get_item())
            .bind(item_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(item)
    }

    async fn add_item(&self, item: &NewItem, now: DateTime<Utc>) -> Result<ShopItem, ShopError> {
        let created = sqlx::query_as::<_, ShopItem>(&queries::insert_item())
            .bind(&item.item_id)
            .bind(&item.name)
            .bind(&item.brand)
            .bind(&item.item_type)
            .bind(&item.category)
            .bind(item.price)
            .bind(item.rarity)
            .bind(item.in_stock)
            .bind(now)
            .fetch_optional(self.db_manager.pool())
            .await?
            .ok_or_else(|| ShopError::AlreadyExists(item.item_id.clone()))?;

        info!("{:<12} --> 상품 등록: {}", "Store", created.item_id);
        Ok(created)
    }

    async fn update_item(
        &self,
        item_id: &str,
        update: &ItemUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<ShopItem>, ShopError> {
        let updated = sqlx::query_as::<_, ShopItem>(&queries::update_item())
            .bind(item_id)
            .bind(&update.name)
            .bind(&update.brand)
            .bind(&update.item_type)
            .bind(&update.category)
            .bind(update.price)
            .bind(update.rarity)
            .bind(update.in_stock)
            .bind(now)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(updated)
    }

    async fn inventory(&self, user_id: &str) -> Result<UserInventory, ShopError> {
        let mut tx = self.db_manager.pool().begin().await?;

        sqlx::query(queries::ENSURE_INVENTORY)
            .bind(user_id)
            .bind(STARTING_HUBBA_BUCKS)
            .execute(&mut *tx)
            .await?;

        let hubba_bucks: i64 = sqlx::query_scalar(queries::GET_BALANCE)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        let items = sqlx::query_as::<_, InventoryItem>(queries::GET_INVENTORY_ITEMS)
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(UserInventory {
            user_id: user_id.to_string(),
            hubba_bucks,
            items,
        })
    }

    async fn purchase_item(
        &self,
        user_id: &str,
        item_id: &str,
        now: DateTime<Utc>,
    ) -> Result<UserInventory, ShopError> {
        let mut tx = self.db_manager.pool().begin().await?;

        sqlx::query(queries::ENSURE_INVENTORY)
            .bind(user_id)
            .bind(STARTING_HUBBA_BUCKS)
            .execute(&mut *tx)
            .await?;

        let item = sqlx::query_as::<_, ShopItem>(&queries::get_item_for_update())
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ShopError::NotFound(format!("item {item_id}")))?;

        if !item.in_stock {
            return Err(ShopError::OutOfStock(item.item_id));
        }

        let balance: i64 = sqlx::query_scalar(queries::GET_BALANCE_FOR_UPDATE)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        if balance < item.price {
            return Err(ShopError::InsufficientFunds {
                balance,
                price: item.price,
            });
        }

        sqlx::query(queries::UPDATE_BALANCE)
            .bind(user_id)
            .bind(balance - item.price)
            .execute(&mut *tx)
            .await?;

        sqlx::query(queries::INSERT_INVENTORY_ITEM)
            .bind(user_id)
            .bind(item_id)
            .bind(item.price)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            "{:<12} --> 구매 커밋: user={}, item={}, price={}",
            "Store", user_id, item_id, item.price
        );

        self.inventory(user_id).await
    }

    async fn add_hubba_bucks(&self, user_id: &str, amount: i64) -> Result<i64, ShopError> {
        let mut tx = self.db_manager.pool().begin().await?;

        sqlx::query(queries::ENSURE_INVENTORY)
            .bind(user_id)
            .bind(STARTING_HUBBA_BUCKS)
            .execute(&mut *tx)
            .await?;

        let balance: i64 = sqlx::query_scalar(queries::GET_BALANCE_FOR_UPDATE)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        let balance = balance.checked_add(amount).ok_or_else(|| {
            ShopError::InvalidArgument(format!("amount overflows balance: {amount}"))
        })?;

        sqlx::query(queries::UPDATE_BALANCE)
            .bind(user_id)
            .bind(balance)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(balance)
    }

    async fn record_purchase(&self, record: &PurchaseRecord) -> Result<(), ShopError> {
        let mut tx = self.db_manager.pool().begin().await?;

        sqlx::query(queries::INSERT_PURCHASE_HISTORY)
            .bind(&record.user_id)
            .bind(&record.item_id)
            .bind(record.price)
            .bind(record.purchased_at)
            .bind(record.recorded_at)
            .execute(&mut *tx)
            .await?;

        sqlx::query(queries::UPSERT_POPULARITY)
            .bind(&record.item_id)
            .bind(record.recorded_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn item_popularity(&self, item_id: &str) -> Result<Option<ItemPopularity>, ShopError> {
        let popularity = sqlx::query_as::<_, ItemPopularity>(queries::GET_POPULARITY)
            .bind(item_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(popularity)
    }
}
// endregion: --- Postgres Shop Store

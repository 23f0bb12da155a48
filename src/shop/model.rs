use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 신규 유저 시작 허바 벅스
pub const STARTING_HUBBA_BUCKS: i64 = 2000;

// 레어리티 등급
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];
}

// 상품 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub item_id: String,
    pub name: String,
    pub brand: String,
    pub item_type: String,
    pub category: String,
    pub price: i64,
    pub rarity: Rarity,
    pub in_stock: bool,
    pub is_hero_item: bool,
    pub is_limited_time: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShopItem {
    /// 드롭 대상 여부 (히어로 아이템이 아니고 재고가 있음)
    pub fn is_eligible_for_drop(&self) -> bool {
        !self.is_hero_item && self.in_stock
    }
}

/// 신규 상품 (관리자 등록)
/// 히어로 상태는 드롭으로만 바뀌므로 등록 시에는 받지 않는다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub item_id: String,
    pub name: String,
    pub brand: String,
    pub item_type: String,
    pub category: String,
    pub price: i64,
    pub rarity: Rarity,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl NewItem {
    pub fn into_item(self, now: DateTime<Utc>) -> ShopItem {
        ShopItem {
            item_id: self.item_id,
            name: self.name,
            brand: self.brand,
            item_type: self.item_type,
            category: self.category,
            price: self.price,
            rarity: self.rarity,
            in_stock: self.in_stock,
            is_hero_item: false,
            is_limited_time: false,
            available_until: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 상품 부분 수정 (지정한 필드만 변경)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub item_type: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub rarity: Option<Rarity>,
    pub in_stock: Option<bool>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self == &ItemUpdate::default()
    }

    pub fn apply(&self, item: &mut ShopItem, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(brand) = &self.brand {
            item.brand = brand.clone();
        }
        if let Some(item_type) = &self.item_type {
            item.item_type = item_type.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(rarity) = self.rarity {
            item.rarity = rarity;
        }
        if let Some(in_stock) = self.in_stock {
            item.in_stock = in_stock;
        }
        item.updated_at = now;
    }
}

// 드롭 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemDrop {
    pub drop_id: String,
    pub item_id: String,
    pub drop_date: DateTime<Utc>,
    pub is_active: bool,
    pub rotation_duration: i32,
    pub rarity_weight: f64,
}

impl ItemDrop {
    /// 만료 시각 = 시작 시각 + 로테이션 시간
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.drop_date + Duration::hours(i64::from(self.rotation_duration))
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at()
    }
}

/// 새 드롭 (아이템 승격 요청)
#[derive(Debug, Clone, PartialEq)]
pub struct NewDrop {
    pub drop_id: String,
    pub item_id: String,
    pub drop_date: DateTime<Utc>,
    pub rotation_duration: i32,
    pub rarity_weight: f64,
}

impl NewDrop {
    pub fn new(item_id: &str, duration_hours: i32, now: DateTime<Utc>, rarity_weight: f64) -> Self {
        Self {
            drop_id: uuid::Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            drop_date: now,
            rotation_duration: duration_hours,
            rarity_weight,
        }
    }

    /// 히어로 아이템 노출 종료 시각
    pub fn available_until(&self) -> DateTime<Utc> {
        self.drop_date + Duration::hours(i64::from(self.rotation_duration))
    }

    pub fn into_drop(self) -> ItemDrop {
        ItemDrop {
            drop_id: self.drop_id,
            item_id: self.item_id,
            drop_date: self.drop_date,
            is_active: true,
            rotation_duration: self.rotation_duration,
            rarity_weight: self.rarity_weight,
        }
    }
}

/// 승격 결과
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionOutcome {
    Created(String),
    AlreadyPromoted,
    ItemNotFound,
}

// 인벤토리 아이템 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item_id: String,
    pub price: i64,
    pub purchased_at: DateTime<Utc>,
}

// 유저 인벤토리 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInventory {
    pub user_id: String,
    pub hubba_bucks: i64,
    pub items: Vec<InventoryItem>,
}

impl UserInventory {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            hubba_bucks: STARTING_HUBBA_BUCKS,
            items: Vec::new(),
        }
    }
}

// 구매 이력 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub user_id: String,
    pub item_id: String,
    pub price: i64,
    pub purchased_at: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

// 아이템 인기도 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ItemPopularity {
    pub item_id: String,
    pub purchases: i64,
    pub last_purchased: DateTime<Utc>,
}

// 샵 통계 모델
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopStats {
    pub total_items: i64,
    pub active_drops: i64,
    pub items_by_rarity: BTreeMap<Rarity, i64>,
    pub last_updated: DateTime<Utc>,
}

impl ShopStats {
    /// 모든 레어리티 키를 0 으로 채운 통계
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            total_items: 0,
            active_drops: 0,
            items_by_rarity: Rarity::ALL.iter().map(|r| (*r, 0)).collect(),
            last_updated: now,
        }
    }
}

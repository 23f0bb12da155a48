/// 샘플 상품 등록
/// 빈 카탈로그로 시작하는 배포를 위해 기본 상품 몇 개를 넣는다. 이미 있는 상품은 건너뛴다.
use crate::error::ShopError;
use crate::shop::model::{NewItem, Rarity};
use crate::store::ShopStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

fn sample(
    item_id: &str,
    name: &str,
    brand: &str,
    item_type: &str,
    price: i64,
    rarity: Rarity,
) -> NewItem {
    NewItem {
        item_id: item_id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        item_type: item_type.to_string(),
        category: item_type.to_string(),
        price,
        rarity,
        in_stock: true,
    }
}

pub fn sample_items() -> Vec<NewItem> {
    vec![
        sample("koston1", "Koston 1's", "NIKE SB", "apparel", 500, Rarity::Rare),
        sample("hookups-deck", "Hook Ups Deck", "HOOK UPS", "deck", 1200, Rarity::Legendary),
        sample("baker-deck-1", "Pro Model Deck", "BAKER", "deck", 65, Rarity::Common),
        sample("thrasher-tee", "Classic Tee", "THRASHER", "apparel", 25, Rarity::Common),
        sample("spitfire-wheels", "Formula Four Wheels", "SPITFIRE", "wheels", 45, Rarity::Rare),
    ]
}

/// 샘플 상품 등록 후 새로 추가된 개수 반환
pub async fn seed_sample_items(
    store: &dyn ShopStore,
    now: DateTime<Utc>,
) -> Result<usize, ShopError> {
    let mut added = 0;
    for item in sample_items() {
        match store.add_item(&item, now).await {
            Ok(_) => added += 1,
            Err(ShopError::AlreadyExists(item_id)) => {
                debug!("{:<12} --> 이미 있는 샘플 상품: {}", "Seed", item_id)
            }
            Err(e) => return Err(e),
        }
    }
    info!("{:<12} --> 샘플 상품 {}개 등록", "Seed", added);
    Ok(added)
}

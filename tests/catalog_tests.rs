mod common;

use common::{base_time, harness, item, ScriptedRandom};
use hubba_shop::catalog::commands::{handle_add_item, handle_update_item};
use hubba_shop::catalog::seed::{sample_items, seed_sample_items};
use hubba_shop::error::ShopError;
use hubba_shop::shop::model::{ItemUpdate, NewItem, Rarity};
use hubba_shop::store::{MemoryShopStore, ShopStore};

fn deck(item_id: &str) -> NewItem {
    NewItem {
        item_id: item_id.to_string(),
        name: "Pro Model Deck".to_string(),
        brand: "BAKER".to_string(),
        item_type: "deck".to_string(),
        category: "deck".to_string(),
        price: 65,
        rarity: Rarity::Common,
        in_stock: true,
    }
}

/// 등록된 상품은 히어로가 아니며 바로 드롭 대상이 된다
#[tokio::test]
async fn test_added_item_is_eligible_for_drops() {
    let now = base_time();
    let h = harness(MemoryShopStore::new());
    let mut input = deck("  baker-1  ");
    input.name = " Pro Model Deck ".to_string();

    let created = handle_add_item(&*h.store, input, now).await.unwrap();

    assert_eq!(created.item_id, "baker-1");
    assert_eq!(created.name, "Pro Model Deck");
    assert!(!created.is_hero_item);
    assert_eq!(created.available_until, None);
    assert_eq!(created.created_at, now);

    let mut random = ScriptedRandom::new(1, &[0.9], &[0]);
    let drops = h.scheduler.create_new_drops(now, &mut random).await.unwrap();
    assert_eq!(drops.len(), 1);
    assert!(h.store.get_item("baker-1").await.unwrap().unwrap().is_hero_item);
}

/// 필수 값 누락, 음수 가격, 중복 itemId
#[tokio::test]
async fn test_add_item_rejects_invalid_input() {
    let now = base_time();
    let h = harness(MemoryShopStore::with_items(vec![item("taken", Rarity::Rare)]));

    let mut blank = deck("blank-name");
    blank.name = "  ".to_string();
    let err = handle_add_item(&*h.store, blank, now).await.unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));

    let mut negative = deck("negative");
    negative.price = -1;
    let err = handle_add_item(&*h.store, negative, now).await.unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));

    let err = handle_add_item(&*h.store, deck("taken"), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::AlreadyExists(_)));

    assert_eq!(h.store.write_count().await, 0);
}

/// 수정은 지정한 필드만 바꾸고 히어로 상태는 유지한다
#[tokio::test]
async fn test_update_item_keeps_hero_state() {
    let now = base_time();
    let h = harness(MemoryShopStore::with_items(vec![item("X", Rarity::Rare)]));
    let mut random = ScriptedRandom::new(1, &[], &[]);
    h.scheduler
        .create_drop(Some("X"), Some(24), now, &mut random)
        .await
        .unwrap();

    let updated = handle_update_item(
        &*h.store,
        "X",
        ItemUpdate {
            price: Some(750),
            rarity: Some(Rarity::Epic),
            ..ItemUpdate::default()
        },
        now,
    )
    .await
    .unwrap();

    assert_eq!(updated.price, 750);
    assert_eq!(updated.rarity, Rarity::Epic);
    assert_eq!(updated.name, "X deck");
    assert!(updated.is_hero_item);
    assert!(updated.available_until.is_some());
    assert_eq!(updated.updated_at, now);
}

/// 빈 수정, 음수 가격, 없는 상품
#[tokio::test]
async fn test_update_item_rejects_invalid_input() {
    let now = base_time();
    let h = harness(MemoryShopStore::with_items(vec![item("X", Rarity::Rare)]));

    let err = handle_update_item(&*h.store, "X", ItemUpdate::default(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));

    let negative = ItemUpdate {
        price: Some(-5),
        ..ItemUpdate::default()
    };
    let err = handle_update_item(&*h.store, "X", negative, now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));

    let rename = ItemUpdate {
        name: Some("Renamed".to_string()),
        ..ItemUpdate::default()
    };
    let err = handle_update_item(&*h.store, "missing", rename, now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::NotFound(_)));

    assert_eq!(h.store.write_count().await, 0);
}

/// 샘플 등록은 두 번 실행해도 중복되지 않는다
#[tokio::test]
async fn test_seed_sample_items_is_idempotent() {
    let now = base_time();
    let h = harness(MemoryShopStore::new());

    let added = seed_sample_items(&*h.store, now).await.unwrap();
    assert_eq!(added, sample_items().len());

    let added = seed_sample_items(&*h.store, now).await.unwrap();
    assert_eq!(added, 0);

    let items = h.store.all_items().await.unwrap();
    assert_eq!(items.len(), sample_items().len());
    assert!(items.iter().all(|item| !item.is_hero_item));
    assert_eq!(h.store.hero_items().await.unwrap().len(), 0);
}

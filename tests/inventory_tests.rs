mod common;

use common::{base_time, init_tracing, item};
use hubba_shop::analytics::process_event;
use hubba_shop::error::ShopError;
use hubba_shop::inventory::commands::{
    get_inventory, handle_add_bucks, handle_purchase, AddBucksCommand, PurchaseCommand,
};
use hubba_shop::message_broker::RecordingPublisher;
use hubba_shop::shop::events::ShopEvent;
use hubba_shop::shop::model::{Rarity, STARTING_HUBBA_BUCKS};
use hubba_shop::store::{MemoryShopStore, ShopStore};

fn purchase(item_id: &str) -> PurchaseCommand {
    PurchaseCommand {
        item_id: Some(item_id.to_string()),
    }
}

/// 신규 유저는 시작 허바 벅스를 받는다
#[tokio::test]
async fn test_new_user_gets_starting_bucks() {
    init_tracing();
    let store = MemoryShopStore::new();

    let inventory = get_inventory(&store, "skater-1").await.unwrap();

    assert_eq!(inventory.hubba_bucks, STARTING_HUBBA_BUCKS);
    assert!(inventory.items.is_empty());
}

/// 구매 시 가격만큼 차감되고 이벤트가 발행된다
#[tokio::test]
async fn test_purchase_deducts_price_and_publishes_event() {
    init_tracing();
    let now = base_time();
    let store = MemoryShopStore::with_items(vec![item("deck-1", Rarity::Rare)]);
    let publisher = RecordingPublisher::default();

    let inventory = handle_purchase(&store, &publisher, "skater-1", purchase("deck-1"), now)
        .await
        .unwrap();

    assert_eq!(inventory.hubba_bucks, STARTING_HUBBA_BUCKS - 500);
    assert_eq!(inventory.items.len(), 1);
    assert_eq!(inventory.items[0].item_id, "deck-1");
    assert_eq!(inventory.items[0].purchased_at, now);

    assert_eq!(
        publisher.events(),
        vec![ShopEvent::ItemPurchased {
            user_id: "skater-1".to_string(),
            item_id: "deck-1".to_string(),
            price: 500,
            timestamp: now,
        }]
    );
}

/// 잔액 부족 시 구매 실패, 잔액 유지
#[tokio::test]
async fn test_purchase_with_insufficient_funds_fails() {
    init_tracing();
    let mut pricey = item("legend-deck", Rarity::Legendary);
    pricey.price = STARTING_HUBBA_BUCKS + 1;
    let store = MemoryShopStore::with_items(vec![pricey]);
    let publisher = RecordingPublisher::default();

    let err = handle_purchase(
        &store,
        &publisher,
        "skater-1",
        purchase("legend-deck"),
        base_time(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ShopError::InsufficientFunds {
            balance: STARTING_HUBBA_BUCKS,
            ..
        }
    ));
    let inventory = store.inventory("skater-1").await.unwrap();
    assert_eq!(inventory.hubba_bucks, STARTING_HUBBA_BUCKS);
    assert!(inventory.items.is_empty());
    assert!(publisher.events().is_empty());
}

/// 재고 없음 / 없는 상품 / itemId 누락
#[tokio::test]
async fn test_purchase_rejects_bad_requests() {
    init_tracing();
    let mut sold_out = item("sold-out", Rarity::Common);
    sold_out.in_stock = false;
    let store = MemoryShopStore::with_items(vec![sold_out]);
    let publisher = RecordingPublisher::default();
    let now = base_time();

    let err = handle_purchase(&store, &publisher, "skater-1", purchase("sold-out"), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::OutOfStock(_)));

    let err = handle_purchase(&store, &publisher, "skater-1", purchase("nope"), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::NotFound(_)));

    let err = handle_purchase(&store, &publisher, "skater-1", PurchaseCommand::default(), now)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));

    assert_eq!(store.write_count().await, 0);
}

/// 허바 벅스 충전
#[tokio::test]
async fn test_add_bucks() {
    init_tracing();
    let store = MemoryShopStore::new();

    let balance = handle_add_bucks(&store, "skater-1", AddBucksCommand { amount: 250 })
        .await
        .unwrap();
    assert_eq!(balance, STARTING_HUBBA_BUCKS + 250);

    let err = handle_add_bucks(&store, "skater-1", AddBucksCommand { amount: 0 })
        .await
        .unwrap_err();
    assert!(matches!(err, ShopError::InvalidArgument(_)));
}

/// 잔액 범위를 넘는 충전은 invalid-argument, 잔액 유지
#[tokio::test]
async fn test_add_bucks_overflow_is_invalid() {
    init_tracing();
    let store = MemoryShopStore::new();

    let err = handle_add_bucks(&store, "skater-1", AddBucksCommand { amount: i64::MAX })
        .await
        .unwrap_err();

    assert!(matches!(err, ShopError::InvalidArgument(_)));
    let inventory = store.inventory("skater-1").await.unwrap();
    assert_eq!(inventory.hubba_bucks, STARTING_HUBBA_BUCKS);
}

/// 구매 이벤트 두 번이면 인기도 2
#[tokio::test]
async fn test_purchase_events_update_popularity() {
    init_tracing();
    let store = MemoryShopStore::with_items(vec![item("deck-1", Rarity::Rare)]);
    let now = base_time();

    for user in ["skater-1", "skater-2"] {
        let event = ShopEvent::ItemPurchased {
            user_id: user.to_string(),
            item_id: "deck-1".to_string(),
            price: 500,
            timestamp: now,
        };
        process_event(&store, event, now).await.unwrap();
    }

    // 구매 외 이벤트는 무시
    process_event(
        &store,
        ShopEvent::DropsExpired {
            count: 3,
            timestamp: now,
        },
        now,
    )
    .await
    .unwrap();

    let popularity = store.item_popularity("deck-1").await.unwrap().unwrap();
    assert_eq!(popularity.purchases, 2);
    assert_eq!(popularity.last_purchased, now);

    let purchases = store.purchases().await;
    assert_eq!(purchases.len(), 2);
    assert_eq!(purchases[1].user_id, "skater-2");
}

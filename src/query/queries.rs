const ITEM_COLUMNS: &str = "item_id, name, brand, item_type, category, price, rarity, in_stock, is_hero_item, is_limited_time, available_until, created_at, updated_at";

/// 활성 드롭 조회
pub const GET_ACTIVE_DROPS: &str = r#"
    SELECT drop_id, item_id, drop_date, is_active, rotation_duration, rarity_weight
    FROM item_drops
    WHERE is_active = TRUE
    ORDER BY drop_date ASC
"#;

/// 드롭 비활성화
pub const DEACTIVATE_DROP: &str =
    "UPDATE item_drops SET is_active = FALSE WHERE drop_id = $1 AND is_active = TRUE";

/// 히어로 아이템 해제
pub const CLEAR_HERO_ITEM: &str = r#"
    UPDATE shop_items
    SET is_hero_item = FALSE, is_limited_time = FALSE, available_until = NULL, updated_at = $2
    WHERE item_id = $1
"#;

/// 드롭 생성
pub const INSERT_DROP: &str = r#"
    INSERT INTO item_drops (drop_id, item_id, drop_date, is_active, rotation_duration, rarity_weight)
    VALUES ($1, $2, $3, TRUE, $4, $5)
"#;

/// 히어로 아이템 승격 (히어로 아이템이 아닌 경우에만)
pub const PROMOTE_ITEM: &str = r#"
    UPDATE shop_items
    SET is_hero_item = TRUE, is_limited_time = TRUE, available_until = $2, updated_at = $3
    WHERE item_id = $1 AND is_hero_item = FALSE
"#;

/// 상품 존재 여부
pub const ITEM_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM shop_items WHERE item_id = $1)";

/// 전체 상품 수
pub const COUNT_ITEMS: &str = "SELECT COUNT(*) FROM shop_items";

/// 활성 드롭 수
pub const COUNT_ACTIVE_DROPS: &str = "SELECT COUNT(*) FROM item_drops WHERE is_active = TRUE";

/// 레어리티별 상품 수
pub const COUNT_ITEMS_BY_RARITY: &str =
    "SELECT rarity, COUNT(*) AS count FROM shop_items GROUP BY rarity";

/// 인벤토리 생성 (없을 때만)
pub const ENSURE_INVENTORY: &str =
    "INSERT INTO user_inventory (user_id, hubba_bucks) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING";

/// 잔액 조회 (행 잠금)
pub const GET_BALANCE_FOR_UPDATE: &str =
    "SELECT hubba_bucks FROM user_inventory WHERE user_id = $1 FOR UPDATE";

/// 잔액 조회
pub const GET_BALANCE: &str = "SELECT hubba_bucks FROM user_inventory WHERE user_id = $1";

/// 잔액 변경
pub const UPDATE_BALANCE: &str = "UPDATE user_inventory SET hubba_bucks = $2 WHERE user_id = $1";

/// 인벤토리 아이템 조회
pub const GET_INVENTORY_ITEMS: &str = r#"
    SELECT item_id, price, purchased_at
    FROM inventory_items
    WHERE user_id = $1
    ORDER BY id ASC
"#;

/// 인벤토리 아이템 추가
pub const INSERT_INVENTORY_ITEM: &str =
    "INSERT INTO inventory_items (user_id, item_id, price, purchased_at) VALUES ($1, $2, $3, $4)";

/// 구매 이력 추가
pub const INSERT_PURCHASE_HISTORY: &str = r#"
    INSERT INTO purchase_history (user_id, item_id, price, purchased_at, recorded_at)
    VALUES ($1, $2, $3, $4, $5)
"#;

/// 인기도 갱신
pub const UPSERT_POPULARITY: &str = r#"
    INSERT INTO item_popularity (item_id, purchases, last_purchased, created_at)
    VALUES ($1, 1, $2, $2)
    ON CONFLICT (item_id)
    DO UPDATE SET purchases = item_popularity.purchases + 1, last_purchased = EXCLUDED.last_purchased
"#;

/// 인기도 조회
pub const GET_POPULARITY: &str =
    "SELECT item_id, purchases, last_purchased FROM item_popularity WHERE item_id = $1";

/// 전체 상품 조회
pub fn get_all_items() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM shop_items ORDER BY created_at DESC")
}

/// 상품 조회
pub fn get_item() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM shop_items WHERE item_id = $1")
}

/// 상품 조회 (행 잠금)
pub fn get_item_for_update() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM shop_items WHERE item_id = $1 FOR UPDATE")
}

/// 히어로 아이템 조회
pub fn get_hero_items() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM shop_items WHERE is_hero_item = TRUE ORDER BY available_until ASC")
}

/// 카테고리별 상품 조회
pub fn get_items_by_category() -> String {
    format!("SELECT {ITEM_COLUMNS} FROM shop_items WHERE category = $1 ORDER BY created_at DESC")
}

/// 드롭 대상 상품 조회
pub fn get_eligible_items() -> String {
    format!(
        "SELECT {ITEM_COLUMNS} FROM shop_items WHERE is_hero_item = FALSE AND in_stock = TRUE ORDER BY item_id ASC"
    )
}

/// 상품 등록 (중복이면 아무 행도 반환하지 않음)
pub fn insert_item() -> String {
    format!(
        r#"
    INSERT INTO shop_items (item_id, name, brand, item_type, category, price, rarity, in_stock, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
    ON CONFLICT (item_id) DO NOTHING
    RETURNING {ITEM_COLUMNS}
"#
    )
}

/// 상품 수정 (NULL 인 값은 기존 값 유지)
pub fn update_item() -> String {
    format!(
        r#"
    UPDATE shop_items
    SET name = COALESCE($2, name),
        brand = COALESCE($3, brand),
        item_type = COALESCE($4, item_type),
        category = COALESCE($5, category),
        price = COALESCE($6, price),
        rarity = COALESCE($7, rarity),
        in_stock = COALESCE($8, in_stock),
        updated_at = $9
    WHERE item_id = $1
    RETURNING {ITEM_COLUMNS}
"#
    )
}

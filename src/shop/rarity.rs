/// 레어리티 가중치 테이블
/// 확률은 basis point (1% = 100bp) 로 보관하며, Legendary 부터 순서대로 누적한다.
use super::model::Rarity;

/// 전체 가중치 (100%)
pub const TOTAL_WEIGHT_BP: u32 = 10_000;

/// 레어리티별 가중치 (순서 유지)
pub const RARITY_WEIGHTS_BP: [(Rarity, u32); 4] = [
    (Rarity::Legendary, 500),
    (Rarity::Epic, 1_500),
    (Rarity::Rare, 3_000),
    (Rarity::Common, 5_000),
];

/// [0, 1) 난수로 레어리티 선택
/// 구간은 반개구간이므로 draw 가 누적값과 같으면 다음 등급으로 넘어간다.
// `draw <= 누적값` 비교(웹 샵 클라이언트 방식)와 다르다: 그 방식은 0.05, 0.20 경계값을 한 등급
// 위로 보내고 0.5 를 Rare 로 뽑는다. 여기서는 0.5 가 Common 이다.
pub fn select_rarity(draw: f64) -> Rarity {
    let roll = (draw.clamp(0.0, 1.0) * f64::from(TOTAL_WEIGHT_BP)) as u32;
    let mut cumulative = 0;
    for (rarity, weight) in RARITY_WEIGHTS_BP {
        cumulative += weight;
        if roll < cumulative {
            return rarity;
        }
    }
    Rarity::Common
}

// endregion: --- Tests

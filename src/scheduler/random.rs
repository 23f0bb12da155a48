use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 드롭 로테이션에 쓰이는 난수
pub trait DropRandom {
    /// 이번 로테이션에서 만들 드롭 수 (1..=3)
    fn drop_count(&mut self) -> usize;
    /// 레어리티 선택용 [0, 1) 난수
    fn rarity_draw(&mut self) -> f64;
    /// 후보 중 하나의 인덱스 (0..len)
    fn pick(&mut self, len: usize) -> usize;
    /// 드롭 기록용 가중치 (선택에는 쓰지 않음)
    fn tie_break(&mut self) -> f64;
}

pub struct StdDropRandom {
    rng: StdRng,
}

impl StdDropRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdDropRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl DropRandom for StdDropRandom {
    fn drop_count(&mut self) -> usize {
        self.rng.gen_range(1..=3)
    }

    fn rarity_draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn tie_break(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

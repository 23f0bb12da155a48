/// 히어로 아이템 드롭 로테이션 스케줄러
/// 만료된 드롭을 내리고, 레어리티 가중치 추첨으로 새 드롭을 만든다.
/// 프로세스 내부에 상태를 두지 않으며 매 실행마다 저장소를 다시 읽는다.
// region:    --- Imports
use crate::config::Config;
use crate::error::ShopError;
use crate::message_broker::EventPublisher;
use crate::shop::events::ShopEvent;
use crate::shop::model::{NewDrop, PromotionOutcome, ShopItem};
use crate::shop::rarity::select_rarity;
use crate::store::ShopStore;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

pub mod random;

pub use random::{DropRandom, StdDropRandom};

// endregion: --- Imports

// region:    --- Drop Scheduler

/// 로테이션 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationReport {
    pub expired: usize,
    pub created: Vec<String>,
}

/// 드롭 로테이션 스케줄러
pub struct DropScheduler {
    store: Arc<dyn ShopStore>,
    publisher: Arc<dyn EventPublisher>,
    period: Duration,
    default_drop_hours: i32,
}

impl DropScheduler {
    pub fn new(
        store: Arc<dyn ShopStore>,
        publisher: Arc<dyn EventPublisher>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            publisher,
            period: config.rotation_interval,
            default_drop_hours: config.default_drop_hours,
        }
    }

    /// 스케줄러 시작
    /// 첫 실행은 한 주기 뒤이며, 실패한 실행은 로그만 남기고 다음 주기를 기다린다.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + scheduler.period, scheduler.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut random = StdDropRandom::new();
            info!(
                "{:<12} --> 드롭 로테이션 시작: 주기 {}초",
                "Scheduler",
                scheduler.period.as_secs()
            );
            loop {
                ticker.tick().await;
                if let Err(e) = scheduler.rotate(Utc::now(), &mut random).await {
                    error!(
                        "{:<12} --> 드롭 로테이션 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
            }
        })
    }

    /// 로테이션 1회 실행 (만료 후 생성)
    pub async fn rotate<R>(
        &self,
        now: DateTime<Utc>,
        random: &mut R,
    ) -> Result<RotationReport, ShopError>
    where
        R: DropRandom + Send,
    {
        info!("{:<12} --> 샵 아이템 로테이션 시작", "Scheduler");
        let expired = self.expire_drops(now).await?;
        let created = self.create_new_drops(now, random).await?;
        info!(
            "{:<12} --> 샵 아이템 로테이션 완료: 만료 {}개, 생성 {}개",
            "Scheduler",
            expired,
            created.len()
        );
        Ok(RotationReport { expired, created })
    }

    /// 만료된 드롭 비활성화
    pub async fn expire_drops(&self, now: DateTime<Utc>) -> Result<usize, ShopError> {
        let active = self.store.active_drops().await.map_err(|e| {
            error!("{:<12} --> 활성 드롭 조회 실패: {:?}", "Scheduler", e);
            e
        })?;

        let expired: Vec<_> = active.into_iter().filter(|d| d.is_expired(now)).collect();
        if expired.is_empty() {
            debug!("{:<12} --> 만료된 드롭 없음", "Scheduler");
            return Ok(0);
        }

        self.store
            .deactivate_drops(&expired, now)
            .await
            .map_err(|e| {
                error!("{:<12} --> 드롭 비활성화 실패: {:?}", "Scheduler", e);
                e
            })?;

        info!(
            "{:<12} --> 만료된 드롭 {}개 비활성화",
            "Scheduler",
            expired.len()
        );
        self.publish(ShopEvent::DropsExpired {
            count: expired.len(),
            timestamp: now,
        })
        .await;

        Ok(expired.len())
    }

    /// 레어리티 가중치 추첨으로 새 드롭 생성
    /// 선택된 등급에 남은 후보가 없으면 해당 슬롯은 건너뛴다.
    pub async fn create_new_drops<R>(
        &self,
        now: DateTime<Utc>,
        random: &mut R,
    ) -> Result<Vec<String>, ShopError>
    where
        R: DropRandom + Send,
    {
        let items = self.store.eligible_items().await.map_err(|e| {
            error!("{:<12} --> 드롭 대상 상품 조회 실패: {:?}", "Scheduler", e);
            e
        })?;

        if items.is_empty() {
            info!("{:<12} --> 드롭 가능한 상품 없음", "Scheduler");
            return Ok(Vec::new());
        }

        let num_drops = random.drop_count();
        let mut selected: HashSet<String> = HashSet::new();
        let mut created = Vec::with_capacity(num_drops);

        for _ in 0..num_drops {
            let rarity = select_rarity(random.rarity_draw());
            let candidates: Vec<&ShopItem> = items
                .iter()
                .filter(|item| item.rarity == rarity && !selected.contains(&item.item_id))
                .collect();

            if candidates.is_empty() {
                debug!("{:<12} --> {:?} 후보 없음, 슬롯 건너뜀", "Scheduler", rarity);
                continue;
            }
            let Some(item) = candidates.get(random.pick(candidates.len())).copied() else {
                continue;
            };
            selected.insert(item.item_id.clone());

            let drop = NewDrop::new(
                &item.item_id,
                self.default_drop_hours,
                now,
                random.tie_break(),
            );
            match self.promote(&drop).await? {
                PromotionOutcome::Created(drop_id) => created.push(drop_id),
                PromotionOutcome::AlreadyPromoted => warn!(
                    "{:<12} --> 다른 실행에서 이미 승격된 상품: {}",
                    "Scheduler", item.item_id
                ),
                PromotionOutcome::ItemNotFound => warn!(
                    "{:<12} --> 승격 중 상품이 사라짐: {}",
                    "Scheduler", item.item_id
                ),
            }
        }

        info!("{:<12} --> 새 드롭 {}개 생성", "Scheduler", created.len());
        Ok(created)
    }

    /// 단일 드롭 생성 (관리자 수동 실행)
    pub async fn create_drop<R>(
        &self,
        item_id: Option<&str>,
        duration_hours: Option<i32>,
        now: DateTime<Utc>,
        random: &mut R,
    ) -> Result<String, ShopError>
    where
        R: DropRandom + Send,
    {
        let item_id = item_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ShopError::InvalidArgument("itemId is required".to_string()))?;

        let duration_hours = duration_hours.unwrap_or(self.default_drop_hours);
        if duration_hours <= 0 {
            return Err(ShopError::InvalidArgument(format!(
                "durationHours must be positive: {duration_hours}"
            )));
        }

        let drop = NewDrop::new(item_id, duration_hours, now, random.tie_break());
        match self.promote(&drop).await? {
            PromotionOutcome::Created(drop_id) => Ok(drop_id),
            PromotionOutcome::AlreadyPromoted => {
                Err(ShopError::AlreadyPromoted(item_id.to_string()))
            }
            PromotionOutcome::ItemNotFound => Err(ShopError::NotFound(format!("item {item_id}"))),
        }
    }

    /// 드롭 저장 및 이벤트 발행
    async fn promote(&self, drop: &NewDrop) -> Result<PromotionOutcome, ShopError> {
        let outcome = self.store.promote_item(drop).await.map_err(|e| {
            error!(
                "{:<12} --> 드롭 생성 실패: item={}, {:?}",
                "Scheduler", drop.item_id, e
            );
            e
        })?;

        if let PromotionOutcome::Created(drop_id) = &outcome {
            info!(
                "{:<12} --> 드롭 생성: drop={}, item={}, {}시간",
                "Scheduler", drop_id, drop.item_id, drop.rotation_duration
            );
            self.publish(ShopEvent::DropCreated {
                drop_id: drop_id.clone(),
                item_id: drop.item_id.clone(),
                duration_hours: drop.rotation_duration,
                timestamp: drop.drop_date,
            })
            .await;
        }
        Ok(outcome)
    }

    /// 이벤트 발행 (실패해도 작업은 실패시키지 않음)
    async fn publish(&self, event: ShopEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            warn!("{:<12} --> 이벤트 발행 실패: {}", "Scheduler", e);
        }
    }
}
// endregion: --- Drop Scheduler

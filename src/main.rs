// region:    --- Imports
use axum::extract::DefaultBodyLimit;
use hubba_shop::analytics::PurchaseConsumer;
use hubba_shop::catalog::seed;
use hubba_shop::config::Config;
use hubba_shop::database::DatabaseManager;
use hubba_shop::handlers::{self, AppState};
use hubba_shop::message_broker::{EventPublisher, KafkaManager};
use hubba_shop::scheduler::DropScheduler;
use hubba_shop::store::{PostgresShopStore, ShopStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = Config::from_env().map_err(|e| {
        error!("{:<12} --> 설정 로드 실패: {}", "Main", e);
        e
    })?;

    // DatabaseManager 생성
    let db_manager = match DatabaseManager::new(&config).await {
        Ok(db_manager) => Arc::new(db_manager),
        Err(e) => {
            error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database(config.reset_database).await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // Kafka 매니저 생성 및 토픽 생성
    let kafka_manager = KafkaManager::new(&config).map_err(|e| {
        error!("{:<12} --> Kafka 초기화 실패: {}", "Main", e);
        e
    })?;
    kafka_manager
        .create_topic(&config.shop_events_topic, 3, 1)
        .await?;
    info!("{:<12} --> Kafka 초기화 성공", "Main");

    let store: Arc<dyn ShopStore> = Arc::new(PostgresShopStore::new(Arc::clone(&db_manager)));
    let publisher: Arc<dyn EventPublisher> = kafka_manager.get_producer();

    // 샘플 상품 등록
    if config.seed_sample_data {
        seed::seed_sample_items(store.as_ref(), chrono::Utc::now())
            .await
            .map_err(|e| {
                error!("{:<12} --> 샘플 상품 등록 실패: {}", "Main", e);
                e
            })?;
    }

    // 구매 분석 컨슈머 시작
    let purchase_consumer = PurchaseConsumer::new(
        Arc::clone(&store),
        kafka_manager.get_consumer(),
        &config.shop_events_topic,
    );
    tokio::spawn(async move {
        purchase_consumer.start().await;
    });

    // 드롭 로테이션 스케줄러 시작
    let scheduler = Arc::new(DropScheduler::new(
        Arc::clone(&store),
        Arc::clone(&publisher),
        &config,
    ));
    scheduler.start();

    // 웹 클라이언트를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::routes(AppState {
        store,
        publisher,
        scheduler,
    })
    .layer(cors)
    .layer(DefaultBodyLimit::max(1024 * 1024));

    // 리스너 생성
    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main

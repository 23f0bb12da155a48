// region:    --- Imports
use crate::config::Config;
use crate::shop::events::ShopEvent;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

// endregion: --- Imports

// region:    --- Event Publisher
/// 이벤트 발행 트레이트
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &ShopEvent) -> Result<(), String>;
}

/// 아무것도 발행하지 않는 구현체
#[derive(Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, event: &ShopEvent) -> Result<(), String> {
        debug!("{:<12} --> 이벤트 발행 생략: {:?}", "Producer", event);
        Ok(())
    }
}

/// 발행된 이벤트를 보관하는 구현체
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ShopEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<ShopEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ShopEvent) -> Result<(), String> {
        self.events
            .lock()
            .map_err(|e| e.to_string())?
            .push(event.clone());
        Ok(())
    }
}

// endregion: --- Event Publisher

// region:    --- Kafka Producer
#[derive(Clone)]
pub struct KafkaProducer {
    producer: Arc<FutureProducer>,
    topic: String,
}

/// KafkaProducer 구현
impl KafkaProducer {
    pub fn new(brokers: &str, topic: &str) -> Result<Self, String> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| format!("Producer creation error: {:?}", e))?;

        Ok(KafkaProducer {
            producer: Arc::new(producer),
            topic: topic.to_string(),
        })
    }

    /// 메시지 전송
    pub async fn send_message(&self, topic: &str, key: &str, value: &str) -> Result<(), String> {
        info!(
            "{:<12} --> Kafka 메시지 전송: topic={}, key={}",
            "Producer", topic, key
        );
        let record = FutureRecord::to(topic).key(key).payload(value);

        self.producer
            .send(record, std::time::Duration::from_secs(0))
            .await
            .map_err(|(e, _)| format!("Error sending message: {:?}", e))?;

        Ok(())
    }
}

#[async_trait]
impl EventPublisher for KafkaProducer {
    async fn publish(&self, event: &ShopEvent) -> Result<(), String> {
        let payload = serde_json::to_string(event).map_err(|e| e.to_string())?;
        self.send_message(&self.topic, &event.key(), &payload).await
    }
}

// endregion: --- Kafka Producer

// region:    --- Kafka Consumer
pub struct KafkaConsumer {
    consumer: Arc<StreamConsumer>,
}

/// KafkaConsumer 구현
impl KafkaConsumer {
    pub fn new(brokers: &str, group_id: &str) -> Result<Self, String> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "6000")
            .set("allow.auto.create.topics", "true")
            .create()
            .map_err(|e| format!("Consumer creation failed: {:?}", e))?;

        Ok(KafkaConsumer {
            consumer: Arc::new(consumer),
        })
    }

    /// 샵 이벤트 소비
    pub async fn consume_events<F, Fut>(
        &self,
        topic: &str,
        handler: F,
    ) -> Result<(), Box<dyn std::error::Error>>
    where
        F: Fn(ShopEvent) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send + 'static,
    {
        info!("{:<12} --> Kafka 이벤트 소비 시작: topic={}", "Consumer", topic);
        self.consumer.subscribe(&[topic])?;

        loop {
            match self.consumer.recv().await {
                Ok(message) => {
                    debug!(
                        "{:<12} --> 메시지 수신: topic={}, partition={}, offset={}",
                        "Consumer",
                        message.topic(),
                        message.partition(),
                        message.offset()
                    );

                    if let Some(payload) = message.payload() {
                        match serde_json::from_slice::<ShopEvent>(payload) {
                            Ok(event) => {
                                if let Err(e) = handler(event).await {
                                    error!(
                                        "{:<12} --> Kafka 이벤트 처리 오류: {:?}",
                                        "Consumer", e
                                    );
                                }
                            }
                            Err(e) => error!("{:<12} --> deserialize 오류: {:?}", "Consumer", e),
                        }
                    } else {
                        warn!("{:<12} --> 빈 페이로드 수신", "Consumer");
                    }
                }
                Err(e) => error!("{:<12} --> 메시지 수신 오류: {:?}", "Consumer", e),
            }
        }
    }
}

// endregion: --- Kafka Consumer

// region:    --- Kafka Manager
pub struct KafkaManager {
    producer: Arc<KafkaProducer>,
    consumer: Arc<KafkaConsumer>,
    brokers: String,
}

/// KafkaManager 구현
impl KafkaManager {
    pub fn new(config: &Config) -> Result<Self, String> {
        let group_id = "shop-analytics-group";

        let producer = Arc::new(KafkaProducer::new(
            &config.kafka_brokers,
            &config.shop_events_topic,
        )?);
        let consumer = Arc::new(KafkaConsumer::new(&config.kafka_brokers, group_id)?);

        Ok(KafkaManager {
            producer,
            consumer,
            brokers: config.kafka_brokers.clone(),
        })
    }

    /// 프로듀서 반환
    pub fn get_producer(&self) -> Arc<KafkaProducer> {
        Arc::clone(&self.producer)
    }

    /// 컨슈머 반환
    pub fn get_consumer(&self) -> Arc<KafkaConsumer> {
        Arc::clone(&self.consumer)
    }

    /// 토픽 생성 (이미 존재하면 성공으로 처리)
    pub async fn create_topic(
        &self,
        topic_name: &str,
        num_partitions: i32,
        replication_factor: i32,
    ) -> Result<(), String> {
        info!("{:<12} --> Kafka 토픽 생성 시작: {}", "Manager", topic_name);

        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(|e| format!("AdminClient 생성 실패: {:?}", e))?;

        let new_topic = NewTopic::new(
            topic_name,
            num_partitions,
            TopicReplication::Fixed(replication_factor),
        );

        let results = admin_client
            .create_topics(&[new_topic], &AdminOptions::new())
            .await
            .map_err(|e| format!("토픽 생성 실패: {:?}", e))?;

        for result in results {
            match result {
                Ok(name) => info!("{:<12} --> Kafka 토픽 생성 성공: {}", "Manager", name),
                Err((name, rdkafka::types::RDKafkaErrorCode::TopicAlreadyExists)) => {
                    info!("{:<12} --> Kafka 토픽 이미 존재: {}", "Manager", name)
                }
                Err((name, code)) => {
                    error!("{:<12} --> Kafka 토픽 생성 실패: {} {:?}", "Manager", name, code);
                    return Err(format!("토픽 생성 실패: {} {:?}", name, code));
                }
            }
        }
        Ok(())
    }
}

// endregion: --- Kafka Manager

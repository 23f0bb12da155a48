/// 서비스 설정
/// 모든 값은 환경 변수에서 읽으며, 필수 값은 DATABASE_URL 뿐이다.
// region:    --- Imports
use std::time::Duration;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config

/// 기본 로테이션 주기 (6시간)
pub const DEFAULT_ROTATION_INTERVAL_SECS: u64 = 6 * 60 * 60;
/// 기본 드롭 유지 시간 (시간 단위)
pub const DEFAULT_DROP_HOURS: i32 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("환경 변수 {0} 가 설정되지 않았습니다")]
    Missing(&'static str),
    #[error("환경 변수 {key} 값이 잘못되었습니다: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub kafka_brokers: String,
    pub bind_addr: String,
    pub rotation_interval: Duration,
    pub default_drop_hours: i32,
    pub db_max_connections: u32,
    pub shop_events_topic: String,
    pub reset_database: bool,
    pub seed_sample_data: bool,
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 조회 함수로부터 설정 생성
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let default_drop_hours = parse_or(&lookup, "DEFAULT_DROP_HOURS", DEFAULT_DROP_HOURS)?;
        if default_drop_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_DROP_HOURS",
                value: default_drop_hours.to_string(),
            });
        }

        Ok(Self {
            database_url,
            kafka_brokers: lookup("KAFKA_BROKERS").unwrap_or_else(|| "localhost:9092".to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            rotation_interval: Duration::from_secs(parse_or(
                &lookup,
                "ROTATION_INTERVAL_SECS",
                DEFAULT_ROTATION_INTERVAL_SECS,
            )?),
            default_drop_hours,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            shop_events_topic: lookup("SHOP_EVENTS_TOPIC")
                .unwrap_or_else(|| "shop-events".to_string()),
            reset_database: parse_or(&lookup, "RESET_DATABASE", false)?,
            seed_sample_data: parse_or(&lookup, "SEED_SAMPLE_DATA", false)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

// endregion: --- Config

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).unwrap();
        assert_eq!(config.rotation_interval, Duration::from_secs(21_600));
        assert_eq!(config.default_drop_hours, 24);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.shop_events_topic, "shop-events");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert!(!config.reset_database);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn boolean_flags_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("RESET_DATABASE", "true"),
            ("SEED_SAMPLE_DATA", "true"),
        ]))
        .unwrap();
        assert!(config.reset_database);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("ROTATION_INTERVAL_SECS", "six hours"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "ROTATION_INTERVAL_SECS",
                ..
            }
        ));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("DEFAULT_DROP_HOURS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
// endregion: --- Tests

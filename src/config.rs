// region:    --- Imports
use thiserror::Error;
// endregion: --- Imports

// region:    --- Constants

/// 레지스트리와 결제 서비스에 알리는 서비스 이름
pub const SERVICE_NAME: &str = "AuctionService";

/// 업스트림 서비스 호출 타임아웃(connect/read/write 각 5초)
pub const UPSTREAM_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

// endregion: --- Constants

// region:    --- Config

/// 기동 시 한 번 읽는 전역 설정
/// 필수 환경 변수가 하나라도 없으면 기동 실패
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub registry_service_url: String,
    pub payment_service_url: String,
    pub service_port: u16,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("환경 변수가 설정되지 않았습니다: {0}")]
    MissingVar(&'static str),
    #[error("SERVICE_PORT가 유효한 포트 번호(1-65535)가 아닙니다: {0}")]
    InvalidPort(String),
}

impl Config {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let service_port_raw = require_env("SERVICE_PORT")?;
        let service_port = service_port_raw
            .parse::<u16>()
            .ok()
            .filter(|port| *port > 0)
            .ok_or(ConfigError::InvalidPort(service_port_raw))?;

        Ok(Self {
            database_url: require_env("DATABASE_URL")?,
            registry_service_url: require_env("REGISTRY_SERVICE_URL")?,
            payment_service_url: require_env("PAYMENT_SERVICE_URL")?,
            service_port,
        })
    }

    /// 레지스트리에 광고하는 서비스 주소
    pub fn service_address(&self) -> String {
        format!("http://auction-service:{}", self.service_port)
    }
}

/// 필수 환경 변수 조회(빈 값은 미설정으로 취급)
fn require_env(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

// endregion: --- Config

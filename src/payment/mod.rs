/// 결제 서비스 접근 게이트
/// 모든 변경 연산은 엔진에 도달하기 전에 여기서 토큰 검증을 통과해야 한다.
// region:    --- Imports
use crate::config::{SERVICE_NAME, UPSTREAM_TIMEOUT};
use crate::error::ServiceError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Payment Gate

pub struct PaymentGate {
    client: reqwest::Client,
    base_url: String,
}

/// 토큰 검증 응답
/// allowed 필드가 없으면 거부로 취급한다
#[derive(Debug, Deserialize)]
struct TokenCheckResponse {
    #[serde(default)]
    allowed: bool,
}

impl PaymentGate {
    pub fn new(base_url: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(UPSTREAM_TIMEOUT)
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// 변경 연산 인가: 토큰 추출 후 결제 서비스에 검증을 위임한다
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        method_name: &str,
    ) -> Result<(), ServiceError> {
        let token = extract_bearer_token(headers)?;
        self.check_token(&token, method_name).await
    }

    /// 결제 서비스 토큰 검증 호출
    async fn check_token(&self, token: &str, method_name: &str) -> Result<(), ServiceError> {
        info!("{:<12} --> 토큰 검증 요청: {}", "PaymentGate", method_name);

        let payload = json!({
            "token": token,
            "serviceName": SERVICE_NAME,
            "methodName": method_name,
        });

        let response = self
            .client
            .post(format!("{}/token/check", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("{:<12} --> 결제 서비스 호출 실패: {}", "PaymentGate", e);
                ServiceError::UpstreamUnavailable(format!("결제 서비스에 연결할 수 없습니다: {e}"))
            })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ServiceError::UpstreamUnavailable(
                "결제 서비스 오류".to_string(),
            ));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ServiceError::Unauthenticated(
                "유효하지 않은 토큰입니다.".to_string(),
            ));
        }
        if status.is_client_error() {
            return Err(ServiceError::Forbidden(
                "토큰 검증에 실패했습니다.".to_string(),
            ));
        }

        let body: TokenCheckResponse = response.json().await.map_err(|e| {
            ServiceError::UpstreamUnavailable(format!("결제 서비스 응답을 해석할 수 없습니다: {e}"))
        })?;

        if !body.allowed {
            return Err(ServiceError::Forbidden("접근이 거부되었습니다.".to_string()));
        }
        Ok(())
    }
}

/// Authorization 헤더에서 Bearer 토큰 추출
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ServiceError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            ServiceError::Unauthenticated("Authorization 헤더가 필요합니다.".to_string())
        })?;

    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        ServiceError::Unauthenticated("Authorization 헤더는 Bearer 방식이어야 합니다.".to_string())
    })?;

    if token.is_empty() {
        return Err(ServiceError::Unauthenticated(
            "Bearer 토큰이 비어 있습니다.".to_string(),
        ));
    }
    Ok(token.to_string())
}

// endregion: --- Payment Gate

// region:    --- Tests


// endregion: --- Tests

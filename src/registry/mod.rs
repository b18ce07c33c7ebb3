/// 서비스 디렉터리 등록
/// 기동 시 서비스 주소와 과금 대상 메서드를 레지스트리에 광고한다.
/// 등록 실패는 로그만 남기고 서비스 기동을 막지 않는다.
// region:    --- Imports
use crate::config::{SERVICE_NAME, UPSTREAM_TIMEOUT};
use crate::error::ServiceError;
use serde_json::{json, Value};
use tracing::info;
// endregion: --- Imports

// region:    --- Registry Client

/// 결제 게이트를 거치는 메서드 목록(레지스트리에 개별 등록)
pub const PAYABLE_METHODS: [&str; 4] = ["PlaceBid", "CreateLot", "UpdateLot", "DeleteLot"];

pub struct RegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl RegistryClient {
    pub fn new(base_url: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(UPSTREAM_TIMEOUT)
            .timeout(UPSTREAM_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// 서비스 등록 후 메서드 목록 등록
    pub async fn register(&self, service_address: &str) -> Result<i64, ServiceError> {
        let service_id = self.register_service(service_address).await?;
        for method in PAYABLE_METHODS {
            self.register_method(method, service_id).await?;
        }
        Ok(service_id)
    }

    /// 서비스 주소 등록, 부여된 서비스 id 반환
    async fn register_service(&self, service_address: &str) -> Result<i64, ServiceError> {
        let payload = json!({
            "ServiceName": SERVICE_NAME,
            "address": service_address,
        });

        let response = self
            .client
            .post(format!("{}/server", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                ServiceError::UpstreamUnavailable(format!(
                    "레지스트리 서비스에 연결할 수 없습니다: {e}"
                ))
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ServiceError::UpstreamUnavailable(format!(
                "레지스트리 등록이 거부되었습니다: {status}"
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            ServiceError::UpstreamUnavailable(format!(
                "레지스트리 응답을 해석할 수 없습니다: {e}"
            ))
        })?;

        parse_service_id(&body).ok_or_else(|| {
            ServiceError::UpstreamUnavailable(
                "레지스트리 응답에서 서비스 id를 확인할 수 없습니다.".to_string(),
            )
        })
    }

    /// 메서드 등록
    async fn register_method(&self, method: &str, service_id: i64) -> Result<(), ServiceError> {
        info!("{:<12} --> 메서드 등록: {}", "Registry", method);

        let payload = json!({
            "MethodName": method,
            "IsPrivate": false,
            "ServiceModelID": service_id,
        });

        let response = self
            .client
            .post(format!("{}/method", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                ServiceError::UpstreamUnavailable(format!("메서드 등록에 실패했습니다: {method} ({e})"))
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ServiceError::UpstreamUnavailable(format!(
                "메서드 등록에 실패했습니다: {method} ({status})"
            )));
        }
        Ok(())
    }
}

/// 레지스트리 응답에서 서비스 id 추출
/// 구현체마다 응답 형태가 달라 id / ID / ServiceModelID / data.id를 모두 허용한다.
fn parse_service_id(body: &Value) -> Option<i64> {
    body.get("id")
        .and_then(Value::as_i64)
        .or_else(|| body.get("ID").and_then(Value::as_i64))
        .or_else(|| body.get("ServiceModelID").and_then(Value::as_i64))
        .or_else(|| {
            body.get("data")
                .and_then(|data| data.get("id"))
                .and_then(Value::as_i64)
        })
        .filter(|service_id| *service_id > 0)
}

// endregion: --- Registry Client

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    /// 허용되는 응답 형태별 id 추출 확인
    #[test]
    fn test_parse_service_id_shapes() {
        assert_eq!(parse_service_id(&json!({"id": 7})), Some(7));
        assert_eq!(parse_service_id(&json!({"ID": 8})), Some(8));
        assert_eq!(parse_service_id(&json!({"ServiceModelID": 9})), Some(9));
        assert_eq!(parse_service_id(&json!({"data": {"id": 10}})), Some(10));
    }

    /// id가 없거나 양수가 아니면 실패
    #[test]
    fn test_parse_service_id_rejects_invalid() {
        assert_eq!(parse_service_id(&json!({})), None);
        assert_eq!(parse_service_id(&json!({"id": 0})), None);
        assert_eq!(parse_service_id(&json!({"id": -3})), None);
        assert_eq!(parse_service_id(&json!({"id": "7"})), None);
        assert_eq!(parse_service_id(&json!({"data": {}})), None);
    }
}

// endregion: --- Tests

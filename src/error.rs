/// 서비스 오류 분류
/// 비즈니스 거절(입찰 거절, 미존재 로트)은 정상적인 결과이며 재시도하지 않는다.
/// 저장소/업스트림 장애만 5xx로 노출한다.
// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
// endregion: --- Imports

// region:    --- ServiceError

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("존재하지 않는 로트입니다.")]
    LotNotFound,
    #[error("입찰 금액은 현재 가격보다 높아야 합니다.")]
    BidTooLow,
    #[error("경매가 이미 종료되었습니다.")]
    AuctionEnded,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    UpstreamUnavailable(String),
    #[error("저장소 오류: {0}")]
    Storage(#[from] sqlx::Error),
}

impl ServiceError {
    /// 클라이언트용 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::LotNotFound => "LOT_NOT_FOUND",
            Self::BidTooLow => "BID_TOO_LOW",
            Self::AuctionEnded => "AUCTION_ENDED",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// HTTP 상태 코드 매핑
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BidTooLow => StatusCode::BAD_REQUEST,
            Self::LotNotFound => StatusCode::NOT_FOUND,
            Self::AuctionEnded => StatusCode::CONFLICT,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if let Self::Storage(e) = &self {
            error!("{:<12} --> 저장소 오류: {:?}", "Error", e);
        }
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (self.status_code(), body).into_response()
    }
}

// endregion: --- ServiceError

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    /// 오류 분류별 HTTP 상태 코드 확인
    #[test]
    fn test_status_code_mapping() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::LotNotFound, StatusCode::NOT_FOUND),
            (ServiceError::BidTooLow, StatusCode::BAD_REQUEST),
            (ServiceError::AuctionEnded, StatusCode::CONFLICT),
            (
                ServiceError::Unauthenticated("x".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (ServiceError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (
                ServiceError::UpstreamUnavailable("x".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ServiceError::Storage(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.status_code(), expected, "variant: {}", err.code());
        }
    }

    /// 오류 코드가 변하지 않는지 확인(클라이언트 계약)
    #[test]
    fn test_error_codes() {
        assert_eq!(ServiceError::LotNotFound.code(), "LOT_NOT_FOUND");
        assert_eq!(ServiceError::BidTooLow.code(), "BID_TOO_LOW");
        assert_eq!(ServiceError::AuctionEnded.code(), "AUCTION_ENDED");
    }
}

// endregion: --- Tests

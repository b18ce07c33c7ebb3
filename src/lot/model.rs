// region:    --- Imports
use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
// endregion: --- Imports

// region:    --- Lot Model

/// 경매 로트 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lot {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub start_price: Decimal,
    pub current_price: Option<Decimal>,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub auction_end_date: DateTime<Utc>,
}

// endregion: --- Lot Model

// region:    --- Create

/// 로트 생성 요청 바디
/// 필수 필드 검증은 핸들러 경계에서 수행한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLotCommand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_price: Option<Decimal>,
    pub owner_id: Option<String>,
    pub auction_end_date: Option<DateTime<Utc>>,
}

/// 검증을 통과한 로트 생성 파라미터
/// auction_end_date가 없으면 저장소가 7일 후로 기본값을 채운다.
#[derive(Debug, Clone)]
pub struct NewLot {
    pub name: String,
    pub description: Option<String>,
    pub start_price: Decimal,
    pub owner_id: Option<String>,
    pub auction_end_date: Option<DateTime<Utc>>,
}

impl CreateLotCommand {
    /// 필수 필드 검증 후 저장소 파라미터로 변환
    pub fn validate(self) -> Result<NewLot, ServiceError> {
        let mut missing = Vec::new();
        if self.name.is_none() {
            missing.push("name");
        }
        if self.start_price.is_none() {
            missing.push("start_price");
        }
        if self.auction_end_date.is_none() {
            missing.push("auction_end_date");
        }

        if let (Some(name), Some(start_price), Some(auction_end_date)) =
            (self.name, self.start_price, self.auction_end_date)
        {
            if name.trim().is_empty() {
                return Err(ServiceError::Validation(
                    "name 필드는 비어 있을 수 없습니다.".to_string(),
                ));
            }
            Ok(NewLot {
                name,
                description: self.description,
                start_price,
                owner_id: self.owner_id,
                auction_end_date: Some(auction_end_date),
            })
        } else {
            Err(ServiceError::Validation(format!(
                "필수 필드가 누락되었습니다: {}",
                missing.join(", ")
            )))
        }
    }
}

// endregion: --- Create

// region:    --- Update

/// 로트 부분 수정 요청 바디
/// 바깥 Option은 필드 존재 여부, 안쪽 Option은 명시적 null을 구분한다.
/// (키 없음 = 변경하지 않음, null = 값 비우기)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLotCommand {
    #[serde(default, deserialize_with = "explicit_optional")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_optional")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit_optional")]
    pub owner_id: Option<Option<String>>,
}

/// 검증을 통과한 부분 수정 내용
/// name은 NOT NULL 컬럼이므로 값이 있을 때만 변경된다.
/// 가격 필드와 id는 이 경로로 변경할 수 없다.
#[derive(Debug, Default, Clone)]
pub struct LotChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub owner_id: Option<Option<String>>,
}

impl LotChanges {
    /// 변경할 필드가 하나도 없는지 확인
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.owner_id.is_none()
    }
}

impl UpdateLotCommand {
    /// 수정 가능 필드 검증 후 변경 내용으로 변환
    pub fn validate(self) -> Result<LotChanges, ServiceError> {
        let name = match self.name {
            Some(Some(name)) if name.trim().is_empty() => {
                return Err(ServiceError::Validation(
                    "name 필드는 비어 있을 수 없습니다.".to_string(),
                ))
            }
            Some(Some(name)) => Some(name),
            Some(None) => {
                return Err(ServiceError::Validation(
                    "name 필드는 null일 수 없습니다.".to_string(),
                ))
            }
            None => None,
        };

        Ok(LotChanges {
            name,
            description: self.description,
            owner_id: self.owner_id,
        })
    }
}

/// 명시적 null과 키 누락을 구분하는 역직렬화
/// 키가 있으면 Some(값 또는 None), 키가 없으면 serde 기본값 None
fn explicit_optional<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// endregion: --- Update

// region:    --- Tests

#[cfg(test)]
mod tests {
    use super::*;

    /// 키 누락 / 명시적 null / 값 있음 구분 확인
    #[test]
    fn test_update_command_field_presence() {
        let cmd: UpdateLotCommand = serde_json::from_str("{}").unwrap();
        assert_eq!(cmd.name, None);
        assert_eq!(cmd.description, None);
        assert_eq!(cmd.owner_id, None);

        let cmd: UpdateLotCommand = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cmd.description, Some(None));
        assert_eq!(cmd.name, None);

        let cmd: UpdateLotCommand =
            serde_json::from_str(r#"{"description": "고려청자", "owner_id": null}"#).unwrap();
        assert_eq!(cmd.description, Some(Some("고려청자".to_string())));
        assert_eq!(cmd.owner_id, Some(None));
    }

    /// 빈 수정 요청은 빈 변경 내용이 된다
    #[test]
    fn test_empty_update_command() {
        let cmd: UpdateLotCommand = serde_json::from_str("{}").unwrap();
        let changes = cmd.validate().unwrap();
        assert!(changes.is_empty());
    }

    /// name은 null로 비울 수 없다
    #[test]
    fn test_update_command_rejects_null_name() {
        let cmd: UpdateLotCommand = serde_json::from_str(r#"{"name": null}"#).unwrap();
        let err = cmd.validate().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    /// 생성 요청은 누락된 필수 필드를 모두 나열한다
    #[test]
    fn test_create_command_lists_missing_fields() {
        let cmd: CreateLotCommand = serde_json::from_str(r#"{"name": "화병"}"#).unwrap();
        let err = cmd.validate().unwrap_err();
        match err {
            ServiceError::Validation(message) => {
                assert!(message.contains("start_price"));
                assert!(message.contains("auction_end_date"));
                assert!(!message.contains("name"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    /// 빈 name은 생성에서 거절된다
    #[test]
    fn test_create_command_rejects_empty_name() {
        let cmd: CreateLotCommand = serde_json::from_str(
            r#"{"name": "  ", "start_price": 100, "auction_end_date": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(matches!(
            cmd.validate().unwrap_err(),
            ServiceError::Validation(_)
        ));
    }
}

// endregion: --- Tests

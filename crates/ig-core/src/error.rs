//! 통계 엔진의 에러 및 비치명적 알림 타입.
//!
//! 구조적 에러(빈 입력, 스키마 불일치)는 [`StatsError`]로 호출자에게 전달되고,
//! 수치적 퇴화나 외부 가격 조회 실패는 [`StatsNotice`]로 기록된 뒤 계산이 계속됩니다.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// 통계 계산 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// 최소 한 개 이상의 원소가 필요한 연산에 빈 시계열/테이블이 전달됨
    #[error("빈 입력: {0}")]
    EmptyInput(String),

    /// 필수 컬럼 누락
    #[error("스키마 에러: 필수 컬럼 '{0}' 누락")]
    MissingColumn(String),

    /// 컬럼 값 파싱 실패
    #[error("잘못된 값: 컬럼 '{column}', {row}행: {value:?}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// 정렬된 시계열 길이 불일치
    #[error("길이 불일치: 기대 {expected}, 실제 {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 테이블 소스 에러
    #[error("데이터 소스 에러: {0}")]
    Source(String),
}

/// 통계 연산을 위한 Result 타입.
pub type StatsResult<T> = Result<T, StatsError>;

impl StatsError {
    /// 입력 구조 자체의 문제인지 확인합니다.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            StatsError::EmptyInput(_)
                | StatsError::MissingColumn(_)
                | StatsError::InvalidValue { .. }
                | StatsError::LengthMismatch { .. }
        )
    }

    /// 빈 입력 에러 생성 헬퍼.
    pub fn empty(context: impl Into<String>) -> Self {
        StatsError::EmptyInput(context.into())
    }
}

/// 계산을 중단시키지 않는 알림.
///
/// 호출자는 요약 결과와 함께 이 목록을 받아 경고로 표시합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatsNotice {
    /// 비율 지표의 분모가 0이어서 0.0으로 대체됨
    DegenerateMetric { metric: String },

    /// 현재가 조회 실패로 마지막 알려진 가격을 사용함
    PriceFallback {
        coin: String,
        fallback_price: Decimal,
        reason: String,
    },
}

impl std::fmt::Display for StatsNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsNotice::DegenerateMetric { metric } => {
                write!(f, "{} 분모가 0이어서 0.0으로 계산됨", metric)
            }
            StatsNotice::PriceFallback {
                coin,
                fallback_price,
                reason,
            } => write!(
                f,
                "{} 현재가를 가져오지 못해 {}을(를) 사용함 ({})",
                coin, fallback_price, reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_structural() {
        assert!(StatsError::empty("returns").is_structural());
        assert!(StatsError::MissingColumn("Portfolio".to_string()).is_structural());
        assert!(!StatsError::InvalidParameter("threshold".to_string()).is_structural());
        assert!(!StatsError::Source("offline".to_string()).is_structural());
    }

    #[test]
    fn test_missing_column_names_column() {
        let err = StatsError::MissingColumn("Quantity".to_string());
        assert!(err.to_string().contains("Quantity"));
    }

    #[test]
    fn test_notice_display() {
        let notice = StatsNotice::PriceFallback {
            coin: "BTC".to_string(),
            fallback_price: dec!(42000),
            reason: "timeout".to_string(),
        };
        let text = notice.to_string();
        assert!(text.contains("BTC"));
        assert!(text.contains("42000"));
    }
}

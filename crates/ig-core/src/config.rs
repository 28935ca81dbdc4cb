//! 설정 관리.
//!
//! TOML 파일과 `IG__` 접두사 환경 변수에서 대시보드 설정을 읽습니다.
//! UI 세션 상태였던 임계값, 기준 코인 선택, 이상치 제외 여부는 모두
//! 여기서 명시적인 파라미터로 전달됩니다.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{StatsError, StatsResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 통계 계산 설정
    pub analytics: AnalyticsConfig,
    /// 상관관계 분석 설정
    pub correlation: CorrelationConfig,
    /// 시트 소스 설정
    pub sources: SourceConfig,
    /// 정적 현재가 (티커 → USD 가격)
    pub quotes: HashMap<String, f64>,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 통계 계산 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 무위험 수익률 (기간 단위, 예: 0.0)
    pub risk_free_rate: f64,
    /// 손익 분포 계산 시 ±500% 밖 이상치 제외 여부
    pub exclude_outliers: bool,
    /// 메모이제이션 캐시 TTL (초)
    pub cache_ttl_secs: u64,
    /// 매수일 컬럼 날짜 형식
    pub date_format: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            exclude_outliers: false,
            cache_ttl_secs: 600,
            date_format: "%d.%m.%Y".to_string(),
        }
    }
}

/// 상관관계 분석 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// 상관계수 임계값 (-1.0 ~ 0.0, 이 값 미만만 표시)
    pub threshold: f64,
    /// 기준 코인 목록 (비어 있으면 전체)
    pub base_assets: Vec<String>,
    /// 중복 제거 및 시간축 컬럼
    pub key_column: String,
    /// 가격 대신 변화율로 상관계수 계산
    pub use_returns: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            base_assets: Vec::new(),
            key_column: "datetime".to_string(),
            use_returns: false,
        }
    }
}

/// 시트 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// 시트 파일 디렉토리
    pub data_dir: String,
    /// 모멘텀 전략 시트
    pub momentum_sheet: String,
    /// HODL BTC 전략 시트
    pub hodl_sheet: String,
    /// 코인 가격 시트
    pub prices_sheet: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            momentum_sheet: "streamlit".to_string(),
            hodl_sheet: "hodl_btc".to_string(),
            prices_sheet: "raw_data".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드 (예: IG__CORRELATION__THRESHOLD=-0.5)
            .add_source(
                config::Environment::with_prefix("IG")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 파라미터 범위를 검증합니다.
    pub fn validate(&self) -> StatsResult<()> {
        let threshold = self.correlation.threshold;
        if !(-1.0..=0.0).contains(&threshold) {
            return Err(StatsError::InvalidParameter(format!(
                "correlation.threshold는 -1.0 ~ 0.0 범위여야 합니다: {}",
                threshold
            )));
        }

        if !self.analytics.risk_free_rate.is_finite() {
            return Err(StatsError::InvalidParameter(
                "analytics.risk_free_rate가 유한한 값이 아닙니다".to_string(),
            ));
        }

        if let Some((coin, price)) = self.quotes.iter().find(|(_, p)| **p <= 0.0) {
            return Err(StatsError::InvalidParameter(format!(
                "quotes.{} 가격은 양수여야 합니다: {}",
                coin, price
            )));
        }

        Ok(())
    }
}

//! # IG Core
//!
//! 전략 통계 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 시트 기반 테이블 모델과 거래 기록 스키마
//! - 코인 가격 와이드 테이블
//! - 외부 협력자 인터페이스 (테이블 소스, 현재가 조회)
//! - 에러 및 비치명적 알림 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;

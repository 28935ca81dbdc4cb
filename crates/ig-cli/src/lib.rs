//! 전략 통계 대시보드 CLI.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - CSV 디렉토리 기반 시트 소스
//! - 전략 요약, 분포, 상관관계, 복리 동학 명령

pub mod commands;
pub mod source;

pub use source::CsvSheetSource;

//! 전략 통계 및 상관관계 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술 통계 및 위험 지표 (샤프/소르티노, 최대 낙폭, 연속 손실)
//! - 전략 요약 집계 (스냅샷/실시간 모드)
//! - 수익률 분류와 이상치 필터
//! - 복리 수익률 동학
//! - 음의 상관관계 탐색
//! - 지표 함수와 분리된 메모이제이션 캐시 및 서비스 계층
//!
//! # Re-exports
//!
//! - [`strategy_stats`]: 전략 요약 (StrategySummary, SummaryReport)
//! - [`correlation`]: 상관행렬과 음의 상관 구조
//! - [`service`]: 캐시를 갖춘 서비스 (StatsService)

pub mod cache;
pub mod classifier;
pub mod compound;
pub mod correlation;
pub mod describe;
pub mod outlier;
pub mod profit_loss;
pub mod risk;
pub mod service;
pub mod strategy_stats;

pub use cache::MemoCache;
pub use classifier::{classify, return_shares, ReturnClass, ReturnShares};
pub use compound::{
    compound_interest_from_records, compound_interest_series, compound_interest_values,
    CompoundPoint,
};
pub use correlation::{
    correlation_matrix, filter_negative_correlations, negative_correlations, pearson_correlation,
    related_assets, CorrelationFilter, CorrelationMatrix, NegativeCorrelations,
};
pub use describe::{Description, SideStats};
pub use outlier::{filter_returns, filter_trades, OUTLIER_BOUND};
pub use profit_loss::{describe_returns, profit_loss_description, ProfitLossDescription};
pub use risk::{
    drawdown_series, max_drawdown, max_loss_streak, sharpe_ratio, sortino_ratio, wealth_index,
};
pub use service::{CorrelationReport, StatsService, StrategyReport, HODL_BTC, MOMENTUM};
pub use strategy_stats::{
    compare_strategies, strategy_summary, strategy_summary_from_table, strategy_summary_live,
    ComparisonRow, StrategySummary, SummaryReport,
};

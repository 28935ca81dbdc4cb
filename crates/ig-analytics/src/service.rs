//! 표현 계층이 사용하는 통계 서비스.
//!
//! 테이블 소스에서 시트를 읽고 설정값을 명시적 파라미터로 넘겨 각 지표 함수를 호출합니다.
//! 캐싱은 이 계층에서만 일어나며 지표 함수는 캐시를 알지 못합니다.

use ig_core::{
    columns, stats_span, AppConfig, PriceLookup, PriceTable, StatsResult, Table, TableSource,
    TradeRecord,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::MemoCache;
use crate::classifier::{return_shares, ReturnShares};
use crate::compound::{compound_interest_from_records, CompoundPoint};
use crate::correlation::{
    correlation_matrix, filter_negative_correlations, negative_correlations, related_assets,
    CorrelationFilter, CorrelationMatrix, NegativeCorrelations,
};
use crate::profit_loss::{profit_loss_description, ProfitLossDescription};
use crate::strategy_stats::{strategy_summary, strategy_summary_live, SummaryReport};

/// 모멘텀 전략 표시 이름.
pub const MOMENTUM: &str = "Momentum";
/// 비트코인 보유 기준 전략 표시 이름.
pub const HODL_BTC: &str = "Hodl BTC";

/// 이름 붙은 전략 요약.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyReport {
    pub name: String,
    #[serde(flatten)]
    pub report: SummaryReport,
}

/// 상관관계 분석 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationReport {
    pub matrix: CorrelationMatrix,
    /// 필터 적용 전 음의 상관 구조
    pub negative: NegativeCorrelations,
    /// 임계값/기준 코인 선택을 적용한 구조
    pub filtered: NegativeCorrelations,
    /// 선택된 기준 코인과 상대 코인 (차트 표시 순서)
    pub related: Vec<String>,
}

/// 캐시를 갖춘 통계 서비스.
pub struct StatsService<S> {
    source: S,
    config: AppConfig,
    cache: MemoCache,
}

impl<S: TableSource> StatsService<S> {
    /// 설정의 `cache_ttl_secs`로 캐시를 구성합니다.
    pub fn new(source: S, config: AppConfig) -> Self {
        let cache = MemoCache::with_ttl_secs(config.analytics.cache_ttl_secs);
        Self {
            source,
            config,
            cache,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &MemoCache {
        &self.cache
    }

    /// 거래 시트를 읽고 필수 컬럼이 비어 있는 행을 제거합니다.
    pub fn trade_table(&self, sheet: &str) -> StatsResult<Table> {
        let table = self.source.query(sheet)?;
        let cleaned = table.drop_incomplete_rows(&columns::REQUIRED)?;
        if cleaned.len() != table.len() {
            debug!(
                sheet,
                dropped = table.len() - cleaned.len(),
                "불완전한 행 제거"
            );
        }
        Ok(cleaned)
    }

    /// 거래 시트를 타입이 있는 기록으로 읽습니다.
    pub fn trade_records(&self, sheet: &str) -> StatsResult<Vec<TradeRecord>> {
        let table = self.trade_table(sheet)?;
        TradeRecord::from_table(&table, &self.config.analytics.date_format)
    }

    /// 전략 요약.
    ///
    /// 스냅샷 모드 결과만 캐시합니다. 실시간 모드는 매번 현재가를 조회합니다.
    pub fn summary(
        &self,
        strategy: &str,
        sheet: &str,
        lookup: Option<&dyn PriceLookup>,
    ) -> StatsResult<SummaryReport> {
        let _span = stats_span!("strategy_summary", strategy).entered();
        let rf = self.config.analytics.risk_free_rate;
        let table = self.trade_table(sheet)?;

        match lookup {
            Some(lookup) => {
                let records = TradeRecord::from_table(&table, &self.config.analytics.date_format)?;
                let _coin_span = records
                    .last()
                    .map(|last| stats_span!("live_revaluation", strategy, last.coin).entered());
                strategy_summary_live(&records, rf, lookup)
            }
            None => self
                .cache
                .get_or_compute("strategy_summary", &(&table, rf), || {
                    let records =
                        TradeRecord::from_table(&table, &self.config.analytics.date_format)?;
                    strategy_summary(&records, rf)
                }),
        }
    }

    /// Momentum과 Hodl BTC 요약을 순서대로 계산합니다.
    pub fn compare(&self, lookup: Option<&dyn PriceLookup>) -> StatsResult<Vec<StrategyReport>> {
        let sources = &self.config.sources;
        [
            (MOMENTUM, sources.momentum_sheet.as_str()),
            (HODL_BTC, sources.hodl_sheet.as_str()),
        ]
        .into_iter()
        .map(|(name, sheet)| {
            let report = self.summary(name, sheet, lookup)?;
            if !report.notices.is_empty() {
                info!(strategy = name, notices = report.notices.len(), "요약 알림 발생");
            }
            Ok(StrategyReport {
                name: name.to_string(),
                report,
            })
        })
        .collect()
    }

    /// 수익/손실 분포 요약.
    pub fn profit_loss(
        &self,
        sheet: &str,
        exclude_outliers: bool,
    ) -> StatsResult<ProfitLossDescription> {
        let table = self.trade_table(sheet)?;
        let date_format = &self.config.analytics.date_format;
        self.cache.get_or_compute(
            "profit_loss_description",
            &(&table, exclude_outliers),
            || {
                let records = TradeRecord::from_table(&table, date_format)?;
                Ok(profit_loss_description(&records, exclude_outliers))
            },
        )
    }

    /// 수익/손실/보유 비중.
    pub fn shares(&self, sheet: &str) -> StatsResult<ReturnShares> {
        let table = self.trade_table(sheet)?;
        self.cache.get_or_compute("return_shares", &table, || {
            let returns = table.numeric_column(columns::RETURN)?;
            return_shares(&returns)
        })
    }

    /// 복리 수익률 동학.
    ///
    /// 매수일 컬럼이 없으면 `MissingColumn`, 컬럼은 있지만 칸이 비어 있으면 `InvalidValue`.
    pub fn compound(&self, sheet: &str) -> StatsResult<Vec<CompoundPoint>> {
        let table = self.trade_table(sheet)?;
        table.column_index(columns::PURCHASE_DATE)?;
        self.cache.get_or_compute("compound_interest", &table, || {
            let records = TradeRecord::from_table(&table, &self.config.analytics.date_format)?;
            compound_interest_from_records(&records)
        })
    }

    /// 가격 시트를 키 기준 중복 제거된 와이드 테이블로 읽습니다.
    pub fn price_table(&self) -> StatsResult<PriceTable> {
        let key_column = &self.config.correlation.key_column;
        let table = self.source.query(&self.config.sources.prices_sheet)?;
        let deduped = table.dedup_by(key_column)?;
        PriceTable::from_table(&deduped, key_column)
    }

    /// 상관행렬과 음의 상관 구조.
    ///
    /// `use_returns`가 참이면 가격 대신 변화율로 상관계수를 계산합니다.
    pub fn correlation(
        &self,
        filter: &CorrelationFilter,
        use_returns: bool,
    ) -> StatsResult<CorrelationReport> {
        let prices = self.price_table()?;
        let prices = if use_returns {
            prices.pct_change()
        } else {
            prices
        };

        let matrix = self
            .cache
            .get_or_compute("correlation_matrix", &prices, || correlation_matrix(&prices))?;
        let negative = negative_correlations(&matrix);
        let filtered = filter_negative_correlations(&negative, filter);
        let related = related_assets(&negative, filter);

        info!(
            assets = matrix.assets.len(),
            negative_pairs = negative.pair_count(),
            filtered_pairs = filtered.pair_count(),
            "상관관계 분석 완료"
        );

        Ok(CorrelationReport {
            matrix,
            negative,
            filtered,
            related,
        })
    }

    /// 설정의 `[correlation]` 섹션으로 상관관계를 분석합니다.
    pub fn correlation_from_config(&self) -> StatsResult<CorrelationReport> {
        let section = &self.config.correlation;
        let filter = CorrelationFilter::new(section.threshold, section.base_assets.clone())?;
        self.correlation(&filter, section.use_returns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ig_core::{Cell, StatsError, StaticPriceLookup};
    use rust_decimal_macros::dec;
    use std::cell::Cell as Counter;

    /// 시트 이름별 고정 테이블과 조회 횟수를 기록하는 소스.
    struct FixtureSource {
        queries: Counter<usize>,
    }

    fn trade_table(returns: &[f64], portfolios: &[f64]) -> Table {
        let mut table = Table::new([
            columns::COIN,
            columns::PURCHASE_DATE,
            columns::PURCHASE_PRICE,
            columns::PORTFOLIO,
            columns::QUANTITY,
            columns::RETURN,
        ]);
        for (i, (r, p)) in returns.iter().zip(portfolios).enumerate() {
            table
                .push_row(vec![
                    Cell::from("BTC"),
                    Cell::from(format!("0{}.01.2024", i + 1).as_str()),
                    Cell::from(100.0),
                    Cell::from(*p),
                    Cell::from(1.0),
                    Cell::from(*r),
                ])
                .unwrap();
        }
        table
    }

    impl TableSource for FixtureSource {
        fn query(&self, query: &str) -> StatsResult<Table> {
            self.queries.set(self.queries.get() + 1);
            match query {
                "streamlit" => Ok(trade_table(
                    &[0.0, 0.1, -0.2, 0.1],
                    &[1000.0, 1100.0, 880.0, 968.0],
                )),
                "hodl_btc" => Ok(trade_table(&[0.0, 0.05], &[1000.0, 1050.0])),
                "blank_dates" => {
                    let mut table = trade_table(&[0.0, 0.05], &[1000.0, 1050.0]);
                    let date = table.column_index(columns::PURCHASE_DATE)?;
                    let mut rows = table.rows().to_vec();
                    rows[1][date] = Cell::Empty;
                    table = Table::new(table.columns().to_vec());
                    for row in rows {
                        table.push_row(row)?;
                    }
                    Ok(table)
                }
                "undated" => {
                    let mut table = Table::new(columns::REQUIRED);
                    table.push_row(vec![
                        Cell::from("BTC"),
                        Cell::from(100.0),
                        Cell::from(1000.0),
                        Cell::from(10.0),
                        Cell::from(0.0),
                    ])?;
                    Ok(table)
                }
                "raw_data" => {
                    let mut table = Table::new(["datetime", "BTC", "XRP"]);
                    for (ts, btc, xrp) in [
                        ("t1", 100.0, 50.0),
                        ("t1", 999.0, 1.0),
                        ("t2", 110.0, 45.0),
                        ("t3", 105.0, 48.0),
                        ("t4", 120.0, 40.0),
                    ] {
                        table
                            .push_row(vec![Cell::from(ts), Cell::from(btc), Cell::from(xrp)])
                            .unwrap();
                    }
                    Ok(table)
                }
                other => Err(StatsError::Source(format!("unknown sheet {other}"))),
            }
        }
    }

    fn service() -> StatsService<FixtureSource> {
        StatsService::new(
            FixtureSource {
                queries: Counter::new(0),
            },
            AppConfig::default(),
        )
    }

    #[test]
    fn test_compare_snapshot() {
        let svc = service();
        let reports = svc.compare(None).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].name, MOMENTUM);
        assert_eq!(reports[1].name, HODL_BTC);
        assert_eq!(reports[0].report.summary.life_period, 4);
        assert!((reports[0].report.summary.max_drawdown + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_summary_is_cached() {
        let svc = service();
        let first = svc.summary(MOMENTUM, "streamlit", None).unwrap();
        let second = svc.summary(MOMENTUM, "streamlit", None).unwrap();
        assert_eq!(first, second);
        assert_eq!(svc.cache().len(), 1);
        // 시트는 매번 읽어 지문을 만들고, 계산만 캐시에서 재사용
        assert_eq!(svc.source.queries.get(), 2);
    }

    #[test]
    fn test_live_summary_uses_lookup() {
        let svc = service();
        let lookup = StaticPriceLookup::new().with_quote("BTC", dec!(125));
        let report = svc
            .summary(MOMENTUM, "streamlit", Some(&lookup as &dyn PriceLookup))
            .unwrap();
        assert!((report.summary.mom - 0.25).abs() < 1e-12);
        assert!(svc.cache().is_empty());
    }

    #[test]
    fn test_unknown_sheet_is_source_error() {
        let err = service().profit_loss("missing", false).unwrap_err();
        assert!(matches!(err, StatsError::Source(_)));
        assert!(!err.is_structural());
    }

    #[test]
    fn test_shares_and_compound() {
        let svc = service();
        let shares = svc.shares("streamlit").unwrap();
        assert!((shares.profit - 0.5).abs() < 1e-12);
        assert!((shares.hodl - 0.25).abs() < 1e-12);

        let series = svc.compound("hodl_btc").unwrap();
        assert_eq!(series.len(), 2);
        assert!((series[1].value - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_compound_distinguishes_missing_column_from_blank_cell() {
        let svc = service();
        assert_eq!(
            svc.compound("undated").unwrap_err(),
            StatsError::MissingColumn(columns::PURCHASE_DATE.to_string())
        );
        assert_eq!(
            svc.compound("blank_dates").unwrap_err(),
            StatsError::InvalidValue {
                column: columns::PURCHASE_DATE.to_string(),
                row: 1,
                value: String::new(),
            }
        );
    }

    #[test]
    fn test_correlation_dedups_prices() {
        let svc = service();
        let filter = CorrelationFilter::new(-0.5, vec!["BTC".into()]).unwrap();
        let report = svc.correlation(&filter, false).unwrap();

        assert!(report.matrix.is_symmetric());
        assert!(report.matrix.get("BTC", "XRP").unwrap() < -0.5);
        assert_eq!(report.related, vec!["BTC", "XRP"]);
        assert_eq!(report.filtered.base_assets().collect::<Vec<_>>(), vec!["BTC"]);
    }
}

//! 전략 거래 기록.
//!
//! 모멘텀/HODL BTC 시트의 한 행이 한 기간(월)의 거래를 나타냅니다.
//! 행은 시간순이며, 마지막 행이 "현재" 기간입니다.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::table::{Cell, Table};
use crate::error::{StatsError, StatsResult};

/// 시트 컬럼 이름.
pub mod columns {
    pub const COIN: &str = "Coin";
    pub const PURCHASE_DATE: &str = "Purchase date";
    pub const PURCHASE_PRICE: &str = "Purchase price";
    pub const SELL_PRICE: &str = "Sell price";
    pub const PORTFOLIO: &str = "Portfolio";
    pub const QUANTITY: &str = "Quantity";
    pub const RETURN: &str = "Profit / Loss %";
    pub const HODL_BTC: &str = "Hodl BTC";

    /// 요약 계산에 반드시 필요한 컬럼
    pub const REQUIRED: [&str; 5] = [COIN, PURCHASE_PRICE, PORTFOLIO, QUANTITY, RETURN];
}

/// 한 기간의 거래 기록.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 보유 코인 티커 (대문자, 예: "BTC")
    pub coin: String,
    /// 매수일
    pub purchase_date: Option<NaiveDate>,
    /// 매수 가격
    pub purchase_price: Decimal,
    /// 매도 가격 (마지막 기간은 비어 있을 수 있음)
    pub sell_price: Option<Decimal>,
    /// 기간 종료 시 포트폴리오 잔고
    pub portfolio: Decimal,
    /// 보유 수량
    pub quantity: Decimal,
    /// 기간 수익률 (비율, 0.05 = 5%)
    pub return_pct: f64,
    /// 같은 시점 HODL BTC 잔고 (비교 차트용)
    pub hodl_btc: Option<Decimal>,
}

impl TradeRecord {
    /// 테스트와 수동 입력용 생성자.
    pub fn new(
        coin: impl Into<String>,
        purchase_price: Decimal,
        portfolio: Decimal,
        quantity: Decimal,
        return_pct: f64,
    ) -> Self {
        Self {
            coin: coin.into(),
            purchase_date: None,
            purchase_price,
            sell_price: None,
            portfolio,
            quantity,
            return_pct,
            hodl_btc: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.purchase_date = Some(date);
        self
    }

    pub fn with_sell_price(mut self, price: Decimal) -> Self {
        self.sell_price = Some(price);
        self
    }

    /// 시트 테이블을 거래 기록으로 변환합니다.
    ///
    /// 필수 컬럼이 없으면 `MissingColumn`, 빈 테이블이면 `EmptyInput`을 반환합니다.
    /// `date_format`은 매수일 형식이며 ISO(`%Y-%m-%d`)도 함께 허용합니다.
    pub fn from_table(table: &Table, date_format: &str) -> StatsResult<Vec<TradeRecord>> {
        for column in columns::REQUIRED {
            table.column_index(column)?;
        }
        if table.is_empty() {
            return Err(StatsError::empty("거래 테이블"));
        }

        let idx = |name: &str| table.column_index(name).ok();
        let coin = table.column_index(columns::COIN)?;
        let purchase_price = table.column_index(columns::PURCHASE_PRICE)?;
        let portfolio = table.column_index(columns::PORTFOLIO)?;
        let quantity = table.column_index(columns::QUANTITY)?;
        let ret = table.column_index(columns::RETURN)?;
        let date = idx(columns::PURCHASE_DATE);
        let sell_price = idx(columns::SELL_PRICE);
        let hodl_btc = idx(columns::HODL_BTC);

        table
            .rows()
            .iter()
            .enumerate()
            .map(|(row_no, row)| -> StatsResult<TradeRecord> {
                Ok(TradeRecord {
                    coin: match &row[coin] {
                        Cell::Text(text) => text.to_uppercase(),
                        other => return Err(invalid(columns::COIN, row_no, other)),
                    },
                    purchase_date: date
                        .map(|i| parse_date(&row[i], date_format, row_no))
                        .transpose()?
                        .flatten(),
                    purchase_price: decimal_cell(
                        &row[purchase_price],
                        columns::PURCHASE_PRICE,
                        row_no,
                    )?,
                    sell_price: sell_price
                        .map(|i| optional_decimal(&row[i], columns::SELL_PRICE, row_no))
                        .transpose()?
                        .flatten(),
                    portfolio: decimal_cell(&row[portfolio], columns::PORTFOLIO, row_no)?,
                    quantity: decimal_cell(&row[quantity], columns::QUANTITY, row_no)?,
                    return_pct: row[ret]
                        .as_f64()
                        .ok_or_else(|| invalid(columns::RETURN, row_no, &row[ret]))?,
                    hodl_btc: hodl_btc
                        .map(|i| optional_decimal(&row[i], columns::HODL_BTC, row_no))
                        .transpose()?
                        .flatten(),
                })
            })
            .collect()
    }
}

/// 수익률 컬럼만 추출합니다.
pub fn return_series(records: &[TradeRecord]) -> Vec<f64> {
    records.iter().map(|r| r.return_pct).collect()
}

fn invalid(column: &str, row: usize, cell: &Cell) -> StatsError {
    StatsError::InvalidValue {
        column: column.to_string(),
        row,
        value: cell.as_key(),
    }
}

fn decimal_cell(cell: &Cell, column: &str, row: usize) -> StatsResult<Decimal> {
    optional_decimal(cell, column, row)?.ok_or_else(|| invalid(column, row, cell))
}

fn optional_decimal(cell: &Cell, column: &str, row: usize) -> StatsResult<Option<Decimal>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Number(value) => Decimal::from_f64(*value)
            .map(Some)
            .ok_or_else(|| invalid(column, row, cell)),
        Cell::Text(_) => Err(invalid(column, row, cell)),
    }
}

fn parse_date(cell: &Cell, format: &str, row: usize) -> StatsResult<Option<NaiveDate>> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Text(text) => NaiveDate::parse_from_str(text, format)
            .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .map(Some)
            .map_err(|_| invalid(columns::PURCHASE_DATE, row, cell)),
        Cell::Number(_) => Err(invalid(columns::PURCHASE_DATE, row, cell)),
    }
}

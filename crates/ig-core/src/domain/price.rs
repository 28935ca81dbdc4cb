//! 현재가 조회 추상화.
//!
//! 최신 기간의 평가에 쓰이는 외부 협력자입니다. 조회는 실패할 수 있으며,
//! 통계 집계기는 실패 시 마지막으로 알려진 가격으로 대체하고 계속 진행합니다.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// 현재가 조회 에러.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceLookupError {
    /// 네트워크 에러 또는 타임아웃
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 알 수 없는 티커
    #[error("가격 없음: {0}")]
    NotFound(String),

    /// 0 이하 또는 비정상 가격
    #[error("잘못된 가격: {symbol} = {price}")]
    InvalidPrice { symbol: String, price: String },
}

/// 티커의 현재 USD 가격을 조회하는 trait.
///
/// 클로저도 구현체로 사용할 수 있습니다:
///
/// ```
/// use ig_core::{PriceLookup, PriceLookupError};
/// use rust_decimal::Decimal;
///
/// let offline = |symbol: &str| -> Result<Decimal, PriceLookupError> {
///     Err(PriceLookupError::Network(format!("{} 조회 실패", symbol)))
/// };
/// assert!(offline.current_price("BTC").is_err());
/// ```
pub trait PriceLookup {
    /// 현재 가격 (양수).
    fn current_price(&self, symbol: &str) -> Result<Decimal, PriceLookupError>;
}

impl<F> PriceLookup for F
where
    F: Fn(&str) -> Result<Decimal, PriceLookupError>,
{
    fn current_price(&self, symbol: &str) -> Result<Decimal, PriceLookupError> {
        self(symbol)
    }
}

/// 설정에 고정된 시세를 반환하는 조회기.
///
/// 티커는 대소문자를 구분하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceLookup {
    quotes: HashMap<String, Decimal>,
}

impl StaticPriceLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정의 `quotes` 맵에서 생성합니다. 변환할 수 없는 값은 건너뜁니다.
    pub fn from_quotes(quotes: &HashMap<String, f64>) -> Self {
        let quotes = quotes
            .iter()
            .filter_map(|(symbol, price)| {
                Decimal::from_f64(*price).map(|p| (symbol.to_uppercase(), p))
            })
            .collect();
        Self { quotes }
    }

    pub fn with_quote(mut self, symbol: &str, price: Decimal) -> Self {
        self.quotes.insert(symbol.to_uppercase(), price);
        self
    }
}

impl PriceLookup for StaticPriceLookup {
    fn current_price(&self, symbol: &str) -> Result<Decimal, PriceLookupError> {
        let price = self
            .quotes
            .get(&symbol.to_uppercase())
            .copied()
            .ok_or_else(|| PriceLookupError::NotFound(symbol.to_string()))?;

        if price <= Decimal::ZERO {
            return Err(PriceLookupError::InvalidPrice {
                symbol: symbol.to_string(),
                price: price.to_string(),
            });
        }
        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_static_lookup_case_insensitive() {
        let lookup = StaticPriceLookup::new().with_quote("btc", dec!(65000));
        assert_eq!(lookup.current_price("BTC").unwrap(), dec!(65000));
        assert_eq!(
            lookup.current_price("ETH").unwrap_err(),
            PriceLookupError::NotFound("ETH".to_string())
        );
    }

    #[test]
    fn test_static_lookup_rejects_non_positive() {
        let lookup = StaticPriceLookup::new().with_quote("DOGE", Decimal::ZERO);
        assert!(matches!(
            lookup.current_price("DOGE"),
            Err(PriceLookupError::InvalidPrice { .. })
        ));
    }

    #[test]
    fn test_from_quotes() {
        let mut quotes = HashMap::new();
        quotes.insert("eth".to_string(), 3200.5);
        let lookup = StaticPriceLookup::from_quotes(&quotes);
        assert_eq!(lookup.current_price("ETH").unwrap(), dec!(3200.5));
    }
}

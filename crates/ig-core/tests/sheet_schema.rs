//! 시트 테이블 → 도메인 모델 변환 통합 테스트

use ig_core::{columns, Cell, PriceTable, StatsError, Table, TradeRecord};
use proptest::prelude::*;
use rust_decimal_macros::dec;

fn momentum_sheet() -> Table {
    let mut table = Table::new([
        "Coin",
        "Purchase date",
        "Sale date",
        "Purchase price",
        "Sell price",
        "Portfolio",
        "Quantity",
        "Profit / Loss %",
        "Hodl BTC",
    ]);

    for row in [
        ["BTC", "01.01.2024", "01.02.2024", "42000", "43050", "1025", "0.0238", "0.025", "1025"],
        ["SOL", "01.02.2024", "01.03.2024", "100", "90", "922.5", "10.25", "-0.1", "1100"],
        ["SOL", "01.03.2024", "", "90", "", "922.5", "10.25", "0", ""],
    ] {
        table
            .push_row(row.iter().map(|raw| Cell::parse(raw)).collect())
            .unwrap();
    }
    table
}

#[test]
fn test_momentum_sheet_to_records() {
    let records = TradeRecord::from_table(&momentum_sheet(), "%d.%m.%Y").unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[1].coin, "SOL");
    assert_eq!(records[1].hodl_btc, Some(dec!(1100)));
    assert_eq!(records[2].hodl_btc, None);
    assert_eq!(records[2].sell_price, None);
    assert_eq!(records[2].return_pct, 0.0);
}

#[test]
fn test_dropna_before_conversion() {
    // 빈 셀이 있는 행을 먼저 제거
    let cleaned = momentum_sheet().drop_incomplete_rows(&[]).unwrap();
    assert_eq!(cleaned.len(), 2);

    let records = TradeRecord::from_table(&cleaned, "%d.%m.%Y").unwrap();
    assert!(records.iter().all(|r| r.sell_price.is_some()));
}

#[test]
fn test_every_required_column_is_reported() {
    for missing in columns::REQUIRED {
        let kept: Vec<&str> = columns::REQUIRED
            .iter()
            .copied()
            .filter(|c| *c != missing)
            .collect();
        let table = Table::new(kept);

        assert_eq!(
            TradeRecord::from_table(&table, "%d.%m.%Y").unwrap_err(),
            StatsError::MissingColumn(missing.to_string())
        );
    }
}

proptest! {
    #[test]
    fn prop_dedup_keys_are_unique(keys in proptest::collection::vec(0u8..6, 1..40)) {
        let mut table = Table::new(["datetime", "BTC"]);
        for key in &keys {
            table
                .push_row(vec![Cell::from(format!("t{key}").as_str()), Cell::from(*key as f64)])
                .unwrap();
        }
        let prices = PriceTable::from_table(&table.dedup_by("datetime").unwrap(), "datetime")
            .unwrap();

        let mut unique = prices.keys.clone();
        unique.sort();
        unique.dedup();
        prop_assert_eq!(unique.len(), prices.keys.len());
        prop_assert_eq!(prices.values[0].len(), prices.keys.len());
    }
}

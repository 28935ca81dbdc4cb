//! 대시보드 도메인 모델.

pub mod price;
pub mod price_table;
pub mod source;
pub mod table;
pub mod trade;

pub use price::{PriceLookup, PriceLookupError, StaticPriceLookup};
pub use price_table::PriceTable;
pub use source::TableSource;
pub use table::{Cell, Table};
pub use trade::{columns, return_series, TradeRecord};

//! 테이블 소스 추상화.
//!
//! 스프레드시트, DB 등 저장소 종류와 무관하게 "쿼리 문자열을 받아 테이블을
//! 반환한다"는 한 가지 기능만 요구합니다. 연결 정보는 구현체별 설정으로 둡니다.

use crate::domain::table::Table;
use crate::error::StatsResult;

/// 쿼리(시트 이름 등)로 테이블을 조회하는 trait.
pub trait TableSource {
    fn query(&self, query: &str) -> StatsResult<Table>;
}

impl<T: TableSource + ?Sized> TableSource for &T {
    fn query(&self, query: &str) -> StatsResult<Table> {
        (**self).query(query)
    }
}

impl<T: TableSource + ?Sized> TableSource for Box<T> {
    fn query(&self, query: &str) -> StatsResult<Table> {
        (**self).query(query)
    }
}

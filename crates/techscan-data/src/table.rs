//! 수집 계층이 넘겨주는 문자열 테이블.
//!
//! 헤더와 레코드를 문자열 그대로 보관합니다. 타입 변환과 검증은
//! `PanelStore::load`가 담당합니다.

use std::io::Read;

/// 헤더 + 문자열 레코드 테이블.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl RawTable {
    /// 헤더와 레코드로 테이블을 생성합니다.
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// CSV 리더에서 테이블을 읽습니다. 첫 줄은 헤더입니다.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, records })
    }

    /// 헤더.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// 레코드.
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// 컬럼 위치를 찾습니다.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// 레코드가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

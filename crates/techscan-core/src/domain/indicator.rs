//! 지표 세트와 지표 프레임 타입.
//!
//! - `IndicatorKind` - 패널에 컬럼 단위로 추가되는 지표 종류
//! - `IndicatorValues` - 한 (종목, 날짜)에 대한 한 종류의 지표 값
//! - `IndicatorSet` - 패널 행에 붙는 전체 지표 컬럼
//! - `IndicatorFrame` - 엔진이 전 종목에 대해 계산한 한 종류의 지표 행 모음
//!
//! `None`은 "미계산"을 뜻하며 계산 결과 0과 구분됩니다.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::round_opt;

/// 출력 패널의 지표 컬럼 (순서는 출력 헤더 순서).
pub const INDICATOR_COLUMNS: [&str; 10] = [
    "bbi", "kdj_k", "kdj_d", "kdj_j", "dif", "dea", "macd", "upper", "mid", "lower",
];

/// 지표 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// 다공지수 (Bull and Bear Index)
    Bbi,
    /// 스토캐스틱 KDJ
    Kdj,
    /// MACD
    Macd,
    /// 볼린저 밴드
    Boll,
}

impl IndicatorKind {
    /// 전체 지표 종류 (계산 순서).
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Bbi,
        IndicatorKind::Kdj,
        IndicatorKind::Macd,
        IndicatorKind::Boll,
    ];

    /// 이 종류가 패널에 추가하는 컬럼명.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            IndicatorKind::Bbi => &INDICATOR_COLUMNS[0..1],
            IndicatorKind::Kdj => &INDICATOR_COLUMNS[1..4],
            IndicatorKind::Macd => &INDICATOR_COLUMNS[4..7],
            IndicatorKind::Boll => &INDICATOR_COLUMNS[7..10],
        }
    }
}

impl std::fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndicatorKind::Bbi => write!(f, "BBI"),
            IndicatorKind::Kdj => write!(f, "KDJ"),
            IndicatorKind::Macd => write!(f, "MACD"),
            IndicatorKind::Boll => write!(f, "BOLL"),
        }
    }
}

/// 한 (종목, 날짜)에 대한 한 종류의 지표 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndicatorValues {
    Bbi {
        bbi: Option<Decimal>,
    },
    Kdj {
        k: Option<Decimal>,
        d: Option<Decimal>,
        j: Option<Decimal>,
    },
    Macd {
        dif: Option<Decimal>,
        dea: Option<Decimal>,
        macd: Option<Decimal>,
    },
    Boll {
        upper: Option<Decimal>,
        mid: Option<Decimal>,
        lower: Option<Decimal>,
    },
}

impl IndicatorValues {
    /// 값의 지표 종류.
    pub fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorValues::Bbi { .. } => IndicatorKind::Bbi,
            IndicatorValues::Kdj { .. } => IndicatorKind::Kdj,
            IndicatorValues::Macd { .. } => IndicatorKind::Macd,
            IndicatorValues::Boll { .. } => IndicatorKind::Boll,
        }
    }

    /// 모든 값이 미계산인 값 (워밍업 구간, 히스토리 부족).
    pub fn undefined(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Bbi => IndicatorValues::Bbi { bbi: None },
            IndicatorKind::Kdj => IndicatorValues::Kdj {
                k: None,
                d: None,
                j: None,
            },
            IndicatorKind::Macd => IndicatorValues::Macd {
                dif: None,
                dea: None,
                macd: None,
            },
            IndicatorKind::Boll => IndicatorValues::Boll {
                upper: None,
                mid: None,
                lower: None,
            },
        }
    }

    /// 모든 값을 소수점 2자리로 반올림한 사본.
    pub fn rounded(self) -> Self {
        match self {
            IndicatorValues::Bbi { bbi } => IndicatorValues::Bbi {
                bbi: round_opt(bbi),
            },
            IndicatorValues::Kdj { k, d, j } => IndicatorValues::Kdj {
                k: round_opt(k),
                d: round_opt(d),
                j: round_opt(j),
            },
            IndicatorValues::Macd { dif, dea, macd } => IndicatorValues::Macd {
                dif: round_opt(dif),
                dea: round_opt(dea),
                macd: round_opt(macd),
            },
            IndicatorValues::Boll { upper, mid, lower } => IndicatorValues::Boll {
                upper: round_opt(upper),
                mid: round_opt(mid),
                lower: round_opt(lower),
            },
        }
    }

    /// 컬럼 순서대로 값을 나열합니다.
    pub fn to_vec(&self) -> Vec<Option<Decimal>> {
        match *self {
            IndicatorValues::Bbi { bbi } => vec![bbi],
            IndicatorValues::Kdj { k, d, j } => vec![k, d, j],
            IndicatorValues::Macd { dif, dea, macd } => vec![dif, dea, macd],
            IndicatorValues::Boll { upper, mid, lower } => vec![upper, mid, lower],
        }
    }

    /// 하나 이상의 값이 계산되었는지 확인합니다.
    pub fn is_defined(&self) -> bool {
        self.to_vec().iter().any(Option::is_some)
    }
}

/// 패널 행에 붙는 지표 컬럼 전체.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub bbi: Option<Decimal>,
    pub kdj_k: Option<Decimal>,
    pub kdj_d: Option<Decimal>,
    pub kdj_j: Option<Decimal>,
    pub dif: Option<Decimal>,
    pub dea: Option<Decimal>,
    pub macd: Option<Decimal>,
    pub boll_upper: Option<Decimal>,
    pub boll_mid: Option<Decimal>,
    pub boll_lower: Option<Decimal>,
}

impl IndicatorSet {
    /// 한 종류의 지표 값을 덮어씁니다. 다른 종류의 컬럼은 건드리지 않습니다.
    pub fn apply(&mut self, values: IndicatorValues) {
        match values {
            IndicatorValues::Bbi { bbi } => self.bbi = bbi,
            IndicatorValues::Kdj { k, d, j } => {
                self.kdj_k = k;
                self.kdj_d = d;
                self.kdj_j = j;
            }
            IndicatorValues::Macd { dif, dea, macd } => {
                self.dif = dif;
                self.dea = dea;
                self.macd = macd;
            }
            IndicatorValues::Boll { upper, mid, lower } => {
                self.boll_upper = upper;
                self.boll_mid = mid;
                self.boll_lower = lower;
            }
        }
    }

    /// 한 종류의 지표 값을 꺼냅니다.
    pub fn get(&self, kind: IndicatorKind) -> IndicatorValues {
        match kind {
            IndicatorKind::Bbi => IndicatorValues::Bbi { bbi: self.bbi },
            IndicatorKind::Kdj => IndicatorValues::Kdj {
                k: self.kdj_k,
                d: self.kdj_d,
                j: self.kdj_j,
            },
            IndicatorKind::Macd => IndicatorValues::Macd {
                dif: self.dif,
                dea: self.dea,
                macd: self.macd,
            },
            IndicatorKind::Boll => IndicatorValues::Boll {
                upper: self.boll_upper,
                mid: self.boll_mid,
                lower: self.boll_lower,
            },
        }
    }

    /// `INDICATOR_COLUMNS` 순서의 값.
    pub fn to_vec(&self) -> Vec<Option<Decimal>> {
        IndicatorKind::ALL
            .iter()
            .flat_map(|kind| self.get(*kind).to_vec())
            .collect()
    }

    /// 내보내기용 값. 미계산은 0으로 치환됩니다.
    ///
    /// 분류 단계 이후의 최종 출력에서만 사용해야 합니다.
    pub fn to_export_vec(&self) -> Vec<Decimal> {
        self.to_vec()
            .into_iter()
            .map(|v| v.unwrap_or(Decimal::ZERO))
            .collect()
    }
}

/// 엔진이 계산한 한 (종목, 날짜)의 지표 행.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub ticker: String,
    pub date: NaiveDate,
    pub values: IndicatorValues,
}

/// 한 종류의 지표를 전 종목에 대해 모은 프레임.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub kind: IndicatorKind,
    pub rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    /// 빈 프레임을 생성합니다.
    pub fn new(kind: IndicatorKind) -> Self {
        Self {
            kind,
            rows: Vec::new(),
        }
    }

    /// 종목별 결과를 한 번에 결합해 프레임을 생성합니다.
    pub fn from_parts(kind: IndicatorKind, parts: Vec<Vec<IndicatorRow>>) -> Self {
        let capacity = parts.iter().map(Vec::len).sum();
        let mut rows = Vec::with_capacity(capacity);
        for part in parts {
            rows.extend(part);
        }
        Self { kind, rows }
    }

    /// 행 수.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// 행이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

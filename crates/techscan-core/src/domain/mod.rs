//! 지표 파이프라인을 위한 도메인 모델.

mod bar;
mod classification;
mod indicator;

pub use bar::*;
pub use classification::*;
pub use indicator::*;

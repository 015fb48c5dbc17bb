//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 원시 패널 CSV에 지표 컬럼 추가
//! - 구간 추세 판정 및 매매 신호 판정
//! - 전체 파이프라인 일괄 실행

pub mod commands;

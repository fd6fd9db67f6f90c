#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`error`]: 실행 에러 (`LifecycleError`)
//! - [`runner`]: 오케스트레이터 (`LifecycleRunner`)
//! - [`teardown`]: 스코프 기반 정리 (`TeardownGuard`)
//! - [`report`]: 성공한 실행 요약 (`LifecycleReport`, `TeardownStatus`)
//! - [`scenario`]: S3 버킷 lifecycle 실행 설정
//! - [`logging`]: `tracing-subscriber` 초기화
//!
//! # 실행 흐름
//!
//! ```text
//! RunConfig --validate--> TeardownGuard::arm
//!                              |
//!                         provision()  (init + apply, spawned)
//!                              |
//!                         release()    (destroy | skip)
//!                              |
//!                  LifecycleReport / LifecycleError
//! ```

pub mod error;
pub mod logging;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod teardown;

// --- 주요 타입 re-export ---

pub use error::LifecycleError;
pub use report::{LifecycleReport, TeardownStatus};
pub use runner::LifecycleRunner;
pub use scenario::{S3_BUCKET_NAME_PREFIX, S3BucketLifecycle};
pub use teardown::TeardownGuard;

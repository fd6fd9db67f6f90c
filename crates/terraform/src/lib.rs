#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`error`]: 도메인 에러 타입 (`TerraformError`)
//! - [`client`]: 클라이언트 trait (`TerraformClient`)
//! - [`cli`]: 프로세스 기반 구현 (`TerraformCli`)
//! - [`options`]: 실행별 명령 옵션 (`TerraformOptions`)
//! - [`command`]: 하위 명령과 인자 목록 (`TerraformCommand`)
//! - [`retry`]: 재시도 에러 정책 (`RetryPolicy`)
//! - [`hcl`]: `-var` 인자용 HCL 리터럴 포맷팅
//!
//! # 아키텍처
//!
//! ```text
//! LifecycleRunner
//!       |
//!  TerraformClient (trait)
//!       |
//!  TerraformCli --retry--> terraform init / apply / destroy
//! ```

pub mod cli;
pub mod client;
pub mod command;
pub mod error;
pub mod hcl;
pub mod options;
pub mod retry;

// --- 주요 타입 re-export ---

pub use cli::TerraformCli;
pub use client::TerraformClient;
pub use command::TerraformCommand;
pub use error::TerraformError;
pub use options::TerraformOptions;
pub use retry::{DEFAULT_RETRYABLE_ERRORS, RetryPolicy, RetryableError};

#![doc = include_str!("../README.md")]

pub mod config;
pub mod env;
pub mod error;
pub mod metrics;
pub mod naming;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, TfcycleError};

// 설정
pub use config::{GeneralConfig, TerraformConfig, TfcycleConfig};

// 환경변수 어댑터
pub use env::LifecycleEnv;

// 도메인 타입
pub use types::{EnvVars, RunConfig, RunConfigBuilder, TagSet, Vars};

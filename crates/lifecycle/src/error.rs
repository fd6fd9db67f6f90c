//! Lifecycle 실행 에러 타입
//!
//! 정리 실패가 provisioning 실패를 가리지 않습니다.
//! 둘 다 발생하면 정리 에러는 [`LifecycleError::Provisioning`] 안에 함께 담깁니다.
//! `From<LifecycleError> for TfcycleError` 변환이 구현되어 있습니다.

use tfcycle_core::error::{ConfigError, TfcycleError};
use tfcycle_terraform::TerraformError;

/// Lifecycle 실행 실패 사유
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// 필수 입력 누락 (terraform 명령을 실행하지 않음)
    #[error("invalid run configuration: {0}")]
    Config(#[from] ConfigError),

    /// `init` 또는 `apply` 실패 (정리는 시도함)
    #[error("provisioning failed: {source}{}", teardown_note(.teardown))]
    Provisioning {
        /// 최종 provisioning 에러
        #[source]
        source: TerraformError,
        /// 실패한 apply 이후의 destroy도 실패한 경우 그 에러
        teardown: Option<TerraformError>,
    },

    /// apply는 성공했으나 `destroy` 실패
    #[error("teardown failed: {0}")]
    Teardown(#[source] TerraformError),

    /// tracing subscriber 설치 실패
    #[error("logging init failed: {0}")]
    Logging(String),
}

impl LifecycleError {
    /// 이 에러가 담고 있는 정리 에러를 반환합니다.
    pub fn teardown_error(&self) -> Option<&TerraformError> {
        match self {
            Self::Provisioning { teardown, .. } => teardown.as_ref(),
            Self::Teardown(err) => Some(err),
            Self::Config(_) | Self::Logging(_) => None,
        }
    }
}

fn teardown_note(teardown: &Option<TerraformError>) -> String {
    match teardown {
        Some(err) => format!("; teardown also failed: {err}"),
        None => String::new(),
    }
}

impl From<LifecycleError> for TfcycleError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Config(e) => TfcycleError::Config(e),
            LifecycleError::Provisioning { .. } => TfcycleError::Provisioning(err.to_string()),
            LifecycleError::Teardown(e) => TfcycleError::Teardown(e.to_string()),
            LifecycleError::Logging(msg) => TfcycleError::Config(ConfigError::InvalidValue {
                field: "general".to_owned(),
                reason: msg,
            }),
        }
    }
}

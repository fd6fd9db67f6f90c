//! terraform 명령 재시도 정책
//!
//! 실패한 명령은 합친 출력이 설정된 패턴 중 하나와 일치할 때만 재시도합니다.
//! 그 외의 실패는 첫 시도에서 바로 실패합니다.

use std::time::Duration;

use regex::Regex;
use tfcycle_core::config::TerraformConfig;

use crate::error::TerraformError;

/// 잘 알려진 일시적 terraform 실패 목록: `(패턴, 설명)`
pub const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (
        r"read: connection reset by peer",
        "connection reset while talking to a remote endpoint",
    ),
    (r"transport is closing", "provider plugin transport closed"),
    (
        r"unable to verify signature",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"unable to verify checksum",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"no provider exists with the given name",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"registry service is unreachable",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"Error installing provider",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"Failed to query available provider packages",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"timeout while waiting for plugin to start",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"timed out waiting for server handshake",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"could not query provider registry for",
        "failed to retrieve plugin due to transient network error",
    ),
    (
        r"Client\.Timeout exceeded while awaiting headers",
        "HTTP client timed out waiting for a response",
    ),
    (
        r"(?s)Could not download module.*The requested URL returned error: 429",
        "failed to download module due to rate limit",
    ),
];

/// 컴파일된 재시도 에러 패턴
#[derive(Debug, Clone)]
pub struct RetryableError {
    pattern: Regex,
    description: String,
}

impl RetryableError {
    /// 패턴을 컴파일합니다.
    pub fn new(pattern: &str, description: impl Into<String>) -> Result<Self, TerraformError> {
        let pattern = Regex::new(pattern).map_err(|e| TerraformError::InvalidRetryPattern {
            pattern: pattern.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            description: description.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// 모든 terraform 하위 명령에 적용되는 재시도 정책
///
/// 전체 시도 횟수는 `max_retries + 1`입니다.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    errors: Vec<RetryableError>,
    max_retries: u32,
    time_between_retries: Duration,
}

impl RetryPolicy {
    /// 재시도하지 않는 정책
    pub fn none() -> Self {
        Self {
            errors: Vec::new(),
            max_retries: 0,
            time_between_retries: Duration::ZERO,
        }
    }

    /// 패턴이 없는 빈 정책
    pub fn new(max_retries: u32, time_between_retries: Duration) -> Self {
        Self {
            errors: Vec::new(),
            max_retries,
            time_between_retries,
        }
    }

    /// [`DEFAULT_RETRYABLE_ERRORS`]를 포함한 정책
    pub fn with_default_errors(
        max_retries: u32,
        time_between_retries: Duration,
    ) -> Result<Self, TerraformError> {
        DEFAULT_RETRYABLE_ERRORS.iter().try_fold(
            Self::new(max_retries, time_between_retries),
            |policy, (pattern, description)| policy.retry_on(pattern, *description),
        )
    }

    /// 기본 패턴과 runner 설정의 재시도 횟수로 정책을 생성합니다.
    pub fn from_config(config: &TerraformConfig) -> Result<Self, TerraformError> {
        Self::with_default_errors(config.max_retries, config.time_between_retries())
    }

    /// 재시도 패턴을 추가합니다.
    pub fn retry_on(
        mut self,
        pattern: &str,
        description: impl Into<String>,
    ) -> Result<Self, TerraformError> {
        self.errors.push(RetryableError::new(pattern, description)?);
        Ok(self)
    }

    /// `output`과 일치하는 첫 패턴을 반환합니다.
    pub fn match_retryable(&self, output: &str) -> Option<&RetryableError> {
        self.errors.iter().find(|e| e.pattern.is_match(output))
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn time_between_retries(&self) -> Duration {
        self.time_between_retries
    }

    pub fn errors(&self) -> &[RetryableError] {
        &self.errors
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

//! 설정 관리 -- tfcycle.toml 파싱 및 런타임 설정
//!
//! [`TfcycleConfig`]는 로깅과 Terraform 실행 방식을 담는 최상위 구조체입니다.
//! 실행마다 달라지는 값(작업 디렉토리, 변수, 리전)은 여기가 아니라
//! [`RunConfig`](crate::types::RunConfig)에 담깁니다.
//!
//! # 설정 로딩 우선순위
//! 1. 환경변수 (`TFCYCLE_TERRAFORM_BINARY=tofu` 형식)
//! 2. 설정 파일 (`tfcycle.toml`)
//! 3. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), tfcycle_core::error::TfcycleError> {
//! use tfcycle_core::config::TfcycleConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = TfcycleConfig::load("tfcycle.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = TfcycleConfig::parse("[terraform]\nmax_retries = 5")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, TfcycleError};

/// 설정 상한값 상수
const MAX_RETRIES: u32 = 10;
const MAX_TIME_BETWEEN_RETRIES_SECS: u64 = 300;

/// tfcycle 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfcycleConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// Terraform 실행 설정
    #[serde(default)]
    pub terraform: TerraformConfig,
}

impl TfcycleConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TfcycleError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에 환경변수 오버라이드만 적용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, TfcycleError> {
        match Self::load(path).await {
            Err(TfcycleError::Config(ConfigError::FileNotFound { .. })) => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, TfcycleError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TfcycleError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                TfcycleError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, TfcycleError> {
        toml::from_str(toml_str).map_err(|e| {
            TfcycleError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `TFCYCLE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "TFCYCLE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "TFCYCLE_GENERAL_LOG_FORMAT");

        // Terraform
        override_string(&mut self.terraform.binary, "TFCYCLE_TERRAFORM_BINARY");
        override_u32(
            &mut self.terraform.max_retries,
            "TFCYCLE_TERRAFORM_MAX_RETRIES",
        );
        override_u64(
            &mut self.terraform.time_between_retries_secs,
            "TFCYCLE_TERRAFORM_TIME_BETWEEN_RETRIES_SECS",
        );
        override_bool(&mut self.terraform.no_color, "TFCYCLE_TERRAFORM_NO_COLOR");
        override_bool(&mut self.terraform.lock, "TFCYCLE_TERRAFORM_LOCK");
        override_bool(&mut self.terraform.upgrade, "TFCYCLE_TERRAFORM_UPGRADE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TfcycleError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.terraform.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "terraform.binary".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.terraform.max_retries > MAX_RETRIES {
            return Err(ConfigError::InvalidValue {
                field: "terraform.max_retries".to_owned(),
                reason: format!("must be 0-{MAX_RETRIES}"),
            }
            .into());
        }

        if self.terraform.time_between_retries_secs > MAX_TIME_BETWEEN_RETRIES_SECS {
            return Err(ConfigError::InvalidValue {
                field: "terraform.time_between_retries_secs".to_owned(),
                reason: format!("must be 0-{MAX_TIME_BETWEEN_RETRIES_SECS}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// Terraform 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerraformConfig {
    /// 실행 파일 이름 또는 경로 (terraform, tofu)
    pub binary: String,
    /// 재시도 가능한 에러 발생 시 최대 재시도 횟수
    pub max_retries: u32,
    /// 재시도 간격 (초)
    pub time_between_retries_secs: u64,
    /// `-no-color` 전달 여부
    pub no_color: bool,
    /// state 잠금 사용 여부 (false면 `-lock=false`)
    pub lock: bool,
    /// `init -upgrade` 사용 여부
    pub upgrade: bool,
}

impl TerraformConfig {
    /// 재시도 간격을 `Duration`으로 반환합니다.
    pub fn time_between_retries(&self) -> Duration {
        Duration::from_secs(self.time_between_retries_secs)
    }
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            binary: "terraform".to_owned(),
            max_retries: 3,
            time_between_retries_secs: 5,
            no_color: false,
            lock: false,
            upgrade: false,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = TfcycleConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.terraform.binary, "terraform");
        assert_eq!(config.terraform.max_retries, 3);
        assert_eq!(config.terraform.time_between_retries(), Duration::from_secs(5));
        assert!(!config.terraform.lock);
    }

    #[test]
    fn default_config_passes_validation() {
        TfcycleConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = TfcycleConfig::parse("").unwrap();
        assert_eq!(config.terraform.binary, "terraform");
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[terraform]
binary = "tofu"
max_retries = 1
"#;
        let config = TfcycleConfig::parse(toml).unwrap();
        assert_eq!(config.terraform.binary, "tofu");
        assert_eq!(config.terraform.max_retries, 1);
        // 나머지는 기본값 유지
        assert_eq!(config.terraform.time_between_retries_secs, 5);
        assert_eq!(config.general.log_format, "pretty");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = TfcycleConfig::parse("terraform = [[[").unwrap_err();
        assert!(matches!(
            err,
            TfcycleError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = TfcycleConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = TfcycleConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_blank_binary() {
        let mut config = TfcycleConfig::default();
        config.terraform.binary = "  ".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("terraform.binary"));
    }

    #[test]
    fn validate_rejects_too_many_retries() {
        let mut config = TfcycleConfig::default();
        config.terraform.max_retries = MAX_RETRIES + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_retries"));
    }

    #[test]
    fn validate_accepts_zero_retries() {
        let mut config = TfcycleConfig::default();
        config.terraform.max_retries = 0;
        config.terraform.time_between_retries_secs = 0;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_long_retry_interval() {
        let mut config = TfcycleConfig::default();
        config.terraform.time_between_retries_secs = MAX_TIME_BETWEEN_RETRIES_SECS + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("time_between_retries_secs"));
    }

    #[test]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: 고유한 키를 사용하므로 다른 테스트와 충돌하지 않습니다.
        unsafe { std::env::set_var("TEST_TFCYCLE_STR", "overridden") };
        override_string(&mut val, "TEST_TFCYCLE_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_TFCYCLE_STR") };
    }

    #[test]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = true;
        // SAFETY: 고유한 키를 사용하므로 다른 테스트와 충돌하지 않습니다.
        unsafe { std::env::set_var("TEST_TFCYCLE_BOOL_BAD", "yes-please") };
        override_bool(&mut val, "TEST_TFCYCLE_BOOL_BAD");
        assert!(val);
        unsafe { std::env::remove_var("TEST_TFCYCLE_BOOL_BAD") };
    }

    #[test]
    fn env_override_u32_invalid_keeps_original() {
        let mut val = 3;
        // SAFETY: 고유한 키를 사용하므로 다른 테스트와 충돌하지 않습니다.
        unsafe { std::env::set_var("TEST_TFCYCLE_U32_BAD", "-1") };
        override_u32(&mut val, "TEST_TFCYCLE_U32_BAD");
        assert_eq!(val, 3);
        unsafe { std::env::remove_var("TEST_TFCYCLE_U32_BAD") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = 7_u64;
        override_u64(&mut val, "TEST_TFCYCLE_NONEXISTENT_12345");
        assert_eq!(val, 7);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = TfcycleConfig::from_file("/nonexistent/path/tfcycle.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TfcycleError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}

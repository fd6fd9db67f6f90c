//! [`TerraformClient`](crate::TerraformClient)에 전달하는 실행별 옵션

use std::path::PathBuf;

use tfcycle_core::config::TerraformConfig;
use tfcycle_core::types::{EnvVars, RunConfig, Vars};

use crate::retry::RetryPolicy;

/// 하나의 작업 디렉토리에 terraform을 실행하는 데 필요한 옵션
#[derive(Debug, Clone)]
pub struct TerraformOptions {
    /// 실행할 바이너리 (`terraform`, `tofu` 또는 경로)
    pub binary: String,
    /// 설정과 state가 있는 디렉토리
    pub working_dir: PathBuf,
    /// 입력 변수 (`-var` 인자로 전달)
    pub vars: Vars,
    /// 자식 프로세스에 설정할 환경변수
    pub env_vars: EnvVars,
    /// `-no-color` 전달 여부
    pub no_color: bool,
    /// state 잠금 사용 여부 (false면 `-lock=false`)
    pub lock: bool,
    /// init에 `-upgrade=true` 전달 여부
    pub upgrade: bool,
    /// 모든 하위 명령에 적용할 재시도 정책
    pub retry: RetryPolicy,
}

impl TerraformOptions {
    /// 기본 설정과 재시도 없는 옵션을 생성합니다.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        let defaults = TerraformConfig::default();
        Self {
            binary: defaults.binary,
            working_dir: working_dir.into(),
            vars: Vars::new(),
            env_vars: EnvVars::new(),
            no_color: defaults.no_color,
            lock: defaults.lock,
            upgrade: defaults.upgrade,
            retry: RetryPolicy::none(),
        }
    }

    /// lifecycle 실행 하나의 옵션을 생성합니다.
    pub fn for_run(run: &RunConfig, config: &TerraformConfig, retry: RetryPolicy) -> Self {
        Self {
            binary: config.binary.clone(),
            working_dir: run.working_dir().to_path_buf(),
            vars: run.vars().clone(),
            env_vars: run.env_vars().clone(),
            no_color: config.no_color,
            lock: config.lock,
            upgrade: config.upgrade,
            retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn for_run_copies_run_and_settings() {
        let run = RunConfig::builder("fixtures/lifecycle")
            .var("test_name", "bucket-1")
            .env("AWS_DEFAULT_REGION", "us-east-1")
            .build();
        let config = TerraformConfig {
            binary: "tofu".to_owned(),
            no_color: true,
            ..TerraformConfig::default()
        };

        let options = TerraformOptions::for_run(
            &run,
            &config,
            RetryPolicy::new(2, Duration::from_secs(1)),
        );

        assert_eq!(options.binary, "tofu");
        assert_eq!(options.working_dir, Path::new("fixtures/lifecycle"));
        assert_eq!(options.vars["test_name"], "bucket-1");
        assert_eq!(options.env_vars["AWS_DEFAULT_REGION"], "us-east-1");
        assert!(options.no_color);
        assert!(!options.lock);
        assert_eq!(options.retry.max_retries(), 2);
    }

    #[test]
    fn new_uses_terraform_binary_without_retries() {
        let options = TerraformOptions::new(".");
        assert_eq!(options.binary, "terraform");
        assert_eq!(options.retry.max_attempts(), 1);
    }
}

//! Lifecycle 오케스트레이터 -- provision -> teardown 한 사이클 실행
//!
//! [`LifecycleRunner`]는 다음 순서로 한 번의 실행을 진행합니다.
//!
//! 1. [`RunConfig`] 검증 (실패 시 terraform 호출 없음)
//! 2. [`TeardownGuard`] 무장
//! 3. [`TerraformClient`]를 통한 `init` + `apply`
//! 4. 가드 해제 (`destroy` 또는 생략)
//!
//! # 사용 예시
//!
//! ```ignore
//! let runner = LifecycleRunner::from_config(Arc::new(TerraformCli::new()), &config.terraform)?;
//! let report = runner.run(run_config).await?;
//! ```

use std::panic;
use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::counter;
use tracing::{Instrument, error, info, info_span};

use tfcycle_core::config::TerraformConfig;
use tfcycle_core::env::AWS_DEFAULT_REGION;
use tfcycle_core::error::ConfigError;
use tfcycle_core::metrics::{LABEL_RESULT, LIFECYCLE_RUNS_TOTAL};
use tfcycle_core::types::RunConfig;
use tfcycle_terraform::{RetryPolicy, TerraformClient, TerraformError, TerraformOptions};

use crate::error::LifecycleError;
use crate::report::LifecycleReport;
use crate::teardown::TeardownGuard;

/// 하나의 클라이언트로 lifecycle 사이클을 실행하는 runner
///
/// 실행별 상태를 갖지 않으므로 하나의 인스턴스로
/// 서로 다른 작업 디렉토리의 실행을 동시에 처리할 수 있습니다.
pub struct LifecycleRunner<C: TerraformClient> {
    client: Arc<C>,
    config: TerraformConfig,
    retry: RetryPolicy,
    required_env: Vec<String>,
}

impl<C: TerraformClient> LifecycleRunner<C> {
    /// `AWS_DEFAULT_REGION`을 필수로 요구하는 runner를 생성합니다.
    pub fn new(client: Arc<C>, config: TerraformConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            config,
            retry,
            required_env: vec![AWS_DEFAULT_REGION.to_owned()],
        }
    }

    /// 기본 재시도 에러 패턴과 설정된 재시도 횟수로 runner를 생성합니다.
    pub fn from_config(client: Arc<C>, config: &TerraformConfig) -> Result<Self, TerraformError> {
        let retry = RetryPolicy::from_config(config)?;
        Ok(Self::new(client, config.clone(), retry))
    }

    /// 모든 실행이 가져야 하는 필수 환경변수 키를 교체합니다.
    pub fn with_required_env<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_env = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn required_env(&self) -> &[String] {
        &self.required_env
    }

    /// provision -> teardown 사이클을 한 번 실행합니다.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::Config`]: 필수 환경변수가 없거나 비어 있음,
    ///   또는 작업 디렉토리가 비어 있음. 아무것도 프로비저닝하지 않았습니다.
    /// - [`LifecycleError::Provisioning`]: `init`/`apply` 실패.
    ///   정리는 여전히 시도하며, 정리 실패 시 그 에러도 함께 담깁니다.
    /// - [`LifecycleError::Teardown`]: apply는 성공했으나 `destroy` 실패.
    ///
    /// # Panics
    ///
    /// 클라이언트의 apply 중 발생한 panic은 정리 후 다시 전파됩니다.
    pub async fn run(&self, run: RunConfig) -> Result<LifecycleReport, LifecycleError> {
        let span = info_span!(
            "lifecycle",
            unique_id = run.unique_id(),
            working_dir = %run.working_dir().display(),
        );
        self.run_inner(run).instrument(span).await
    }

    async fn run_inner(&self, run: RunConfig) -> Result<LifecycleReport, LifecycleError> {
        let started = Instant::now();

        if let Err(e) = self.validate(&run) {
            error!(error = %e, "run rejected before provisioning");
            record_run("rejected");
            return Err(e.into());
        }

        let options = Arc::new(TerraformOptions::for_run(
            &run,
            &self.config,
            self.retry.clone(),
        ));
        let mut guard = TeardownGuard::arm(Arc::clone(&self.client), options, run.skip_destroy());

        info!("provisioning");
        let provisioned = guard.provision().await;
        let teardown = guard.release().await;

        let applied = match provisioned {
            Ok(applied) => applied,
            Err(join_err) if join_err.is_panic() => {
                match &teardown {
                    Ok(status) => error!(teardown = %status, "apply panicked"),
                    Err(e) => error!(error = %e, "apply panicked and teardown failed"),
                }
                record_run("panicked");
                panic::resume_unwind(join_err.into_panic());
            }
            Err(join_err) => Err(TerraformError::TaskFailed(join_err.to_string())),
        };

        let result = match (applied, teardown) {
            (Ok(apply_output), Ok(status)) => {
                info!(
                    teardown = %status,
                    elapsed_ms = elapsed_millis(started.elapsed()),
                    "lifecycle run succeeded"
                );
                Ok(LifecycleReport {
                    unique_id: run.unique_id().to_owned(),
                    working_dir: run.working_dir().to_path_buf(),
                    apply_output,
                    teardown: status,
                    elapsed: started.elapsed(),
                })
            }
            (Ok(_), Err(e)) => {
                error!(error = %e, "teardown failed, infrastructure may be left running");
                Err(LifecycleError::Teardown(e))
            }
            (Err(source), teardown) => {
                error!(error = %source, "provisioning failed");
                Err(LifecycleError::Provisioning {
                    source,
                    teardown: teardown.err(),
                })
            }
        };

        record_run(match &result {
            Ok(_) => "success",
            Err(LifecycleError::Teardown(_)) => "teardown_failed",
            Err(_) => "provisioning_failed",
        });
        result
    }

    fn validate(&self, run: &RunConfig) -> Result<(), ConfigError> {
        if run.working_dir().as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "working_dir".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if let Some(key) = self
            .required_env
            .iter()
            .find(|key| run.env_vars().get(key.as_str()).is_none_or(|v| v.is_empty()))
        {
            return Err(ConfigError::MissingEnvVar { key: key.clone() });
        }

        Ok(())
    }
}

/// 밀리초 단위 경과 시간 (`u64` 범위를 넘으면 `u64::MAX`)
fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

fn record_run(result: &'static str) {
    counter!(LIFECYCLE_RUNS_TOTAL, LABEL_RESULT => result).increment(1);
}

//! 프로세스 기반 [`TerraformClient`] 구현
//!
//! 각 하위 명령은 `tokio::process`로 실행되며 부모 환경에
//! [`TerraformOptions::env_vars`]만 더해 상속합니다.
//! 출력은 수집되어 줄 단위로 `debug` 레벨 로그에 남고,
//! 명령이 실패하면 재시도 정책과 대조합니다.

use std::process::Stdio;
use std::time::Instant;

use metrics::{counter, histogram};
use tokio::process::Command;
use tracing::{debug, info, warn};

use tfcycle_core::metrics::{
    LABEL_COMMAND, LABEL_RESULT, TERRAFORM_COMMAND_DURATION_SECONDS, TERRAFORM_COMMANDS_TOTAL,
    TERRAFORM_RETRIES_TOTAL,
};

use crate::client::TerraformClient;
use crate::command::TerraformCommand;
use crate::error::TerraformError;
use crate::options::TerraformOptions;

/// [`TerraformError::CommandFailed`]에 보관할 출력 줄 수
const OUTPUT_TAIL_LINES: usize = 40;

/// [`TerraformOptions::binary`]에 지정된 terraform 바이너리를 실행합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerraformCli;

impl TerraformCli {
    pub fn new() -> Self {
        Self
    }

    /// 하위 명령 하나를 [`TerraformOptions::retry`]에 따라 재시도하며 실행합니다.
    ///
    /// 성공한 시도의 stdout을 반환합니다.
    pub async fn run(
        &self,
        command: TerraformCommand,
        options: &TerraformOptions,
    ) -> Result<String, TerraformError> {
        let args = command.args(options);
        let max_attempts = options.retry.max_attempts();

        info!(
            command = command.as_str(),
            working_dir = %options.working_dir.display(),
            "running terraform"
        );

        let mut attempt = 1;
        loop {
            let err = match self.run_once(command, &args, options).await {
                Ok(stdout) => return Ok(stdout),
                Err(err) => err,
            };

            let retryable = match &err {
                TerraformError::CommandFailed { output, .. } => {
                    options.retry.match_retryable(output)
                }
                _ => None,
            };
            let Some(retryable) = retryable else {
                return Err(err);
            };

            if attempt >= max_attempts {
                return Err(TerraformError::RetriesExhausted {
                    command: command.as_str().to_owned(),
                    attempts: attempt,
                    last_error: err.to_string(),
                });
            }

            let backoff = options.retry.time_between_retries();
            warn!(
                command = command.as_str(),
                attempt,
                max_attempts,
                reason = retryable.description(),
                backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
                "retryable terraform error, retrying"
            );
            counter!(TERRAFORM_RETRIES_TOTAL, LABEL_COMMAND => command.as_str()).increment(1);
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }

    /// 재시도 없는 단일 시도
    async fn run_once(
        &self,
        command: TerraformCommand,
        args: &[String],
        options: &TerraformOptions,
    ) -> Result<String, TerraformError> {
        let started = Instant::now();
        let output = Command::new(&options.binary)
            .args(args)
            .current_dir(&options.working_dir)
            .envs(&options.env_vars)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| TerraformError::Exec {
                binary: options.binary.clone(),
                source,
            })?;
        histogram!(TERRAFORM_COMMAND_DURATION_SECONDS, LABEL_COMMAND => command.as_str())
            .record(started.elapsed().as_secs_f64());

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().chain(stderr.lines()) {
            debug!(command = command.as_str(), "{line}");
        }

        if output.status.success() {
            counter!(
                TERRAFORM_COMMANDS_TOTAL,
                LABEL_COMMAND => command.as_str(),
                LABEL_RESULT => "success"
            )
            .increment(1);
            return Ok(stdout);
        }

        counter!(
            TERRAFORM_COMMANDS_TOTAL,
            LABEL_COMMAND => command.as_str(),
            LABEL_RESULT => "failure"
        )
        .increment(1);

        let combined = format!("{stdout}{stderr}");
        Err(TerraformError::CommandFailed {
            command: command.as_str().to_owned(),
            exit_code: output.status.code(),
            output: tail(&combined, OUTPUT_TAIL_LINES),
        })
    }
}

impl TerraformClient for TerraformCli {
    async fn init_and_apply(&self, options: &TerraformOptions) -> Result<String, TerraformError> {
        self.run(TerraformCommand::Init, options).await?;
        self.run(TerraformCommand::Apply, options).await
    }

    async fn destroy(&self, options: &TerraformOptions) -> Result<String, TerraformError> {
        self.run(TerraformCommand::Destroy, options).await
    }
}

/// `text`의 마지막 `max_lines`줄 (끝 공백 제거)
fn tail(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.trim_end().lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

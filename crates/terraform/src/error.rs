//! Terraform 어댑터 에러 타입
//!
//! [`TerraformError`]는 프로세스 실행, 비정상 종료, 재시도 정책 에러를 표현합니다.
//! `From<TerraformError> for TfcycleError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 전파할 수 있습니다.

use tfcycle_core::error::TfcycleError;

/// Terraform 어댑터 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TerraformError {
    /// 바이너리 실행 실패 (미설치, 잘못된 작업 디렉토리)
    #[error("failed to execute '{binary}': {source}")]
    Exec {
        /// 실행한 바이너리
        binary: String,
        /// 원인 에러
        #[source]
        source: std::io::Error,
    },

    /// 재시도 불가능한 에러로 명령 실패
    #[error("terraform {command} failed ({}): {output}", describe_exit(.exit_code))]
    CommandFailed {
        /// 하위 명령 이름
        command: String,
        /// 종료 코드 (시그널로 종료되면 `None`)
        exit_code: Option<i32>,
        /// stdout/stderr 합친 출력의 끝부분
        output: String,
    },

    /// 모든 시도가 재시도 가능한 에러로 실패
    #[error("terraform {command} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// 하위 명령 이름
        command: String,
        /// 시도 횟수
        attempts: u32,
        /// 마지막 시도의 에러 메시지
        last_error: String,
    },

    /// 재시도 에러 패턴이 올바른 정규식이 아님
    #[error("invalid retryable error pattern '{pattern}': {reason}")]
    InvalidRetryPattern {
        /// 문제의 패턴
        pattern: String,
        /// 정규식 컴파일 에러
        reason: String,
    },

    /// 명령을 실행하던 태스크가 취소되었거나 panic 발생
    #[error("terraform task failed: {0}")]
    TaskFailed(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_owned(),
    }
}

impl From<TerraformError> for TfcycleError {
    fn from(err: TerraformError) -> Self {
        TfcycleError::Terraform(err.to_string())
    }
}

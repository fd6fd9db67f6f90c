//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 크레이트는 이 상수로 `metrics::counter!()`, `metrics::histogram!()` 매크로를 호출합니다.
//! exporter 설치는 이 워크스페이스를 사용하는 쪽의 몫입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `tfcycle_`
//! - 모듈명: `terraform_`, `lifecycle_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// Terraform 하위 명령 레이블 키 (init, apply, destroy)
pub const LABEL_COMMAND: &str = "command";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Terraform 메트릭 ──────────────────────────────────────────────

/// Terraform: 실행된 명령 수 (counter, label: command, result)
pub const TERRAFORM_COMMANDS_TOTAL: &str = "tfcycle_terraform_commands_total";

/// Terraform: 재시도 횟수 (counter, label: command)
pub const TERRAFORM_RETRIES_TOTAL: &str = "tfcycle_terraform_retries_total";

/// Terraform: 명령 실행 시간 (histogram, 초, label: command)
pub const TERRAFORM_COMMAND_DURATION_SECONDS: &str = "tfcycle_terraform_command_duration_seconds";

// ─── Lifecycle 메트릭 ──────────────────────────────────────────────

/// Lifecycle: 완료된 실행 수 (counter, label: result)
pub const LIFECYCLE_RUNS_TOTAL: &str = "tfcycle_lifecycle_runs_total";

/// Lifecycle: 생략된 정리 단계 수 (counter)
pub const LIFECYCLE_TEARDOWNS_SKIPPED_TOTAL: &str = "tfcycle_lifecycle_teardowns_skipped_total";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명을 등록합니다.
///
/// recorder 설치 이후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        TERRAFORM_COMMANDS_TOTAL,
        "Total number of terraform commands executed, per command and result"
    );
    describe_counter!(
        TERRAFORM_RETRIES_TOTAL,
        "Total number of terraform command retries caused by retryable errors"
    );
    describe_histogram!(
        TERRAFORM_COMMAND_DURATION_SECONDS,
        "Wall-clock duration of a single terraform command attempt in seconds"
    );
    describe_counter!(
        LIFECYCLE_RUNS_TOTAL,
        "Total number of completed lifecycle runs, per result"
    );
    describe_counter!(
        LIFECYCLE_TEARDOWNS_SKIPPED_TOTAL,
        "Total number of lifecycle runs that left infrastructure running"
    );
}

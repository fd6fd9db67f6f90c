//! 로깅 초기화
//!
//! `TfcycleConfig`의 `[general]` 섹션으로 `tracing-subscriber`를 설정합니다.
//! `RUST_LOG`가 설정되어 있으면 설정 파일의 레벨보다 우선합니다.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tfcycle_core::config::GeneralConfig;

use crate::error::LifecycleError;

/// 전역 tracing subscriber를 초기화합니다.
///
/// 테스트는 한 프로세스를 공유하므로 두 번째 호출은 panic 대신
/// [`LifecycleError::Logging`]을 반환합니다. 여러 번 호출될 수 있는 쪽은 이 에러를 무시합니다.
///
/// # 형식
///
/// * `"json"` - 기계 파싱용 JSON lines (CI 로그 수집용)
/// * `"pretty"` - 사람이 읽기 쉬운 컬러 출력
pub fn init_tracing(config: &GeneralConfig) -> Result<(), LifecycleError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| {
                LifecycleError::Logging(format!(
                    "failed to initialize JSON tracing subscriber: {e}"
                ))
            }),
        "pretty" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .map_err(|e| {
                LifecycleError::Logging(format!(
                    "failed to initialize pretty tracing subscriber: {e}"
                ))
            }),
        other => Err(LifecycleError::Logging(format!(
            "unknown log format '{other}', expected 'json' or 'pretty'"
        ))),
    }
}

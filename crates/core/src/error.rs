//! 에러 타입 -- 도메인별 에러 정의
//!
//! 각 크레이트의 도메인 에러(`TerraformError`, `LifecycleError`)는
//! `From` 변환으로 [`TfcycleError`]에 합류합니다.

/// tfcycle 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum TfcycleError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Terraform 명령 실행 에러
    #[error("terraform error: {0}")]
    Terraform(String),

    /// 프로비저닝(init + apply) 실패
    #[error("provisioning error: {0}")]
    Provisioning(String),

    /// 정리(destroy) 실패
    #[error("teardown error: {0}")]
    Teardown(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 필수 환경변수 누락
    #[error("missing environment variable {key}")]
    MissingEnvVar { key: String },
}

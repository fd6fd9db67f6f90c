//! 성공한 실행의 결과 요약

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// 프로비저닝된 인프라의 정리 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownStatus {
    /// `destroy` 성공
    Destroyed,
    /// skip-destroy 설정으로 인프라가 남아 있음
    Skipped,
}

impl TeardownStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destroyed => "destroyed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TeardownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// apply와 정리가 모두 성공한 실행의 요약
#[derive(Debug, Clone)]
pub struct LifecycleReport {
    /// 이번 실행의 고유 suffix
    pub unique_id: String,
    /// Terraform 작업 디렉토리
    pub working_dir: PathBuf,
    /// `terraform apply` 출력
    pub apply_output: String,
    /// 정리 결과
    pub teardown: TeardownStatus,
    /// 전체 실행 소요 시간
    pub elapsed: Duration,
}

impl LifecycleReport {
    /// 인프라가 남아 있는지 여부
    pub fn left_running(&self) -> bool {
        self.teardown == TeardownStatus::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_teardown_leaves_infrastructure_running() {
        let report = LifecycleReport {
            unique_id: "abc12345".to_owned(),
            working_dir: PathBuf::from("fixtures/lifecycle"),
            apply_output: String::new(),
            teardown: TeardownStatus::Skipped,
            elapsed: Duration::ZERO,
        };
        assert!(report.left_running());
        assert_eq!(report.teardown.to_string(), "skipped");
    }
}

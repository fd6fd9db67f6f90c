//! S3 버킷 lifecycle 시나리오
//!
//! 실행 고유 ID로 이름 붙인 태그된 S3 버킷 하나를 생성한 뒤 삭제합니다.

use std::path::PathBuf;

use tfcycle_core::env::{AWS_DEFAULT_REGION, LifecycleEnv};
use tfcycle_core::naming;
use tfcycle_core::types::{RunConfig, TagSet};

/// 버킷 이름 접두어 (전체 이름은 `<prefix>-<unique id>`)
pub const S3_BUCKET_NAME_PREFIX: &str = "terratest-s3-bucket-lifecycle";

/// 버킷 이름을 담는 Terraform 변수
pub const TEST_NAME_VAR: &str = "test_name";

/// 버킷 태그를 담는 Terraform 변수
pub const TAGS_VAR: &str = "tags";

/// S3 버킷 lifecycle 실행의 [`RunConfig`] 빌더
#[derive(Debug, Clone)]
pub struct S3BucketLifecycle {
    working_dir: PathBuf,
}

impl S3BucketLifecycle {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// 버킷에 적용할 태그
    pub fn tags() -> TagSet {
        TagSet::new()
            .with("Automation", "Terraform")
            .with("Terratest", "yes")
            .with("Test", "s3_bucket_lifecycle")
    }

    /// 새 고유 ID로 실행 설정을 생성합니다.
    ///
    /// `env`에 리전이 없으면 환경변수 매핑에서 제외하므로
    /// runner가 AWS에 접근하기 전에 실행을 거부합니다.
    pub fn run_config(&self, env: &LifecycleEnv) -> RunConfig {
        self.run_config_with_id(env, naming::unique_id())
    }

    /// 호출자가 지정한 ID로 [`run_config`](Self::run_config)와 같은 설정을 생성합니다.
    pub fn run_config_with_id(&self, env: &LifecycleEnv, unique_id: impl Into<String>) -> RunConfig {
        let unique_id = unique_id.into();
        let name = naming::resource_name(S3_BUCKET_NAME_PREFIX, &unique_id);

        let mut builder = RunConfig::builder(self.working_dir.clone())
            .unique_id(unique_id)
            .var(TEST_NAME_VAR, name)
            .tags(TAGS_VAR, &Self::tags())
            .skip_destroy(env.skip_destroy);
        if let Some(region) = &env.region {
            builder = builder.env(AWS_DEFAULT_REGION, region.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(region: Option<&str>, skip_destroy: bool) -> LifecycleEnv {
        LifecycleEnv {
            region: region.map(str::to_owned),
            skip_destroy,
        }
    }

    #[test]
    fn run_config_names_bucket_after_unique_id() {
        let scenario = S3BucketLifecycle::new("fixtures/lifecycle");
        let run = scenario.run_config(&env(Some("us-east-1"), false));

        let expected = format!("{S3_BUCKET_NAME_PREFIX}-{}", run.unique_id());
        assert_eq!(run.var_str(TEST_NAME_VAR), Some(expected.as_str()));
        assert_eq!(run.region(), Some("us-east-1"));
        assert!(!run.skip_destroy());
    }

    #[test]
    fn explicit_id_is_lowercased_in_name() {
        let scenario = S3BucketLifecycle::new("fixtures/lifecycle");
        let run = scenario.run_config_with_id(&env(Some("us-east-1"), false), "AbC12345");

        assert_eq!(
            run.var_str(TEST_NAME_VAR),
            Some("terratest-s3-bucket-lifecycle-abc12345")
        );
    }

    #[test]
    fn tags_are_passed_as_map() {
        let scenario = S3BucketLifecycle::new("fixtures/lifecycle");
        let run = scenario.run_config(&env(Some("us-east-1"), false));

        let tags = &run.vars()[TAGS_VAR];
        assert_eq!(tags["Automation"], "Terraform");
        assert_eq!(tags["Terratest"], "yes");
        assert_eq!(tags["Test"], "s3_bucket_lifecycle");
    }

    #[test]
    fn missing_region_is_left_out() {
        let scenario = S3BucketLifecycle::new("fixtures/lifecycle");
        let run = scenario.run_config(&env(None, true));

        assert!(run.region().is_none());
        assert!(run.env_vars().is_empty());
        assert!(run.skip_destroy());
    }

    #[test]
    fn every_run_gets_a_distinct_name() {
        let scenario = S3BucketLifecycle::new("fixtures/lifecycle");
        let env = env(Some("us-east-1"), false);
        let a = scenario.run_config(&env);
        let b = scenario.run_config(&env);

        assert_ne!(a.var_str(TEST_NAME_VAR), b.var_str(TEST_NAME_VAR));
    }
}

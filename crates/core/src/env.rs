//! 환경변수 어댑터
//!
//! 프로세스 환경을 읽는 코드는 이 모듈에만 있습니다.
//! runner는 이 어댑터가 채운 [`RunConfig`](crate::types::RunConfig)만 봅니다.

/// Terraform AWS provider가 요구하는 리전 환경변수
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

/// `"1"`이면 테스트 종료 시 destroy를 생략합니다.
pub const TT_SKIP_DESTROY: &str = "TT_SKIP_DESTROY";

/// lifecycle 실행에 필요한 환경 입력
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleEnv {
    /// `AWS_DEFAULT_REGION` 값 (비어 있으면 `None`)
    pub region: Option<String>,
    /// `TT_SKIP_DESTROY == "1"` 여부
    pub skip_destroy: bool,
}

impl LifecycleEnv {
    /// 현재 프로세스 환경에서 읽습니다.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 읽습니다.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let region = lookup(AWS_DEFAULT_REGION).filter(|r| !r.is_empty());
        let skip_destroy = lookup(TT_SKIP_DESTROY).as_deref() == Some("1");
        Self {
            region,
            skip_destroy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_region_and_skip_flag() {
        let env = LifecycleEnv::from_lookup(lookup_from(&[
            ("AWS_DEFAULT_REGION", "us-east-1"),
            ("TT_SKIP_DESTROY", "1"),
        ]));
        assert_eq!(env.region.as_deref(), Some("us-east-1"));
        assert!(env.skip_destroy);
    }

    #[test]
    fn empty_region_is_treated_as_missing() {
        let env = LifecycleEnv::from_lookup(lookup_from(&[("AWS_DEFAULT_REGION", "")]));
        assert_eq!(env.region, None);
    }

    #[test]
    fn skip_destroy_requires_literal_one() {
        for value in ["true", "yes", "0", " 1", "1 ", ""] {
            let env = LifecycleEnv::from_lookup(lookup_from(&[("TT_SKIP_DESTROY", value)]));
            assert!(!env.skip_destroy, "value {value:?} must not skip destroy");
        }
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let env = LifecycleEnv::from_lookup(|_| None);
        assert_eq!(env, LifecycleEnv::default());
    }
}

//! 도메인 타입 -- 실행 설정과 Terraform에 전달되는 값 매핑
//!
//! [`RunConfig`]는 한 번의 lifecycle 실행 동안 바뀌지 않는 값입니다.
//! 필드는 비공개이고 [`RunConfigBuilder`]로만 만들 수 있습니다.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::env::AWS_DEFAULT_REGION;
use crate::naming;

/// Terraform 입력 변수 (이름 → 임의의 JSON 값)
pub type Vars = BTreeMap<String, Value>;

/// Terraform 프로세스에 전달할 환경변수
pub type EnvVars = BTreeMap<String, String>;

/// 리소스 태그 집합
///
/// 키는 유일하며 정렬된 순서로 유지됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    /// 빈 태그 집합을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 태그를 추가합니다. 같은 키가 있으면 값을 덮어씁니다.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// 태그 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Terraform 변수로 넘길 수 있는 JSON 객체로 변환합니다.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// 한 번의 lifecycle 실행 설정
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    working_dir: PathBuf,
    vars: Vars,
    env_vars: EnvVars,
    unique_id: String,
    skip_destroy: bool,
}

impl RunConfig {
    /// 새 빌더를 생성합니다.
    pub fn builder(working_dir: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder::new(working_dir)
    }

    /// Terraform 설정이 있는 디렉토리
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Terraform 입력 변수
    pub fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Terraform 프로세스 환경변수
    pub fn env_vars(&self) -> &EnvVars {
        &self.env_vars
    }

    /// 이번 실행의 고유 suffix
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// 정리 단계를 생략할지 여부
    pub fn skip_destroy(&self) -> bool {
        self.skip_destroy
    }

    /// 환경변수 매핑의 리전 값 (비어 있으면 `None`)
    pub fn region(&self) -> Option<&str> {
        self.env_vars
            .get(AWS_DEFAULT_REGION)
            .map(String::as_str)
            .filter(|r| !r.is_empty())
    }

    /// 문자열 변수 값을 조회합니다.
    pub fn var_str(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(Value::as_str)
    }
}

impl fmt::Display for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.working_dir.display(), self.unique_id)
    }
}

/// [`RunConfig`] 빌더
///
/// `unique_id`를 지정하지 않으면 [`naming::unique_id`]로 생성합니다.
pub struct RunConfigBuilder {
    working_dir: PathBuf,
    vars: Vars,
    env_vars: EnvVars,
    unique_id: Option<String>,
    skip_destroy: bool,
}

impl RunConfigBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            vars: Vars::new(),
            env_vars: EnvVars::new(),
            unique_id: None,
            skip_destroy: false,
        }
    }

    /// Terraform 입력 변수를 추가합니다.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// 태그 집합을 변수로 추가합니다.
    pub fn tags(mut self, name: impl Into<String>, tags: &TagSet) -> Self {
        self.vars.insert(name.into(), tags.to_value());
        self
    }

    /// 환경변수를 추가합니다.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// 고유 suffix를 직접 지정합니다.
    pub fn unique_id(mut self, id: impl Into<String>) -> Self {
        self.unique_id = Some(id.into());
        self
    }

    /// 정리 단계 생략 여부를 설정합니다.
    pub fn skip_destroy(mut self, skip: bool) -> Self {
        self.skip_destroy = skip;
        self
    }

    /// 설정을 완성합니다.
    pub fn build(self) -> RunConfig {
        RunConfig {
            working_dir: self.working_dir,
            vars: self.vars,
            env_vars: self.env_vars,
            unique_id: self.unique_id.unwrap_or_else(naming::unique_id),
            skip_destroy: self.skip_destroy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_set_keys_are_unique() {
        let tags = TagSet::new()
            .with("Automation", "Terraform")
            .with("Automation", "Manual");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("Automation"), Some("Manual"));
    }

    #[test]
    fn tag_set_converts_to_json_object() {
        let tags: TagSet = [("Terratest", "yes"), ("Automation", "Terraform")]
            .into_iter()
            .collect();
        assert_eq!(
            tags.to_value(),
            json!({"Automation": "Terraform", "Terratest": "yes"})
        );
    }

    #[test]
    fn tag_set_iterates_in_key_order() {
        let tags = TagSet::new().with("b", "2").with("a", "1");
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn builder_generates_unique_id_when_missing() {
        let a = RunConfig::builder("fixtures/lifecycle").build();
        let b = RunConfig::builder("fixtures/lifecycle").build();
        assert!(!a.unique_id().is_empty());
        assert_ne!(a.unique_id(), b.unique_id());
    }

    #[test]
    fn builder_keeps_explicit_values() {
        let tags = TagSet::new().with("Test", "unit");
        let config = RunConfig::builder("fixtures/lifecycle")
            .var("test_name", "bucket-1")
            .tags("tags", &tags)
            .env("AWS_DEFAULT_REGION", "eu-west-1")
            .unique_id("abc12345")
            .skip_destroy(true)
            .build();

        assert_eq!(config.working_dir(), Path::new("fixtures/lifecycle"));
        assert_eq!(config.var_str("test_name"), Some("bucket-1"));
        assert_eq!(config.vars()["tags"], json!({"Test": "unit"}));
        assert_eq!(config.region(), Some("eu-west-1"));
        assert_eq!(config.unique_id(), "abc12345");
        assert!(config.skip_destroy());
    }

    #[test]
    fn region_is_none_when_empty_or_absent() {
        let absent = RunConfig::builder(".").build();
        assert_eq!(absent.region(), None);

        let empty = RunConfig::builder(".").env("AWS_DEFAULT_REGION", "").build();
        assert_eq!(empty.region(), None);
    }

    #[test]
    fn display_includes_dir_and_id() {
        let config = RunConfig::builder("fixtures/lifecycle")
            .unique_id("deadbeef")
            .build();
        assert_eq!(config.to_string(), "fixtures/lifecycle (deadbeef)");
    }
}

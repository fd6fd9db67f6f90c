//! 고유 리소스 이름 생성
//!
//! 동시에 실행되는 테스트가 같은 리소스 이름을 쓰지 않도록
//! 실행마다 무작위 suffix를 붙입니다.

use uuid::Uuid;

/// suffix 길이 (16진수 문자 수)
pub const UNIQUE_ID_LEN: usize = 8;

/// 소문자 16진수로 된 무작위 suffix를 생성합니다.
pub fn unique_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(UNIQUE_ID_LEN);
    id
}

/// `<prefix>-<id>` 형식의 소문자 리소스 이름을 만듭니다.
///
/// S3 버킷 이름처럼 대문자를 허용하지 않는 리소스가 있으므로 항상 소문자입니다.
pub fn resource_name(prefix: &str, id: &str) -> String {
    format!("{prefix}-{id}").to_lowercase()
}

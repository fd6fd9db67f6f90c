//! 테스트 가능성을 위한 Terraform 추상화
//!
//! lifecycle runner는 [`TerraformClient`] trait을 통해서만 인프라 도구에 접근합니다.
//! 프로덕션 코드는 [`TerraformCli`]를, 테스트는 기록용 stub을 사용합니다.
//!
//! ```text
//! ┌─────────────────┐
//! │ LifecycleRunner │
//! └────────┬────────┘
//!          │
//!          ▼
//!  ┌────────────────┐
//!  │TerraformClient │ (trait)
//!  └────────────────┘
//!       │      │
//!       ▼      ▼
//!   ┌─────┐ ┌──────┐
//!   │ CLI │ │ Stub │
//!   └──┬──┘ └──────┘
//!      │
//!      ▼
//!  terraform binary
//! ```
//!
//! [`TerraformCli`]: crate::TerraformCli

use std::future::Future;

use crate::error::TerraformError;
use crate::options::TerraformOptions;

/// 인프라 도구를 추상화하는 trait
///
/// 재시도는 구현체의 책임이며, 호출자는 각 호출의 최종 결과만 봅니다.
///
/// `Send + Sync + 'static`이므로 `Arc`로 감싸 spawn된 태스크와 공유할 수 있습니다.
pub trait TerraformClient: Send + Sync + 'static {
    /// `init` 후 `apply`를 실행합니다.
    ///
    /// `apply`의 출력을 반환합니다.
    ///
    /// # Errors
    ///
    /// 재시도 후에도 실패한 첫 하위 명령의 에러를 반환합니다.
    fn init_and_apply(
        &self,
        options: &TerraformOptions,
    ) -> impl Future<Output = Result<String, TerraformError>> + Send;

    /// `destroy`를 실행하고 그 출력을 반환합니다.
    fn destroy(
        &self,
        options: &TerraformOptions,
    ) -> impl Future<Output = Result<String, TerraformError>> + Send;
}

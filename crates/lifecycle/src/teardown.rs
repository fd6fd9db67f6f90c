//! 스코프 기반 정리 -- 모든 종료 경로에서 destroy 보장
//!
//! [`TeardownGuard`]는 provisioning 시작 전에 무장(arm)되며
//! 다음 두 경로 중 하나로 인프라를 정리합니다.
//!
//! - 정상 경로: [`release`](TeardownGuard::release)가 destroy 결과를 반환합니다.
//! - 취소 경로: 실행 future가 drop되면 `Drop`에서 destroy를 수행합니다.
//!
//! 가드는 provisioning 태스크의 핸들을 소유합니다.
//! 어느 경로에서도 apply가 끝나기 전에는 destroy를 시작하지 않습니다.
//!
//! # 런타임 제약
//!
//! 멀티 스레드 런타임에서는 `Drop`이 `block_in_place`로 destroy 완료까지 대기합니다.
//! current-thread 런타임에서는 블로킹할 수 없어 백그라운드 태스크로 spawn하며,
//! 그 태스크가 끝나기 전에 런타임이 종료되면 정리가 유실됩니다.
//! 타임아웃으로 실행을 취소할 수 있는 테스트는 멀티 스레드 런타임을 사용해야 합니다.

use std::sync::Arc;

use metrics::counter;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::task::{JoinError, JoinHandle};
use tracing::{error, info, warn};

use tfcycle_core::metrics::LIFECYCLE_TEARDOWNS_SKIPPED_TOTAL;
use tfcycle_terraform::{TerraformClient, TerraformError, TerraformOptions};

use crate::report::TeardownStatus;

type ProvisionHandle = JoinHandle<Result<String, TerraformError>>;

/// skip-destroy가 설정되지 않은 한 프로비저닝된 인프라를 정리하는 가드
pub struct TeardownGuard<C: TerraformClient> {
    client: Arc<C>,
    options: Arc<TerraformOptions>,
    skip_destroy: bool,
    provisioning: Option<ProvisionHandle>,
    armed: bool,
}

impl<C: TerraformClient> TeardownGuard<C> {
    /// 하나의 작업 디렉토리에 대한 가드를 무장합니다.
    pub fn arm(client: Arc<C>, options: Arc<TerraformOptions>, skip_destroy: bool) -> Self {
        Self {
            client,
            options,
            skip_destroy,
            provisioning: None,
            armed: true,
        }
    }

    /// release 시 destroy를 생략하는지 여부
    pub fn skips_destroy(&self) -> bool {
        self.skip_destroy
    }

    /// `init` + `apply`를 별도 태스크로 실행하고 완료를 기다립니다.
    ///
    /// 클라이언트 내부 panic은 호출자를 통해 unwind되지 않고
    /// [`JoinError`]로 반환되므로, 호출자는 이후에도 release할 수 있습니다.
    pub async fn provision(&mut self) -> Result<Result<String, TerraformError>, JoinError> {
        let client = Arc::clone(&self.client);
        let options = Arc::clone(&self.options);
        let handle = self
            .provisioning
            .insert(tokio::spawn(async move { client.init_and_apply(&options).await }));
        let joined = handle.await;
        self.provisioning = None;
        joined
    }

    /// 가드를 해제하고 정리 단계를 실행합니다.
    pub async fn release(mut self) -> Result<TeardownStatus, TerraformError> {
        self.armed = false;

        if let Some(pending) = self.provisioning.take() {
            // provision() future만 취소된 경우에도 apply 완료를 기다림
            let _ = pending.await;
        }

        if self.skip_destroy {
            warn!(
                working_dir = %self.options.working_dir.display(),
                "skip-destroy set, leaving infrastructure running"
            );
            counter!(LIFECYCLE_TEARDOWNS_SKIPPED_TOTAL).increment(1);
            return Ok(TeardownStatus::Skipped);
        }

        info!(
            working_dir = %self.options.working_dir.display(),
            "destroying infrastructure"
        );
        self.client
            .destroy(&self.options)
            .await
            .map(|_| TeardownStatus::Destroyed)
    }
}

impl<C: TerraformClient> Drop for TeardownGuard<C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let working_dir = self.options.working_dir.display().to_string();
        if self.skip_destroy {
            warn!(
                working_dir = working_dir.as_str(),
                "run dropped with skip-destroy set, leaving infrastructure running"
            );
            return;
        }

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                error!(
                    working_dir = working_dir.as_str(),
                    "run dropped outside a tokio runtime, infrastructure may be left running"
                );
                return;
            }
        };

        let client = Arc::clone(&self.client);
        let options = Arc::clone(&self.options);
        let pending = self.provisioning.take();
        let teardown = async move {
            if let Some(pending) = pending {
                let _ = pending.await;
            }
            client.destroy(&options).await
        };

        if runtime.runtime_flavor() == RuntimeFlavor::MultiThread {
            warn!(
                working_dir = working_dir.as_str(),
                "run dropped before teardown, destroying before returning"
            );
            let result = tokio::task::block_in_place(|| runtime.block_on(teardown));
            log_dropped_teardown(&working_dir, result);
            return;
        }

        error!(
            working_dir = working_dir.as_str(),
            "run dropped on a current-thread runtime, destroy runs in background \
             and is lost if the runtime shuts down first"
        );
        runtime.spawn(async move {
            let result = teardown.await;
            log_dropped_teardown(&working_dir, result);
        });
    }
}

fn log_dropped_teardown(working_dir: &str, result: Result<String, TerraformError>) {
    match result {
        Ok(_) => info!(working_dir, "teardown of dropped run completed"),
        Err(e) => error!(
            working_dir,
            error = %e,
            "teardown of dropped run failed, infrastructure may be left running"
        ),
    }
}

//! Terraform 하위 명령과 인자 목록

use std::fmt;

use crate::hcl;
use crate::options::TerraformOptions;

/// lifecycle에서 사용하는 Terraform 하위 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerraformCommand {
    Init,
    Apply,
    Destroy,
}

impl TerraformCommand {
    /// 하위 명령 이름 (메트릭 레이블로도 사용)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Apply => "apply",
            Self::Destroy => "destroy",
        }
    }

    /// 이 하위 명령의 전체 인자 목록
    pub fn args(&self, options: &TerraformOptions) -> Vec<String> {
        let mut args: Vec<String> = match self {
            Self::Init => vec!["init".to_owned(), format!("-upgrade={}", options.upgrade)],
            Self::Apply => vec![
                "apply".to_owned(),
                "-input=false".to_owned(),
                "-auto-approve".to_owned(),
            ],
            Self::Destroy => vec![
                "destroy".to_owned(),
                "-auto-approve".to_owned(),
                "-input=false".to_owned(),
            ],
        };

        if !options.lock && self.supports_lock() {
            args.push("-lock=false".to_owned());
        }
        if options.no_color {
            args.push("-no-color".to_owned());
        }
        if self.takes_vars() {
            for (name, value) in &options.vars {
                args.push("-var".to_owned());
                args.push(hcl::format_var(name, value));
            }
        }

        args
    }

    fn supports_lock(&self) -> bool {
        matches!(self, Self::Apply | Self::Destroy)
    }

    fn takes_vars(&self) -> bool {
        matches!(self, Self::Apply | Self::Destroy)
    }
}

impl fmt::Display for TerraformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

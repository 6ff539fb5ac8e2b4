use std::fmt;

/// 定时器错误类型 (Timer Error Type)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// 配置验证失败 (Configuration validation failed)
    InvalidConfiguration {
        field: String,
        reason: String,
    },

    /// 工作线程创建失败（资源耗尽）
    /// Worker thread creation failed (resource exhaustion)
    SpawnFailed {
        reason: String,
    },
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidConfiguration { field, reason } => {
                write!(f, "Configuration validation failed ({}): {}", field, reason)
            }
            TimerError::SpawnFailed { reason } => {
                write!(f, "Failed to spawn worker thread: {}", reason)
            }
        }
    }
}

impl std::error::Error for TimerError {}

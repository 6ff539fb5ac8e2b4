//! 定时器服务配置模块 (Timer Service Configuration Module)
//!
//! 提供配置结构和 Builder 模式，用于配置事件存储容量和工作线程。
//! (Provides configuration structure and Builder pattern for configuring event
//! store capacity and the worker thread)

use crate::error::TimerError;

/// 默认工作线程名称 (Default worker thread name)
const DEFAULT_THREAD_NAME: &str = "goshawk-timer";

/// 定时器服务配置 (Timer Service Configuration)
///
/// # 示例 (Examples)
/// ```
/// use goshawk_timer::TimerConfig;
///
/// // 使用默认配置 (Use default configuration)
/// let config = TimerConfig::default();
///
/// // 使用 Builder 自定义配置 (Use Builder to customize configuration)
/// let config = TimerConfig::builder()
///     .capacity_hint(128)
///     .thread_name("my-timer")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// 事件存储的预分配容量提示，0 表示不预分配。仅影响性能，不影响语义。
    /// (Pre-allocation capacity hint for the event store, 0 means no
    /// pre-allocation. Performance-only, no semantic effect)
    pub capacity_hint: usize,

    /// 工作线程名称 (Worker thread name)
    pub thread_name: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            capacity_hint: 0,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl TimerConfig {
    /// 创建配置构建器 (Create configuration builder)
    pub fn builder() -> TimerConfigBuilder {
        TimerConfigBuilder::default()
    }
}

/// 定时器服务配置构建器 (Timer Service Configuration Builder)
#[derive(Debug, Clone)]
pub struct TimerConfigBuilder {
    capacity_hint: usize,
    thread_name: String,
}

impl Default for TimerConfigBuilder {
    fn default() -> Self {
        let config = TimerConfig::default();
        Self {
            capacity_hint: config.capacity_hint,
            thread_name: config.thread_name,
        }
    }
}

impl TimerConfigBuilder {
    /// 设置事件存储容量提示 (Set event store capacity hint)
    pub fn capacity_hint(mut self, hint: usize) -> Self {
        self.capacity_hint = hint;
        self
    }

    /// 设置工作线程名称 (Set worker thread name)
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// 构建配置并进行验证
    ///      (Build and validate configuration)
    ///
    /// # 返回 (Returns)
    /// - `Ok(TimerConfig)`: 配置有效
    ///      (Configuration is valid)
    /// - `Err(TimerError)`: 配置验证失败
    ///      (Configuration validation failed)
    ///
    /// # 验证规则 (Validation Rules)
    /// - 线程名称不能为空 (Thread name must not be empty)
    /// - 线程名称不能包含空字节 (Thread name must not contain NUL bytes)
    pub fn build(self) -> Result<TimerConfig, TimerError> {
        if self.thread_name.is_empty() {
            return Err(TimerError::InvalidConfiguration {
                field: "thread_name".to_string(),
                reason: "thread name must not be empty".to_string(),
            });
        }

        if self.thread_name.contains('\0') {
            return Err(TimerError::InvalidConfiguration {
                field: "thread_name".to_string(),
                reason: "thread name must not contain NUL bytes".to_string(),
            });
        }

        Ok(TimerConfig {
            capacity_hint: self.capacity_hint,
            thread_name: self.thread_name,
        })
    }
}

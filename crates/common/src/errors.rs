//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 依赖解析错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("未找到绑定: {key}\n已注册的绑定:\n{registered}")]
    NotFound { key: String, registered: String },

    #[error("未找到覆盖绑定: {key}, 覆盖层级: {level}")]
    OverrideNotFound { key: String, level: usize },

    #[error("检测到依赖循环:\n{tree}")]
    DependencyLoop { tree: String },

    #[error("解析深度超出上限 {max_depth}: {key}")]
    DepthExceeded { key: String, max_depth: usize },

    #[error("实例类型不匹配: 期望 {expected}")]
    TypeMismatch { expected: String },

    #[error("绑定注册失败: {key}, 原因: {message}")]
    RegistrationError { key: String, message: String },
}

impl DependencyError {
    /// 创建注册错误
    pub fn registration(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistrationError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// 是否为依赖循环错误
    pub fn is_dependency_loop(&self) -> bool {
        matches!(self, Self::DependencyLoop { .. })
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;

//! # Bindery Common
//!
//! 这个 crate 提供了 Bindery 解析引擎的公共类型标识与错误定义。
//!
//! ## 核心组件
//!
//! - [`TypeToken`] - 不透明的类型标识，支持层级查询（原始形式、接口、父类型）
//! - [`TypeDescriptor`] - [`TypeToken`] 的参考实现
//! - [`DependencyError`] - 依赖解析错误
//! - [`ConfigError`] - 配置错误
//!
//! ## 设计原则
//!
//! - 解析算法只依赖 [`TypeToken`] 的四个层级查询操作，不绑定具体的类型表示
//! - 错误通过 `Result` 传播，"未找到" 与 "配置自引用" 明确区分

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;

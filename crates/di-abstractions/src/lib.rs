//! # Dependency Injection Abstractions
//!
//! 依赖解析抽象层，定义绑定键、绑定策略和解析上下文的核心接口。
//!
//! ## 核心接口
//!
//! - [`Key`] - 绑定键（目标类型 + 参数类型）
//! - [`Binding`] - 绑定策略，产出工厂函数
//! - [`ExternalSource`] - 找不到注册绑定时的最后兜底
//! - [`DependencyContainer`] - 解析上下文，供工厂函数解析传递依赖
//! - [`ResolutionNode`] - 解析祖先链，用于递归检测

pub mod container;
pub mod factory;
pub mod key;
pub mod resolver;

pub use container::*;
pub use factory::*;
pub use key::*;
pub use resolver::*;

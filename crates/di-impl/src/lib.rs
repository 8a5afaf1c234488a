//! # 依赖解析具体实现
//!
//! 提供绑定表、带层级回退与递归检测的解析容器，以及配置加载。
//!
//! ```
//! use bindery_common::TypeDescriptor;
//! use di_abstractions::{DependencyContainer, Key};
//! use di_impl::Container;
//!
//! let logger = Key::of(TypeDescriptor::named("Logger"));
//!
//! let mut builder = Container::<TypeDescriptor>::builder();
//! builder.bind_instance(logger.clone(), "stdout").unwrap();
//! let container = builder.build();
//!
//! let name = container.instance_of::<&'static str>(&logger).unwrap();
//! assert_eq!(*name, "stdout");
//! assert!(container.factory_or_none(&Key::of(TypeDescriptor::named("Db")), None).unwrap().is_none());
//! ```

pub mod bindings;
pub mod config;
pub mod container;
pub mod registry;

pub use bindings::*;
pub use config::*;
pub use container::*;
pub use registry::*;

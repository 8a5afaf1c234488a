//! 绑定与工厂抽象接口
//!
//! 绑定只有一种能力：给定解析上下文和键，产出工厂函数。
//! 实例类型在这一层被擦除为 [`Instance`]，由调用方通过 [`downcast_instance`] 还原。

use crate::container::ContainerRef;
use crate::key::Key;
use bindery_common::{DependencyError, DependencyResult, TypeToken};
use std::any::Any;
use std::sync::Arc;

/// 类型擦除的实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 工厂函数：参数 -> 实例
pub type Factory = Arc<dyn Fn(Instance) -> DependencyResult<Instance> + Send + Sync>;

/// 无参提供者
pub type Provider = Arc<dyn Fn() -> DependencyResult<Instance> + Send + Sync>;

/// 绑定 trait
///
/// 单例、作用域等生命周期策略都作为绑定的不同实现存在，解析引擎只调用 `get_factory`。
pub trait Binding<T: TypeToken>: Send + Sync {
    /// 产出工厂函数
    ///
    /// `context` 的祖先链已包含当前键，工厂被调用时应通过它解析传递依赖。
    fn get_factory(&self, context: ContainerRef<T>, key: &Key<T>) -> Factory;

    /// 绑定策略描述
    fn description(&self) -> &str {
        "binding"
    }
}

/// 共享的绑定引用
pub type BindingRef<T> = Arc<dyn Binding<T>>;

/// 外部来源 trait
///
/// 仅在注册绑定及其层级回退都未命中时才会被询问。
pub trait ExternalSource<T: TypeToken>: Send + Sync {
    /// 为键提供工厂，不支持时返回 `None`
    fn get_factory(&self, context: ContainerRef<T>, key: &Key<T>) -> Option<Factory>;
}

impl<T, F> ExternalSource<T> for F
where
    T: TypeToken,
    F: Fn(ContainerRef<T>, &Key<T>) -> Option<Factory> + Send + Sync,
{
    fn get_factory(&self, context: ContainerRef<T>, key: &Key<T>) -> Option<Factory> {
        self(context, key)
    }
}

/// 无参数值 `()`
pub fn unit_instance() -> Instance {
    Arc::new(())
}

/// 将闭包包装为工厂
pub fn factory_from_fn<F>(f: F) -> Factory
where
    F: Fn(Instance) -> DependencyResult<Instance> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 将工厂柯里化为固定参数的提供者
pub fn to_provider(factory: Factory, arg: Instance) -> Provider {
    Arc::new(move || factory(Arc::clone(&arg)))
}

/// 将工厂柯里化为以 `()` 调用的提供者
pub fn no_arg_provider(factory: Factory) -> Provider {
    to_provider(factory, unit_instance())
}

/// 还原实例的具体类型
pub fn downcast_instance<R>(instance: Instance) -> DependencyResult<Arc<R>>
where
    R: Any + Send + Sync,
{
    instance
        .downcast::<R>()
        .map_err(|_| DependencyError::TypeMismatch {
            expected: std::any::type_name::<R>().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doubling() -> Factory {
        factory_from_fn(|arg| {
            let value = downcast_instance::<u32>(arg)?;
            Ok(Arc::new(*value * 2) as Instance)
        })
    }

    #[test]
    fn test_to_provider_fixes_argument() {
        let provider = to_provider(doubling(), Arc::new(21_u32));
        let first = downcast_instance::<u32>(provider().unwrap()).unwrap();
        let second = downcast_instance::<u32>(provider().unwrap()).unwrap();
        assert_eq!(*first, 42);
        assert_eq!(*second, 42);
    }

    #[test]
    fn test_no_arg_provider_passes_unit() {
        let provider = no_arg_provider(factory_from_fn(|arg| {
            downcast_instance::<()>(arg)?;
            Ok(Arc::new("ok") as Instance)
        }));
        let value = downcast_instance::<&'static str>(provider().unwrap()).unwrap();
        assert_eq!(*value, "ok");
    }

    #[test]
    fn test_downcast_mismatch() {
        let err = downcast_instance::<String>(Arc::new(1_u8)).unwrap_err();
        match err {
            DependencyError::TypeMismatch { expected } => {
                assert_eq!(expected, "alloc::string::String");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! 常用绑定策略
//!
//! 单例、作用域缓存等生命周期策略不在这里实现；这些是把闭包或现成实例
//! 接到解析引擎上的最小适配。

use bindery_common::{DependencyResult, TypeToken};
use di_abstractions::{factory_from_fn, Binding, ContainerRef, Factory, Instance, Key};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 实例绑定：每次调用返回同一个实例
#[derive(Clone)]
pub struct InstanceBinding {
    instance: Instance,
}

impl InstanceBinding {
    /// 包装一个值
    pub fn new<V: Any + Send + Sync>(value: V) -> Self {
        Self {
            instance: Arc::new(value),
        }
    }

    /// 包装已擦除类型的实例
    pub fn from_instance(instance: Instance) -> Self {
        Self { instance }
    }
}

impl fmt::Debug for InstanceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceBinding")
            .field("instance", &"<instance>")
            .finish()
    }
}

impl<T: TypeToken> Binding<T> for InstanceBinding {
    fn get_factory(&self, _context: ContainerRef<T>, _key: &Key<T>) -> Factory {
        let instance = Arc::clone(&self.instance);
        factory_from_fn(move |_| Ok(Arc::clone(&instance)))
    }

    fn description(&self) -> &str {
        "instance"
    }
}

/// 提供者绑定：忽略参数，每次调用执行一次创建函数
pub struct ProviderBinding<F> {
    creator: Arc<F>,
}

impl<F> ProviderBinding<F> {
    /// 创建提供者绑定
    pub fn new(creator: F) -> Self {
        Self {
            creator: Arc::new(creator),
        }
    }
}

impl<T, F> Binding<T> for ProviderBinding<F>
where
    T: TypeToken,
    F: Fn(&ContainerRef<T>) -> DependencyResult<Instance> + Send + Sync + 'static,
{
    fn get_factory(&self, context: ContainerRef<T>, _key: &Key<T>) -> Factory {
        let creator = Arc::clone(&self.creator);
        factory_from_fn(move |_| creator(&context))
    }

    fn description(&self) -> &str {
        "provider"
    }
}

/// 工厂绑定：以调用参数执行创建函数
pub struct FactoryBinding<F> {
    creator: Arc<F>,
}

impl<F> FactoryBinding<F> {
    /// 创建工厂绑定
    pub fn new(creator: F) -> Self {
        Self {
            creator: Arc::new(creator),
        }
    }
}

impl<T, F> Binding<T> for FactoryBinding<F>
where
    T: TypeToken,
    F: Fn(&ContainerRef<T>, Instance) -> DependencyResult<Instance> + Send + Sync + 'static,
{
    fn get_factory(&self, context: ContainerRef<T>, _key: &Key<T>) -> Factory {
        let creator = Arc::clone(&self.creator);
        factory_from_fn(move |arg| creator(&context, arg))
    }

    fn description(&self) -> &str {
        "factory"
    }
}

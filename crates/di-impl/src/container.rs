//! 解析容器实现
//!
//! 容器由共享状态（绑定表、回退缓存、外部来源、配置）和一个祖先节点指针组成。
//! 每次传递解析都克隆出新的容器，只替换节点指针与接收者，共享状态不复制。

use crate::bindings::{FactoryBinding, InstanceBinding, ProviderBinding};
use crate::registry::BindingsMap;
use bindery_common::{ConfigResult, DependencyError, DependencyResult, TypeToken};
use dashmap::DashMap;
use di_abstractions::{
    downcast_instance, BindingRef, ContainerConfig, ContainerRef, DependencyContainer,
    ExternalSource, Factory, Instance, Key, ResolutionNode,
};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// 所有派生容器共享的状态
struct SharedState<T: TypeToken> {
    /// 绑定表
    bindings: BindingsMap<T>,
    /// 回退解析缓存：请求的键 -> 实际命中的绑定
    cache: DashMap<Key<T>, BindingRef<T>>,
    /// 外部来源
    external_source: Option<Arc<dyn ExternalSource<T>>>,
    /// 容器配置
    config: ContainerConfig,
}

/// 解析容器
#[derive(Clone)]
pub struct Container<T: TypeToken> {
    shared: Arc<SharedState<T>>,
    node: Option<Arc<ResolutionNode<T>>>,
    receiver: Option<Instance>,
}

impl<T: TypeToken> Container<T> {
    /// 创建构建器
    pub fn builder() -> ContainerBuilder<T> {
        ContainerBuilder::new()
    }

    /// 以默认配置从绑定表创建容器
    pub fn new(bindings: BindingsMap<T>) -> Self {
        Self::from_parts(bindings, ContainerConfig::default(), None)
    }

    fn from_parts(
        bindings: BindingsMap<T>,
        config: ContainerConfig,
        external_source: Option<Arc<dyn ExternalSource<T>>>,
    ) -> Self {
        Self {
            shared: Arc::new(SharedState {
                bindings,
                cache: DashMap::new(),
                external_source,
                config,
            }),
            node: None,
            receiver: None,
        }
    }

    /// 所有主绑定
    pub fn bindings(&self) -> &HashMap<Key<T>, BindingRef<T>> {
        self.shared.bindings.bindings()
    }

    /// 所有覆盖链
    pub fn overrides(&self) -> &HashMap<Key<T>, Vec<BindingRef<T>>> {
        self.shared.bindings.overrides()
    }

    /// 容器配置
    pub fn config(&self) -> &ContainerConfig {
        &self.shared.config
    }

    /// 回退缓存条目数
    pub fn cache_len(&self) -> usize {
        self.shared.cache.len()
    }

    /// 键是否已写入回退缓存
    pub fn is_cached(&self, key: &Key<T>) -> bool {
        self.shared.cache.contains_key(key)
    }

    /// 当前祖先链末端
    pub fn node(&self) -> Option<&Arc<ResolutionNode<T>>> {
        self.node.as_ref()
    }

    /// 解析实例并还原为具体类型
    pub fn instance_of<R>(&self, key: &Key<T>) -> DependencyResult<Arc<R>>
    where
        R: Any + Send + Sync,
    {
        downcast_instance(self.instance(key)?)
    }

    /// 以 `(key, override_level)` 延长祖先链，得到子上下文
    fn child(
        &self,
        key: &Key<T>,
        override_level: usize,
        receiver: Option<Instance>,
    ) -> DependencyResult<Self> {
        let node = ResolutionNode::new(self.node.clone(), key.clone(), override_level);
        let max_depth = self.shared.config.max_resolution_depth;
        if node.depth() > max_depth {
            return Err(DependencyError::DepthExceeded {
                key: key.to_string(),
                max_depth,
            });
        }

        Ok(Self {
            shared: Arc::clone(&self.shared),
            node: Some(Arc::new(node)),
            receiver,
        })
    }

    /// 对本容器的末端节点做递归检测
    fn check_recursion(&self, key: &Key<T>, override_level: usize) -> DependencyResult<()> {
        let Some(node) = &self.node else {
            return Ok(());
        };
        node.check_recursion(key, override_level).map_err(|err| {
            warn!("检测到依赖循环: {}", key);
            err
        })
    }

    /// 精确匹配：绑定表优先，其次回退缓存
    fn exact(&self, key: &Key<T>) -> Option<BindingRef<T>> {
        if let Some(binding) = self.shared.bindings.get(key) {
            return Some(Arc::clone(binding));
        }
        self.shared
            .cache
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// 只有最外层调用才写缓存
    fn remember(&self, key: &Key<T>, binding: &BindingRef<T>, cache_result: bool) {
        if cache_result && self.shared.config.enable_fallback_cache {
            debug!("回退解析命中，写入缓存: {}", key);
            self.shared.cache.insert(key.clone(), Arc::clone(binding));
        }
    }

    /// 再向上回退一层是否超出层级深度上限
    fn check_widening_depth(&self, key: &Key<T>, depth: usize) -> DependencyResult<()> {
        let max_depth = self.shared.config.max_widening_depth;
        if depth + 1 > max_depth {
            return Err(DependencyError::DepthExceeded {
                key: key.to_string(),
                max_depth,
            });
        }
        Ok(())
    }

    /// 沿类型层级查找绑定
    ///
    /// 顺序：精确匹配 -> 原始参数类型 -> 直接接口（按声明顺序）-> 父类型。
    /// 递归调用一律不写缓存，命中结果只记在最初请求的键上。
    fn find_binding(
        &self,
        key: &Key<T>,
        cache_result: bool,
        depth: usize,
    ) -> DependencyResult<Option<BindingRef<T>>> {
        if let Some(found) = self.exact(key) {
            return Ok(Some(found));
        }

        let arg_type = &key.arg_type;
        if arg_type.is_generic() {
            let raw_key = key.with_arg_type(arg_type.raw());
            if let Some(found) = self.exact(&raw_key) {
                trace!("原始类型命中: {} -> {}", key, raw_key);
                self.remember(key, &found, cache_result);
                return Ok(Some(found));
            }
        }

        for interface in arg_type.interfaces() {
            self.check_widening_depth(key, depth)?;
            let interface_key = key.with_arg_type(interface);
            if let Some(found) = self.find_binding(&interface_key, false, depth + 1)? {
                trace!("接口命中: {} -> {}", key, interface_key);
                self.remember(key, &found, cache_result);
                return Ok(Some(found));
            }
        }

        let Some(super_type) = arg_type.super_type() else {
            return Ok(None);
        };
        if super_type == T::no_argument() {
            return Ok(None);
        }

        self.check_widening_depth(key, depth)?;
        let super_key = key.with_arg_type(super_type);
        let found = self.find_binding(&super_key, false, depth + 1)?;
        if let Some(found) = &found {
            trace!("父类型命中: {} -> {}", key, super_key);
            self.remember(key, found, cache_result);
        }
        Ok(found)
    }
}

impl<T: TypeToken> DependencyContainer<T> for Container<T> {
    fn factory_or_none(
        &self,
        key: &Key<T>,
        receiver: Option<Instance>,
    ) -> DependencyResult<Option<Factory>> {
        let child = self.child(key, 0, receiver)?;

        if let Some(binding) = self.find_binding(key, true, 0)? {
            child.check_recursion(key, 0)?;
            return Ok(Some(binding.get_factory(Arc::new(child), key)));
        }

        if let Some(source) = &self.shared.external_source {
            if let Some(factory) = source.get_factory(Arc::new(child.clone()), key) {
                child.check_recursion(key, 0)?;
                debug!("外部来源提供工厂: {}", key);
                return Ok(Some(factory));
            }
        }

        Ok(None)
    }

    fn overridden_factory_or_none(
        &self,
        key: &Key<T>,
        receiver: Option<Instance>,
        override_level: usize,
    ) -> DependencyResult<Option<Factory>> {
        let Some(binding) = self
            .shared
            .bindings
            .overrides_of(key)
            .and_then(|chain| chain.get(override_level))
            .cloned()
        else {
            return Ok(None);
        };

        let level = override_level + 1;
        let child = self.child(key, level, receiver)?;
        child.check_recursion(key, level)?;
        Ok(Some(binding.get_factory(Arc::new(child), key)))
    }

    fn receiver(&self) -> Option<Instance> {
        self.receiver.clone()
    }

    fn current(&self) -> Option<(Key<T>, usize)> {
        self.node
            .as_ref()
            .map(|node| (node.key().clone(), node.override_level()))
    }

    fn describe_bindings(&self) -> String {
        self.shared.bindings.describe()
    }
}

impl<T: TypeToken> fmt::Debug for Container<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.shared.bindings)
            .field("cached", &self.shared.cache.len())
            .field("node", &self.node.as_ref().map(|node| node.display_name()))
            .finish()
    }
}

/// 容器构建器
pub struct ContainerBuilder<T: TypeToken> {
    bindings: BindingsMap<T>,
    config: ContainerConfig,
    external_source: Option<Arc<dyn ExternalSource<T>>>,
}

impl<T: TypeToken> ContainerBuilder<T> {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            bindings: BindingsMap::new(),
            config: ContainerConfig::default(),
            external_source: None,
        }
    }

    /// 设置容器配置
    ///
    /// 配置在这里校验，深度上限为 0 的配置会让任何解析都失败。
    pub fn with_config(mut self, config: ContainerConfig) -> ConfigResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// 设置外部来源
    #[must_use]
    pub fn with_external_source<S>(mut self, source: S) -> Self
    where
        S: ExternalSource<T> + 'static,
    {
        self.external_source = Some(Arc::new(source));
        self
    }

    /// 注册主绑定
    ///
    /// 允许静默替换时，旧的主绑定直接丢弃，不会移入覆盖链。
    pub fn bind(&mut self, key: Key<T>, binding: BindingRef<T>) -> DependencyResult<&mut Self> {
        self.bindings
            .bind(key, binding, self.config.allow_silent_override)?;
        Ok(self)
    }

    /// 注册实例
    pub fn bind_instance<V>(&mut self, key: Key<T>, value: V) -> DependencyResult<&mut Self>
    where
        V: Any + Send + Sync,
    {
        self.bind(key, Arc::new(InstanceBinding::new(value)))
    }

    /// 注册提供者
    pub fn bind_provider<F>(&mut self, key: Key<T>, creator: F) -> DependencyResult<&mut Self>
    where
        F: Fn(&ContainerRef<T>) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        self.bind(key, Arc::new(ProviderBinding::new(creator)))
    }

    /// 注册工厂
    pub fn bind_factory<F>(&mut self, key: Key<T>, creator: F) -> DependencyResult<&mut Self>
    where
        F: Fn(&ContainerRef<T>, Instance) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        self.bind(key, Arc::new(FactoryBinding::new(creator)))
    }

    /// 追加覆盖绑定
    pub fn bind_override(
        &mut self,
        key: Key<T>,
        binding: BindingRef<T>,
    ) -> DependencyResult<&mut Self> {
        self.bindings.bind_override(key, binding)?;
        Ok(self)
    }

    /// 以提供者追加覆盖绑定
    pub fn override_provider<F>(&mut self, key: Key<T>, creator: F) -> DependencyResult<&mut Self>
    where
        F: Fn(&ContainerRef<T>) -> DependencyResult<Instance> + Send + Sync + 'static,
    {
        self.bind_override(key, Arc::new(ProviderBinding::new(creator)))
    }

    /// 构建容器
    pub fn build(self) -> Container<T> {
        debug!(
            "构建容器完成，注册了 {} 个绑定, {} 条覆盖链",
            self.bindings.len(),
            self.bindings.overrides().len()
        );
        Container::from_parts(self.bindings, self.config, self.external_source)
    }
}

impl<T: TypeToken> Default for ContainerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

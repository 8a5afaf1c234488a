//! 依赖解析容器抽象接口
//!
//! 提供解析上下文的核心抽象与容器配置

use crate::factory::{unit_instance, Factory, Instance};
use crate::key::Key;
use bindery_common::{ConfigError, ConfigResult, DependencyError, DependencyResult, TypeToken};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 依赖解析容器 trait
///
/// 每个实例都携带一条祖先链；绑定拿到的上下文即是以当前键为末端的子容器，
/// 工厂被调用时通过它解析的依赖都会参与递归检测。
pub trait DependencyContainer<T: TypeToken>: Send + Sync {
    /// 解析键对应的工厂，未找到时返回 `Ok(None)`
    fn factory_or_none(
        &self,
        key: &Key<T>,
        receiver: Option<Instance>,
    ) -> DependencyResult<Option<Factory>>;

    /// 解析指定覆盖层级的工厂，层级越界时返回 `Ok(None)`
    fn overridden_factory_or_none(
        &self,
        key: &Key<T>,
        receiver: Option<Instance>,
        override_level: usize,
    ) -> DependencyResult<Option<Factory>>;

    /// 当前上下文的接收者
    fn receiver(&self) -> Option<Instance>;

    /// 当前正在解析的键及其覆盖层级
    fn current(&self) -> Option<(Key<T>, usize)>;

    /// 已注册绑定的描述
    fn describe_bindings(&self) -> String;

    /// 解析键对应的工厂
    fn factory(&self, key: &Key<T>, receiver: Option<Instance>) -> DependencyResult<Factory> {
        self.factory_or_none(key, receiver)?
            .ok_or_else(|| DependencyError::NotFound {
                key: key.to_string(),
                registered: self.describe_bindings(),
            })
    }

    /// 解析指定覆盖层级的工厂
    fn overridden_factory(
        &self,
        key: &Key<T>,
        receiver: Option<Instance>,
        override_level: usize,
    ) -> DependencyResult<Factory> {
        self.overridden_factory_or_none(key, receiver, override_level)?
            .ok_or_else(|| DependencyError::OverrideNotFound {
                key: key.to_string(),
                level: override_level,
            })
    }

    /// 解析当前绑定所覆盖的下一层绑定
    fn overridden_factory_of_current(
        &self,
        receiver: Option<Instance>,
    ) -> DependencyResult<Option<Factory>> {
        match self.current() {
            Some((key, level)) => self.overridden_factory_or_none(&key, receiver, level),
            None => Ok(None),
        }
    }

    /// 解析并以 `()` 调用工厂
    fn instance(&self, key: &Key<T>) -> DependencyResult<Instance> {
        let factory = self.factory(key, None)?;
        factory(unit_instance())
    }
}

/// 共享的解析上下文
pub type ContainerRef<T> = Arc<dyn DependencyContainer<T>>;

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 祖先链最大深度
    pub max_resolution_depth: usize,
    /// 类型层级回退的最大深度
    pub max_widening_depth: usize,
    /// 是否缓存回退解析结果
    pub enable_fallback_cache: bool,
    /// 是否允许重复注册静默替换主绑定
    pub allow_silent_override: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_resolution_depth: 100,
            max_widening_depth: 64,
            enable_fallback_cache: true,
            allow_silent_override: false,
        }
    }
}

impl ContainerConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::validation("max_resolution_depth 必须大于 0"));
        }
        if self.max_widening_depth == 0 {
            return Err(ConfigError::validation("max_widening_depth 必须大于 0"));
        }
        Ok(())
    }
}

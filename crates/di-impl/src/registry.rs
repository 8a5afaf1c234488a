//! 绑定表实现
//!
//! 配置阶段构建一次，之后只读。主绑定与覆盖链分开存放：
//! 覆盖链按注册顺序排列，下标 `n` 的覆盖在解析时处于层级 `n + 1`。

use bindery_common::{DependencyError, DependencyResult, TypeToken};
use di_abstractions::{BindingRef, Key};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// 绑定表
pub struct BindingsMap<T: TypeToken> {
    /// 主绑定
    bindings: HashMap<Key<T>, BindingRef<T>>,
    /// 覆盖链
    overrides: HashMap<Key<T>, Vec<BindingRef<T>>>,
}

impl<T: TypeToken> BindingsMap<T> {
    /// 创建空绑定表
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            overrides: HashMap::new(),
        }
    }

    /// 注册主绑定
    ///
    /// 键已存在时，仅在 `allow_silent_override` 为真时替换，否则返回注册错误。
    /// 被替换的旧绑定直接丢弃，不会进入覆盖链。
    pub fn bind(
        &mut self,
        key: Key<T>,
        binding: BindingRef<T>,
        allow_silent_override: bool,
    ) -> DependencyResult<()> {
        if self.bindings.contains_key(&key) {
            if !allow_silent_override {
                return Err(DependencyError::registration(
                    key.to_string(),
                    "绑定已存在，覆盖请使用 bind_override",
                ));
            }
            warn!("静默替换主绑定: {}", key);
        }

        debug!("注册绑定: {} ({})", key, binding.description());
        self.bindings.insert(key, binding);
        Ok(())
    }

    /// 追加覆盖绑定
    pub fn bind_override(&mut self, key: Key<T>, binding: BindingRef<T>) -> DependencyResult<()> {
        if !self.bindings.contains_key(&key) {
            return Err(DependencyError::registration(
                key.to_string(),
                "覆盖绑定必须对应已有的主绑定",
            ));
        }

        let chain = self.overrides.entry(key).or_default();
        chain.push(binding);
        debug!("注册覆盖绑定, 覆盖链长度: {}", chain.len());
        Ok(())
    }

    /// 精确查找主绑定
    pub fn get(&self, key: &Key<T>) -> Option<&BindingRef<T>> {
        self.bindings.get(key)
    }

    /// 键的覆盖链
    pub fn overrides_of(&self, key: &Key<T>) -> Option<&[BindingRef<T>]> {
        self.overrides.get(key).map(Vec::as_slice)
    }

    /// 所有主绑定
    pub fn bindings(&self) -> &HashMap<Key<T>, BindingRef<T>> {
        &self.bindings
    }

    /// 所有覆盖链
    pub fn overrides(&self) -> &HashMap<Key<T>, Vec<BindingRef<T>>> {
        &self.overrides
    }

    /// 主绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 按键排序的绑定描述，每行一个绑定
    pub fn describe(&self) -> String {
        if self.bindings.is_empty() {
            return "    (无)".to_string();
        }

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|(key, binding)| {
                let mut line = format!("    {key} with {}", binding.description());
                if let Some(chain) = self.overrides.get(key) {
                    let names: Vec<&str> = chain.iter().map(|b| b.description()).collect();
                    line.push_str(&format!(", overrides: [{}]", names.join(", ")));
                }
                line
            })
            .collect();
        lines.sort();
        lines.join("\n")
    }
}

impl<T: TypeToken> Default for BindingsMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TypeToken> fmt::Debug for BindingsMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingsMap")
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

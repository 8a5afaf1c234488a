//! 绑定键定义

use bindery_common::TypeToken;
use std::fmt;

/// 绑定目标：可选标签 + 结果类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bind<T: TypeToken> {
    /// 标签
    pub tag: Option<String>,
    /// 结果类型
    pub result_type: T,
}

impl<T: TypeToken> Bind<T> {
    /// 创建无标签的绑定目标
    pub fn new(result_type: T) -> Self {
        Self {
            tag: None,
            result_type,
        }
    }

    /// 设置标签
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl<T: TypeToken> fmt::Display for Bind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "bind<{}>(tag = \"{tag}\")", self.result_type),
            None => write!(f, "bind<{}>()", self.result_type),
        }
    }
}

/// 绑定键
///
/// 标识 "由参数类型 A 产出结果类型 R 的绑定"。两个键相等当且仅当
/// 绑定目标与参数类型都相等。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key<T: TypeToken> {
    /// 绑定目标
    pub bind: Bind<T>,
    /// 参数类型
    pub arg_type: T,
}

impl<T: TypeToken> Key<T> {
    /// 创建绑定键
    pub fn new(bind: Bind<T>, arg_type: T) -> Self {
        Self { bind, arg_type }
    }

    /// 创建无参数的绑定键
    pub fn of(result_type: T) -> Self {
        Self::new(Bind::new(result_type), T::no_argument())
    }

    /// 创建带标签、无参数的绑定键
    pub fn tagged(result_type: T, tag: impl Into<String>) -> Self {
        Self::new(Bind::new(result_type).with_tag(tag), T::no_argument())
    }

    /// 替换参数类型，绑定目标保持不变
    #[must_use]
    pub fn with_arg_type(&self, arg_type: T) -> Self {
        Self {
            bind: self.bind.clone(),
            arg_type,
        }
    }

    /// 是否接受参数
    pub fn has_argument(&self) -> bool {
        self.arg_type != T::no_argument()
    }
}

impl<T: TypeToken> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_argument() {
            return fmt::Display::fmt(&self.bind, f);
        }
        match &self.bind.tag {
            Some(tag) => write!(
                f,
                "bind<{}>(tag = \"{tag}\", arg = {})",
                self.bind.result_type, self.arg_type
            ),
            None => write!(f, "bind<{}>(arg = {})", self.bind.result_type, self.arg_type),
        }
    }
}

//! 类型标识定义
//!
//! 解析引擎只通过 [`TypeToken`] 观察类型：相等性、哈希，以及原始形式、
//! 直接接口、直接父类型三种层级查询。[`TypeDescriptor`] 是基于名称的参考实现，
//! 由调用方显式声明层级关系。

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// 不透明的类型标识
///
/// 实现必须满足：
/// - 相等的标识哈希值相等
/// - [`TypeToken::interfaces`] 在一次运行内顺序稳定
/// - 沿 [`TypeToken::super_type`] 的链最终终止于 `None` 或 [`TypeToken::no_argument`]
pub trait TypeToken: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// 是否为参数化（泛型）类型
    fn is_generic(&self) -> bool;

    /// 去掉类型参数后的原始形式
    fn raw(&self) -> Self;

    /// 直接声明实现的接口，按声明顺序
    fn interfaces(&self) -> Vec<Self>;

    /// 直接父类型
    fn super_type(&self) -> Option<Self>;

    /// 表示 "无参数类型" 的哨兵值
    fn no_argument() -> Self;
}

#[derive(Debug, Clone)]
struct TypeDeclaration {
    name: String,
    interfaces: Vec<TypeDescriptor>,
    super_type: Option<TypeDescriptor>,
}

/// 类型描述符
///
/// 标识由 (名称, 类型参数) 决定；接口与父类型属于声明本身，
/// 参数化后的描述符与其原始形式共享同一份声明。
#[derive(Clone)]
pub struct TypeDescriptor {
    decl: Arc<TypeDeclaration>,
    args: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// 创建没有层级关系的类型
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            decl: Arc::new(TypeDeclaration {
                name: name.into(),
                interfaces: Vec::new(),
                super_type: None,
            }),
            args: Vec::new(),
        }
    }

    /// 从 Rust 类型获取描述符（不包含模块路径）
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        Self::named(base.rsplit("::").next().unwrap_or(base))
    }

    /// 无参数哨兵类型
    pub fn unit() -> Self {
        Self::named("()")
    }

    /// 添加直接接口
    #[must_use]
    pub fn with_interface(mut self, interface: TypeDescriptor) -> Self {
        Arc::make_mut(&mut self.decl).interfaces.push(interface);
        self
    }

    /// 设置直接父类型
    #[must_use]
    pub fn with_super(mut self, super_type: TypeDescriptor) -> Self {
        Arc::make_mut(&mut self.decl).super_type = Some(super_type);
        self
    }

    /// 以给定的类型参数实例化
    #[must_use]
    pub fn parameterized(&self, args: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self {
            decl: Arc::clone(&self.decl),
            args: args.into_iter().collect(),
        }
    }

    /// 类型名称（不含类型参数）
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    /// 类型参数
    pub fn args(&self) -> &[TypeDescriptor] {
        &self.args
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.decl.name == other.decl.name && self.args == other.args
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.decl.name.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decl.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (index, arg) in self.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}

impl TypeToken for TypeDescriptor {
    fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    fn raw(&self) -> Self {
        Self {
            decl: Arc::clone(&self.decl),
            args: Vec::new(),
        }
    }

    fn interfaces(&self) -> Vec<Self> {
        self.decl.interfaces.clone()
    }

    fn super_type(&self) -> Option<Self> {
        self.decl.super_type.clone()
    }

    fn no_argument() -> Self {
        Self::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Database;

    #[test]
    fn test_identity_ignores_declared_hierarchy() {
        let a = TypeDescriptor::named("Service").with_super(TypeDescriptor::named("Base"));
        let b = TypeDescriptor::named("Service");
        assert_eq!(a, b);
        assert_ne!(a, TypeDescriptor::named("Other"));
    }

    #[test]
    fn test_parameterized_shares_declaration() {
        let collection = TypeDescriptor::named("Collection");
        let list = TypeDescriptor::named("List").with_interface(collection.clone());
        let string_list = list.parameterized([TypeDescriptor::named("String")]);

        assert!(string_list.is_generic());
        assert!(!list.is_generic());
        assert_ne!(string_list, list);
        assert_eq!(string_list.raw(), list);
        assert_eq!(string_list.interfaces(), vec![collection]);
        assert_eq!(string_list.to_string(), "List<String>");
    }

    #[test]
    fn test_of_strips_module_path() {
        assert_eq!(TypeDescriptor::of::<Database>().name(), "Database");
        assert_eq!(TypeDescriptor::of::<Vec<u8>>().name(), "Vec");
    }

    #[test]
    fn test_unit_is_no_argument_sentinel() {
        assert_eq!(TypeDescriptor::no_argument(), TypeDescriptor::unit());
        assert_eq!(TypeDescriptor::unit().to_string(), "()");
        assert!(TypeDescriptor::unit().super_type().is_none());
    }
}

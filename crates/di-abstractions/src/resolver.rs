//! 解析祖先链
//!
//! 每解析一层依赖就分配一个节点，指向发起请求的父节点。节点从不修改，
//! 多个并发解析各自持有独立的链，只在公共前缀上共享结构。

use crate::key::Key;
use bindery_common::{DependencyError, DependencyResult, TypeToken};
use std::sync::Arc;

/// 解析链节点
#[derive(Debug)]
pub struct ResolutionNode<T: TypeToken> {
    key: Key<T>,
    override_level: usize,
    parent: Option<Arc<ResolutionNode<T>>>,
    depth: usize,
}

impl<T: TypeToken> ResolutionNode<T> {
    /// 在父节点之下创建节点，`parent` 为 `None` 时即为根解析
    pub fn new(parent: Option<Arc<Self>>, key: Key<T>, override_level: usize) -> Self {
        let depth = parent.as_ref().map_or(1, |p| p.depth + 1);
        Self {
            key,
            override_level,
            parent,
            depth,
        }
    }

    /// 节点对应的键
    pub fn key(&self) -> &Key<T> {
        &self.key
    }

    /// 覆盖层级，0 表示主绑定
    pub fn override_level(&self) -> usize {
        self.override_level
    }

    /// 父节点
    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// 链长度（根节点为 1）
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 从自身到根的节点序列
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |node| node.parent.as_deref())
    }

    /// 递归检测
    ///
    /// 从父节点向根遍历，若 `(key, override_level)` 已在链上则返回
    /// [`DependencyError::DependencyLoop`]。
    pub fn check_recursion(&self, key: &Key<T>, override_level: usize) -> DependencyResult<()> {
        let Some(parent) = self.parent.as_deref() else {
            return Ok(());
        };

        let looped = parent
            .ancestors()
            .any(|node| node.override_level == override_level && node.key == *key);
        if !looped {
            return Ok(());
        }

        let mut names: Vec<String> = parent.ancestors().map(Self::display_name).collect();
        names.reverse();
        names.push(display_string(key, override_level));

        Err(DependencyError::DependencyLoop {
            tree: render_tree(&names),
        })
    }

    /// 节点的展示名称
    pub fn display_name(&self) -> String {
        display_string(&self.key, self.override_level)
    }
}

fn display_string<T: TypeToken>(key: &Key<T>, override_level: usize) -> String {
    if override_level == 0 {
        key.to_string()
    } else {
        format!("overridden {key}")
    }
}

/// 以 ASCII 树渲染依赖链，首项为根
fn render_tree(names: &[String]) -> String {
    let mut out = String::new();
    for (index, name) in names.iter().enumerate() {
        match index {
            0 => out.push_str("     "),
            1 => out.push_str("    ╔╩>"),
            _ => {
                out.push_str("    ║");
                out.push_str(&"  ".repeat(index - 1));
                out.push_str("╚>");
            }
        }
        out.push_str(name);
        out.push('\n');
    }
    out.push_str("    ╚");
    out.push_str(&"══".repeat(names.len().saturating_sub(1)));
    out.push('╝');
    out
}

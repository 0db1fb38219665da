//! ICSGen Core Library
//!
//! This library provides the RFC 5545 serialization engine: an ordered
//! property model, content line folding, the component tree contract and
//! the renderer, plus the concrete calendar components built on top of it.

/// 组件契约
pub mod component;
/// 具体的日历组件
pub mod components;
/// 日期时间格式化
pub mod datetime;
/// 从选项构建组件树
pub mod document;
/// 错误类型
pub mod error;
/// 值转义
pub mod escape;
/// 内容行折叠
pub mod fold;
/// 属性与属性包
pub mod property;
/// 重复规则
pub mod recurrence;
/// 渲染器
pub mod render;
/// 配置选项
pub mod types;

// Re-export core types and error handling
pub use error::{Error, Result};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{
        component::*, components::*, datetime::*, escape::*, fold::*, property::*, recurrence::*,
        render::*, types::*,
    };
}

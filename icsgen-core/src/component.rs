//! The component contract shared by every calendar component.

use std::{fmt, ops::Deref};

use crate::{property::PropertyBag, render::Renderer};

/// 日历组件
///
/// 每个组件渲染为一对 `BEGIN:<TYPE>` / `END:<TYPE>`，其间依次是属性行和子组件。
/// 属性包在每次渲染时由 [`Component::build_properties`] 根据当前字段重新生成，
/// 组件本身不缓存任何渲染结果。
pub trait Component: fmt::Debug + Send + Sync {
    /// 组件类型，例如 `VEVENT`
    fn component_type(&self) -> &str;

    /// 根据当前字段生成属性包
    fn build_properties(&self) -> PropertyBag;

    /// 按输出顺序返回子组件，包括由字段派生的子组件
    fn children(&self) -> Vec<Child<'_>> {
        Vec::new()
    }

    /// 使用默认渲染器渲染整棵子树
    fn render(&self) -> String
    where
        Self: Sized,
    {
        Renderer::default().render(self)
    }
}

/// 子组件：显式添加的借用，或渲染时派生出的新组件
pub enum Child<'a> {
    /// 显式添加、由父组件持有的子组件
    Borrowed(&'a dyn Component),
    /// 渲染时由字段派生的子组件
    Derived(Box<dyn Component + 'a>),
}

impl<'a> Child<'a> {
    /// 包装一个渲染时派生的组件
    pub fn derived(component: impl Component + 'a) -> Self {
        Self::Derived(Box::new(component))
    }
}

impl<'a> Deref for Child<'a> {
    type Target = dyn Component + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(component) => *component,
            Self::Derived(component) => component.as_ref(),
        }
    }
}

impl fmt::Debug for Child<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borrowed(component) => f.debug_tuple("Borrowed").field(component).finish(),
            Self::Derived(component) => f.debug_tuple("Derived").field(component).finish(),
        }
    }
}

use crate::{component::Component, fold::LineFolder};

/// iCalendar 渲染器
///
/// 以深度优先、先序的方式遍历组件树，每个组件依次输出
/// `BEGIN`、属性行、子组件、`END`，每一行都单独折叠。
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    folder: LineFolder,
}

impl Renderer {
    /// 使用指定的折叠器
    pub const fn new(folder: LineFolder) -> Self {
        Self { folder }
    }

    /// 使用的折叠器
    pub const fn folder(&self) -> &LineFolder {
        &self.folder
    }

    /// 渲染组件树
    pub fn render(&self, component: &dyn Component) -> String {
        let mut output = String::new();
        self.write_component(component, &mut output, 0);

        tracing::debug!(
            component = component.component_type(),
            bytes = output.len(),
            "rendered calendar document"
        );

        output
    }

    /// 渲染单个组件的全部逻辑行（未折叠），用于调试
    pub fn logical_lines(&self, component: &dyn Component) -> Vec<String> {
        let mut lines = vec![format!("BEGIN:{}", component.component_type())];
        lines.extend(component.build_properties().render());
        for child in component.children() {
            lines.extend(self.logical_lines(&*child));
        }
        lines.push(format!("END:{}", component.component_type()));
        lines
    }

    fn write_component(&self, component: &dyn Component, output: &mut String, depth: usize) {
        let component_type = component.component_type();
        let properties = component.build_properties();

        tracing::trace!(
            component = component_type,
            depth,
            properties = properties.len(),
            "rendering component"
        );

        self.folder
            .fold_into(&format!("BEGIN:{component_type}"), output);

        for property in properties.iter() {
            self.folder.fold_into(&property.to_line(), output);
        }

        for child in component.children() {
            self.write_component(&*child, output, depth + 1);
        }

        self.folder.fold_into(&format!("END:{component_type}"), output);
    }
}

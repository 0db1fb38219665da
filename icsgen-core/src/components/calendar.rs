use std::fmt;

use crate::{
    Error, Result,
    component::{Child, Component},
    property::{Property, PropertyBag, PropertyValue},
};

use super::{Event, Timezone, non_empty};

/// 日历自身输出的属性，不能作为自定义属性添加
const RESERVED_PROPERTIES: &[&str] = &[
    "VERSION",
    "PRODID",
    "METHOD",
    "CALSCALE",
    "X-WR-CALNAME",
    "X-WR-CALDESC",
    "X-WR-TIMEZONE",
];

/// 日历组件 (VCALENDAR)
///
/// 总是输出 `VERSION` 和 `PRODID`，其余字段仅在设置后输出。
/// 设置时区后，渲染时会派生出对应的 [`Timezone`] 子组件，追加在显式添加的子组件之后；
/// 派生的子组件不会写回组件列表，因此多次渲染结果一致。
#[derive(Debug)]
pub struct Calendar {
    prod_id: String,
    method: Option<String>,
    name: Option<String>,
    description: Option<String>,
    timezone: Option<String>,
    calendar_scale: Option<String>,
    custom: Vec<Property>,
    components: Vec<Box<dyn Component>>,
}

impl Calendar {
    /// 发布日历，核心库对 METHOD 取值不做限制
    pub const METHOD_PUBLISH: &'static str = "PUBLISH";
    /// 请求
    pub const METHOD_REQUEST: &'static str = "REQUEST";
    /// 答复
    pub const METHOD_REPLY: &'static str = "REPLY";
    /// 追加实例
    pub const METHOD_ADD: &'static str = "ADD";
    /// 取消
    pub const METHOD_CANCEL: &'static str = "CANCEL";
    /// 请求刷新
    pub const METHOD_REFRESH: &'static str = "REFRESH";
    /// 反提议
    pub const METHOD_COUNTER: &'static str = "COUNTER";
    /// 拒绝反提议
    pub const METHOD_DECLINECOUNTER: &'static str = "DECLINECOUNTER";

    /// 公历 (CALSCALE)
    pub const CALSCALE_GREGORIAN: &'static str = "GREGORIAN";

    /// 创建日历，`prod_id` 为空时返回 [`Error::InvalidArgument`]
    pub fn new(prod_id: impl Into<String>) -> Result<Self> {
        let prod_id = prod_id.into();
        if prod_id.is_empty() {
            return Err(Error::InvalidArgument("PRODID cannot be empty".to_string()));
        }

        Ok(Self {
            prod_id,
            method: None,
            name: None,
            description: None,
            timezone: None,
            calendar_scale: None,
            custom: Vec::new(),
            components: Vec::new(),
        })
    }

    /// 产品标识
    pub fn prod_id(&self) -> &str {
        &self.prod_id
    }

    /// 设置方法，空字符串表示清除
    pub fn set_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.method = non_empty(method);
        self
    }

    /// 设置日历名称 (X-WR-CALNAME)
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = non_empty(name);
        self
    }

    /// 设置日历描述 (X-WR-CALDESC)
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = non_empty(description);
        self
    }

    /// 设置时区 (X-WR-TIMEZONE)，渲染时派生出VTIMEZONE子组件
    pub fn set_timezone(&mut self, timezone: impl Into<String>) -> &mut Self {
        self.timezone = non_empty(timezone);
        self
    }

    /// 设置历法 (CALSCALE)
    pub fn set_calendar_scale(&mut self, calendar_scale: impl Into<String>) -> &mut Self {
        self.calendar_scale = non_empty(calendar_scale);
        self
    }

    /// 时区标识
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    /// 添加自定义属性 (通常是 `X-` 属性)
    ///
    /// 名称非法或与日历自身输出的属性同名 (如 `PRODID`) 时返回 [`Error::InvalidProperty`]
    pub fn add_property(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<&mut Self> {
        self.custom
            .push(Property::custom(name, value, RESERVED_PROPERTIES)?);
        Ok(self)
    }

    /// 添加子组件，按添加顺序输出
    pub fn add_component(&mut self, component: impl Component + 'static) -> &mut Self {
        self.components.push(Box::new(component));
        self
    }

    /// 添加事件
    pub fn add_event(&mut self, event: Event) -> &mut Self {
        self.add_component(event)
    }

    /// 显式添加的子组件
    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    /// 由 `timezone` 字段派生的时区组件；已显式添加相同TZID的VTIMEZONE时不再派生
    fn derived_timezone(&self) -> Option<Timezone> {
        let tzid = self.timezone.as_deref()?;

        let explicit = self.components.iter().any(|component| {
            component.component_type().eq_ignore_ascii_case("VTIMEZONE")
                && component
                    .build_properties()
                    .get("TZID")
                    .is_some_and(|property| property.value().as_plain() == tzid)
        });

        if explicit {
            tracing::debug!(tzid, "explicit VTIMEZONE present, skipping derived timezone");
            return None;
        }

        Some(Timezone::from_tzid(tzid.to_string()))
    }
}

impl Component for Calendar {
    fn component_type(&self) -> &str {
        "VCALENDAR"
    }

    fn build_properties(&self) -> PropertyBag {
        let mut properties = PropertyBag::new();
        properties
            .put("VERSION", PropertyValue::Raw("2.0".to_string()))
            .put("PRODID", self.prod_id.as_str());

        if let Some(ref method) = self.method {
            properties.put("METHOD", method.as_str());
        }

        if let Some(ref calendar_scale) = self.calendar_scale {
            properties.put("CALSCALE", calendar_scale.as_str());
        }

        if let Some(ref name) = self.name {
            properties.put("X-WR-CALNAME", name.as_str());
        }

        if let Some(ref description) = self.description {
            properties.put("X-WR-CALDESC", description.as_str());
        }

        if let Some(ref timezone) = self.timezone {
            properties.put("X-WR-TIMEZONE", timezone.as_str());
        }

        properties.extend(self.custom.iter().cloned());
        properties
    }

    fn children(&self) -> Vec<Child<'_>> {
        let mut children: Vec<Child<'_>> = self
            .components
            .iter()
            .map(|component| Child::Borrowed(component.as_ref()))
            .collect();

        if let Some(timezone) = self.derived_timezone() {
            children.push(Child::derived(timezone));
        }

        children
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

//! Properties, parameters and the ordered property bag.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    Error, Result,
    escape::{escape_line_breaks, escape_param_value, escape_text},
};

/// 属性名和参数名：iana-token 或 x-name
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("valid name pattern"));

fn validate_name(kind: &str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::InvalidProperty(format!("{kind} name cannot be empty")));
    }
    if !NAME_PATTERN.is_match(name) {
        return Err(Error::InvalidProperty(format!(
            "{kind} name '{name}' contains characters outside A-Z, 0-9 and '-'"
        )));
    }
    Ok(name.to_ascii_uppercase())
}

/// 属性值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// 需要转义的文本
    Text(String),
    /// 文本列表，逐项转义后以逗号连接 (如 CATEGORIES)
    TextList(Vec<String>),
    /// 已格式化好的值，原样输出 (日期、RRULE、GEO、URI)
    Raw(String),
    /// 已格式化好的值列表，以逗号连接
    RawList(Vec<String>),
}

impl PropertyValue {
    /// 编码为内容行中的值部分
    pub fn encode(&self) -> String {
        match self {
            Self::Text(text) => escape_text(text),
            Self::TextList(items) => items
                .iter()
                .map(|item| escape_text(item))
                .collect::<Vec<_>>()
                .join(","),
            Self::Raw(raw) => escape_line_breaks(raw),
            Self::RawList(items) => escape_line_breaks(&items.join(",")),
        }
    }

    /// 未编码的文本形式，列表以逗号连接
    pub fn as_plain(&self) -> String {
        match self {
            Self::Text(value) | Self::Raw(value) => value.clone(),
            Self::TextList(items) | Self::RawList(items) => items.join(","),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(values: Vec<String>) -> Self {
        Self::TextList(values)
    }
}

/// 有序的属性参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    /// 创建空参数表
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置参数，同名参数就地替换
    pub fn insert(&mut self, name: &str, value: impl Into<String>) -> Result<&mut Self> {
        let name = validate_name("Parameter", name)?;
        self.put(name, value.into());
        Ok(self)
    }

    /// 内置参数名，不做校验
    pub(crate) fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        debug_assert!(NAME_PATTERN.is_match(name));
        self.put(name.to_string(), value.into());
        self
    }

    fn put(&mut self, name: String, value: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// 按名称取参数值，不区分大小写
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// 是否没有任何参数
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按插入顺序遍历 (名称, 值)
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    fn encode_into(&self, line: &mut String) {
        for (name, value) in &self.entries {
            line.push(';');
            line.push_str(name);
            line.push('=');
            line.push_str(&escape_param_value(value));
        }
    }
}

/// 单个属性：名称、值与参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    value: PropertyValue,
    params: Parameters,
}

impl Property {
    /// 创建属性，名称为空或包含非法字符时返回 [`Error::InvalidProperty`]
    pub fn new(name: &str, value: impl Into<PropertyValue>) -> Result<Self> {
        Self::with_params(name, value, Parameters::new())
    }

    /// 创建带参数的属性
    pub fn with_params(
        name: &str,
        value: impl Into<PropertyValue>,
        params: Parameters,
    ) -> Result<Self> {
        Ok(Self {
            name: validate_name("Property", name)?,
            value: value.into(),
            params,
        })
    }

    /// 组件的自定义属性，不能与组件自身输出的属性同名
    pub(crate) fn custom(
        name: &str,
        value: impl Into<PropertyValue>,
        reserved: &[&str],
    ) -> Result<Self> {
        let property = Self::new(name, value)?;
        if reserved.contains(&property.name.as_str()) {
            return Err(Error::InvalidProperty(format!(
                "{} is managed by the component and cannot be added as a custom property",
                property.name
            )));
        }
        Ok(property)
    }

    /// 内置属性名，不做校验
    pub(crate) fn known(
        name: &'static str,
        value: impl Into<PropertyValue>,
        params: Parameters,
    ) -> Self {
        debug_assert!(NAME_PATTERN.is_match(name));
        Self {
            name: name.to_ascii_uppercase(),
            value: value.into(),
            params,
        }
    }

    /// 大写的属性名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 属性值
    pub const fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// 属性参数
    pub const fn params(&self) -> &Parameters {
        &self.params
    }

    /// 渲染为未折叠的内容行 `NAME;PARAM=VAL:VALUE`
    pub fn to_line(&self) -> String {
        let encoded = self.value.encode();
        let mut line = String::with_capacity(self.name.len() + encoded.len() + 1);
        line.push_str(&self.name);
        self.params.encode_into(&mut line);
        line.push(':');
        line.push_str(&encoded);
        line
    }
}

/// 同名属性的一组取值
#[derive(Debug, Clone, PartialEq, Eq)]
struct PropertyEntry {
    name: String,
    values: Vec<Property>,
}

/// 有序属性包
///
/// 不同属性名按首次插入的顺序输出；同名的多个取值按添加顺序各占一行。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: Vec<PropertyEntry>,
}

impl PropertyBag {
    /// 创建空属性包
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置属性，替换已有的同名取值并保留其原有位置
    pub fn set(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<&mut Self> {
        self.set_with_params(name, value, Parameters::new())
    }

    /// 设置带参数的属性，规则同 [`PropertyBag::set`]
    pub fn set_with_params(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
        params: Parameters,
    ) -> Result<&mut Self> {
        let property = Property::with_params(name, value, params)?;
        Ok(self.insert(property))
    }

    /// 为多值属性追加一个取值
    pub fn add(&mut self, name: &str, value: impl Into<PropertyValue>) -> Result<&mut Self> {
        self.add_with_params(name, value, Parameters::new())
    }

    /// 追加带参数的取值，规则同 [`PropertyBag::add`]
    pub fn add_with_params(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
        params: Parameters,
    ) -> Result<&mut Self> {
        let property = Property::with_params(name, value, params)?;
        Ok(self.push(property))
    }

    /// 以已校验的属性替换同名取值
    pub fn insert(&mut self, property: Property) -> &mut Self {
        match self.entry_mut(property.name()) {
            Some(entry) => entry.values = vec![property],
            None => self.entries.push(PropertyEntry {
                name: property.name.clone(),
                values: vec![property],
            }),
        }
        self
    }

    /// 追加一个已校验的属性取值
    pub fn push(&mut self, property: Property) -> &mut Self {
        match self.entry_mut(property.name()) {
            Some(entry) => entry.values.push(property),
            None => self.entries.push(PropertyEntry {
                name: property.name.clone(),
                values: vec![property],
            }),
        }
        self
    }

    pub(crate) fn put(&mut self, name: &'static str, value: impl Into<PropertyValue>) -> &mut Self {
        self.insert(Property::known(name, value, Parameters::new()))
    }

    pub(crate) fn put_with(
        &mut self,
        name: &'static str,
        value: impl Into<PropertyValue>,
        params: Parameters,
    ) -> &mut Self {
        self.insert(Property::known(name, value, params))
    }

    pub(crate) fn append(
        &mut self,
        name: &'static str,
        value: impl Into<PropertyValue>,
        params: Parameters,
    ) -> &mut Self {
        self.push(Property::known(name, value, params))
    }

    fn entry_mut(&mut self, name: &str) -> Option<&mut PropertyEntry> {
        self.entries
            .iter_mut()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// 取指定名称的第一个取值
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.get_all(name).first()
    }

    /// 取指定名称的全部取值，不存在时为空
    pub fn get_all(&self, name: &str) -> &[Property] {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.values.as_slice())
            .unwrap_or_default()
    }

    /// 是否包含指定名称的属性
    pub fn contains(&self, name: &str) -> bool {
        !self.get_all(name).is_empty()
    }

    /// 不同属性名的数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否没有任何属性
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按输出顺序遍历所有取值
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter().flat_map(|entry| entry.values.iter())
    }

    /// 渲染为未折叠的内容行，每个取值一行
    pub fn render(&self) -> Vec<String> {
        self.iter().map(Property::to_line).collect()
    }
}

impl Extend<Property> for PropertyBag {
    fn extend<I: IntoIterator<Item = Property>>(&mut self, iter: I) {
        for property in iter {
            self.push(property);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_preserves_first_insertion_position() {
        let mut bag = PropertyBag::new();
        bag.set("VERSION", "2.0").unwrap();
        bag.set("PRODID", "-//A//EN").unwrap();
        bag.set("METHOD", "PUBLISH").unwrap();
        bag.set("version", "3.0").unwrap();

        assert_eq!(
            bag.render(),
            vec!["VERSION:3.0", "PRODID:-//A//EN", "METHOD:PUBLISH"]
        );
    }

    #[test]
    fn set_replaces_all_previous_values() {
        let mut bag = PropertyBag::new();
        bag.add("ATTENDEE", PropertyValue::Raw("mailto:a@x".into()))
            .unwrap()
            .add("ATTENDEE", PropertyValue::Raw("mailto:b@x".into()))
            .unwrap();
        bag.set("ATTENDEE", PropertyValue::Raw("mailto:c@x".into()))
            .unwrap();

        assert_eq!(bag.render(), vec!["ATTENDEE:mailto:c@x"]);
    }

    #[test]
    fn add_groups_values_under_first_position() {
        let mut bag = PropertyBag::new();
        bag.add("CATEGORIES", "Work").unwrap();
        bag.set("SUMMARY", "Meeting").unwrap();
        bag.add("categories", "Urgent").unwrap();

        assert_eq!(
            bag.render(),
            vec!["CATEGORIES:Work", "CATEGORIES:Urgent", "SUMMARY:Meeting"]
        );
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get_all("CATEGORIES").len(), 2);
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut bag = PropertyBag::new();
        let err = bag.set("", "value").unwrap_err();
        assert!(matches!(err, Error::InvalidProperty(_)));
        assert!(bag.is_empty());
    }

    #[test]
    fn malformed_name_is_rejected() {
        for name in ["X WR", "NAME:", "A;B", "名称"] {
            assert!(
                matches!(Property::new(name, "v"), Err(Error::InvalidProperty(_))),
                "{name}"
            );
        }
    }

    #[test]
    fn names_are_upper_cased() {
        let property = Property::new("x-custom-prop", "v").unwrap();
        assert_eq!(property.name(), "X-CUSTOM-PROP");
    }

    #[test]
    fn text_values_are_escaped() {
        let mut bag = PropertyBag::new();
        bag.set("DESCRIPTION", "a, b; c\\d\nnext").unwrap();

        assert_eq!(bag.render(), vec!["DESCRIPTION:a\\, b\\; c\\\\d\\nnext"]);
    }

    #[test]
    fn raw_values_are_not_escaped() {
        let mut bag = PropertyBag::new();
        bag.set("GEO", PropertyValue::Raw("29.5;106.6".into()))
            .unwrap()
            .set(
                "EXDATE",
                PropertyValue::RawList(vec!["20240101T000000Z".into(), "20240108T000000Z".into()]),
            )
            .unwrap();

        assert_eq!(
            bag.render(),
            vec!["GEO:29.5;106.6", "EXDATE:20240101T000000Z,20240108T000000Z"]
        );
    }

    #[test]
    fn raw_values_cannot_break_content_lines() {
        let mut bag = PropertyBag::new();
        bag.set("URL", PropertyValue::Raw("http://x\ny".into()))
            .unwrap()
            .set("STATUS", PropertyValue::Raw("CONFIRMED\r\nX-EVIL:1".into()))
            .unwrap()
            .set(
                "EXDATE",
                PropertyValue::RawList(vec!["20240101T000000Z\r".into(), "x".into()]),
            )
            .unwrap();

        assert_eq!(
            bag.render(),
            vec![
                "URL:http://x\\ny",
                "STATUS:CONFIRMED\\nX-EVIL:1",
                "EXDATE:20240101T000000Z\\n,x"
            ]
        );
    }

    #[test]
    fn custom_rejects_reserved_names() {
        let reserved = ["VERSION", "PRODID"];
        assert!(matches!(
            Property::custom("prodid", "-//Other//EN", &reserved),
            Err(Error::InvalidProperty(_))
        ));
        assert_eq!(
            Property::custom("x-wr-relcalid", "abc", &reserved)
                .unwrap()
                .name(),
            "X-WR-RELCALID"
        );
    }

    #[test]
    fn text_list_escapes_each_item() {
        let value = PropertyValue::TextList(vec!["a,b".into(), "c".into()]);
        assert_eq!(value.encode(), "a\\,b,c");
        assert_eq!(value.as_plain(), "a,b,c");
    }

    #[test]
    fn parameters_render_in_order_and_quote() {
        let mut params = Parameters::new();
        params
            .insert("CN", "Doe, Jane")
            .unwrap()
            .insert("ROLE", "REQ-PARTICIPANT")
            .unwrap();

        let mut bag = PropertyBag::new();
        bag.set_with_params(
            "ATTENDEE",
            PropertyValue::Raw("mailto:jane@example.com".into()),
            params,
        )
        .unwrap();

        assert_eq!(
            bag.render(),
            vec!["ATTENDEE;CN=\"Doe, Jane\";ROLE=REQ-PARTICIPANT:mailto:jane@example.com"]
        );
    }

    #[test]
    fn parameter_names_are_validated() {
        let mut params = Parameters::new();
        assert!(matches!(
            params.insert("", "x"),
            Err(Error::InvalidProperty(_))
        ));
        params.insert("tzid", "UTC").unwrap();
        params.insert("TZID", "Asia/Shanghai").unwrap();

        assert_eq!(params.get("tzid"), Some("Asia/Shanghai"));
        assert_eq!(params.iter().count(), 1);
    }

    #[test]
    fn extend_appends_properties() {
        let mut bag = PropertyBag::new();
        bag.extend([
            Property::new("X-A", "1").unwrap(),
            Property::new("X-A", "2").unwrap(),
        ]);

        assert!(bag.contains("x-a"));
        assert_eq!(bag.render(), vec!["X-A:1", "X-A:2"]);
    }
}

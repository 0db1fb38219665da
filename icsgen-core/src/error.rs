use thiserror::Error;

/// 核心库错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 构造组件时必填字段不合法
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 属性名或参数名为空、含非法字符，或与组件内置属性冲突
    #[error("Invalid property: {0}")]
    InvalidProperty(String),

    /// 日历文档JSON解析失败
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// 核心库结果类型
pub type Result<T> = std::result::Result<T, Error>;

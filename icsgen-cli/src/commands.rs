use std::{
    fs,
    io::{self, Write},
};

use anyhow::{Context, Result};
use icsgen_core::prelude::*;

/// 生成日历命令参数
pub struct GenerateParams {
    pub input: Option<String>,
    pub prod_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub timezone: Option<String>,
    pub method: Option<String>,
    pub calendar_scale: Option<String>,
}

/// 读取日历文档，命令行参数覆盖文档中的同名字段
fn load_document(params: GenerateParams) -> Result<CalendarDocument> {
    let mut document = match params.input {
        Some(ref path) => {
            let content =
                fs::read_to_string(path).with_context(|| format!("无法读取日历文档: {path}"))?;
            CalendarDocument::from_json(&content)
                .with_context(|| format!("日历文档格式错误: {path}"))?
        }
        None => CalendarDocument::default(),
    };

    let options = &mut document.calendar;
    if let Some(prod_id) = params.prod_id {
        options.prod_id = prod_id;
    }
    if params.name.is_some() {
        options.name = params.name;
    }
    if params.description.is_some() {
        options.description = params.description;
    }
    if params.timezone.is_some() {
        options.timezone = params.timezone;
    }
    if params.method.is_some() {
        options.method = params.method;
    }
    if params.calendar_scale.is_some() {
        options.calendar_scale = params.calendar_scale;
    }

    Ok(document)
}

/// 生成日历命令
pub fn generate_command(params: GenerateParams) -> Result<()> {
    let document = load_document(params)?;

    tracing::info!(
        "开始生成日历: prodid={}, 事件数={}",
        document.calendar.prod_id,
        document.events.len()
    );

    let calendar = document.build().context("构建日历失败")?;
    let content = calendar.render();

    io::stdout().lock().write_all(content.as_bytes())?;
    tracing::info!("✓ 已输出 {} 字节", content.len());

    Ok(())
}

/// 折叠内容行命令
pub fn fold_command(line: &str, max_octets: usize) -> Result<()> {
    let folder = LineFolder::with_max_octets(max_octets);
    let physical = folder.fold(line);

    println!("逻辑行: {} 字节, 折叠为 {} 行", line.len(), physical.len());
    for (index, physical_line) in physical.iter().enumerate() {
        let body = physical_line.trim_end_matches("\r\n");
        println!("{:>3} | {:>3} | {}", index + 1, body.len(), body);
    }

    Ok(())
}

/// 转义文本命令
pub fn escape_command(text: &str) -> Result<()> {
    println!("{}", escape_text(text));
    Ok(())
}

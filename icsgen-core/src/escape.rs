//! Value escaping for content lines (RFC 5545 §3.3.11, RFC 6868).

/// 转义TEXT类型的属性值
///
/// 反斜杠、逗号、分号前加反斜杠，换行变为 `\n`。CRLF 与单独的 CR 都按换行处理。
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    escaped.push_str("\\n");
                }
            }
            _ => escaped.push(c),
        }
    }

    escaped
}

/// [`escape_text`] 的逆操作
///
/// 未知的转义序列原样保留。
#[must_use]
pub fn unescape_text(text: &str) -> String {
    let mut unescaped = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }

        match chars.next() {
            Some('n' | 'N') => unescaped.push('\n'),
            Some(next @ ('\\' | ',' | ';')) => unescaped.push(next),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }

    unescaped
}

/// 转义参数值
///
/// `^`、`"` 和换行始终使用 RFC 6868 的插入符编码；含有 `:`、`;`、`,`、`"` 或换行的值再加双引号。
#[must_use]
pub fn escape_param_value(value: &str) -> String {
    let quote = needs_quoting(value);
    let mut encoded = String::with_capacity(value.len() + 4);

    if quote {
        encoded.push('"');
    }
    for c in value.chars() {
        match c {
            '^' => encoded.push_str("^^"),
            '"' => encoded.push_str("^'"),
            '\n' => encoded.push_str("^n"),
            '\r' => {}
            _ => encoded.push(c),
        }
    }
    if quote {
        encoded.push('"');
    }
    encoded
}

/// 已格式化的值不做文本转义，只把换行 (CRLF、LF、单独的 CR) 替换为 `\n`，避免破坏内容行
#[must_use]
pub fn escape_line_breaks(value: &str) -> String {
    if !value.contains(['\r', '\n']) {
        return value.to_string();
    }

    let mut escaped = String::with_capacity(value.len() + 4);
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    escaped.push_str("\\n");
                }
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

fn needs_quoting(value: &str) -> bool {
    value
        .chars()
        .any(|c| matches!(c, ':' | ';' | ',' | '"' | '\n' | '\r'))
}

//! Content line folding (RFC 5545 §3.1).

/// 物理行的最大长度（字节数，不含CRLF）
pub const MAX_LINE_OCTETS: usize = 75;

/// 续行之间必须至少能容纳一个四字节字符和前导空格
const MIN_LINE_OCTETS: usize = 5;

const CRLF: &str = "\r\n";

/// 行折叠器
///
/// 把一条逻辑行拆成若干物理行：每行不超过 `max_octets` 字节（续行包含前导空格），
/// 不会在多字节UTF-8字符中间断开，每行以CRLF结尾。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFolder {
    max_octets: usize,
}

impl LineFolder {
    /// 使用默认的75字节上限
    pub const fn new() -> Self {
        Self {
            max_octets: MAX_LINE_OCTETS,
        }
    }

    /// 使用自定义的行长度上限，最小为5字节
    pub fn with_max_octets(max_octets: usize) -> Self {
        Self {
            max_octets: max_octets.max(MIN_LINE_OCTETS),
        }
    }

    /// 每个物理行的字节上限
    pub const fn max_octets(&self) -> usize {
        self.max_octets
    }

    /// 折叠一条逻辑行，返回带CRLF的物理行
    pub fn fold(&self, line: &str) -> Vec<String> {
        self.segments(line)
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                if index == 0 {
                    format!("{segment}{CRLF}")
                } else {
                    format!(" {segment}{CRLF}")
                }
            })
            .collect()
    }

    /// 折叠一条逻辑行并直接追加到输出
    pub fn fold_into(&self, line: &str, out: &mut String) {
        for (index, segment) in self.segments(line).into_iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            out.push_str(segment);
            out.push_str(CRLF);
        }
    }

    fn segments<'a>(&self, line: &'a str) -> Vec<&'a str> {
        if line.len() <= self.max_octets {
            return vec![line];
        }

        let mut segments = Vec::with_capacity(line.len() / (self.max_octets - 1) + 1);
        let mut start = 0;
        let mut budget = self.max_octets;

        for (offset, c) in line.char_indices() {
            if offset + c.len_utf8() - start > budget {
                segments.push(&line[start..offset]);
                start = offset;
                // 续行的前导空格占用一个字节
                budget = self.max_octets - 1;
            }
        }
        segments.push(&line[start..]);

        segments
    }
}

impl Default for LineFolder {
    fn default() -> Self {
        Self::new()
    }
}

/// 使用默认的75字节上限折叠一条逻辑行
#[must_use]
pub fn fold_line(line: &str) -> String {
    let mut folded = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3 + 2);
    LineFolder::new().fold_into(line, &mut folded);
    folded
}

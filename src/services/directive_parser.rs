//! 提交地址解析
//!
//! 从题目文本中找出 "Post your answer to <URL>" 一类的句子，取出 URL。

use once_cell::sync::Lazy;
use regex::Regex;

static DIRECTIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:post|submit|send)\s+(?:your\s+)?answers?\s+to\s+(https?://\S+)")
        .expect("directive regex is valid")
});

/// URL 末尾需要去掉的句子标点
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', '”', '’', '。'];

/// 解析提交地址
///
/// 返回第一个匹配的 URL（去掉末尾标点）；找不到返回 `None`。
pub fn parse_submission_target(content: &str) -> Option<String> {
    DIRECTIVE_RE
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
        .find(|url| !url.ends_with("://"))
        .map(str::to_string)
}

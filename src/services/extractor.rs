//! 题目提取服务 - 业务能力层
//!
//! 把原始页面快照清洗成结构化的题目与选项。纯函数，无副作用，
//! 失败以 [`ExtractError`] 显式返回，由流程层决定如何上报

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ExtractError;
use crate::models::{DomSnapshot, Extraction, OptionItem, Question};

/// 连续空白（textContent 里常见换行和缩进）
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("空白正则为静态字面量"));

/// 题目提取服务
///
/// 职责：
/// - 校验快照（题目缺失 / 选项为空视为失败）
/// - 去掉选项文本里第一处出现的字母子串
/// - 整理空白
/// - 不读页面、不写剪贴板、不关心流程顺序
pub struct Extractor;

impl Extractor {
    /// 创建新的提取服务
    pub fn new() -> Self {
        Self
    }

    /// 从页面快照提取题目与选项
    ///
    /// 选项顺序保持文档顺序。字母子元素缺失得到空字符串字母，不算失败；
    /// 选项元素一个都没匹配到才是 [`ExtractError::MissingOptions`]
    pub fn extract(&self, snapshot: &DomSnapshot) -> Result<Extraction, ExtractError> {
        let title = snapshot
            .title
            .as_deref()
            .map(normalize)
            .filter(|t| !t.is_empty())
            .ok_or(ExtractError::MissingTitle)?;

        if snapshot.options.is_empty() {
            return Err(ExtractError::MissingOptions);
        }

        let options = snapshot
            .options
            .iter()
            .map(|raw| {
                let letter = raw.letter.as_deref().unwrap_or("").trim().to_string();
                // 只去掉第一处出现的字母子串，后续出现原样保留
                let text = if letter.is_empty() {
                    raw.text.clone()
                } else {
                    raw.text.replacen(&letter, "", 1)
                };
                OptionItem {
                    letter,
                    text: normalize(&text),
                }
            })
            .collect();

        Ok(Extraction {
            question: Question { text: title },
            options,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

/// 去首尾空白并把连续空白折叠为单个空格
fn normalize(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawOption;

    fn snapshot(title: Option<&str>, options: Vec<(Option<&str>, &str)>) -> DomSnapshot {
        DomSnapshot {
            title: title.map(|t| t.to_string()),
            options: options
                .into_iter()
                .map(|(letter, text)| RawOption {
                    letter: letter.map(|l| l.to_string()),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_extract_success_keeps_order_and_count() {
        let extractor = Extractor::new();
        let snapshot = snapshot(
            Some("What is 2+2?"),
            vec![(Some("A"), "A4"), (Some("B"), "B5"), (Some("C"), "C22")],
        );

        let extraction = extractor.extract(&snapshot).expect("应提取成功");
        assert_eq!(extraction.question.text, "What is 2+2?");
        assert_eq!(extraction.options.len(), 3);
        assert_eq!(extraction.options[0].text, "4");
        assert_eq!(extraction.options[1].text, "5");
        assert_eq!(extraction.options[2].text, "22");
        assert_eq!(extraction.options[0].letter, "A");
    }

    #[test]
    fn test_extract_missing_title() {
        let extractor = Extractor::new();
        let snapshot = snapshot(None, vec![(Some("A"), "A4")]);
        assert_eq!(
            extractor.extract(&snapshot),
            Err(ExtractError::MissingTitle)
        );
    }

    #[test]
    fn test_extract_blank_title_counts_as_missing() {
        let extractor = Extractor::new();
        let snapshot = snapshot(Some("  \n\t "), vec![(Some("A"), "A4")]);
        assert_eq!(
            extractor.extract(&snapshot),
            Err(ExtractError::MissingTitle)
        );
    }

    #[test]
    fn test_extract_no_options() {
        let extractor = Extractor::new();
        let snapshot = snapshot(Some("题目"), vec![]);
        assert_eq!(
            extractor.extract(&snapshot),
            Err(ExtractError::MissingOptions)
        );
    }

    #[test]
    fn test_letter_removed_first_occurrence_only() {
        // 字母在选项正文中再次出现时，只去掉第一处
        let extractor = Extractor::new();
        let snapshot = snapshot(Some("题目"), vec![(Some("A"), "A maps to A sharp")]);

        let extraction = extractor.extract(&snapshot).expect("应提取成功");
        assert_eq!(extraction.options[0].text, "maps to A sharp");
    }

    #[test]
    fn test_absent_letter_yields_empty_string() {
        let extractor = Extractor::new();
        let snapshot = snapshot(Some("题目"), vec![(None, " 只有正文 ")]);

        let extraction = extractor.extract(&snapshot).expect("应提取成功");
        assert_eq!(extraction.options[0].letter, "");
        assert_eq!(extraction.options[0].text, "只有正文");
    }

    #[test]
    fn test_letter_trimmed_before_removal() {
        // 字母元素 textContent 带空白：去首尾空白后再做子串移除
        let extractor = Extractor::new();
        let snapshot = snapshot(Some("题目"), vec![(Some(" B \n"), "B西红柿")]);

        let extraction = extractor.extract(&snapshot).expect("应提取成功");
        assert_eq!(extraction.options[0].letter, "B");
        assert_eq!(extraction.options[0].text, "西红柿");
    }

    #[test]
    fn test_whitespace_normalized() {
        let extractor = Extractor::new();
        let snapshot = snapshot(
            Some("  第1题\n  下列说法正确的是？  "),
            vec![(Some("A"), "A\n    西 红柿\t是蔬菜  ")],
        );

        let extraction = extractor.extract(&snapshot).expect("应提取成功");
        assert_eq!(extraction.question.text, "第1题 下列说法正确的是？");
        assert_eq!(extraction.options[0].text, "西 红柿 是蔬菜");
    }

    #[test]
    fn test_reinvocable() {
        let extractor = Extractor::new();
        let snapshot = snapshot(Some("题目"), vec![(Some("A"), "A甲")]);

        let first = extractor.extract(&snapshot).expect("第一次提取");
        let second = extractor.extract(&snapshot).expect("第二次提取");
        assert_eq!(first, second);
    }
}

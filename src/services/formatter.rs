//! 剪贴板文本格式化 - 业务能力层
//!
//! 纯函数。输出布局逐字节固定，下游粘贴目标依赖这个格式

use crate::models::{OptionItem, Question};

/// 把题目和选项格式化为剪贴板文本
///
/// 布局（换行敏感）：
///
/// ```text
/// 题目: <题干>
///
/// 选项:
/// A. <文本>
/// B. <文本>
/// ```
///
/// 每个选项行以单个换行结尾，最后一个选项之后没有额外分隔
pub fn format_copy_text(question: &Question, options: &[OptionItem]) -> String {
    let mut text = format!("题目: {}\n\n选项:\n", question.text);

    for option in options {
        text.push_str(&format!("{}. {}\n", option.letter, option.text));
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(letter: &str, text: &str) -> OptionItem {
        OptionItem {
            letter: letter.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_exact_layout() {
        let question = Question {
            text: "What is 2+2?".to_string(),
        };
        let options = vec![option("A", "4"), option("B", "5")];

        assert_eq!(
            format_copy_text(&question, &options),
            "题目: What is 2+2?\n\n选项:\nA. 4\nB. 5\n"
        );
    }

    #[test]
    fn test_deterministic() {
        let question = Question {
            text: "下列哪项正确？".to_string(),
        };
        let options = vec![option("A", "甲"), option("B", "乙")];

        let first = format_copy_text(&question, &options);
        let second = format_copy_text(&question, &options);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_letter_keeps_line_shape() {
        let question = Question {
            text: "题目".to_string(),
        };
        let options = vec![option("", "无字母选项")];

        assert_eq!(
            format_copy_text(&question, &options),
            "题目: 题目\n\n选项:\n. 无字母选项\n"
        );
    }

    #[test]
    fn test_no_trailing_separator() {
        let question = Question {
            text: "题目".to_string(),
        };
        let options = vec![option("A", "甲")];

        let text = format_copy_text(&question, &options);
        assert!(text.ends_with("A. 甲\n"));
        assert!(!text.ends_with("\n\n"));
    }
}

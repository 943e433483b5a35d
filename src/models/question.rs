//! 题目数据模型
//!
//! 一次提取周期内的不可变数据：提取成功后交给格式化器，用完即丢

use serde::Deserialize;

/// 题目
///
/// 由提取器在每个提取周期创建，`text` 保证去除首尾空白且非空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 题干文本
    pub text: String,
}

/// 单个选项
///
/// 顺序 = 选项元素在文档中的顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    /// 选项字母（可能为空字符串，字母元素缺失不算失败）
    pub letter: String,
    /// 选项文本（已去掉第一处出现的字母子串并整理空白）
    pub text: String,
}

/// 提取结果：题目 + 有序选项列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub question: Question,
    pub options: Vec<OptionItem>,
}

/// 页面一次性读取的原始快照
///
/// 由 [`DomReader`](crate::services::DomReader) 通过单次 JS 求值获得，
/// 字段保持页面原样（未裁剪、未整理），由提取器负责清洗
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomSnapshot {
    /// 题目元素的完整 textContent，元素缺失时为 None
    pub title: Option<String>,
    /// 按文档顺序排列的选项元素
    #[serde(default)]
    pub options: Vec<RawOption>,
}

/// 快照中的单个选项元素
#[derive(Debug, Clone, Deserialize)]
pub struct RawOption {
    /// 字母子元素的 textContent，子元素缺失时为 None
    pub letter: Option<String>,
    /// 选项元素的完整 textContent（含字母部分）
    #[serde(default)]
    pub text: String,
}

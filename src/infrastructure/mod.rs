pub mod js_executor;

pub use js_executor::JsExecutor;

/// 页面回调 binding 名称
///
/// 页面注入脚本通过 `window.<名称>('')` 通知 Rust 侧
pub mod bindings {
    /// 下一题按钮被点击（捕获阶段）
    pub const TRIGGER: &str = "__question_copy_trigger";
    /// 题目容器子树出现首批变化
    pub const MUTATION: &str = "__question_copy_mutation";
    /// 页面上的手动复制按钮被点击
    pub const MANUAL: &str = "__question_copy_manual";
}

pub mod clipboard;
pub mod copy_log;
pub mod dom_reader;
pub mod extractor;
pub mod formatter;
pub mod notifier;
pub mod page_ui;

pub use clipboard::ClipboardWriter;
pub use copy_log::CopyLog;
pub use dom_reader::DomReader;
pub use extractor::Extractor;
pub use formatter::format_copy_text;
pub use notifier::{Notifier, NotifyKind};
pub use page_ui::{MessageColor, PageUi};

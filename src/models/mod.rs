pub mod question;

pub use question::{DomSnapshot, Extraction, OptionItem, Question, RawOption};

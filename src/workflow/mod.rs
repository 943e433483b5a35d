pub mod copy_flow;

pub use copy_flow::{CopyFlow, CopyOutcome};

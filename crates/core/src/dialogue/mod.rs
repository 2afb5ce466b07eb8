pub mod flow;
pub mod machine;
pub mod phrases;

pub use flow::{Flow, SessionState};
pub use machine::{decide, Decision};

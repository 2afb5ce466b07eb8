pub mod alexa;
pub mod config;
pub mod dialogue;
pub mod domain;

pub use alexa::request::{ConfirmationStatus, Intent, Request, TurnRequest};
pub use alexa::response::{ResponseBuilder, TurnResponse};
pub use dialogue::flow::{Flow, SessionState};
pub use dialogue::machine::{decide, Decision};
pub use domain::{ItemId, LocationHit};

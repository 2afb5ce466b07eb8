pub mod request;
pub mod response;

pub use request::{ConfirmationStatus, Intent, Request, TurnRequest};
pub use response::{ResponseBuilder, TurnResponse};

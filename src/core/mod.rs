pub mod admission;
pub mod dispatcher;
pub mod handler;
pub mod templates;

pub use crate::domain::model::{EmailMessage, ProspectSubmission, SubmitReply};
pub use crate::domain::ports::{EmailSender, RecordStore};
pub use crate::utils::error::Result;

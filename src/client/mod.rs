// Client side of the contact form: posts the fields and renders a status line.

pub mod form;

pub use form::{ContactForm, FormFields, FormStatus};

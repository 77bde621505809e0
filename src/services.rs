//! Clients for external collaborators. Each is built once in `main` and
//! handed to the handlers through `web::Data`.

pub mod gateway;
pub mod invoice;
pub mod mailer;

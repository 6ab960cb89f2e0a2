//! # ewsclient-soap
//!
//! Builders for the Exchange Web Services requests used to compose and send
//! mail, and a parser for their responses.
//!
//! ## Features
//!
//! - **Drafts**: [`EmailDraft`] builds a `CreateItem` request that saves a
//!   message under Drafts
//! - **Attachments**: [`AttachmentSet`] builds a `CreateAttachment` request
//!   for a saved item
//! - **Sending**: [`send_item_request`] sends a saved item and keeps a copy
//!   in Sent Items
//! - **Autodiscover**: [`autodiscover_request`] for endpoint resolution
//! - **Responses**: [`parse_response`] captures item ids, attachment ids and
//!   send confirmations
//! - **Diagnostics**: every builder keeps an ordered [`Diagnostics`] log
//!
//! Every finalized request is validated against the bundled messages schema
//! before it is handed out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ewsclient_soap::{EmailDraft, Importance};
//!
//! let finalized = EmailDraft::new()
//!     .with_subject("Status")
//!     .with_body("All green.")
//!     .with_to(["Alice <alice@example.com>"])
//!     .with_importance(Importance::High)
//!     .finalize()?;
//!
//! println!("{}", finalized.request);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod attachment;
mod draft;
mod error;
mod item;
mod log;
mod request;
mod response;
pub mod xml;

pub use address::{extract_address, filter_addresses};
pub use attachment::{AttachmentSet, FileAttachment};
pub use draft::{BodyFormat, EmailDraft, Importance, Sensitivity};
pub use error::{Error, Result};
pub use item::ItemId;
pub use log::{Diagnostics, Level, LogEntry};
pub use request::{
    Finalized, RequestKind, SoapRequest, autodiscover_request, envelope, send_item_request,
};
pub use response::{ResponseSummary, Stage, parse_response};

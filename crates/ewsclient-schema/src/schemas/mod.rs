//! Bundled schemas.

mod autodiscover;
mod messages;

pub use autodiscover::{AUTODISCOVER_REQUEST, AUTODISCOVER_RESPONSE};
pub use messages::ENVELOPE;

use crate::rules::AttributeRule;

const BOOLEAN: &[&str] = &["true", "false", "1", "0"];

const fn boolean_attribute(name: &'static str, required: bool) -> AttributeRule {
    AttributeRule {
        name,
        required,
        values: Some(BOOLEAN),
    }
}

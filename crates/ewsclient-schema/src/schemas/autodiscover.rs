//! Outlook autodiscover request and response.

use crate::namespace::{
    AUTODISCOVER_OUTLOOK_RESPONSE as OUTLOOK, AUTODISCOVER_REQUEST as REQ,
    AUTODISCOVER_RESPONSE as RESP,
};
use crate::rules::{ElementRule, Particle, TextRule};

/// Request root.
pub static AUTODISCOVER_REQUEST: ElementRule =
    ElementRule::complex(REQ, "Autodiscover", &REQUEST_ROOT_CHILDREN);
static REQUEST_ROOT_CHILDREN: [Particle; 1] = [Particle::required(&REQUEST)];
static REQUEST: ElementRule = ElementRule::complex(REQ, "Request", &REQUEST_CHILDREN);
static REQUEST_CHILDREN: [Particle; 3] = [
    Particle::required(&EMAIL_ADDRESS),
    Particle::optional(&LEGACY_DN),
    Particle::required(&ACCEPTABLE_RESPONSE_SCHEMA),
];
static EMAIL_ADDRESS: ElementRule = ElementRule::leaf(REQ, "EMailAddress", TextRule::NonEmpty);
static LEGACY_DN: ElementRule = ElementRule::leaf(REQ, "LegacyDN", TextRule::Any);
static ACCEPTABLE_RESPONSE_SCHEMA: ElementRule =
    ElementRule::leaf(REQ, "AcceptableResponseSchema", TextRule::NonEmpty);

/// Response root.
pub static AUTODISCOVER_RESPONSE: ElementRule =
    ElementRule::complex(RESP, "Autodiscover", &RESPONSE_ROOT_CHILDREN);
static RESPONSE_ROOT_CHILDREN: [Particle; 1] = [Particle::choice(&RESPONSES)];
static RESPONSES: [&ElementRule; 2] = [&OUTLOOK_RESPONSE, &ERROR_RESPONSE];

static OUTLOOK_RESPONSE: ElementRule =
    ElementRule::complex(OUTLOOK, "Response", &OUTLOOK_RESPONSE_CHILDREN);
static OUTLOOK_RESPONSE_CHILDREN: [Particle; 2] = [
    Particle::optional(&USER),
    Particle::required(&ACCOUNT),
];
static USER: ElementRule = ElementRule::open(OUTLOOK, "User");
static ACCOUNT: ElementRule = ElementRule::open(OUTLOOK, "Account");

// Servers answer with the generic namespace when they reject the request.
static ERROR_RESPONSE: ElementRule =
    ElementRule::complex(RESP, "Response", &ERROR_RESPONSE_CHILDREN);
static ERROR_RESPONSE_CHILDREN: [Particle; 1] = [Particle::required(&ERROR)];
static ERROR: ElementRule = ElementRule::open(RESP, "Error");

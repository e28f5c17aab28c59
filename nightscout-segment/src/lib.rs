//! Nightscout status-line segment.
//!
//! Fetches the latest continuous glucose monitor reading from a Nightscout
//! site and renders it, with a trend arrow, through a user template.

pub mod env;
pub mod nightscout;

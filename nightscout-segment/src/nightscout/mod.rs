//! Nightscout glucose segment.
//!
//! Polls a Nightscout site's entries API and shows the latest sensor
//! glucose value with a trend arrow, e.g. ` 150→`.
//!
//! Reads are optionally cached per URL so that a status line redrawn on
//! every prompt does not hit the site more than once per cache window.

mod cache;
pub mod config;
mod error;
mod fetch;
mod icons;
mod segment;
mod types;

pub use cache::CachedSource;
pub use config::SegmentConfig;
pub use error::FetchError;
pub use fetch::{LiveSource, ReadingSource, parse_latest};
pub use icons::{TrendIcons, map_symbol};
pub use segment::{NightscoutSegment, RenderContext};
pub use types::{Reading, Trend};

//! Tickr-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;
mod point;
mod range;

pub use config::{BoundaryPolicy, RequestLimits, TickrConfig};
pub use connector::ConnectorKey;
pub use error::TickrError;
pub use point::PricePoint;
pub use range::DateRange;

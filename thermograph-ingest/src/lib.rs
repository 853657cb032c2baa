//! # Thermograph Ingest
//!
//! Turns an XML temperature document into time-series points:
//!
//! ```ignore
//! use thermograph_ingest::{normalize, read_document};
//!
//! let readings = read_document("teploty.xml")?;
//! let points = normalize(&readings)?;
//! ```

pub mod document;
pub mod errors;
pub mod normalizer;

pub use document::{parse_document, read_document};
pub use errors::IngestError;
pub use normalizer::{normalize, normalize_in, normalize_reading};

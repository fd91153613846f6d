//! Tabular transcoding.
//!
//! - Coerce: raw cell -> typed value
//! - Nest: flat row -> nested record
//! - Template: schema -> header line + sample row
//! - Pipeline: CSV -> records -> validation report

pub mod coerce;
pub mod nest;
pub mod pipeline;
pub mod samples;
pub mod template;

pub use coerce::coerce;
pub use nest::to_nested;
pub use pipeline::*;
pub use template::{generate_template, Template};

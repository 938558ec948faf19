//! picobench-core - chip-identification and performance report engine
//!
//! This crate ingests raw SPI NOR flash benchmark samples and a vendor
//! datasheet catalogue, and produces a pivoted performance/identification
//! report. It does **not** drive hardware, SD-card I/O, HTTP serving, or
//! any other concern of the firmware it was extracted from; those are
//! external collaborators supplying its three inputs and consuming its
//! one output.
//!
//! # Example
//!
//! ```
//! use picobench_core::{generate_report, DeviceContext};
//! use std::io::Cursor;
//!
//! let catalogue = "CHIP_MODEL,JEDEC,50MHZ_READ_SPEED\nX,BF2641,5.0\n";
//! let results = "BF2641,read,4096,0x0,800,0\n";
//! let context = DeviceContext {
//!     jedec_norm_observed: Some("BF2641".to_string()),
//!     sck_mhz: 10.0,
//!     capacity_bytes: 2_097_152,
//! };
//! let mut report = Vec::new();
//! generate_report(Cursor::new(results), Cursor::new(catalogue), &context, &mut report).unwrap();
//! assert!(String::from_utf8(report).unwrap().starts_with("title,read,write,erase"));
//! ```

pub mod aggregate;
pub mod catalogue;
mod engine;
pub mod error;
pub mod intersect;
pub mod matcher;
pub mod model;
pub mod predict;
pub mod report;
pub mod scorer;
pub mod stats;

pub use engine::generate_report;
pub use error::{EngineError, Result};
pub use model::{DeviceContext, Operation, SizeGroup};

//! Filter-and-aggregate pipeline for TED procurement exports.
//!
//! The desktop front end lives in the `ted-market-analyzer` binary; this
//! library holds everything that can run without a window.

pub mod config;
pub mod data;

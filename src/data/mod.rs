/// Data layer: archive acquisition, parsing, filtering, aggregation, export.
///
/// Architecture:
/// ```text
///   remote URL / picked file / dropped file
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  acquire ZIP bytes
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  first *.csv entry → TenderTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  country membership, keyword substring
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate  │  │  export   │
///   └───────────┘  └──────────┘
/// ```
///
/// [`pipeline`] strings the stages together and is the only place the UI
/// calls into.

pub mod aggregate;
pub mod countries;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod source;

/// Data layer: selection, upload, and display-ready results.
///
/// Architecture:
/// ```text
///  dropped / picked files
///        │
///        ▼
///   ┌───────────┐
///   │ selection  │  keep *.xyz → Vec<XyzFile>
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  client   │  multipart POST → PcaResponse
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  report   │  timestep labels, colour axis, summary
///   └──────────┘
/// ```

pub mod client;
pub mod model;
pub mod report;
pub mod selection;
pub mod timestep;

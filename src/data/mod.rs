/// Data layer: stage export ingestion, normalisation and aggregation.
///
/// Architecture:
/// ```text
///  Wall-03-Excavation[Phase_3].txt  ...
///        │
///        ▼
///   ┌──────────┐   ┌──────────┐
///   │  loader   │   │  stage    │  file bytes → RawTable, file name → StageMeta
///   └──────────┘   └──────────┘
///        │               │
///        ▼               │
///   ┌──────────┐         │
///   │ transform │  m → mm, |u_x| |u_y| |M| |Q| |N|
///   └──────────┘         │
///        │               │
///        ▼               ▼
///   ┌──────────────────────┐
///   │       assemble        │  StageBatch* → Dataset
///   └──────────────────────┘
///        │              │
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  summary  │   │  profile  │  per-stage maxima / per-stage plot series
///   └──────────┘   └──────────┘
/// ```
/// `pipeline::run` drives the whole chain for one batch of files.

pub mod assemble;
pub mod error;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod profile;
pub mod stage;
pub mod summary;
pub mod transform;

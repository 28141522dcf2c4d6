/// Data layer: sample types and the portrait file reader.
///
/// Architecture:
/// ```text
///   portrait.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  skip `#` lines, fields 1/2 → Sample
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ SampleSet  │  Vec<Sample> in file order, extent
///   └───────────┘
/// ```

pub mod loader;
pub mod model;

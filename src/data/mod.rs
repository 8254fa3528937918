/// Data layer: core types, loading, selection and visual encoding.
///
/// Architecture:
/// ```text
///   samples.json          all_week.geojson / .csv      PB2002_boundaries.json
///        │                        │                            │
///        ▼                        ▼                            ▼
///   ┌──────────────────────────────────────────────────────────────┐
///   │  fetch / loader   fetch or read → parse → immutable snapshot │
///   └──────────────────────────────────────────────────────────────┘
///        │                        │                            │
///        ▼                        ▼                            │
///   ┌──────────┐            ┌──────────┐                       │
///   │  select   │  top-N,    │  encode   │  depth → colour,     │
///   │           │  metadata  │           │  magnitude → radius  │
///   └──────────┘            └──────────┘                       │
///        │                        │                            │
///        ▼                        ▼                            ▼
///   ┌──────────┐              plot layer  ◄─────────── plate polylines
///   │  trace    │  bar / bubble chart descriptions
///   └──────────┘
/// ```

pub mod basemap;
pub mod encode;
pub mod fetch;
pub mod loader;
pub mod model;
pub mod select;
pub mod trace;

//! Data layer: core types, loading, and extraction.
//!
//! Architecture:
//! ```text
//!        .mat
//!          │
//!          ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → MatrixSet
//!   └──────────┘
//!          │
//!          ▼
//!   ┌──────────────┐
//!   │   MatrixSet   │  Vec<NamedArray>, file order
//!   └──────────────┘
//!          │
//!          ▼
//!   ┌──────────┐
//!   │  extract  │  pick g (2×2) and H (3D) → ExtractionResult
//!   └──────────┘
//! ```
//!
//! `writer` goes the other way and produces `.mat` fixtures.

pub mod extract;
pub mod loader;
pub mod model;
pub mod writer;

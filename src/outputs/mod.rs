//! Output generation.
//!
//! # Submodules
//!
//! - [`markdown`]: Renders a [`crate::models::Digest`] and writes it to disk
//!
//! # Output Structure
//!
//! ```text
//! summaries/
//! ├── 2024-03-04.md
//! └── 2024-03-05.md   # one file per run date, overwritten on re-run
//! ```

pub mod markdown;

// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Host-side state mirror for embedded molecular trajectory viewers.
//!
//! Trajview keeps a trajectory and a frame index on the host, encodes the
//! selected frame's coordinates into a transport-safe `{data, type, shape}`
//! object, projects the topology into bond pairs and per-atom colors, and
//! pushes both to a remote observer such as a browser-side renderer.
//!
//! # Key entry points
//!
//! - [`viewer::MolecularViewer`] - the state mirror and its `subscribe` API
//! - [`array`] - raw-bytes base64 array encoding and decoding
//! - [`topology::project_topology`] - bonds and element colors
//! - [`colors::element_color`] - the element color table
//! - [`bridge`] - JSON / script form of updates for a page host
//! - `assets` (feature `assets`) - embedded browser files, install and
//!   require.js configuration
//! - [`options::Options`] - TOML-loadable configuration
//!
//! # Data flow
//!
//! Host mutation (`set_frame`, `set_trajectory`) → recompute the encoded
//! coordinates (and topology, on trajectory change) → notify listeners with
//! one [`viewer::ViewerUpdate`]. Nothing flows back from the observer.

pub mod array;
#[cfg(feature = "assets")]
pub mod assets;
pub mod bridge;
pub mod colors;
pub mod error;
pub mod options;
pub mod topology;
pub mod trajectory;
pub mod viewer;

pub use error::TrajviewError;
pub use viewer::MolecularViewer;

//! # seqprep
//!
//! Prepares recommendation benchmark datasets (Amazon Beauty, Yelp, MovieLens) for sequential
//! recommenders. Raw interactions are filtered down to their k-core, users and items are mapped
//! to consecutive integer ids and every user's chronological sequence is split leave-two-out.
//!
//! ```no_run
//! use seqprep::config::PreprocessConfig;
//! use seqprep::pipeline::{preprocess, Outcome};
//! use seqprep::progress::Silent;
//!
//! let config = PreprocessConfig::new("beauty").data_root("data");
//!
//! if let Outcome::Written { path, summary } = preprocess(&config, &Silent).unwrap() {
//!     println!("{} users, {} items written to {}", summary.num_users, summary.num_items, path.display());
//! }
//! ```

pub mod config;
pub mod datasets;
pub mod error;
pub mod filter;
pub mod io;
pub mod package;
pub mod pipeline;
pub mod progress;
pub mod stats;
pub mod types;


pub use crate::error::{Error, Result};
pub use crate::package::PackagedDataset;
pub use crate::types::{Interaction, InteractionTable};

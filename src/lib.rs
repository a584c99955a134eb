//! # simcore - simulation seed and value utilities
//!
//! Small building blocks a coalescent simulator leans on when callers do not
//! spell everything out.
//!
//! ## Features
//!
//! - **Default random seeds**: [`seed::get_random_seed`] hands out unique
//!   positive seeds from a lazily built, process-wide generator that is never
//!   shared across processes, forked children included.
//! - **Integer checks**: [`integer::isinteger`] decides whether a native
//!   number, string, `ndarray` array or JSON value is a whole number.
//! - **CLI**: `simcore seed` and `simcore check` expose both from a shell.
//!
//! ## Quick Start
//!
//! ```rust
//! use simcore::integer::isinteger;
//! use simcore::seed::{clear_seed_rng, get_random_seed, get_seed_rng};
//!
//! clear_seed_rng();
//! assert!(get_seed_rng().is_none());
//!
//! let seed = get_random_seed();
//! assert!(seed > 0);
//! assert!(get_seed_rng().is_some());
//!
//! assert!(isinteger("100_000"));
//! assert!(!isinteger(&1.1));
//! ```
//!
//! ## Modules
//!
//! - [`seed`] - Process-wide default seed generator
//! - [`integer`] - Integer-likeness classification
//! - [`config`] - Configuration management
//! - [`logging`] - Logging initialization
//! - [`error`] - Error types and reports
//! - [`cli`] - Command-line front end
//!
//! ## Configuration
//!
//! Configuration is read from `~/.simcore/config.json`; every field is
//! optional.
//!
//! ```json
//! {
//!   "log": {
//!     "level": "info",
//!     "format": "json",
//!     "timestampFormat": "rfc3339",
//!     "file": true
//!   },
//!   "seed": { "count": 10, "workers": 2 }
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod integer;
pub mod logging;
pub mod seed;

pub use integer::{is_integer_literal, isinteger, IsInteger};
pub use seed::{clear_seed_rng, get_random_seed, get_seed_rng, SeedRng, SeedSlot};

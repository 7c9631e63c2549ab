//! Data-driven content for the tactical core.
//!
//! Provides loaders for the files a level ships with:
//! - Vision and activation tuning (TOML)
//! - Map layouts (RON tile lists or plain ASCII)
//!
//! Loaded values are plain `tactical-core` types; the core itself never
//! touches the filesystem.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult, MapLoader};

//! Cached, activation-aware vision queries.
//!
//! Visibility is directional: `can_see(a, b)` uses `a`'s range and FOV only,
//! so a long-sighted player can see a short-sighted monster that cannot see
//! back.
mod error;
mod index;

pub use error::VisionError;
pub use index::{VisionIndex, VisionStats};

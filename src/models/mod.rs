//! Data models for the Carrot Console.
//!
//! Field names serialize in camelCase to match the browser console's storage layout.

mod clip;
mod digest;
mod reward;
mod settings;

pub use clip::*;
pub use digest::*;
pub use reward::*;
pub use settings::*;

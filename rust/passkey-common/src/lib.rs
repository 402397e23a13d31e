#![warn(missing_docs)]

//! Light weight helpers shared by the passkey demo crates. Everything in
//! here works on both `wasm32-unknown-unknown` and native targets, so the
//! crates above it can be written (and tested) once.

mod sync;
pub use sync::*;

mod time;
pub use time::*;

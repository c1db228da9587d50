//! File-bytes-in / file-bytes-out for the workbench.
//!
//! - [`mmap::MappedFile`] maps a file read-only so the encoding detector can
//!   scan it before anything is decoded.
//! - [`atomic::write_atomic`] persists a save through a sibling temp file and a
//!   rename, so a failed save never leaves a half-written target behind.
pub mod atomic;
pub mod mmap;

pub use atomic::write_atomic;
pub use mmap::MappedFile;

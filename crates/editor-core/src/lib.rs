//! Pure text algorithms of the workbench.
//!
//! Nothing in this crate holds session state: every function takes the text
//! or bytes it works on and returns a fresh result. The stateful side lives
//! in `editor-state`.
pub mod analyzer;
pub mod bookmarks;
pub mod diff_package;
pub mod encoding;
pub mod errors;
pub mod language;
pub mod lines;
pub mod position;
pub mod transform;

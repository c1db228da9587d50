//! The workbench session: the live buffers of one editing window and the
//! state that hangs off them.
//!
//! - [`session`] owns the mode switch between single and comparison view,
//!   bookmark ownership and decoration recomputes.
//! - [`persistence`] loads file contents into a session and serialises it
//!   back for saving.
//! - [`document`] holds buffer text and applies edit events to it.
pub mod decorations;
pub mod document;
pub mod errors;
pub mod persistence;
pub mod session;

pub use errors::{EditError, SessionError, SessionResult};
pub use persistence::{LoadReport, Prompt, SaveArtifact};
pub use session::{BufferId, Mode, Session};

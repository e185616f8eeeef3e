//! Terminal UI for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal lifecycle, key handling and the event loop.
//! - [`renderer`] and [`layout`]: frame composition, line building and
//!   wrapping.
//! - [`theme`]: styles, including the per-route colors.
//!
//! This layer only presents and captures interaction; [`crate::core`] owns
//! the turn lifecycle and session state.

pub mod chat_loop;
pub mod layout;
pub mod renderer;
pub mod theme;

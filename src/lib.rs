//! OptiRoute Chat is a terminal client for cost-aware LLM routing endpoints.
//!
//! Each prompt becomes an independent turn: the client shows a placeholder
//! while the request is in flight, then renders the answer together with the
//! provider the server routed to, the cost of the call, and its latency. The
//! session keeps a running cost total.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines the `/generate` wire payloads and the HTTP backend.
//! - [`core`] owns runtime state: the transcript, session metrics, turn
//!   bookkeeping, the action reducer, and configuration.
//! - [`ui`] renders the terminal interface and runs the event loop that turns
//!   key presses and turn completions into actions.
//! - [`cli`] parses arguments and dispatches subcommands.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;

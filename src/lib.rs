//! chat-wm: a desktop-style chat window manager for terminal shells.
//!
//! Floating, draggable, resizable windows rendered with ratatui, each
//! hosting one chat session against an OpenAI-style completion endpoint.
//! The binary in `main.rs` wires the pieces together; everything here is
//! usable (and tested) without a live terminal.

pub mod chat;
pub mod components;
pub mod constants;
pub mod event_loop;
pub mod geometry;
pub mod models;
pub mod panel;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub(crate) mod ui;
pub mod window;

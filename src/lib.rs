//! Text-to-image relay - forwards prompts to a hosted inference model
//!
//! The relay accepts a prompt, calls the inference provider with a bearer
//! token, and hands the generated image back as base64. A small client cycle
//! renders the result as an HTML page or as terminal output.

pub mod ai;
pub mod error;
pub mod models;
pub mod relay;
pub mod ui;
pub mod web;

pub use error::{Error, Result};

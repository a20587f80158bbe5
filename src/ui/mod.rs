//! Terminal UI components.
//!
//! The view is a pure function of an [`Application`](crate::app::Application):
//! - [`render`]: Text area with line numbers, selection and cursor
//! - status line: File name, modified marker, cursor position, pending keys
//! - message line: Extended-command prompt or the newest message

mod render;
mod status;

pub use render::{line_number_width, render};

#[cfg(test)]
mod tests;

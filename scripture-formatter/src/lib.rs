#![deny(
    clippy::panic,
    clippy::absolute_paths,
    clippy::print_stderr,
    clippy::print_stdout
)]

//! # Scripture Formatter
//!
//! Rendering of normalized chapters produced by `scripture-parser`:
//!
//! - **HTML fragments**: one fragment per content block, with configurable
//!   class names ([`FragmentRenderer`])
//! - **Plain text**: headings and `N text` verse lines with markup stripped
//!   ([`to_plain_text`])
//!
//! Block text carries markup (reference spans, footnote markers,
//! name spans). Sanitizing it before display stays the host's job.

pub mod html;
pub mod text;

// Re-export main types for convenience
pub use html::{FragmentConfig, FragmentRenderer};
pub use text::{strip_markup, to_plain_text};

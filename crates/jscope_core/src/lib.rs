//! jscope_core: Core utilities for the jscope scope analyzer.
//!
//! Provides text ranges, line/column mapping, string interning, and the
//! hash collections used throughout the analysis pipeline.

pub mod collections;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, SourcePosition, TextRange};

/*!
Backend functions that emit shader text.
!*/

pub mod sksl;

/// Indent for body statements.
pub const INDENT: &str = "  ";

//! Stable exit codes for the retriever CLI.

/// Resolution succeeded.
pub const OK: i32 = 0;
/// Invalid usage/configuration or an I/O failure.
pub const INVALID: i32 = 1;
/// No candidate jar declares an entry class.
pub const ENTRY_POINT_NOT_FOUND: i32 = 2;
/// More than one candidate jar declares an entry class.
pub const AMBIGUOUS_ENTRY_POINT: i32 = 3;
/// The resolved entry class could not be loaded.
pub const ENTRY_CLASS_NOT_FOUND: i32 = 4;

//! Standard exit codes (BSD sysexits.h compatible)

/// Successful termination
pub const OK: i32 = 0;

/// Negative answer to a yes/no query (`is-a` returned false)
pub const NO: i32 = 1;

/// Command line usage error
pub const USAGE: i32 = 64;

/// Data format error (unknown type name)
pub const DATAERR: i32 = 65;

/// Service unavailable (transport failure, non-OK status)
pub const UNAVAILABLE: i32 = 69;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Configuration error
pub const CONFIG: i32 = 78;

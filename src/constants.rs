//! Common constants used throughout plynt.

/// Default opening delimiter of a placeholder
pub const DEFAULT_START: &str = "<<@";

/// Default closing delimiter of a placeholder
pub const DEFAULT_END: &str = "@>>";

/// Opening marker of the optional fallback suffix
pub const DEFAULT_FALLBACK_OPEN: &str = "[(";

/// Closing marker of the optional fallback suffix
pub const DEFAULT_FALLBACK_CLOSE: &str = ")]";

/// Separator between the path and each function call of a chain
pub const CHAIN_SEPARATOR: &str = "->";

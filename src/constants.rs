//! Constants for board geometry, SGF codes and solving defaults.
//!
//! Runtime-tunable values (reply delay, comment keywords) live in
//! [`crate::config::Config`]; the values here are their defaults and the
//! fixed limits of the coordinate spaces.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size used when a record carries no `SZ` property.
pub const DEFAULT_SIZE: usize = 19;

/// Largest board addressable by SGF letter pairs (`a`-`z`, then `A`-`Z`).
pub const MAX_SGF_SIZE: usize = 52;

/// Largest board addressable in display notation (`A`-`Z` without `I`).
pub const MAX_DISPLAY_SIZE: usize = 25;

/// Largest board on which `tt` is read as a pass.
pub const LEGACY_PASS_MAX_SIZE: usize = 19;

/// Legacy FF[3] pass token.
pub const LEGACY_PASS: &str = "tt";

/// Display token for a pass.
pub const PASS_TOKEN: &str = "pass";

// =============================================================================
// SGF Property Identifiers
// =============================================================================

pub const PROP_BLACK: &str = "B";
pub const PROP_WHITE: &str = "W";
pub const PROP_ADD_BLACK: &str = "AB";
pub const PROP_ADD_WHITE: &str = "AW";
pub const PROP_ADD_EMPTY: &str = "AE";
pub const PROP_PLAYER: &str = "PL";
pub const PROP_SIZE: &str = "SZ";
pub const PROP_KOMI: &str = "KM";
pub const PROP_HANDICAP: &str = "HA";
pub const PROP_RULES: &str = "RU";
pub const PROP_BLACK_NAME: &str = "PB";
pub const PROP_WHITE_NAME: &str = "PW";
pub const PROP_COMMENT: &str = "C";

/// "Bad move" marker.
pub const PROP_BAD_MOVE: &str = "BM";

/// "Doubtful" marker, treated like a bad move.
pub const PROP_DOUBTFUL: &str = "DO";

/// "Tesuji" marker, the preferred continuation.
pub const PROP_TESUJI: &str = "TE";

// =============================================================================
// Solving Defaults
// =============================================================================

/// Pause before a scripted reply is shown, in milliseconds.
pub const REPLY_DELAY_MS: u64 = 300;

/// Comment words that mark a node as a wrong line.
pub const WRONG_KEYWORDS: &[&str] = &["wrong", "incorrect", "failure", "fail"];

/// Comment words that mark a node as a solved line.
pub const RIGHT_KEYWORDS: &[&str] = &["correct", "solved", "success"];

//! Constants used throughout the library.
//!
//! Central definitions for wire strings, header names and defaults shared by
//! the transports and the discovery operation.

/// Wire action for discovering users by email.
pub const ACTION_USER_QUERY: &str = "user:query";

/// Wire action for querying users by relation.
pub const ACTION_RELATION_QUERY: &str = "relation:query";

/// Path appended to the configured endpoint by the HTTP transport.
pub const DISCOVERY_PATH: &str = "discovery";

/// Header carrying the application API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Header carrying the session access token of the current user.
pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of operations a queue runs at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Name of the built-in mutual relation.
pub const RELATION_FRIEND: &str = "friend";

/// Name of the built-in directional relation.
pub const RELATION_FOLLOW: &str = "follow";

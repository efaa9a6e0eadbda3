/// Default REST API base URL (overridable with `CLINIC_API_URL`)
pub const DEFAULT_API_URL: &str = "https://virtualhealthassistant.onrender.com/api";

/// HTTP request timeout in seconds
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Storage key holding the session credential
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Authorization header scheme (DRF token authentication)
pub const AUTH_SCHEME: &str = "Token";

/// Query parameter carrying the originally requested path on a login redirect
pub const REDIRECT_QUERY_PARAM: &str = "redirect";

/// Symptom submission defaults
pub const DEFAULT_DURATION_DAYS: u32 = 1;
pub const DEFAULT_SEVERITY: u8 = 2;

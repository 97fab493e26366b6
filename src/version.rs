// Version information for the web search MCP server

/// Server name reported to tool clients
pub const SERVER_NAME: &str = "web-search-mcp-server";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Protocol revision announced during `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "duckduckgo-html",
    "redirect-decoding",
    "selector-fallback",
    "retry-backoff",
    "proxy-support",
    "stdio-transport",
    "http-api",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVER_NAME, VERSION_NUMBER)
}

/// Get full version info for API responses
pub fn get_version_info() -> serde_json::Value {
    serde_json::json!({
        "name": SERVER_NAME,
        "version": VERSION_NUMBER,
        "protocol": PROTOCOL_VERSION,
        "features": FEATURES,
    })
}

use serde::Deserialize;

/// Configuration options specific to the Acervo service.
///
/// Loaded from `config/default.yaml` and overridden by `APP_*` environment
/// variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind the HTTP server to.
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    /// Secret used to sign session cookies and verify identity tokens.
    pub secret: String,
    /// Location of the shared authentication service.
    pub auth_service_url: String,
    /// Cookie domain shared with the authentication service.
    pub domain: String,
}

use serde::Deserialize;

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_media_root() -> String {
    "./media".to_string()
}

/// Configuration options for the Quillpad server, merged from an optional
/// `quillpad.yaml` file and the process environment.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Path to the SQLite database file.
    pub database_url: String,
    /// Address and port the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Secret used to derive the session/flash cookie key. Must be at least
    /// 32 bytes long.
    pub secret_key: String,
    /// Directory uploaded files are written to, served under `/media`.
    #[serde(default = "default_media_root")]
    pub media_root: String,
}

impl ServerConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("quillpad").required(false))
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }
}

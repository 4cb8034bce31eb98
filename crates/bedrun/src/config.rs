use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use bedrun_fetch::{ClientSetting, FetchOptions};
use bedrun_properties::ServerProperties;

pub const DEFAULT_CONFIG_FILE: &str = "launcher.toml";

/// File name of the server binary inside the data directory.
pub const SERVER_BINARY: &str = "bedrock_server";

/// Launcher configuration, layered defaults -> `launcher.toml` ->
/// `BEDRUN_*` environment variables (`__` separates nesting, e.g.
/// `BEDRUN_HTTP__MAX_RETRIES=3`).
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Server version baked into the mirror archive name.
    pub version: String,
    pub port: u16,
    pub data_dir: String,
    /// Archive mirrors, tried strictly in order.
    pub mirrors: Vec<String>,
    /// Overrides the computed `bedrock-server-{version}.zip` name.
    pub archive_name: Option<String>,
    pub cloudflared_url: String,
    pub http: HttpConfig,
    pub server: ServerIdentity,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_base_secs: u64,
    pub user_agent: String,
    /// Anything smaller than this is treated as a corrupt download.
    pub min_archive_bytes: u64,
    /// Optional SHA-256 pin for the server archive.
    pub sha256: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerIdentity {
    pub name: String,
    pub world: String,
    pub max_players: u32,
    pub gamemode: String,
    pub difficulty: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            version: "1.21.44.01".to_string(),
            port: 19132,
            data_dir: "bedrock-data".to_string(),
            mirrors: vec![
                "https://minecraft.azureedge.net/bin-linux/".to_string(),
                "https://www.minecraft.net/bedrockdedicatedserver/bin-linux/".to_string(),
            ],
            archive_name: None,
            cloudflared_url:
                "https://github.com/cloudflare/cloudflared/releases/latest/download/cloudflared-linux-amd64"
                    .to_string(),
            http: HttpConfig::default(),
            server: ServerIdentity::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            max_retries: 5,
            retry_base_secs: 1,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            min_archive_bytes: 1_000_000,
            sha256: None,
        }
    }
}

impl Default for ServerIdentity {
    fn default() -> Self {
        Self {
            name: "Bedrun Dedicated Server".to_string(),
            world: "Bedrun-World".to_string(),
            max_players: 10,
            gamemode: "survival".to_string(),
            difficulty: "normal".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Load with figment layering. An explicitly passed file must exist;
    /// the implicit `launcher.toml` is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.is_file() {
                    bail!("config file {} not found", p.display());
                }
                p.to_path_buf()
            }
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&file))
            .merge(Env::prefixed("BEDRUN_").split("__"))
            .extract()
            .with_context(|| format!("loading configuration from {}", file.display()))?;

        if config.mirrors.is_empty() {
            bail!("mirror list is empty");
        }
        Ok(config)
    }

    pub fn archive_file_name(&self) -> String {
        match &self.archive_name {
            Some(name) => name.clone(),
            None => format!("bedrock-server-{}.zip", self.version),
        }
    }

    /// Each mirror joined with the archive file name.
    pub fn mirror_urls(&self) -> Vec<String> {
        let name = self.archive_file_name();
        self.mirrors
            .iter()
            .map(|base| {
                if base.ends_with('/') {
                    format!("{base}{name}")
                } else {
                    format!("{base}/{name}")
                }
            })
            .collect()
    }

    pub fn data_path(&self) -> PathBuf {
        bedrun_platform::dir::expand(&self.data_dir)
    }

    pub fn server_binary_path(&self) -> PathBuf {
        self.data_path().join(SERVER_BINARY)
    }

    pub fn client_setting(&self) -> ClientSetting {
        ClientSetting::new(
            self.http.user_agent.clone(),
            Duration::from_secs(self.http.timeout_secs),
        )
    }

    /// Fetch options for the server archive itself.
    pub fn archive_fetch_options(&self) -> FetchOptions {
        let mut options = FetchOptions::default()
            .min_bytes(self.http.min_archive_bytes)
            .max_retries(self.http.max_retries)
            .retry_base(Duration::from_secs(self.http.retry_base_secs));
        if let Some(digest) = &self.http.sha256 {
            options = options.sha256(digest.clone());
        }
        options
    }

    /// Fetch options for small helper binaries (no size floor).
    pub fn binary_fetch_options(&self) -> FetchOptions {
        FetchOptions::default()
            .max_retries(self.http.max_retries)
            .retry_base(Duration::from_secs(self.http.retry_base_secs))
    }

    /// The properties the launcher wants, before merging operator edits.
    pub fn properties(&self) -> ServerProperties {
        let mut props = ServerProperties::default();
        props.server_name = self.server.name.clone();
        props.level_name = self.server.world.clone();
        props.max_players = self.server.max_players;
        props.gamemode = self.server.gamemode.clone();
        props.difficulty = self.server.difficulty.clone();
        props.server_port = self.port;
        props.server_portv6 = self.port;
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_mirrors() {
        let cfg = LauncherConfig::default();
        assert_eq!(cfg.port, 19132);
        assert_eq!(cfg.mirrors.len(), 2);
        assert_eq!(cfg.archive_file_name(), "bedrock-server-1.21.44.01.zip");
    }

    #[test]
    fn archive_name_override_wins() {
        let mut cfg = LauncherConfig::default();
        cfg.archive_name = Some("nightly.zip".to_string());
        assert_eq!(cfg.archive_file_name(), "nightly.zip");
    }

    #[test]
    fn mirror_urls_join_with_and_without_slash() {
        let mut cfg = LauncherConfig::default();
        cfg.mirrors = vec![
            "https://a.example/bin/".to_string(),
            "https://b.example/bin".to_string(),
        ];
        let urls = cfg.mirror_urls();
        assert_eq!(urls[0], format!("https://a.example/bin/{}", cfg.archive_file_name()));
        assert_eq!(urls[1], format!("https://b.example/bin/{}", cfg.archive_file_name()));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("launcher.toml");
        std::fs::write(
            &file,
            r#"
port = 25565
data_dir = "space-data"

[server]
name = "Space Bedrock Server"
world = "Space-World"
"#,
        )
        .unwrap();

        let cfg = LauncherConfig::load(Some(&file)).unwrap();
        assert_eq!(cfg.port, 25565);
        assert_eq!(cfg.data_dir, "space-data");
        assert_eq!(cfg.server.name, "Space Bedrock Server");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.http.max_retries, 5);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = LauncherConfig::load(Some(Path::new("/no/such/launcher.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn empty_mirror_list_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("launcher.toml");
        std::fs::write(&file, "mirrors = []\n").unwrap();

        let err = LauncherConfig::load(Some(&file)).unwrap_err();
        assert!(err.to_string().contains("mirror list is empty"));
    }

    #[test]
    fn properties_inherit_identity_and_port() {
        let mut cfg = LauncherConfig::default();
        cfg.port = 20000;
        cfg.server.world = "MSX-World".to_string();

        let props = cfg.properties();
        assert_eq!(props.server_port, 20000);
        assert_eq!(props.server_portv6, 20000);
        assert_eq!(props.level_name, "MSX-World");
    }
}

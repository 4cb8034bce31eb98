//! The `server.properties` file the Bedrock server reads on boot.
//!
//! The launcher owns a typed subset of keys; anything else found in an
//! existing file is kept verbatim in `extra` so operator edits survive a
//! rewrite. Merging follows the preserve-existing rule: a value already on
//! disk wins over the launcher's default.

pub use error::{Error, Result};

mod error;

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Typed view of the managed keys, plus pass-through extras.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerProperties {
    pub server_name: String,
    pub gamemode: String,
    pub difficulty: String,
    pub allow_cheats: bool,
    pub max_players: u32,
    pub online_mode: bool,
    pub server_port: u16,
    pub server_portv6: u16,
    pub level_name: String,
    pub default_player_permission_level: String,
    pub view_distance: u32,
    pub player_idle_timeout: u32,
    pub compression_threshold: u32,
    pub server_authoritative_movement: String,
    pub extra: BTreeMap<String, String>,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            server_name: "Dedicated Server".to_string(),
            gamemode: "survival".to_string(),
            difficulty: "normal".to_string(),
            allow_cheats: false,
            max_players: 10,
            online_mode: true,
            server_port: 19132,
            server_portv6: 19132,
            level_name: "Bedrock level".to_string(),
            default_player_permission_level: "member".to_string(),
            view_distance: 12,
            player_idle_timeout: 30,
            compression_threshold: 1,
            server_authoritative_movement: "server-auth".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl ServerProperties {
    /// Parse `key=value` lines. Blank lines and `#` comments are ignored;
    /// unknown keys land in `extra`.
    pub fn parse(content: &str) -> Result<Self> {
        let mut props = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            props.set(key.trim(), value.trim())?;
        }
        Ok(props)
    }

    /// Assign one key. Returns whether the key was one of the managed ones.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        let known = match key {
            "server-name" => {
                self.server_name = value.to_string();
                true
            }
            "gamemode" => {
                self.gamemode = value.to_string();
                true
            }
            "difficulty" => {
                self.difficulty = value.to_string();
                true
            }
            "allow-cheats" => {
                self.allow_cheats = parse_bool(key, value)?;
                true
            }
            "max-players" => {
                self.max_players = parse_num(key, value)?;
                true
            }
            "online-mode" => {
                self.online_mode = parse_bool(key, value)?;
                true
            }
            "server-port" => {
                self.server_port = parse_num(key, value)?;
                true
            }
            "server-portv6" => {
                self.server_portv6 = parse_num(key, value)?;
                true
            }
            "level-name" => {
                self.level_name = value.to_string();
                true
            }
            "default-player-permission-level" => {
                self.default_player_permission_level = value.to_string();
                true
            }
            "view-distance" => {
                self.view_distance = parse_num(key, value)?;
                true
            }
            "player-idle-timeout" => {
                self.player_idle_timeout = parse_num(key, value)?;
                true
            }
            "compression-threshold" => {
                self.compression_threshold = parse_num(key, value)?;
                true
            }
            "server-authoritative-movement" => {
                self.server_authoritative_movement = value.to_string();
                true
            }
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
                false
            }
        };
        Ok(known)
    }

    /// Managed keys in the order they are rendered.
    fn managed_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("server-name", self.server_name.clone()),
            ("gamemode", self.gamemode.clone()),
            ("difficulty", self.difficulty.clone()),
            ("allow-cheats", self.allow_cheats.to_string()),
            ("max-players", self.max_players.to_string()),
            ("online-mode", self.online_mode.to_string()),
            ("server-port", self.server_port.to_string()),
            ("server-portv6", self.server_portv6.to_string()),
            ("level-name", self.level_name.clone()),
            (
                "default-player-permission-level",
                self.default_player_permission_level.clone(),
            ),
            ("view-distance", self.view_distance.to_string()),
            ("player-idle-timeout", self.player_idle_timeout.to_string()),
            (
                "compression-threshold",
                self.compression_threshold.to_string(),
            ),
            (
                "server-authoritative-movement",
                self.server_authoritative_movement.clone(),
            ),
        ]
    }

    /// Render to `key=value` lines, managed keys first, extras after in
    /// sorted order.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.managed_pairs() {
            out.push_str(key);
            out.push('=');
            out.push_str(&value);
            out.push('\n');
        }
        for (key, value) in &self.extra {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }

    /// Fold an existing file's values over this one: anything the operator
    /// already set wins, including keys the launcher doesn't manage.
    pub fn merge_existing(&mut self, existing: &str) -> Result<()> {
        for line in existing.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                self.set(key.trim(), value.trim())?;
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Atomic save: temp file in the same directory, then rename.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(self.render().as_bytes())?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Error::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_render_has_managed_keys() {
        let rendered = ServerProperties::default().render();
        assert!(rendered.contains("server-port=19132\n"));
        assert!(rendered.contains("gamemode=survival\n"));
        assert!(rendered.contains("online-mode=true\n"));
    }

    #[test]
    fn parse_reads_typed_fields() {
        let props = ServerProperties::parse(
            "# a comment\n\nserver-port=25565\nmax-players=4\nallow-cheats=true\n",
        )
        .unwrap();
        assert_eq!(props.server_port, 25565);
        assert_eq!(props.max_players, 4);
        assert!(props.allow_cheats);
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let props =
            ServerProperties::parse("texturepack-required=false\nserver-port=19132\n").unwrap();
        assert_eq!(
            props.extra.get("texturepack-required").map(String::as_str),
            Some("false")
        );
        assert!(props.render().contains("texturepack-required=false\n"));
    }

    #[test]
    fn merge_preserves_operator_edits() {
        let mut props = ServerProperties::default();
        props.server_name = "Space Bedrock Server".to_string();

        props
            .merge_existing("gamemode=creative\nview-distance=32\nmotd=hello\n")
            .unwrap();

        // Operator values win over launcher defaults.
        assert_eq!(props.gamemode, "creative");
        assert_eq!(props.view_distance, 32);
        // Untouched launcher values stay.
        assert_eq!(props.server_name, "Space Bedrock Server");
        // Unmanaged keys ride along.
        assert_eq!(props.extra.get("motd").map(String::as_str), Some("hello"));
    }

    #[test]
    fn bad_number_is_an_error() {
        let err = ServerProperties::parse("server-port=lots\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { key, .. } if key == "server-port"));
    }

    #[test]
    fn bad_bool_is_an_error() {
        let err = ServerProperties::parse("online-mode=yes\n").unwrap_err();
        assert!(matches!(err, Error::InvalidValue { key, .. } if key == "online-mode"));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("server.properties");

        let mut props = ServerProperties::default();
        props.level_name = "MSX-World".to_string();
        props.save(&path).unwrap();

        let loaded = ServerProperties::load(&path).unwrap();
        assert_eq!(loaded, props);
    }

    #[test]
    fn render_is_deterministic() {
        let props = ServerProperties::default();
        assert_eq!(props.render(), props.render());
    }
}

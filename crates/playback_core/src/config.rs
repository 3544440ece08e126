use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use shared::domain::{Algorithm, Speed, DEFAULT_ARRAY_SIZE};
use url::Url;

pub const SETTINGS_FILE: &str = "visualizer.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArraySourceKind {
    #[default]
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub generate_path: String,
    pub sort_path: String,
    pub array_source: ArraySourceKind,
    pub algorithm: Algorithm,
    pub array_size: usize,
    pub speed: Speed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            generate_path: "/generate".into(),
            sort_path: "/sort".into(),
            array_source: ArraySourceKind::Remote,
            algorithm: Algorithm::Bubble,
            array_size: DEFAULT_ARRAY_SIZE,
            speed: Speed::default(),
        }
    }
}

impl Settings {
    pub fn generate_url(&self) -> anyhow::Result<Url> {
        endpoint_url(&self.server_url, &self.generate_path)
    }

    pub fn sort_url(&self) -> anyhow::Result<Url> {
        endpoint_url(&self.server_url, &self.sort_path)
    }
}

/// Defaults, then `visualizer.toml` in the working directory, then the
/// process environment.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new(SETTINGS_FILE));
    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, path: &Path) {
    let Ok(raw) = fs::read_to_string(path) else {
        return;
    };
    match toml::from_str::<HashMap<String, String>>(&raw) {
        Ok(file_cfg) => apply_values(settings, |key| file_cfg.get(key).cloned()),
        Err(err) => {
            tracing::warn!(path = %path.display(), "config: ignoring unreadable settings file: {err}")
        }
    }
}

fn apply_values(settings: &mut Settings, get: impl Fn(&str) -> Option<String>) {
    if let Some(v) = get("server_url") {
        settings.server_url = v;
    }
    if let Some(v) = get("generate_path") {
        settings.generate_path = v;
    }
    if let Some(v) = get("sort_path") {
        settings.sort_path = v;
    }
    if let Some(kind) = get("array_source").and_then(|v| parse_source_kind(&v)) {
        settings.array_source = kind;
    }
    if let Some(algorithm) = get("algorithm").and_then(|v| v.parse().ok()) {
        settings.algorithm = algorithm;
    }
    if let Some(size) = get("array_size").and_then(|v| v.trim().parse().ok()) {
        settings.array_size = size;
    }
    if let Some(speed) = get("speed").and_then(|v| v.trim().parse::<u8>().ok()) {
        settings.speed = Speed::new(speed);
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("VISUALIZER_SERVER_URL") {
        settings.server_url = v;
    }
    apply_values(settings, |key| var(&format!("APP__{}", key.to_ascii_uppercase())));
}

fn parse_source_kind(raw: &str) -> Option<ArraySourceKind> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "remote" => Some(ArraySourceKind::Remote),
        "local" => Some(ArraySourceKind::Local),
        _ => None,
    }
}

fn endpoint_url(server_url: &str, path: &str) -> anyhow::Result<Url> {
    let base = Url::parse(server_url.trim())
        .with_context(|| format!("invalid server url '{server_url}'"))?;
    base.join(path)
        .with_context(|| format!("invalid endpoint path '{path}' for '{server_url}'"))
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn builds_endpoint_urls_from_server_url() {
        let settings = Settings::default();
        assert_eq!(
            settings.generate_url().expect("generate url").as_str(),
            "http://127.0.0.1:8080/generate"
        );
        assert_eq!(
            settings.sort_url().expect("sort url").as_str(),
            "http://127.0.0.1:8080/sort"
        );
    }

    #[test]
    fn rejects_unparseable_server_url() {
        let settings = Settings {
            server_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(settings.sort_url().is_err());
    }

    #[test]
    fn env_overrides_apply_and_bad_values_keep_defaults() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env_from(&[
                ("VISUALIZER_SERVER_URL", "http://sorter.local:9000"),
                ("APP__ARRAY_SOURCE", "Local"),
                ("APP__ALGORITHM", "heap"),
                ("APP__ARRAY_SIZE", "thirty"),
                ("APP__SPEED", "12"),
            ]),
        );

        assert_eq!(settings.server_url, "http://sorter.local:9000");
        assert_eq!(settings.array_source, ArraySourceKind::Local);
        assert_eq!(settings.algorithm, Algorithm::Heap);
        assert_eq!(settings.array_size, DEFAULT_ARRAY_SIZE);
        assert_eq!(settings.speed.get(), 10);
    }

    #[test]
    fn app_prefixed_server_url_wins_over_legacy_name() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env_from(&[
                ("VISUALIZER_SERVER_URL", "http://legacy:1"),
                ("APP__SERVER_URL", "http://preferred:2"),
            ]),
        );
        assert_eq!(settings.server_url, "http://preferred:2");
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("visualizer_settings_test_{suffix}.toml"));
        fs::write(
            &path,
            "server_url = \"http://from-file:8080\"\nsort_path = \"/api/sort\"\narray_size = \"35\"\n",
        )
        .expect("write settings");

        let mut settings = Settings::default();
        apply_file(&mut settings, &path);
        assert_eq!(settings.server_url, "http://from-file:8080");
        assert_eq!(settings.array_size, 35);

        apply_env(&mut settings, env_from(&[("APP__ARRAY_SIZE", "8")]));
        assert_eq!(settings.array_size, 8);
        assert_eq!(
            settings.sort_url().expect("sort url").as_str(),
            "http://from-file:8080/api/sort"
        );

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn missing_file_leaves_defaults() {
        let mut settings = Settings::default();
        apply_file(&mut settings, Path::new("/nonexistent/visualizer.toml"));
        assert_eq!(settings, Settings::default());
    }
}

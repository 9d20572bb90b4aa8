use crate::anim::Easing;
use crate::events::AppEvent;
use crate::menu::SpriteName;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub radius: f64,
    pub angle_offset: f64,
    pub selected_scale: f64,
    pub unselected_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: 150.0,
            angle_offset: 0.0,
            selected_scale: 1.2,
            unselected_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub fade: f64,
    pub scale: f64,
    pub expand: f64,
    pub collapse: f64,
    pub rotation: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade: 0.20,
            scale: 0.20,
            expand: 0.25,
            collapse: 0.20,
            rotation: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub open_scale: f64,
    pub closed_scale: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            open_scale: 1.2,
            closed_scale: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelConfig {
    pub top_icons: usize,
    pub bottom_icons: usize,
    pub move_duration: f64,
    pub stagger_delay: f64,
    pub top_offset: f64,
    pub bottom_offset: f64,
    pub easing: Easing,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            top_icons: 0,
            bottom_icons: 0,
            move_duration: 0.25,
            stagger_delay: 0.04,
            top_offset: 120.0,
            bottom_offset: -120.0,
            easing: Easing::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SkillConfig {
    #[serde(default = "default_skill_name")]
    pub name: String,
    pub active_icon: Option<SpriteName>,
    pub inactive_icon: Option<SpriteName>,
    pub panel: Option<PanelConfig>,
}

fn default_skill_name() -> String {
    "Skill".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub default_skill: usize,
    pub start_open: bool,
    pub layout: LayoutConfig,
    pub timings: TimingConfig,
    pub window: WindowConfig,
    pub skills: Vec<SkillConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const ENV_PREFIX: &str = "SKILLRING";
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "skillring", "skillring")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// The configuration shipped with the binary, used until the user writes their own.
pub fn bundled_config() -> Result<Config, ConfigError> {
    parse_toml(DEFAULT_CONFIG)
}

pub fn parse_toml(source: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(source, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    let fallback = || {
        bundled_config().unwrap_or_else(|e| {
            log::error!("Bundled configuration is invalid: {}", e);
            Config::default()
        })
    };

    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        match write_default_config(&path) {
            Ok(()) => log::info!("Wrote default config to {}", path.display()),
            Err(e) => log::warn!("Failed to write default config: {}", e),
        }
        return fallback();
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to load config, using bundled defaults: {}", e);
            fallback()
        }
    }
}

/// Seeds `path` with the bundled configuration. An existing file is left alone.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_parses() {
        let config = bundled_config().unwrap();
        assert_eq!(config.skills.len(), 4);
        assert_eq!(config.layout, LayoutConfig::default());
        assert_eq!(config.timings, TimingConfig::default());

        let fireball = &config.skills[0];
        assert_eq!(fireball.name, "Fireball");
        assert_eq!(fireball.active_icon, Some(SpriteName::new("fireball-active")));
        let panel = fireball.panel.as_ref().unwrap();
        assert_eq!((panel.top_icons, panel.bottom_icons), (3, 3));
        assert_eq!(panel.move_duration, 0.25);

        let lightning = config.skills[2].panel.as_ref().unwrap();
        assert_eq!(lightning.easing, Easing::EaseOut);
        assert_eq!(lightning.stagger_delay, 0.03);

        assert!(config.skills[3].panel.is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = parse_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.start_open);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = parse_toml(
            r#"
            default_skill = 2
            [timings]
            rotation = 0.5

            [[skills]]
            [skills.panel]
            top_icons = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.default_skill, 2);
        assert_eq!(config.timings.rotation, 0.5);
        assert_eq!(config.timings.fade, 0.20);
        assert_eq!(config.skills[0].name, "Skill");
        let panel = config.skills[0].panel.as_ref().unwrap();
        assert_eq!(panel.top_icons, 1);
        assert_eq!(panel.bottom_offset, -120.0);
    }

    #[test]
    fn test_unknown_easing_is_rejected() {
        let result = parse_toml(
            r#"
            [[skills]]
            [skills.panel]
            easing = "wobbly"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_write_default_config_seeds_once() {
        let dir = std::env::temp_dir().join(format!("skillring-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let _ = fs_err::remove_dir_all(&dir);

        write_default_config(&path).unwrap();
        let written = fs_err::read_to_string(&path).unwrap();
        assert_eq!(parse_toml(&written).unwrap(), bundled_config().unwrap());

        fs_err::write(&path, "default_skill = 3\n").unwrap();
        write_default_config(&path).unwrap();
        assert_eq!(fs_err::read_to_string(&path).unwrap(), "default_skill = 3\n");

        fs_err::remove_dir_all(&dir).unwrap();
    }
}

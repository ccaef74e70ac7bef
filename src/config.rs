use crate::{
    app::Message,
    watch::{FileEvent, watch_file},
};
use anyhow::Context;
use hex_color::HexColor;
use iced::{Color, Subscription, futures::StreamExt};
use serde::Deserialize;
use std::{
    any::TypeId,
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CONFIG_FILE_PATH: &str = "~/.config/wsswitch/config.toml";

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl Position {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Position::Left | Position::Right)
    }
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    Visual,
    #[default]
    Simple,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Normal,
    Inverted,
    Disabled,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct GraphAppearance {
    pub active_window_border: HexColor,
    pub active_window_background: HexColor,
    pub inactive_window_border: HexColor,
    pub inactive_window_background: HexColor,
}

impl Default for GraphAppearance {
    fn default() -> Self {
        Self {
            active_window_border: HexColor::rgb(250, 179, 135),
            active_window_background: HexColor::rgb(88, 91, 112),
            inactive_window_border: HexColor::rgb(108, 112, 134),
            inactive_window_background: HexColor::rgb(49, 50, 68),
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct Appearance {
    pub background_color: HexColor,
    pub text_color: HexColor,
    pub primary_color: HexColor,
    pub shaded_text_color: HexColor,
    pub opacity: f32,
    pub graph: GraphAppearance,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            background_color: HexColor::rgb(30, 30, 46),
            text_color: HexColor::rgb(205, 214, 244),
            primary_color: HexColor::rgb(250, 179, 135),
            shaded_text_color: HexColor::rgb(108, 112, 134),
            opacity: 1.0,
            graph: GraphAppearance::default(),
        }
    }
}

pub fn to_color(color: HexColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a as f32 / 255.0)
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub position: Position,
    /// Panel thickness, the height of a horizontal panel.
    pub size: u32,
    pub display_type: DisplayType,
    pub scroll_behavior: ScrollBehavior,
    /// While set, the workspace buttons ignore pointer input.
    pub panel_edit_mode: bool,
    pub names_path: Option<PathBuf>,
    pub appearance: Appearance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            position: Position::default(),
            size: 34,
            display_type: DisplayType::default(),
            scroll_behavior: ScrollBehavior::default(),
            panel_edit_mode: false,
            names_path: None,
            appearance: Appearance::default(),
        }
    }
}

impl Config {
    /// True when the change can only be shown by recreating every button.
    pub fn needs_rebuild(&self, other: &Config) -> bool {
        self.display_type != other.display_type
            || self.position != other.position
            || self.size != other.size
            || self.appearance != other.appearance
    }
}

pub fn resolve_path(path: Option<PathBuf>) -> PathBuf {
    match path {
        Some(path) => shellexpand::path::tilde(&path).into_owned(),
        None => shellexpand::path::tilde(DEFAULT_CONFIG_FILE_PATH).into_owned(),
    }
}

pub fn read_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        log::info!("No config file at {path:?}, using defaults");
        return Ok(Config::default());
    }

    log::info!("Reading config file {path:?}");
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
    parse_config(&content)
}

fn parse_config(content: &str) -> anyhow::Result<Config> {
    toml::from_str(content).context("Failed to parse config file")
}

pub fn subscription(path: &Path) -> Subscription<Message> {
    let id = TypeId::of::<Config>();
    let path = path.to_path_buf();

    Subscription::run_with_id(
        id,
        watch_file(path.clone()).filter_map(move |event| {
            let path = path.clone();
            async move {
                match event {
                    FileEvent::Changed => log::info!("Config file modified"),
                    FileEvent::Removed => log::info!("Config file deleted"),
                }

                match read_config(&path) {
                    Ok(config) => Some(Message::ConfigChanged(Box::new(config))),
                    Err(e) => {
                        log::warn!("Failed to read config file: {e:#}");
                        None
                    }
                }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.display_type, DisplayType::Simple);
        assert_eq!(config.scroll_behavior, ScrollBehavior::Normal);
    }

    #[test]
    fn parses_switcher_options() {
        let config = parse_config(
            r##"
            position = "left"
            display_type = "visual"
            scroll_behavior = "inverted"
            panel_edit_mode = true

            [appearance.graph]
            active_window_border = "#ff0000"
            "##,
        )
        .unwrap();

        assert_eq!(config.position, Position::Left);
        assert!(config.position.is_vertical());
        assert_eq!(config.display_type, DisplayType::Visual);
        assert_eq!(config.scroll_behavior, ScrollBehavior::Inverted);
        assert!(config.panel_edit_mode);
        assert_eq!(
            config.appearance.graph.active_window_border,
            HexColor::rgb(255, 0, 0)
        );
        assert_eq!(
            config.appearance.graph.inactive_window_border,
            GraphAppearance::default().inactive_window_border
        );
    }

    #[test]
    fn explicit_path_is_kept() {
        let path = PathBuf::from("/etc/wsswitch.toml");
        assert_eq!(resolve_path(Some(path.clone())), path);
        assert!(resolve_path(None).ends_with(".config/wsswitch/config.toml"));
    }

    #[test]
    fn rejects_unknown_scroll_behavior() {
        assert!(parse_config(r#"scroll_behavior = "sideways""#).is_err());
    }

    #[test]
    fn edit_mode_alone_does_not_rebuild() {
        let base = Config::default();
        let edit = Config {
            panel_edit_mode: true,
            ..Config::default()
        };
        let visual = Config {
            display_type: DisplayType::Visual,
            ..Config::default()
        };

        assert!(!base.needs_rebuild(&edit));
        assert!(base.needs_rebuild(&visual));
    }
}

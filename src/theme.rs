use crate::config::{Appearance, Config, Position, to_color};
use iced::{
    Background, Border, Color, Theme,
    theme::Palette,
    widget::{
        button::{self, Status},
        container, text_input,
    },
};

#[derive(Debug, Copy, Clone)]
pub struct Space {
    pub xxs: u16,
    pub xs: u16,
    pub sm: u16,
    pub md: u16,
}

impl Default for Space {
    fn default() -> Self {
        Self {
            xxs: 4,
            xs: 8,
            sm: 12,
            md: 16,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Radius {
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
}

impl Default for Radius {
    fn default() -> Self {
        Self {
            sm: 4,
            md: 8,
            lg: 16,
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct FontSize {
    pub sm: u16,
    pub md: u16,
    pub lg: u16,
}

impl Default for FontSize {
    fn default() -> Self {
        Self {
            sm: 12,
            md: 14,
            lg: 20,
        }
    }
}

/// Border plus padding on one side of a box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Insets {
    pub padding: f32,
    pub border: f32,
}

impl Insets {
    /// Total space taken across one axis, both sides included.
    pub fn across(&self) -> f32 {
        2.0 * (self.padding + self.border)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraphColors {
    pub active_border: Color,
    pub active_background: Color,
    pub inactive_border: Color,
    pub inactive_background: Color,
}

impl GraphColors {
    /// Border and background for a window, depending on its focus.
    pub fn for_window(&self, focused: bool) -> (Color, Color) {
        if focused {
            (self.active_border, self.active_background)
        } else {
            (self.inactive_border, self.inactive_background)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwitcherTheme {
    iced_theme: Theme,
    pub space: Space,
    pub radius: Radius,
    pub font_size: FontSize,
    pub bar_position: Position,
    pub bar_size: u32,
    pub opacity: f32,
    pub shaded_text: Color,
    pub graph: GraphColors,
    pub panel_insets: Insets,
    pub graph_insets: Insets,
}

#[cfg(test)]
impl Default for SwitcherTheme {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl SwitcherTheme {
    pub fn new(config: &Config) -> Self {
        let appearance: &Appearance = &config.appearance;

        SwitcherTheme {
            space: Space::default(),
            radius: Radius::default(),
            font_size: FontSize::default(),
            bar_position: config.position,
            bar_size: config.size,
            opacity: appearance.opacity,
            shaded_text: to_color(appearance.shaded_text_color),
            graph: GraphColors {
                active_border: to_color(appearance.graph.active_window_border),
                active_background: to_color(appearance.graph.active_window_background),
                inactive_border: to_color(appearance.graph.inactive_window_border),
                inactive_background: to_color(appearance.graph.inactive_window_background),
            },
            panel_insets: Insets {
                padding: 2.0,
                border: 0.0,
            },
            graph_insets: Insets {
                padding: 2.0,
                border: 1.0,
            },
            iced_theme: Theme::custom(
                "wsswitch".to_string(),
                Palette {
                    background: to_color(appearance.background_color),
                    text: to_color(appearance.text_color),
                    primary: to_color(appearance.primary_color),
                    success: Color::from_rgb8(166, 227, 161),
                    danger: Color::from_rgb8(243, 139, 168),
                },
            ),
        }
    }

    pub fn get_theme(&self) -> &Theme {
        &self.iced_theme
    }

    pub fn bar_style(&self) -> impl Fn(&Theme) -> container::Style {
        let opacity = self.opacity;
        move |theme| container::Style {
            background: Some(theme.palette().background.scale_alpha(opacity).into()),
            ..container::Style::default()
        }
    }

    pub fn simple_button_style(
        &self,
        outlined: bool,
        shaded: bool,
    ) -> impl Fn(&Theme, Status) -> button::Style {
        let radius = self.radius.sm;
        let opacity = self.opacity;
        let shaded_text = self.shaded_text;
        move |theme, status| {
            let mut base = button::Style {
                background: None,
                border: Border {
                    width: if outlined { 2.0 } else { 0.0 },
                    radius: radius.into(),
                    color: theme.palette().primary,
                },
                text_color: if shaded {
                    shaded_text
                } else {
                    theme.palette().text
                },
                ..button::Style::default()
            };
            match status {
                Status::Hovered | Status::Pressed => {
                    base.background = Some(
                        theme
                            .extended_palette()
                            .background
                            .weak
                            .color
                            .scale_alpha(opacity)
                            .into(),
                    );
                    base
                }
                _ => base,
            }
        }
    }

    pub fn graph_style(&self, active: bool) -> impl Fn(&Theme) -> container::Style {
        let border_width = self.graph_insets.border;
        let radius = self.radius.sm;
        move |theme| container::Style {
            background: Some(Background::Color(
                theme.extended_palette().background.weak.color,
            )),
            border: Border {
                width: border_width,
                radius: radius.into(),
                color: if active {
                    theme.palette().primary
                } else {
                    theme.extended_palette().background.strong.color
                },
            },
            ..container::Style::default()
        }
    }

    pub fn popup_style(&self) -> impl Fn(&Theme) -> container::Style {
        let radius = self.radius.lg;
        move |theme| container::Style {
            background: Some(theme.palette().background.into()),
            border: Border {
                width: 1.0,
                radius: radius.into(),
                color: theme.extended_palette().background.weak.color,
            },
            text_color: Some(theme.palette().text),
            ..container::Style::default()
        }
    }

    pub fn menu_item_style(&self) -> impl Fn(&Theme, Status) -> button::Style {
        let radius = self.radius.md;
        move |theme, status| {
            let mut base = button::Style {
                background: None,
                border: Border {
                    width: 0.0,
                    radius: radius.into(),
                    color: Color::TRANSPARENT,
                },
                text_color: theme.palette().text,
                ..button::Style::default()
            };
            match status {
                Status::Hovered => {
                    base.background =
                        Some(theme.extended_palette().background.weak.color.into());
                    base
                }
                Status::Disabled => {
                    base.text_color = theme.palette().text.scale_alpha(0.4);
                    base
                }
                _ => base,
            }
        }
    }
}

pub fn confirm_button_style(theme: &Theme, status: Status) -> button::Style {
    let mut base = button::Style {
        background: Some(theme.extended_palette().background.weak.color.into()),
        border: Border {
            width: 2.0,
            radius: 32.0.into(),
            color: Color::TRANSPARENT,
        },
        text_color: theme.palette().text,
        ..button::Style::default()
    };
    match status {
        Status::Hovered => {
            base.background = Some(theme.extended_palette().background.strong.color.into());
            base
        }
        _ => base,
    }
}

pub fn outline_button_style(theme: &Theme, status: Status) -> button::Style {
    let mut base = button::Style {
        background: None,
        border: Border {
            width: 2.0,
            radius: 32.into(),
            color: theme.extended_palette().background.weak.color,
        },
        text_color: theme.palette().text,
        ..button::Style::default()
    };
    match status {
        Status::Hovered => {
            base.background = Some(theme.extended_palette().background.weak.color.into());
            base
        }
        _ => base,
    }
}

pub fn text_input_style(theme: &Theme, status: text_input::Status) -> text_input::Style {
    let mut base = text_input::Style {
        background: theme.palette().background.into(),
        border: Border {
            width: 2.0,
            radius: 32.0.into(),
            color: theme.extended_palette().background.weak.color,
        },
        icon: theme.palette().text,
        placeholder: theme.palette().text,
        value: theme.palette().text,
        selection: theme.palette().primary,
    };
    match status {
        text_input::Status::Active => base,
        text_input::Status::Focused | text_input::Status::Hovered => {
            base.border.color = theme.extended_palette().background.strong.color;
            base
        }
        text_input::Status::Disabled => {
            base.background = theme.extended_palette().background.weak.color.into();
            base.border.color = Color::TRANSPARENT;
            base
        }
    }
}

pub fn backdrop_color(backdrop: f32) -> Color {
    Color::from_rgba(0.0, 0.0, 0.0, backdrop)
}

use crate::{config::Position, theme::SwitcherTheme};
use iced::{
    Alignment, Element, Length, Task,
    platform_specific::shell::commands::layer_surface::{
        Anchor, KeyboardInteractivity, Layer, destroy_layer_surface, get_layer_surface,
    },
    runtime::platform_specific::wayland::layer_surface::{IcedOutput, SctkLayerSurfaceSettings},
    widget::{container, mouse_area},
    window::Id,
};

/// Where the popup content sits inside the fullscreen popup surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Next to the panel, used by the context menu.
    Panel(Position),
    Center,
}

/// Fullscreen overlay surface hosting the context menu and the dialogs.
#[derive(Debug, Default, Clone)]
pub struct PopupSurface {
    id: Option<Id>,
}

impl PopupSurface {
    pub fn id(&self) -> Option<Id> {
        self.id
    }

    pub fn open<Message: 'static>(&mut self) -> Task<Message> {
        if self.id.is_some() {
            return Task::none();
        }

        let id = Id::unique();
        log::debug!("Opening popup surface {id:?}");
        self.id = Some(id);

        get_layer_surface(SctkLayerSurfaceSettings {
            id,
            namespace: "wsswitch-popup".to_string(),
            size: Some((None, None)),
            layer: Layer::Overlay,
            pointer_interactivity: true,
            keyboard_interactivity: KeyboardInteractivity::Exclusive,
            exclusive_zone: -1,
            output: IcedOutput::Active,
            anchor: Anchor::TOP | Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT,
            ..Default::default()
        })
    }

    pub fn close<Message: 'static>(&mut self) -> Task<Message> {
        match self.id.take() {
            Some(id) => {
                log::debug!("Closing popup surface {id:?}");
                destroy_layer_surface(id)
            }
            None => Task::none(),
        }
    }
}

/// Wraps popup content in a backdrop that dismisses it on an outside click.
pub fn view<'a, Message: Clone + 'a>(
    content: Element<'a, Message>,
    placement: Placement,
    theme: &SwitcherTheme,
    none: Message,
    dismiss: Message,
) -> Element<'a, Message> {
    let (align_x, align_y) = match placement {
        Placement::Center => (Alignment::Center, Alignment::Center),
        Placement::Panel(Position::Top) => (Alignment::Center, Alignment::Start),
        Placement::Panel(Position::Bottom) => (Alignment::Center, Alignment::End),
        Placement::Panel(Position::Left) => (Alignment::Start, Alignment::Center),
        Placement::Panel(Position::Right) => (Alignment::End, Alignment::Center),
    };

    let panel_gap = theme.bar_size as f32 + f32::from(theme.space.xxs);
    let padding = match placement {
        Placement::Center => iced::Padding::ZERO,
        Placement::Panel(Position::Top) => iced::Padding::ZERO.top(panel_gap),
        Placement::Panel(Position::Bottom) => iced::Padding::ZERO.bottom(panel_gap),
        Placement::Panel(Position::Left) => iced::Padding::ZERO.left(panel_gap),
        Placement::Panel(Position::Right) => iced::Padding::ZERO.right(panel_gap),
    };

    let backdrop = match placement {
        Placement::Center => 0.3,
        Placement::Panel(_) => 0.0,
    };

    mouse_area(
        container(
            mouse_area(
                container(content)
                    .width(Length::Shrink)
                    .height(Length::Shrink)
                    .style(theme.popup_style()),
            )
            .on_release(none),
        )
        .align_x(align_x)
        .align_y(align_y)
        .padding(padding)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_| container::Style {
            background: Some(crate::theme::backdrop_color(backdrop).into()),
            ..container::Style::default()
        }),
    )
    .on_release(dismiss)
    .into()
}

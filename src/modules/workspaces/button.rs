use super::{Message, graph::GraphLayout, graph::WorkspaceGraph};
use crate::{
    config::{DisplayType, Position},
    services::{compositor::CompositorWorkspace, names::WorkspaceNames},
    theme::SwitcherTheme,
};
use iced::{
    Element, Length, mouse,
    widget::{button, container, mouse_area, text, tooltip},
};
use unicode_segmentation::UnicodeSegmentation;

const MIN_WIDTH: f32 = 25.0;
const LABEL_MARGIN: f32 = 15.0;
// average advance of a proportional glyph relative to the font size
const GLYPH_WIDTH_RATIO: f32 = 0.6;

pub fn natural_label_width(label: &str, font_size: f32) -> f32 {
    label.graphemes(true).count() as f32 * font_size * GLYPH_WIDTH_RATIO
}

pub fn button_width(label: &str, font_size: f32) -> f32 {
    (natural_label_width(label, font_size) + LABEL_MARGIN)
        .ceil()
        .max(MIN_WIDTH)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleButton {
    shaded: bool,
    outlined: bool,
    width: f32,
}

impl SimpleButton {
    fn new(name: &str, workspace: &CompositorWorkspace, font_size: f32) -> Self {
        Self {
            shaded: !workspace.has_listed_windows(),
            outlined: false,
            width: button_width(name, font_size),
        }
    }

    fn update(&mut self, workspace: &CompositorWorkspace) {
        self.shaded = !workspace.has_listed_windows();
    }

    fn activate(&mut self, active: bool, workspace: &CompositorWorkspace) {
        self.outlined = active;
        if !active {
            self.update(workspace);
        }
    }

    /// Width and height: a vertical panel spans its own width and stacks buttons by text height.
    fn extent(&self, vertical: bool) -> (Length, Length) {
        if vertical {
            (Length::Fill, Length::Shrink)
        } else {
            (Length::Fixed(self.width), Length::Fill)
        }
    }
}

enum ButtonKind {
    Simple(SimpleButton),
    Graph(WorkspaceGraph),
}

/// One workspace in the switcher, either a label or a window preview.
pub struct WorkspaceButton {
    index: usize,
    name: String,
    font_size: f32,
    reactive: bool,
    shown: bool,
    kind: ButtonKind,
}

impl WorkspaceButton {
    pub fn new(
        index: usize,
        workspace: &CompositorWorkspace,
        names: &WorkspaceNames,
        display_type: DisplayType,
        font_size: f32,
    ) -> Self {
        let name = names.name(index);
        let kind = match display_type {
            DisplayType::Simple => ButtonKind::Simple(SimpleButton::new(&name, workspace, font_size)),
            DisplayType::Visual => ButtonKind::Graph(WorkspaceGraph::new(workspace)),
        };

        Self {
            index,
            name,
            font_size,
            reactive: false,
            shown: false,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enables input and the tooltip, outlines the button if it is the active one.
    pub fn show(
        &mut self,
        workspace: &CompositorWorkspace,
        active_index: Option<usize>,
        layout: &GraphLayout,
        reactive: bool,
    ) {
        if let ButtonKind::Graph(graph) = &mut self.kind {
            graph.ensure_scale(layout);
        }

        self.shown = true;
        self.reactive = reactive;
        if active_index == Some(self.index) {
            self.activate(true, workspace);
        }
    }

    pub fn update_name(&mut self, names: &WorkspaceNames) {
        self.name = names.name(self.index);
        if let ButtonKind::Simple(simple) = &mut self.kind {
            simple.width = button_width(&self.name, self.font_size);
        }
    }

    pub fn update(&mut self, workspace: &CompositorWorkspace) {
        match &mut self.kind {
            ButtonKind::Simple(simple) => simple.update(workspace),
            ButtonKind::Graph(graph) => graph.update(workspace),
        }
    }

    pub fn activate(&mut self, active: bool, workspace: &CompositorWorkspace) {
        match &mut self.kind {
            ButtonKind::Simple(simple) => simple.activate(active, workspace),
            ButtonKind::Graph(graph) => graph.activate(active),
        }
    }

    pub fn set_reactive(&mut self, reactive: bool) {
        self.reactive = reactive;
    }

    pub fn is_reactive(&self) -> bool {
        self.shown && self.reactive
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        match &self.kind {
            ButtonKind::Simple(simple) => simple.outlined,
            ButtonKind::Graph(graph) => graph.is_active(),
        }
    }

    #[cfg(test)]
    pub fn is_shaded(&self) -> bool {
        matches!(&self.kind, ButtonKind::Simple(simple) if simple.shaded)
    }

    #[cfg(test)]
    pub fn width(&self) -> f32 {
        match &self.kind {
            ButtonKind::Simple(simple) => simple.width,
            ButtonKind::Graph(graph) => graph.size().width,
        }
    }

    pub fn view(&self, theme: &SwitcherTheme) -> Element<'_, Message> {
        let interactive = self.is_reactive();
        let vertical = matches!(theme.bar_position, Position::Left | Position::Right);

        let content: Element<'_, Message> = match &self.kind {
            ButtonKind::Simple(simple) => {
                let label = container(text(self.name.as_str()).size(theme.font_size.sm))
                    .center_x(Length::Fill);
                let (label, padding) = if vertical {
                    (label, [theme.space.xxs, 0])
                } else {
                    (label.center_y(Length::Fill), [0, 0])
                };
                let (width, height) = simple.extent(vertical);

                button(label)
                    .padding(padding)
                    .width(width)
                    .height(height)
                    .style(theme.simple_button_style(simple.outlined, simple.shaded))
                    .on_press_maybe(
                        interactive.then_some(Message::Clicked(self.index, mouse::Button::Left)),
                    )
                    .into()
            }
            ButtonKind::Graph(graph) => {
                let preview = if vertical {
                    container(graph.view(theme)).center_x(Length::Fill)
                } else {
                    container(graph.view(theme)).center_y(Length::Fill)
                };
                if interactive {
                    mouse_area(preview)
                        .on_release(Message::Clicked(self.index, mouse::Button::Left))
                        .interaction(mouse::Interaction::Pointer)
                        .into()
                } else {
                    preview.into()
                }
            }
        };

        if !interactive {
            return content;
        }

        let content = mouse_area(content)
            .on_middle_release(Message::Clicked(self.index, mouse::Button::Middle));

        tooltip(
            content,
            container(text(self.name.as_str()).size(theme.font_size.sm))
                .padding(theme.space.xxs)
                .style(theme.popup_style()),
            tooltip_position(theme.bar_position),
        )
        .into()
    }
}

fn tooltip_position(position: Position) -> tooltip::Position {
    match position {
        Position::Top => tooltip::Position::Bottom,
        Position::Bottom => tooltip::Position::Top,
        Position::Left => tooltip::Position::Right,
        Position::Right => tooltip::Position::Left,
    }
}

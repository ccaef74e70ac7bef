pub mod button;
pub mod graph;
pub mod scroll;

use self::{
    button::WorkspaceButton,
    graph::GraphLayout,
    scroll::{ScrollDirection, ScrollSwitch},
};
use crate::{
    config::{Config, DisplayType, ScrollBehavior},
    dialog::{self, RenameDialog, rename_input_id},
    services::{
        ReadOnlyService, Service, ServiceEvent,
        compositor::{CompositorCommand, CompositorEvent, CompositorService, CompositorState},
        names::{self, WorkspaceNames},
    },
    theme::SwitcherTheme,
};
use iced::{
    Alignment, Element, Length, Subscription, Task,
    keyboard::{self, key},
    mouse::{self, ScrollDelta},
    widget::{Column, Row, button, column, container, mouse_area, text, text_input},
};
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum Message {
    Event(ServiceEvent<CompositorService>),
    NamesChanged(Vec<String>),
    Rebuild,
    Clicked(usize, mouse::Button),
    Scroll(ScrollDelta),
    OpenMenu,
    ToggleOverview,
    AddWorkspace,
    RemoveCurrentWorkspace,
    RenameCurrentWorkspace,
    FocusRenameInput,
    RenameInput(String),
    RenameSubmit,
    RenameCancel,
    ConfirmRemove,
    CancelRemove,
    ClosePopup,
}

pub enum Action {
    None,
    Command(Task<Message>),
    OpenPopup(Task<Message>),
    ClosePopup(Task<Message>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Popup {
    Menu,
    Rename(RenameDialog),
    ConfirmRemove { workspace_id: i32, name: String },
}

/// What removing a workspace should do right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Ignore,
    Confirm { workspace_id: i32, name: String },
    Remove { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Unchanged,
    Rename(String),
}

/// Blank input and input equal to the current name, once trimmed, change nothing.
pub fn rename_outcome(current: &str, input: &str) -> RenameOutcome {
    let name = input.trim();
    if name.is_empty() || name == current.trim() {
        RenameOutcome::Unchanged
    } else {
        RenameOutcome::Rename(name.to_owned())
    }
}

/// A new workspace list or new work areas invalidate every button.
fn needs_rebuild(previous: &CompositorState, current: &CompositorState) -> bool {
    previous.workspaces.len() != current.workspaces.len()
        || previous
            .workspaces
            .iter()
            .zip(&current.workspaces)
            .any(|(old, new)| old.id != new.id || old.work_area != new.work_area)
}

pub struct Workspaces {
    service: Option<CompositorService>,
    names: WorkspaceNames,
    buttons: Vec<WorkspaceButton>,
    rebuild_queued: bool,
    scroll: ScrollSwitch,
    reactive: bool,
    display_type: DisplayType,
    scroll_behavior: ScrollBehavior,
    layout: GraphLayout,
    font_size: f32,
    popup: Option<Popup>,
}

impl Workspaces {
    pub fn new(config: &Config, theme: &SwitcherTheme) -> Self {
        let names_path = config.names_path.clone().unwrap_or_else(names::default_path);

        Self {
            service: None,
            names: WorkspaceNames::load(names_path),
            buttons: Vec::new(),
            rebuild_queued: false,
            scroll: ScrollSwitch::default(),
            reactive: !config.panel_edit_mode,
            display_type: config.display_type,
            scroll_behavior: config.scroll_behavior,
            layout: GraphLayout::new(theme),
            font_size: theme.font_size.sm as f32,
            popup: None,
        }
    }

    fn state(&self) -> Option<&CompositorState> {
        self.service.as_ref().map(|service| &service.state)
    }

    fn workspace_count(&self) -> usize {
        self.state().map_or(0, |state| state.workspaces.len())
    }

    /// True for the context menu, which sits by the panel instead of the screen center.
    pub fn is_menu_open(&self) -> bool {
        matches!(self.popup, Some(Popup::Menu))
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::Event(event) => match event {
                ServiceEvent::Init(service) => {
                    self.service = Some(service);
                    self.request_rebuild()
                }
                ServiceEvent::Update(CompositorEvent::StateChanged(state)) => {
                    match self.service.as_mut() {
                        Some(service) => {
                            let previous = service.state.clone();
                            service.update(CompositorEvent::StateChanged(state));
                            self.state_changed(&previous)
                        }
                        None => Action::None,
                    }
                }
                ServiceEvent::Update(CompositorEvent::ActionPerformed) => Action::None,
                ServiceEvent::Error(e) => {
                    log::warn!("Compositor error: {e}");
                    Action::None
                }
            },
            Message::NamesChanged(names) => {
                if self.names.replace(names) {
                    log::debug!("Workspace names changed on disk: {:?}", self.names.stored());
                    for button in &mut self.buttons {
                        button.update_name(&self.names);
                    }
                }
                Action::None
            }
            Message::Rebuild => {
                self.rebuild();
                Action::None
            }
            Message::Clicked(index, mouse::Button::Left) => {
                let id = self
                    .state()
                    .and_then(|state| state.workspace_at(index))
                    .map(|workspace| workspace.id);
                match id {
                    Some(id) => self.command(CompositorCommand::FocusWorkspace(id)),
                    None => Action::None,
                }
            }
            Message::Clicked(index, mouse::Button::Middle) => self.remove_workspace_at_index(index),
            Message::Clicked(..) => Action::None,
            Message::Scroll(delta) => self.scroll_at(delta, Instant::now()),
            Message::OpenMenu => {
                self.popup = Some(Popup::Menu);
                Action::OpenPopup(Task::none())
            }
            Message::ToggleOverview => {
                self.popup = None;
                Action::ClosePopup(self.command_task(CompositorCommand::ToggleOverview))
            }
            Message::AddWorkspace => {
                self.popup = None;
                Action::ClosePopup(self.command_task(CompositorCommand::AddWorkspace))
            }
            Message::RemoveCurrentWorkspace => {
                self.popup = None;
                match self.state().and_then(CompositorState::active_index) {
                    Some(index) if self.workspace_count() > 1 => {
                        match self.remove_workspace_at_index(index) {
                            Action::Command(task) => Action::ClosePopup(task),
                            action => action,
                        }
                    }
                    _ => Action::ClosePopup(Task::none()),
                }
            }
            Message::RenameCurrentWorkspace => {
                match self.state().and_then(CompositorState::active_index) {
                    Some(index) => {
                        self.popup = Some(Popup::Rename(RenameDialog::new(
                            index,
                            self.names.name(index),
                        )));
                        Action::OpenPopup(Task::done(Message::FocusRenameInput))
                    }
                    None => {
                        log::warn!("No active workspace to rename");
                        self.popup = None;
                        Action::ClosePopup(Task::none())
                    }
                }
            }
            Message::FocusRenameInput => Action::Command(
                text_input::focus(rename_input_id()).chain(text_input::select_all(rename_input_id())),
            ),
            Message::RenameInput(input) => {
                if let Some(Popup::Rename(dialog)) = self.popup.as_mut() {
                    dialog.input = input;
                }
                Action::None
            }
            Message::RenameSubmit => match self.popup.take() {
                Some(Popup::Rename(dialog)) => {
                    self.apply_rename(&dialog);
                    Action::ClosePopup(self.rebuild_task())
                }
                popup => {
                    self.popup = popup;
                    Action::None
                }
            },
            Message::RenameCancel => {
                self.popup = None;
                Action::ClosePopup(self.rebuild_task())
            }
            Message::ConfirmRemove => match self.popup.take() {
                Some(Popup::ConfirmRemove { workspace_id, .. }) => {
                    let task = match self.state().and_then(|state| state.index_of(workspace_id)) {
                        Some(index) => self.remove_task(index),
                        None => {
                            log::info!("Workspace {workspace_id} is already gone");
                            Task::none()
                        }
                    };
                    Action::ClosePopup(task)
                }
                popup => {
                    self.popup = popup;
                    Action::None
                }
            },
            Message::CancelRemove => {
                self.popup = None;
                Action::ClosePopup(Task::none())
            }
            Message::ClosePopup => match self.popup.take() {
                Some(Popup::Rename(_)) => Action::ClosePopup(self.rebuild_task()),
                _ => Action::ClosePopup(Task::none()),
            },
        }
    }

    fn state_changed(&mut self, previous: &CompositorState) -> Action {
        let Some(service) = &self.service else {
            return Action::None;
        };

        // the queued rebuild reads the state when it runs
        if self.rebuild_queued {
            return Action::None;
        }

        if self.buttons.len() != service.state.workspaces.len()
            || needs_rebuild(previous, &service.state)
        {
            return self.request_rebuild();
        }

        for ((button, old), new) in self
            .buttons
            .iter_mut()
            .zip(&previous.workspaces)
            .zip(&service.state.workspaces)
        {
            if old.windows != new.windows {
                button.update(new);
            }
        }

        let from = previous.active_index();
        let to = service.state.active_index();
        if from != to {
            self.workspace_changed(from, to);
        }

        Action::None
    }

    /// Moves the active outline from one workspace index to another.
    pub fn workspace_changed(&mut self, from: Option<usize>, to: Option<usize>) {
        let Some(service) = &self.service else {
            return;
        };

        for (index, active) in [(from, false), (to, true)] {
            let Some(index) = index else {
                continue;
            };
            if let (Some(button), Some(workspace)) = (
                self.buttons.get_mut(index),
                service.state.workspace_at(index),
            ) {
                button.activate(active, workspace);
            }
        }
    }

    fn rebuild_task(&mut self) -> Task<Message> {
        if self.rebuild_queued {
            Task::none()
        } else {
            self.rebuild_queued = true;
            Task::done(Message::Rebuild)
        }
    }

    pub fn request_rebuild(&mut self) -> Action {
        if self.rebuild_queued {
            Action::None
        } else {
            Action::Command(self.rebuild_task())
        }
    }

    fn rebuild(&mut self) {
        self.rebuild_queued = false;
        self.buttons.clear();

        let Some(service) = &self.service else {
            return;
        };

        let state = &service.state;
        log::debug!("Rebuilding {} workspace buttons", state.workspaces.len());

        self.buttons = state
            .workspaces
            .iter()
            .enumerate()
            .map(|(index, workspace)| {
                WorkspaceButton::new(
                    index,
                    workspace,
                    &self.names,
                    self.display_type,
                    self.font_size,
                )
            })
            .collect();

        let active = state.active_index();
        for (button, workspace) in self.buttons.iter_mut().zip(&state.workspaces) {
            button.show(workspace, active, &self.layout, self.reactive);
        }
    }

    pub fn scroll_at(&mut self, delta: ScrollDelta, now: Instant) -> Action {
        let Some(direction) = ScrollDirection::from_delta(delta) else {
            return Action::None;
        };

        let Some(step) = self.scroll.register(self.scroll_behavior, direction, now) else {
            return Action::None;
        };

        match self.state().and_then(|state| state.neighbour_of_active(step)) {
            Some(id) => self.command(CompositorCommand::FocusWorkspace(id)),
            None => Action::None,
        }
    }

    pub fn removal(&self, index: usize) -> Removal {
        let Some(state) = self.state() else {
            return Removal::Ignore;
        };
        if state.workspaces.len() <= 1 {
            return Removal::Ignore;
        }
        let Some(workspace) = state.workspace_at(index) else {
            return Removal::Ignore;
        };

        if self.names.has_default_name(index) {
            Removal::Remove { index }
        } else {
            Removal::Confirm {
                workspace_id: workspace.id,
                name: self.names.name(index),
            }
        }
    }

    pub fn remove_workspace_at_index(&mut self, index: usize) -> Action {
        match self.removal(index) {
            Removal::Ignore => Action::None,
            Removal::Confirm { workspace_id, name } => {
                self.popup = Some(Popup::ConfirmRemove { workspace_id, name });
                Action::OpenPopup(Task::none())
            }
            Removal::Remove { index } => Action::Command(self.remove_task(index)),
        }
    }

    /// Empties the workspace into its left neighbour, the right one for the first.
    fn remove_task(&mut self, index: usize) -> Task<Message> {
        let ids = match self.state() {
            Some(state) => {
                let fallback = if index == 0 { 1 } else { index - 1 };
                state
                    .workspace_at(index)
                    .zip(state.workspace_at(fallback))
                    .map(|(removed, fallback)| (removed.id, fallback.id))
            }
            None => None,
        };

        match ids {
            Some((id, fallback)) => {
                log::info!("Removing workspace {id}, windows go to {fallback}");
                self.command_task(CompositorCommand::RemoveWorkspace { id, fallback })
            }
            None => Task::none(),
        }
    }

    fn apply_rename(&mut self, dialog: &RenameDialog) {
        match rename_outcome(&dialog.current, &dialog.input) {
            RenameOutcome::Unchanged => {
                log::debug!("Workspace {} name unchanged", dialog.index + 1);
            }
            RenameOutcome::Rename(name) => {
                let count = self.workspace_count();
                if let Err(e) = self.names.set(dialog.index, &name, count) {
                    log::error!("Failed to rename workspace: {e:#}");
                }
            }
        }
    }

    fn command_task(&mut self, command: CompositorCommand) -> Task<Message> {
        match self.service.as_mut() {
            Some(service) => service.command(command).map(Message::Event),
            None => Task::none(),
        }
    }

    fn command(&mut self, command: CompositorCommand) -> Action {
        if self.service.is_some() {
            Action::Command(self.command_task(command))
        } else {
            Action::None
        }
    }

    pub fn set_reactive(&mut self, reactive: bool) {
        self.reactive = reactive;
        for button in &mut self.buttons {
            button.set_reactive(reactive);
        }
    }

    /// Applies a reloaded config, `rebuild` tells whether the buttons are stale.
    pub fn set_config(&mut self, config: &Config, theme: &SwitcherTheme, rebuild: bool) -> Action {
        self.display_type = config.display_type;
        self.scroll_behavior = config.scroll_behavior;
        self.layout = GraphLayout::new(theme);
        self.font_size = theme.font_size.sm as f32;

        if self.reactive == config.panel_edit_mode {
            self.set_reactive(!config.panel_edit_mode);
        }

        let names_path = config.names_path.clone().unwrap_or_else(names::default_path);
        if self.names.path() != Some(names_path.as_path()) {
            self.names = WorkspaceNames::load(names_path);
            for button in &mut self.buttons {
                button.update_name(&self.names);
            }
        }

        if rebuild {
            self.request_rebuild()
        } else {
            Action::None
        }
    }

    pub fn view(&self, theme: &SwitcherTheme) -> Element<'_, Message> {
        let buttons = self.buttons.iter().map(|button| button.view(theme));

        let content: Element<'_, Message> = if self.layout.vertical {
            Column::with_children(buttons)
                .spacing(theme.space.xxs)
                .align_x(Alignment::Center)
                .width(Length::Fill)
                .into()
        } else {
            Row::with_children(buttons)
                .spacing(theme.space.xxs)
                .align_y(Alignment::Center)
                .height(Length::Fill)
                .into()
        };

        mouse_area(container(content).padding(self.layout.panel_insets.padding))
            .on_scroll(Message::Scroll)
            .on_right_release(Message::OpenMenu)
            .into()
    }

    pub fn popup_view(&self, theme: &SwitcherTheme) -> Option<Element<'_, Message>> {
        Some(match self.popup.as_ref()? {
            Popup::Menu => self.menu_view(theme),
            Popup::Rename(dialog) => dialog::rename_view(dialog, theme),
            Popup::ConfirmRemove { name, .. } => dialog::confirm_remove_view(name, theme),
        })
    }

    fn menu_view(&self, theme: &SwitcherTheme) -> Element<'_, Message> {
        let item = |label: &'static str, message: Option<Message>| {
            button(text(label))
                .padding([theme.space.xxs, theme.space.sm])
                .width(Length::Fill)
                .style(theme.menu_item_style())
                .on_press_maybe(message)
        };

        column!(
            item("Manage workspaces", Some(Message::ToggleOverview)),
            item("Add a new workspace", Some(Message::AddWorkspace)),
            item(
                "Remove the current workspace",
                (self.workspace_count() > 1).then_some(Message::RemoveCurrentWorkspace)
            ),
            item(
                "Rename current workspace",
                Some(Message::RenameCurrentWorkspace)
            ),
        )
        .spacing(theme.space.xxs)
        .padding(theme.space.xs)
        .width(250)
        .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = vec![CompositorService::subscribe().map(Message::Event)];

        if let Some(path) = self.names.path() {
            subscriptions.push(names::subscription(path.to_path_buf()).map(Message::NamesChanged));
        }

        if self.popup.is_some() {
            subscriptions.push(keyboard::on_key_press(|key, _| match key {
                keyboard::Key::Named(key::Named::Escape) => Some(Message::ClosePopup),
                _ => None,
            }));
        }

        Subscription::batch(subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::compositor::{
        CompositorChoice, CompositorWindow, CompositorWorkspace,
    };
    use iced::{Point, Rectangle, Size};
    use std::{env, fs, path::PathBuf, time::Duration};

    fn workspace(id: i32) -> CompositorWorkspace {
        CompositorWorkspace {
            id,
            work_area: Rectangle::new(Point::ORIGIN, Size::new(1920.0, 1080.0)),
            windows: Vec::new(),
        }
    }

    fn state(ids: &[i32], active: i32) -> CompositorState {
        CompositorState {
            workspaces: ids.iter().copied().map(workspace).collect(),
            active_workspace_id: Some(active),
        }
    }

    fn switcher(state: CompositorState, names: Vec<String>) -> Workspaces {
        let config = Config::default();
        let mut switcher = Workspaces::new(&config, &SwitcherTheme::new(&config));
        switcher.names = WorkspaceNames::new(names, None);
        switcher.service = Some(CompositorService {
            state,
            backend: CompositorChoice::Hyprland,
        });
        switcher.rebuild();
        switcher
    }

    fn changed(switcher: &mut Workspaces, state: CompositorState) -> Action {
        switcher.update(Message::Event(ServiceEvent::Update(
            CompositorEvent::StateChanged(state),
        )))
    }

    fn temp_names(test: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("wsswitch-switcher-{}-{test}", std::process::id()))
            .join("names.toml")
    }

    #[test]
    fn opposite_scrolls_both_switch() {
        let mut switcher = switcher(state(&[1, 2, 3], 2), vec![]);
        let t0 = Instant::now();
        let up = ScrollDelta::Lines { x: 0.0, y: 1.0 };
        let down = ScrollDelta::Lines { x: 0.0, y: -1.0 };

        assert!(matches!(switcher.scroll_at(down, t0), Action::Command(_)));
        assert!(matches!(
            switcher.scroll_at(down, t0 + Duration::from_millis(50)),
            Action::None
        ));
        assert!(matches!(
            switcher.scroll_at(up, t0 + Duration::from_millis(60)),
            Action::Command(_)
        ));
    }

    #[test]
    fn scrolling_targets_existing_neighbours() {
        let sparse = state(&[1, 3, 8], 1);
        assert_eq!(sparse.neighbour_of_active(1), Some(3));
        assert_eq!(sparse.neighbour_of_active(-1), None);

        let last = state(&[1, 3, 8], 8);
        assert_eq!(last.neighbour_of_active(1), None);
        assert_eq!(last.neighbour_of_active(-1), Some(3));
    }

    #[test]
    fn scrolling_past_the_last_workspace_does_nothing() {
        let mut switcher = switcher(state(&[1, 2], 2), vec![]);
        let down = ScrollDelta::Lines { x: 0.0, y: -1.0 };

        assert!(matches!(
            switcher.scroll_at(down, Instant::now()),
            Action::None
        ));
    }

    #[test]
    fn disabled_scrolling_does_nothing() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);
        switcher.scroll_behavior = ScrollBehavior::Disabled;

        let up = ScrollDelta::Pixels { x: 0.0, y: 4.0 };
        assert!(matches!(switcher.scroll_at(up, Instant::now()), Action::None));
    }

    #[test]
    fn rebuild_requests_are_coalesced() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        assert!(matches!(switcher.request_rebuild(), Action::Command(_)));
        assert!(matches!(switcher.request_rebuild(), Action::None));
        assert!(matches!(
            changed(&mut switcher, state(&[1, 2, 3], 1)),
            Action::None
        ));
        assert!(matches!(
            changed(&mut switcher, state(&[1, 2, 3, 4], 4)),
            Action::None
        ));

        switcher.update(Message::Rebuild);
        assert_eq!(switcher.buttons.len(), 4);
        assert!(switcher.buttons[3].is_active());
        assert!(!switcher.rebuild_queued);
    }

    #[test]
    fn workspace_count_change_requests_rebuild() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        assert!(matches!(
            changed(&mut switcher, state(&[1, 2, 3], 1)),
            Action::Command(_)
        ));
        assert_eq!(switcher.buttons.len(), 2);

        switcher.update(Message::Rebuild);
        assert_eq!(switcher.buttons.len(), 3);
    }

    #[test]
    fn reorder_requests_rebuild() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);
        assert!(matches!(
            changed(&mut switcher, state(&[2, 1], 1)),
            Action::Command(_)
        ));
    }

    #[test]
    fn active_change_moves_outline_without_rebuild() {
        let mut switcher = switcher(state(&[1, 2, 3], 1), vec![]);
        assert!(switcher.buttons[0].is_active());

        assert!(matches!(
            changed(&mut switcher, state(&[1, 2, 3], 3)),
            Action::None
        ));
        assert!(!switcher.buttons[0].is_active());
        assert!(switcher.buttons[2].is_active());
        assert!(!switcher.rebuild_queued);
    }

    #[test]
    fn new_window_updates_only_its_button() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);
        assert!(switcher.buttons[1].is_shaded());

        let mut next = state(&[1, 2], 1);
        next.workspaces[1].windows.push(CompositorWindow {
            id: "0xa".to_owned(),
            geometry: None,
            focused: true,
            minimized: false,
            skip_taskbar: false,
            interesting: true,
            last_interaction: 1,
        });

        assert!(matches!(changed(&mut switcher, next), Action::None));
        assert!(!switcher.buttons[1].is_shaded());
        assert!(switcher.buttons[0].is_shaded());
    }

    #[test]
    fn sole_workspace_is_never_removed() {
        let mut switcher = switcher(state(&[1], 1), vec!["Named".into()]);

        assert_eq!(switcher.removal(0), Removal::Ignore);
        assert!(matches!(
            switcher.remove_workspace_at_index(0),
            Action::None
        ));
        assert!(switcher.popup.is_none());
    }

    #[test]
    fn out_of_range_removal_is_ignored() {
        let switcher = switcher(state(&[1, 2], 1), vec![]);
        assert_eq!(switcher.removal(2), Removal::Ignore);
    }

    #[test]
    fn named_workspace_asks_for_confirmation() {
        let mut switcher = switcher(state(&[1, 2], 1), vec!["".into(), "Mail".into()]);

        assert_eq!(
            switcher.removal(1),
            Removal::Confirm {
                workspace_id: 2,
                name: "Mail".to_owned()
            }
        );
        assert!(matches!(
            switcher.update(Message::Clicked(1, mouse::Button::Middle)),
            Action::OpenPopup(_)
        ));
        assert!(matches!(switcher.popup, Some(Popup::ConfirmRemove { .. })));

        assert!(matches!(
            switcher.update(Message::ConfirmRemove),
            Action::ClosePopup(_)
        ));
        assert!(switcher.popup.is_none());
    }

    #[test]
    fn default_named_workspace_is_removed_at_once() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        assert_eq!(switcher.removal(0), Removal::Remove { index: 0 });
        assert!(matches!(
            switcher.update(Message::Clicked(0, mouse::Button::Middle)),
            Action::Command(_)
        ));
        assert!(switcher.popup.is_none());
    }

    #[test]
    fn remove_current_needs_two_workspaces() {
        let mut switcher = switcher(state(&[1], 1), vec![]);
        switcher.popup = Some(Popup::Menu);

        assert!(matches!(
            switcher.update(Message::RemoveCurrentWorkspace),
            Action::ClosePopup(_)
        ));
        assert!(switcher.popup.is_none());
    }

    #[test]
    fn rename_outcomes() {
        assert_eq!(rename_outcome("Mail", " Mail "), RenameOutcome::Unchanged);
        assert_eq!(rename_outcome("Mail", "   "), RenameOutcome::Unchanged);
        assert_eq!(
            rename_outcome("Workspace 2", " Chat "),
            RenameOutcome::Rename("Chat".to_owned())
        );
    }

    #[test]
    fn unchanged_rename_writes_nothing_but_rebuilds() {
        let path = temp_names("unchanged");
        let _ = fs::remove_dir_all(path.parent().unwrap());

        let mut switcher = switcher(state(&[1, 2], 2), vec![]);
        switcher.names = WorkspaceNames::load(path.clone());

        switcher.update(Message::RenameCurrentWorkspace);
        assert_eq!(
            switcher.popup,
            Some(Popup::Rename(RenameDialog::new(1, "Workspace 2".to_owned())))
        );

        switcher.update(Message::RenameInput("  Workspace 2 ".to_owned()));
        assert!(matches!(
            switcher.update(Message::RenameSubmit),
            Action::ClosePopup(_)
        ));

        assert!(!path.exists());
        assert!(switcher.rebuild_queued);
        assert!(switcher.popup.is_none());
    }

    #[test]
    fn rename_persists_and_rebuilds() {
        let path = temp_names("rename");
        let _ = fs::remove_dir_all(path.parent().unwrap());

        let mut switcher = switcher(state(&[1, 2, 3], 3), vec![]);
        switcher.names = WorkspaceNames::load(path.clone());

        switcher.update(Message::RenameCurrentWorkspace);
        switcher.update(Message::RenameInput(" Chat".to_owned()));
        switcher.update(Message::RenameSubmit);
        switcher.update(Message::Rebuild);

        assert_eq!(switcher.names.stored(), &["", "", "Chat"]);
        assert_eq!(switcher.buttons[2].name(), "Chat");
        assert_eq!(WorkspaceNames::load(path.clone()).name(2), "Chat");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn cancelled_rename_still_rebuilds() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        switcher.update(Message::RenameCurrentWorkspace);
        switcher.update(Message::RenameInput("Other".to_owned()));
        switcher.update(Message::RenameCancel);

        assert!(switcher.rebuild_queued);
        assert!(switcher.names.stored().is_empty());
    }

    #[test]
    fn external_name_edit_relabels_without_rebuild() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        switcher.update(Message::NamesChanged(vec!["Web".into()]));

        assert_eq!(switcher.buttons[0].name(), "Web");
        assert_eq!(switcher.buttons[1].name(), "Workspace 2");
        assert!(!switcher.rebuild_queued);
    }

    #[test]
    fn edit_mode_toggles_reactivity() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);
        assert!(switcher.buttons.iter().all(WorkspaceButton::is_reactive));

        switcher.set_reactive(false);
        assert!(!switcher.buttons.iter().any(WorkspaceButton::is_reactive));

        switcher.set_reactive(true);
        assert!(switcher.buttons.iter().all(WorkspaceButton::is_reactive));
    }

    #[test]
    fn edit_mode_follows_config_reload() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);
        let editing = Config {
            panel_edit_mode: true,
            ..Config::default()
        };
        let theme = SwitcherTheme::new(&editing);

        assert!(matches!(
            switcher.set_config(&editing, &theme, false),
            Action::None
        ));
        assert!(!switcher.buttons.iter().any(WorkspaceButton::is_reactive));

        switcher.set_config(&Config::default(), &theme, false);
        assert!(switcher.buttons.iter().all(WorkspaceButton::is_reactive));
        assert!(!switcher.rebuild_queued);
    }

    #[test]
    fn dismissing_rename_dialog_rebuilds() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        switcher.update(Message::RenameCurrentWorkspace);
        assert!(matches!(
            switcher.update(Message::ClosePopup),
            Action::ClosePopup(_)
        ));
        assert!(switcher.popup.is_none());
        assert!(switcher.rebuild_queued);
    }

    #[test]
    fn dismissing_menu_does_not_rebuild() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        switcher.update(Message::OpenMenu);
        switcher.update(Message::ClosePopup);
        assert!(!switcher.rebuild_queued);
    }

    #[test]
    fn overview_entry_closes_the_menu() {
        let mut switcher = switcher(state(&[1, 2], 1), vec![]);

        switcher.update(Message::OpenMenu);
        assert!(switcher.is_menu_open());
        assert!(matches!(
            switcher.update(Message::ToggleOverview),
            Action::ClosePopup(_)
        ));
        assert!(switcher.popup.is_none());
    }
}

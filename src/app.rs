use crate::{
    config::{self, Config, Position},
    get_log_spec,
    menu::{self, Placement, PopupSurface},
    modules::workspaces::{self, Action, Workspaces},
    theme::SwitcherTheme,
};
use flexi_logger::LoggerHandle;
use iced::{
    Color, Element, Length, Subscription, Task, Theme,
    daemon::Appearance,
    platform_specific::shell::commands::layer_surface::{
        Anchor, KeyboardInteractivity, Layer, destroy_layer_surface, get_layer_surface,
    },
    runtime::platform_specific::wayland::layer_surface::{IcedOutput, SctkLayerSurfaceSettings},
    widget::{Row, container},
    window::Id,
};
use log::{debug, info};
use std::path::PathBuf;

pub struct App {
    config_path: PathBuf,
    config: Config,
    theme: SwitcherTheme,
    logger: LoggerHandle,
    bar_id: Id,
    popup: PopupSurface,
    workspaces: Workspaces,
}

#[derive(Debug, Clone)]
pub enum Message {
    None,
    ConfigChanged(Box<Config>),
    Workspaces(workspaces::Message),
}

fn bar_surface<Message: 'static>(config: &Config) -> (Id, Task<Message>) {
    let id = Id::unique();
    let size = config.size;
    let (anchor, surface_size) = match config.position {
        Position::Top => (Anchor::TOP | Anchor::LEFT | Anchor::RIGHT, (None, Some(size))),
        Position::Bottom => (
            Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT,
            (None, Some(size)),
        ),
        Position::Left => (Anchor::LEFT | Anchor::TOP | Anchor::BOTTOM, (Some(size), None)),
        Position::Right => (
            Anchor::RIGHT | Anchor::TOP | Anchor::BOTTOM,
            (Some(size), None),
        ),
    };

    let task = get_layer_surface(SctkLayerSurfaceSettings {
        id,
        namespace: "wsswitch".to_string(),
        size: Some(surface_size),
        layer: Layer::Bottom,
        pointer_interactivity: true,
        keyboard_interactivity: KeyboardInteractivity::None,
        exclusive_zone: size as i32,
        output: IcedOutput::Active,
        anchor,
        ..Default::default()
    });

    (id, task)
}

impl App {
    pub fn new(
        (logger, config, config_path): (LoggerHandle, Config, PathBuf),
    ) -> impl FnOnce() -> (Self, Task<Message>) {
        move || {
            let theme = SwitcherTheme::new(&config);
            let (bar_id, task) = bar_surface(&config);
            let workspaces = Workspaces::new(&config, &theme);

            (
                App {
                    config_path,
                    config,
                    theme,
                    logger,
                    bar_id,
                    popup: PopupSurface::default(),
                    workspaces,
                },
                task,
            )
        }
    }

    pub fn title(&self, _id: Id) -> String {
        String::from("wsswitch")
    }

    pub fn theme(&self, _id: Id) -> Theme {
        self.theme.get_theme().clone()
    }

    pub fn style(&self, theme: &Theme) -> Appearance {
        Appearance {
            background_color: Color::TRANSPARENT,
            text_color: theme.palette().text,
            icon_color: theme.palette().text,
        }
    }

    fn refresh_config(&mut self, config: Box<Config>) -> Task<Message> {
        let rebuild = self.config.needs_rebuild(&config);
        let move_bar =
            self.config.position != config.position || self.config.size != config.size;

        self.logger.set_new_spec(get_log_spec(&config.log_level));
        self.theme = SwitcherTheme::new(&config);
        self.config = *config;

        let action = self.workspaces.set_config(&self.config, &self.theme, rebuild);

        let surface_task = if move_bar {
            debug!(
                "Moving panel to {:?} with size {}",
                self.config.position, self.config.size
            );
            let (bar_id, create) = bar_surface(&self.config);
            let destroy = destroy_layer_surface(self.bar_id);
            self.bar_id = bar_id;
            Task::batch([destroy, create])
        } else {
            Task::none()
        };

        Task::batch([surface_task, self.handle_action(action)])
    }

    fn handle_action(&mut self, action: Action) -> Task<Message> {
        match action {
            Action::None => Task::none(),
            Action::Command(task) => task.map(Message::Workspaces),
            Action::OpenPopup(task) => {
                Task::batch([self.popup.open(), task.map(Message::Workspaces)])
            }
            Action::ClosePopup(task) => {
                Task::batch([self.popup.close(), task.map(Message::Workspaces)])
            }
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::None => Task::none(),
            Message::ConfigChanged(config) => {
                info!("New config: {config:?}");
                self.refresh_config(config)
            }
            Message::Workspaces(message) => {
                let action = self.workspaces.update(message);
                self.handle_action(action)
            }
        }
    }

    pub fn view(&self, id: Id) -> Element<'_, Message> {
        if self.popup.id() == Some(id) {
            let placement = if self.workspaces.is_menu_open() {
                Placement::Panel(self.config.position)
            } else {
                Placement::Center
            };

            return match self.workspaces.popup_view(&self.theme) {
                Some(content) => menu::view(
                    content.map(Message::Workspaces),
                    placement,
                    &self.theme,
                    Message::None,
                    Message::Workspaces(workspaces::Message::ClosePopup),
                ),
                None => Row::new().into(),
            };
        }

        if id != self.bar_id {
            return Row::new().into();
        }

        container(self.workspaces.view(&self.theme).map(Message::Workspaces))
            .width(Length::Fill)
            .height(Length::Fill)
            .style(self.theme.bar_style())
            .into()
    }

    pub fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            config::subscription(&self.config_path),
            self.workspaces.subscription().map(Message::Workspaces),
        ])
    }
}

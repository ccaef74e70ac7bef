use super::types::{
    CompositorCommand, CompositorEvent, CompositorState, CompositorWindow, CompositorWorkspace,
};
use crate::services::{ServiceEvent, compositor::CompositorService};
use anyhow::Result;
use hyprland::{
    data::{Client, Clients, Monitors, Workspace, Workspaces},
    dispatch::{Dispatch, DispatchType, WorkspaceIdentifierWithSpecial},
    event_listener::AsyncEventListener,
    prelude::*,
};
use iced::Rectangle;
use itertools::Itertools;
use tokio::sync::broadcast;

pub async fn execute_command(cmd: CompositorCommand) -> Result<()> {
    match cmd {
        CompositorCommand::FocusWorkspace(id) => {
            Dispatch::call(DispatchType::Workspace(WorkspaceIdentifierWithSpecial::Id(
                id,
            )))?;
        }
        CompositorCommand::AddWorkspace => {
            Dispatch::call(DispatchType::Custom("workspace", "emptynm"))?;
        }
        CompositorCommand::RemoveWorkspace { id, fallback } => {
            let active = Workspace::get_active().ok().map(|w| w.id);

            for client in Clients::get()?
                .into_iter()
                .filter(|c| c.workspace.id == id)
            {
                let args = format!("{fallback},address:{}", client.address);
                Dispatch::call(DispatchType::Custom("movetoworkspacesilent", &args))?;
            }

            // an empty workspace only goes away once it is left
            if active == Some(id) {
                Dispatch::call(DispatchType::Workspace(WorkspaceIdentifierWithSpecial::Id(
                    fallback,
                )))?;
            }
        }
        CompositorCommand::ToggleOverview => {
            // provided by the hyprexpo plugin
            if let Err(e) = Dispatch::call(DispatchType::Custom("hyprexpo:expo", "toggle")) {
                log::warn!("Workspace overview unavailable, is hyprexpo loaded? {e}");
            }
        }
    }
    Ok(())
}

pub fn is_available() -> bool {
    const IPC_ENV_VAR: &str = "HYPRLAND_INSTANCE_SIGNATURE";
    std::env::var_os(IPC_ENV_VAR).is_some()
}

pub async fn run_listener(tx: &broadcast::Sender<ServiceEvent<CompositorService>>) -> Result<()> {
    match fetch_full_state() {
        Ok(state) => {
            let _ = tx.send(ServiceEvent::Update(CompositorEvent::StateChanged(state)));
        }
        Err(e) => {
            log::error!("Failed to fetch initial compositor state: {e}");
        }
    }

    let mut listener = AsyncEventListener::new();

    macro_rules! add_refresh_handler {
        ($method:ident) => {
            listener.$method({
                let tx = tx.clone();
                move |_| {
                    let tx = tx.clone();
                    Box::pin(async move {
                        match fetch_full_state() {
                            Ok(state) => {
                                let _ = tx.send(ServiceEvent::Update(
                                    CompositorEvent::StateChanged(state),
                                ));
                            }
                            Err(e) => log::warn!("Failed to refresh compositor state: {e}"),
                        }
                    })
                }
            });
        };
    }

    add_refresh_handler!(add_workspace_added_handler);
    add_refresh_handler!(add_workspace_changed_handler);
    add_refresh_handler!(add_workspace_deleted_handler);
    add_refresh_handler!(add_workspace_moved_handler);
    add_refresh_handler!(add_active_monitor_changed_handler);

    add_refresh_handler!(add_window_closed_handler);
    add_refresh_handler!(add_window_opened_handler);
    add_refresh_handler!(add_window_moved_handler);
    add_refresh_handler!(add_active_window_changed_handler);
    add_refresh_handler!(add_float_state_changed_handler);
    add_refresh_handler!(add_fullscreen_state_changed_handler);

    listener
        .start_listener_async()
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

/// Hyprland reports monitor modes in physical pixels, clients in logical ones.
fn logical_area(x: f32, y: f32, width: f32, height: f32, scale: f32) -> Rectangle {
    let scale = if scale > 0.0 { scale } else { 1.0 };
    Rectangle {
        x,
        y,
        width: width / scale,
        height: height / scale,
    }
}

/// `focus_history_id` counts up from 0 for the most recently focused client,
/// -1 means never focused.
fn interaction_stamp(clients: usize, focus_history_id: i64) -> u64 {
    if focus_history_id < 0 {
        0
    } else {
        (clients as i64 - focus_history_id).max(0) as u64
    }
}

fn fetch_full_state() -> Result<CompositorState> {
    let monitors = Monitors::get()?.into_iter().collect_vec();
    let clients = Clients::get()?.into_iter().collect_vec();
    let active_address = Client::get_active()
        .ok()
        .flatten()
        .map(|c| c.address.to_string());

    let client_count = clients.len();
    let workspaces = Workspaces::get()?
        .into_iter()
        .filter(|w| w.id >= 0)
        .sorted_by_key(|w| w.id)
        .map(|w| {
            let work_area = monitors
                .iter()
                .find(|m| m.name == w.monitor)
                .map(|m| {
                    logical_area(
                        m.x as f32,
                        m.y as f32,
                        m.width as f32,
                        m.height as f32,
                        m.scale as f32,
                    )
                })
                .unwrap_or_default();

            let windows = clients
                .iter()
                .filter(|c| c.workspace.id == w.id)
                .map(|c| {
                    let address = c.address.to_string();
                    CompositorWindow {
                        focused: active_address.as_deref() == Some(address.as_str()),
                        geometry: Some(Rectangle {
                            x: c.at.0 as f32,
                            y: c.at.1 as f32,
                            width: c.size.0 as f32,
                            height: c.size.1 as f32,
                        }),
                        minimized: c.hidden,
                        skip_taskbar: false,
                        interesting: c.mapped,
                        last_interaction: interaction_stamp(
                            client_count,
                            c.focus_history_id as i64,
                        ),
                        id: address,
                    }
                })
                .collect();

            CompositorWorkspace {
                id: w.id,
                work_area,
                windows,
            }
        })
        .collect();

    let active_workspace_id = Workspace::get_active().ok().map(|w| w.id);

    Ok(CompositorState {
        workspaces,
        active_workspace_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_area_is_logical() {
        let area = logical_area(1920.0, 0.0, 2880.0, 1800.0, 1.5);
        assert_eq!(area.x, 1920.0);
        assert_eq!(area.width, 1920.0);
        assert_eq!(area.height, 1200.0);
    }

    #[test]
    fn recent_focus_has_larger_stamp() {
        let latest = interaction_stamp(3, 0);
        let older = interaction_stamp(3, 2);
        assert!(latest > older);
        assert_eq!(interaction_stamp(3, -1), 0);
    }
}

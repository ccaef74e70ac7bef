use super::types::{
    CompositorCommand, CompositorEvent, CompositorService, CompositorState, CompositorWindow,
    CompositorWorkspace,
};
use crate::services::ServiceEvent;
use anyhow::{Context, Result, anyhow};
use iced::Rectangle;
use itertools::Itertools;
use niri_ipc::{
    Action, Event, Reply, Request, Response, Timestamp, WorkspaceReferenceArg,
    state::{EventStreamState, EventStreamStatePart},
};
use std::{collections::HashMap, env, os::unix::net::UnixStream as StdUnixStream};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    sync::broadcast,
};

pub async fn execute_command(cmd: CompositorCommand) -> Result<()> {
    match cmd {
        CompositorCommand::FocusWorkspace(id) => {
            let id = u64::try_from(id)
                .map_err(|_| anyhow!("Workspace ID {id} is out of range for Niri backend"))?;
            run_action(Action::FocusWorkspace {
                reference: WorkspaceReferenceArg::Id(id),
            })
            .await?;
        }
        CompositorCommand::AddWorkspace => {
            // niri keeps one empty workspace at the end of every output
            let Response::Workspaces(workspaces) = request(Request::Workspaces).await? else {
                return Err(anyhow!("Unexpected reply to workspaces request"));
            };
            let output = workspaces
                .iter()
                .find(|w| w.is_focused)
                .and_then(|w| w.output.clone());
            let last = workspaces
                .iter()
                .filter(|w| w.output == output)
                .map(|w| w.idx)
                .max()
                .ok_or_else(|| anyhow!("No workspace on the focused output"))?;
            run_action(Action::FocusWorkspace {
                reference: WorkspaceReferenceArg::Index(last),
            })
            .await?;
        }
        CompositorCommand::RemoveWorkspace { id, fallback } => {
            let id = u64::try_from(id)?;
            let fallback = u64::try_from(fallback)?;

            let Response::Workspaces(workspaces) = request(Request::Workspaces).await? else {
                return Err(anyhow!("Unexpected reply to workspaces request"));
            };
            let focused = workspaces.iter().any(|w| w.id == id && w.is_focused);

            let Response::Windows(windows) = request(Request::Windows).await? else {
                return Err(anyhow!("Unexpected reply to windows request"));
            };
            let window_ids = windows
                .iter()
                .filter(|w| w.workspace_id == Some(id))
                .map(|w| w.id);

            for action in removal_actions(window_ids, fallback, focused) {
                run_action(action).await?;
            }
        }
        CompositorCommand::ToggleOverview => {
            run_action(Action::ToggleOverview {}).await?;
        }
    }

    Ok(())
}

/// Moves every window out of a workspace, then leaves it if it has focus:
/// niri keeps the focused workspace even when it is empty.
fn removal_actions(
    window_ids: impl IntoIterator<Item = u64>,
    fallback: u64,
    focused: bool,
) -> Vec<Action> {
    let mut actions = window_ids
        .into_iter()
        .map(|window_id| Action::MoveWindowToWorkspace {
            window_id: Some(window_id),
            reference: WorkspaceReferenceArg::Id(fallback),
            focus: false,
        })
        .collect::<Vec<_>>();

    if focused {
        actions.push(Action::FocusWorkspace {
            reference: WorkspaceReferenceArg::Id(fallback),
        });
    }

    actions
}

pub fn is_available() -> bool {
    env::var_os("NIRI_SOCKET")
        .or_else(|| env::var_os("NIRI_SOCKET_PATH"))
        .is_some()
}

pub async fn run_listener(tx: &broadcast::Sender<ServiceEvent<CompositorService>>) -> Result<()> {
    let mut outputs = fetch_output_areas().await.unwrap_or_else(|e| {
        log::warn!("Failed to read niri outputs: {e}");
        HashMap::new()
    });

    let mut stream = connect().await?;

    let request_json = serde_json::to_string(&Request::EventStream)? + "\n";
    stream.write_all(request_json.as_bytes()).await?;
    stream.flush().await?;

    let mut reader = BufReader::new(stream);

    let mut line = String::new();
    reader.read_line(&mut line).await?;

    let reply: Reply = serde_json::from_str(&line).context("Failed to parse handshake")?;
    if let Err(e) = reply {
        return Err(anyhow!("Niri refused EventStream: {e}"));
    }

    let _ = reader.get_mut().shutdown().await;

    let mut internal_state = EventStreamState::default();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let event: Event = match serde_json::from_str(&line) {
            Ok(ev) => ev,
            Err(e) => {
                // niri only promises additive IPC changes, newer events are skipped
                log::debug!("Failed to parse niri event: {e:?}");
                continue;
            }
        };

        // outputs come and go with the workspaces living on them
        if matches!(event, Event::WorkspacesChanged { .. }) {
            match fetch_output_areas().await {
                Ok(areas) => outputs = areas,
                Err(e) => log::warn!("Failed to refresh niri outputs: {e}"),
            }
        }

        internal_state.apply(event);

        let state = map_state(&internal_state, &outputs);
        let _ = tx.send(ServiceEvent::Update(CompositorEvent::StateChanged(state)));
    }

    Ok(())
}

async fn connect() -> Result<UnixStream> {
    let socket_path = env::var_os("NIRI_SOCKET")
        .or_else(|| env::var_os("NIRI_SOCKET_PATH"))
        .ok_or_else(|| anyhow!("NIRI_SOCKET or NIRI_SOCKET_PATH environment variable not set"))?;

    let std_stream = StdUnixStream::connect(socket_path)?;
    std_stream.set_nonblocking(true)?;
    UnixStream::from_std(std_stream).context("Failed to convert stream")
}

async fn request(request: Request) -> Result<Response> {
    let mut stream = connect().await?;

    let mut json = serde_json::to_string(&request)?;
    json.push('\n');
    stream.write_all(json.as_bytes()).await?;
    stream.flush().await?;

    let mut reader = BufReader::new(stream);
    let mut response_line = String::new();
    reader.read_line(&mut response_line).await?;

    let reply: Reply = serde_json::from_str(&response_line)?;
    reply.map_err(|e| anyhow!("Niri error: {e}"))
}

async fn run_action(action: Action) -> Result<()> {
    request(Request::Action(action)).await.map(|_| ())
}

async fn fetch_output_areas() -> Result<HashMap<String, Rectangle>> {
    let Response::Outputs(outputs) = request(Request::Outputs).await? else {
        return Err(anyhow!("Unexpected reply to outputs request"));
    };

    Ok(outputs
        .into_iter()
        .filter_map(|(name, output)| {
            output.logical.map(|l| {
                (
                    name,
                    Rectangle {
                        x: l.x as f32,
                        y: l.y as f32,
                        width: l.width as f32,
                        height: l.height as f32,
                    },
                )
            })
        })
        .collect())
}

/// Places a tile given relative to the workspace view into global coordinates.
fn window_geometry(
    area: Rectangle,
    tile_pos: Option<(f64, f64)>,
    offset_in_tile: (f64, f64),
    window_size: (i32, i32),
) -> Option<Rectangle> {
    tile_pos.map(|(x, y)| Rectangle {
        x: area.x + (x + offset_in_tile.0) as f32,
        y: area.y + (y + offset_in_tile.1) as f32,
        width: window_size.0 as f32,
        height: window_size.1 as f32,
    })
}

/// Nanoseconds of the last focus, windows never focused fall back to their
/// id, which grows with every new window.
fn interaction_stamp(id: u64, focus: Option<Timestamp>) -> u64 {
    match focus {
        Some(ts) => ts
            .secs
            .saturating_mul(1_000_000_000)
            .saturating_add(u64::from(ts.nanos)),
        None => id,
    }
}

fn switcher_id(id: u64) -> Option<i32> {
    i32::try_from(id)
        .inspect_err(|_| log::warn!("Skipping niri workspace {id} with an out of range id"))
        .ok()
}

fn map_state(niri: &EventStreamState, outputs: &HashMap<String, Rectangle>) -> CompositorState {
    let workspaces = niri
        .workspaces
        .workspaces
        .values()
        .sorted_by_key(|w| (w.output.clone(), w.idx))
        .filter_map(|w| {
            let id = switcher_id(w.id)?;

            let work_area = w
                .output
                .as_ref()
                .and_then(|o| outputs.get(o))
                .copied()
                .unwrap_or_default();

            let windows = niri
                .windows
                .windows
                .values()
                .filter(|win| win.workspace_id == Some(w.id))
                .map(|win| CompositorWindow {
                    id: win.id.to_string(),
                    geometry: window_geometry(
                        work_area,
                        win.layout.tile_pos_in_workspace_view,
                        win.layout.window_offset_in_tile,
                        win.layout.window_size,
                    ),
                    focused: win.is_focused,
                    minimized: false,
                    skip_taskbar: false,
                    interesting: true,
                    last_interaction: interaction_stamp(win.id, win.focus_timestamp),
                })
                .collect();

            Some(CompositorWorkspace {
                id,
                work_area,
                windows,
            })
        })
        .collect();

    let active_workspace_id = niri
        .workspaces
        .workspaces
        .values()
        .find(|w| w.is_focused)
        .and_then(|w| switcher_id(w.id));

    CompositorState {
        workspaces,
        active_workspace_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_are_offset_by_output_origin() {
        let area = Rectangle {
            x: 1920.0,
            y: 0.0,
            width: 2560.0,
            height: 1440.0,
        };
        let geometry = window_geometry(area, Some((16.0, 16.0)), (2.0, 2.0), (800, 600));

        assert_eq!(
            geometry,
            Some(Rectangle {
                x: 1938.0,
                y: 18.0,
                width: 800.0,
                height: 600.0,
            })
        );
    }

    #[test]
    fn offscreen_tiles_have_no_geometry() {
        assert_eq!(
            window_geometry(Rectangle::default(), None, (0.0, 0.0), (800, 600)),
            None
        );
    }

    #[test]
    fn removing_focused_workspace_moves_windows_then_leaves_it() {
        let actions = removal_actions([7, 9], 2, true);

        assert_eq!(actions.len(), 3);
        assert!(matches!(
            actions[0],
            Action::MoveWindowToWorkspace {
                window_id: Some(7),
                reference: WorkspaceReferenceArg::Id(2),
                focus: false,
            }
        ));
        assert!(matches!(
            actions[2],
            Action::FocusWorkspace {
                reference: WorkspaceReferenceArg::Id(2)
            }
        ));
    }

    #[test]
    fn removing_background_workspace_keeps_focus() {
        let actions = removal_actions([7], 2, false);

        assert_eq!(actions.len(), 1);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, Action::FocusWorkspace { .. })));
    }

    #[test]
    fn recent_focus_beats_newer_window() {
        let old_but_used = interaction_stamp(
            3,
            Some(Timestamp {
                secs: 120,
                nanos: 5,
            }),
        );
        let new_but_idle = interaction_stamp(
            40,
            Some(Timestamp {
                secs: 100,
                nanos: 0,
            }),
        );
        let never_focused = interaction_stamp(41, None);

        assert!(old_but_used > new_but_idle);
        assert!(new_but_idle > never_focused);
        assert_eq!(old_but_used, 120_000_000_005);
    }

    #[test]
    fn oversized_workspace_ids_are_skipped() {
        assert_eq!(switcher_id(12), Some(12));
        assert_eq!(switcher_id(u64::from(u32::MAX)), None);
    }

    #[test]
    fn empty_state_maps_to_no_workspaces() {
        let state = map_state(&EventStreamState::default(), &HashMap::new());
        assert!(state.workspaces.is_empty());
        assert_eq!(state.active_workspace_id, None);
    }
}

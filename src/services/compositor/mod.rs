pub mod hyprland;
pub mod niri;
pub mod types;

pub use self::types::{
    CompositorChoice, CompositorCommand, CompositorEvent, CompositorService, CompositorState,
    CompositorWindow, CompositorWorkspace,
};

use crate::services::{ReadOnlyService, Service, ServiceEvent, throttle::ThrottleExt};
use iced::{
    Subscription, Task,
    futures::{SinkExt, StreamExt, future, stream},
    stream::channel,
};
use std::{any::TypeId, time::Duration};
use tokio::sync::broadcast;

// Dragging a window emits a burst of events, one snapshot per frame is plenty
const STATE_THROTTLE: Duration = Duration::from_millis(16);

impl CompositorService {
    fn detect() -> Option<CompositorChoice> {
        if hyprland::is_available() {
            Some(CompositorChoice::Hyprland)
        } else if niri::is_available() {
            Some(CompositorChoice::Niri)
        } else {
            None
        }
    }
}

impl ReadOnlyService for CompositorService {
    type UpdateEvent = CompositorEvent;
    type Error = String;

    fn update(&mut self, event: Self::UpdateEvent) {
        match event {
            CompositorEvent::StateChanged(new_state) => {
                self.state = new_state;
            }
            CompositorEvent::ActionPerformed => {}
        }
    }

    fn subscribe() -> Subscription<ServiceEvent<Self>> {
        let id = TypeId::of::<Self>();

        Subscription::run_with_id(
            id,
            channel(10, async move |mut output| {
                let Some(backend) = CompositorService::detect() else {
                    log::warn!("No supported compositor backend found (Hyprland or Niri)");
                    let _ = output
                        .send(ServiceEvent::Error(
                            "No supported compositor backend found".to_string(),
                        ))
                        .await;
                    return;
                };
                log::info!("Using {backend:?} compositor backend");

                let _ = output
                    .send(ServiceEvent::Init(CompositorService {
                        state: CompositorState::default(),
                        backend,
                    }))
                    .await;

                let (tx, rx) = broadcast::channel(64);
                let listener = async move {
                    match backend {
                        CompositorChoice::Hyprland => hyprland::run_listener(&tx).await,
                        CompositorChoice::Niri => niri::run_listener(&tx).await,
                    }
                };

                let mut events = stream::unfold(rx, |mut rx| async move {
                    loop {
                        match rx.recv().await {
                            Ok(event) => return Some((event, rx)),
                            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                                log::debug!("Compositor listener lagged by {skipped} events");
                            }
                            Err(broadcast::error::RecvError::Closed) => return None,
                        }
                    }
                })
                .throttle(STATE_THROTTLE)
                .boxed();

                let forward = async {
                    while let Some(event) = events.next().await {
                        let _ = output.send(event).await;
                    }
                };

                let (res, ()) = future::join(listener, forward).await;
                if let Err(e) = res {
                    log::error!("Failed to listen to compositor: {e}");
                    let _ = output.send(ServiceEvent::Error(e.to_string())).await;
                }
            }),
        )
    }
}

impl Service for CompositorService {
    type Command = CompositorCommand;

    fn command(&mut self, command: Self::Command) -> Task<ServiceEvent<Self>> {
        let choice = self.backend;
        Task::perform(
            async move {
                match choice {
                    CompositorChoice::Hyprland => hyprland::execute_command(command)
                        .await
                        .map_err(|e| e.to_string()),
                    CompositorChoice::Niri => niri::execute_command(command)
                        .await
                        .map_err(|e| e.to_string()),
                }
            },
            |res| match res {
                Ok(_) => ServiceEvent::Update(CompositorEvent::ActionPerformed),
                Err(e) => ServiceEvent::Error(e),
            },
        )
    }
}

use iced::futures::{SinkExt, Stream, StreamExt, channel::mpsc};
use inotify::{EventMask, Inotify, WatchMask};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileEvent {
    Changed,
    Removed,
}

/// Watches a single file, following it through create, replace and delete.
///
/// Editors often write by moving a temporary file over the target, so a
/// missing file is watched through its parent directory until it shows up.
pub fn watch_file(path: PathBuf) -> impl Stream<Item = FileEvent> {
    let (mut tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        loop {
            match wait_for_change(&path).await {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to watch {path:?}: {e}");
                    sleep(Duration::from_secs(5)).await;
                }
            }
        }
    });

    rx
}

async fn wait_for_change(path: &Path) -> anyhow::Result<FileEvent> {
    let inotify = Inotify::init()?;
    let file_name = path.file_name().map(OsStr::to_owned);

    if path.exists() {
        log::debug!("watch path {path:?}");
        inotify.watches().add(
            path,
            WatchMask::MODIFY
                .union(WatchMask::CLOSE_WRITE)
                .union(WatchMask::DELETE_SELF)
                .union(WatchMask::MOVE_SELF),
        )?;
    } else {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("{path:?} has no parent directory"))?;
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("watch directory {parent:?}");
        inotify.watches().add(
            parent,
            WatchMask::CREATE
                .union(WatchMask::MOVED_TO)
                .union(WatchMask::CLOSE_WRITE),
        )?;
    }

    let mut buffer = [0; 1024];
    let mut stream = inotify.into_event_stream(&mut buffer)?;

    while let Some(event) = stream.next().await {
        let event = event?;
        log::debug!("inotify event {event:?}");

        if event.mask.intersects(EventMask::DELETE_SELF | EventMask::MOVE_SELF) {
            return Ok(FileEvent::Removed);
        }

        match event.name {
            // directory watch, only our file matters
            Some(name) if Some(name.as_os_str()) == file_name.as_deref() => {
                return Ok(FileEvent::Changed);
            }
            Some(_) => {}
            None if event
                .mask
                .intersects(EventMask::MODIFY | EventMask::CLOSE_WRITE) =>
            {
                // let the writer finish before anyone reads the file
                sleep(Duration::from_millis(200)).await;
                return Ok(FileEvent::Changed);
            }
            None => {}
        }
    }

    Err(anyhow::anyhow!("inotify stream for {path:?} ended"))
}

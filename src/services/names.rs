use crate::watch::{FileEvent, watch_file};
use anyhow::{Context, Result, bail};
use iced::{Subscription, futures::StreamExt};
use serde::{Deserialize, Serialize};
use std::{
    any::TypeId,
    env, fs,
    path::{Path, PathBuf},
};

const NAMES_FILE: &str = "wsswitch/names.toml";

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
struct NamesFile {
    #[serde(default)]
    names: Vec<String>,
}

/// User assigned workspace names, stored by workspace index.
///
/// A blank or missing entry means the workspace keeps its generated name.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceNames {
    names: Vec<String>,
    path: Option<PathBuf>,
}

pub fn default_path() -> PathBuf {
    let state_dir = env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .unwrap_or_else(|| shellexpand::path::tilde("~/.local/state").into_owned());

    state_dir.join(NAMES_FILE)
}

pub fn default_name(index: usize) -> String {
    format!("Workspace {}", index + 1)
}

fn read_names(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))?;
    let file: NamesFile =
        toml::from_str(&content).with_context(|| format!("Failed to parse {path:?}"))?;

    Ok(file.names)
}

impl WorkspaceNames {
    pub fn new(names: Vec<String>, path: Option<PathBuf>) -> Self {
        Self { names, path }
    }

    pub fn load(path: PathBuf) -> Self {
        let names = read_names(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load workspace names: {e:#}");
            Vec::new()
        });

        Self::new(names, Some(path))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn stored(&self) -> &[String] {
        &self.names
    }

    /// Replaces the in-memory list after an external edit of the storage.
    pub fn replace(&mut self, names: Vec<String>) -> bool {
        if self.names == names {
            false
        } else {
            self.names = names;
            true
        }
    }

    pub fn name(&self, index: usize) -> String {
        match self.names.get(index).map(|n| n.trim()) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => default_name(index),
        }
    }

    pub fn has_default_name(&self, index: usize) -> bool {
        self.name(index) == default_name(index)
    }

    /// Stores `name` for the workspace at `index` and persists the list.
    ///
    /// The list is padded with blank entries up to `workspace_count` first.
    pub fn set(&mut self, index: usize, name: &str, workspace_count: usize) -> Result<()> {
        if self.names.len() < workspace_count {
            self.names.resize(workspace_count, String::new());
        }

        if index >= workspace_count {
            bail!(
                "Workspace index {index} out of bounds for names list (length: {}, workspaces: {workspace_count})",
                self.names.len()
            );
        }

        self.names[index] = name.to_owned();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {parent:?}"))?;
        }

        let content = toml::to_string(&NamesFile {
            names: self.names.clone(),
        })?;
        fs::write(path, content).with_context(|| format!("Failed to write {path:?}"))?;

        log::debug!("Workspace names saved to {path:?}");

        Ok(())
    }
}

/// Emits the stored list every time the storage file changes on disk.
pub fn subscription(path: PathBuf) -> Subscription<Vec<String>> {
    let id = (TypeId::of::<WorkspaceNames>(), path.clone());

    Subscription::run_with_id(
        id,
        watch_file(path.clone()).filter_map(move |event| {
            let path = path.clone();
            async move {
                if event == FileEvent::Removed {
                    log::info!("Workspace names file removed");
                }
                match read_names(&path) {
                    Ok(names) => Some(names),
                    Err(e) => {
                        log::warn!("Failed to reload workspace names: {e:#}");
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

    fn temp_path(test: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("wsswitch-names-{}-{test}", std::process::id()))
            .join("names.toml")
    }

    #[test]
    fn blank_entries_fall_back_to_generated_names() {
        let names = WorkspaceNames::new(vec!["Web".into(), "  ".into()], None);

        assert_eq!(names.name(0), "Web");
        assert_eq!(names.name(1), "Workspace 2");
        assert_eq!(names.name(7), "Workspace 8");
        assert!(!names.has_default_name(0));
        assert!(names.has_default_name(1));
    }

    #[test]
    fn explicit_default_text_counts_as_default() {
        let names = WorkspaceNames::new(vec!["Workspace 1".into()], None);
        assert!(names.has_default_name(0));
    }

    #[test]
    fn set_pads_list_to_workspace_count() {
        let mut names = WorkspaceNames::new(vec![], None);
        names.set(2, "Mail", 4).unwrap();

        assert_eq!(names.stored(), &["", "", "Mail", ""]);
        assert_eq!(names.name(2), "Mail");
    }

    #[test]
    fn set_rejects_out_of_range_index() {
        let mut names = WorkspaceNames::new(vec![], None);
        assert!(names.set(3, "Mail", 3).is_err());
    }

    #[test]
    fn set_persists_and_reloads() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        let mut names = WorkspaceNames::load(path.clone());
        names.set(1, "Chat", 2).unwrap();

        let reloaded = WorkspaceNames::load(path.clone());
        assert_eq!(reloaded.name(1), "Chat");
        assert_eq!(reloaded.name(0), "Workspace 1");

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_loads_empty() {
        let names = WorkspaceNames::load(temp_path("missing"));
        assert!(names.stored().is_empty());
    }
}

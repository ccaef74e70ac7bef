use iced::Rectangle;

#[derive(Debug, Clone, PartialEq)]
pub struct CompositorWindow {
    pub id: String,
    /// Buffer rectangle in global logical coordinates, `None` when the
    /// compositor does not currently place the window on screen.
    pub geometry: Option<Rectangle>,
    pub focused: bool,
    pub minimized: bool,
    pub skip_taskbar: bool,
    pub interesting: bool,
    /// Larger means more recently used.
    pub last_interaction: u64,
}

impl CompositorWindow {
    /// Windows that count as "something is on this workspace".
    pub fn is_listed(&self) -> bool {
        self.interesting && !self.skip_taskbar && !self.minimized
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositorWorkspace {
    pub id: i32,
    pub work_area: Rectangle,
    pub windows: Vec<CompositorWindow>,
}

impl CompositorWorkspace {
    pub fn has_listed_windows(&self) -> bool {
        self.windows.iter().any(CompositorWindow::is_listed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositorState {
    /// Ordered as the compositor presents them, position is the switcher index.
    pub workspaces: Vec<CompositorWorkspace>,
    pub active_workspace_id: Option<i32>,
}

impl CompositorState {
    pub fn active_index(&self) -> Option<usize> {
        let active = self.active_workspace_id?;
        self.index_of(active)
    }

    pub fn index_of(&self, id: i32) -> Option<usize> {
        self.workspaces.iter().position(|w| w.id == id)
    }

    pub fn workspace_at(&self, index: usize) -> Option<&CompositorWorkspace> {
        self.workspaces.get(index)
    }

    /// Id of the workspace `step` places away from the active one, none past either end.
    pub fn neighbour_of_active(&self, step: i32) -> Option<i32> {
        let target = self.active_index()?.checked_add_signed(step as isize)?;
        self.workspace_at(target).map(|w| w.id)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompositorChoice {
    Hyprland,
    Niri,
}

#[derive(Debug, Clone)]
pub struct CompositorService {
    pub state: CompositorState,
    pub backend: CompositorChoice,
}

#[derive(Debug, Clone)]
pub enum CompositorEvent {
    ActionPerformed,
    StateChanged(CompositorState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositorCommand {
    FocusWorkspace(i32),
    AddWorkspace,
    /// Empties workspace `id` into `fallback`, the compositor then drops it.
    RemoveWorkspace { id: i32, fallback: i32 },
    ToggleOverview,
}

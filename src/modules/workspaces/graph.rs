use crate::{
    services::compositor::{CompositorWindow, CompositorWorkspace},
    theme::{GraphColors, Insets, SwitcherTheme},
};
use iced::{
    Element, Point, Rectangle, Renderer, Size, Theme,
    mouse::Cursor,
    widget::{
        canvas,
        canvas::{Cache, Geometry, Path, Program, Stroke},
        container,
    },
};

/// Panel geometry a workspace preview has to fit in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphLayout {
    pub vertical: bool,
    /// Thickness of the panel across its main axis.
    pub panel_extent: f32,
    pub panel_insets: Insets,
    pub graph_insets: Insets,
}

impl GraphLayout {
    pub fn new(theme: &SwitcherTheme) -> Self {
        Self {
            vertical: theme.bar_position.is_vertical(),
            panel_extent: theme.bar_size as f32,
            panel_insets: theme.panel_insets,
            graph_insets: theme.graph_insets,
        }
    }

    fn available(&self) -> f32 {
        self.panel_extent - self.panel_insets.across() - self.graph_insets.across()
    }
}

/// Workspace to preview scale factor and the preview size.
///
/// Horizontal panels fit the workspace height into the panel, vertical panels
/// its width. Returns `None` when there is nothing to fit into.
pub fn compute_scale(work_area: Rectangle, layout: &GraphLayout) -> Option<(f32, Size)> {
    let available = layout.available();
    if available <= 0.0 || work_area.width <= 0.0 || work_area.height <= 0.0 {
        return None;
    }

    if layout.vertical {
        let scale = work_area.width / available;
        Some((scale, Size::new(available, (work_area.height / scale).round())))
    } else {
        let scale = work_area.height / available;
        Some((scale, Size::new((work_area.width / scale).round(), available)))
    }
}

/// Maps a window rectangle into preview coordinates.
pub fn scale_rect(window: Rectangle, origin: Point, scale: f32) -> Rectangle {
    Rectangle {
        x: ((window.x - origin.x) / scale).round().max(0.0),
        y: ((window.y - origin.y) / scale).round().max(0.0),
        width: (window.width / scale).round(),
        height: (window.height / scale).round(),
    }
}

/// Listed windows, least recently used first, the focused one always last.
pub fn paint_order(windows: &[CompositorWindow]) -> Vec<&CompositorWindow> {
    let mut listed = windows
        .iter()
        .filter(|w| w.is_listed())
        .collect::<Vec<_>>();
    listed.sort_by_key(|w| (w.focused, w.last_interaction));

    listed
}

pub struct WorkspaceGraph {
    work_area: Rectangle,
    windows: Vec<CompositorWindow>,
    // zero until the first layout pass
    scale: f32,
    size: Size,
    active: bool,
    cache: Cache,
}

impl WorkspaceGraph {
    pub fn new(workspace: &CompositorWorkspace) -> Self {
        Self {
            work_area: workspace.work_area,
            windows: workspace.windows.clone(),
            scale: 0.0,
            size: Size::ZERO,
            active: false,
            cache: Cache::new(),
        }
    }

    pub fn ensure_scale(&mut self, layout: &GraphLayout) {
        if self.scale > 0.0 {
            return;
        }

        match compute_scale(self.work_area, layout) {
            Some((scale, size)) => {
                self.scale = scale;
                self.size = size;
            }
            None => log::debug!("Cannot fit work area {:?} into the panel", self.work_area),
        }
        self.cache.clear();
    }

    pub fn update(&mut self, workspace: &CompositorWorkspace) {
        self.windows.clone_from(&workspace.windows);
        self.cache.clear();
    }

    pub fn activate(&mut self, active: bool) {
        self.active = active;
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg(test)]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Preview rectangles in paint order, paired with their focus state.
    pub fn scaled_windows(&self) -> Vec<(Rectangle, bool)> {
        if self.scale <= 0.0 {
            return Vec::new();
        }

        let origin = self.work_area.position();
        paint_order(&self.windows)
            .into_iter()
            .filter_map(|w| {
                w.geometry
                    .map(|rect| (scale_rect(rect, origin, self.scale), w.focused))
            })
            .collect()
    }

    pub fn view<'a, Message: 'a>(&'a self, theme: &SwitcherTheme) -> Element<'a, Message> {
        container(
            canvas(Painter {
                graph: self,
                colors: theme.graph,
            })
            .width(self.size.width)
            .height(self.size.height),
        )
        .padding(theme.graph_insets.padding)
        .style(theme.graph_style(self.active))
        .into()
    }
}

struct Painter<'a> {
    graph: &'a WorkspaceGraph,
    colors: GraphColors,
}

impl<Message> Program<Message> for Painter<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<Geometry> {
        let geometry = self.graph.cache.draw(renderer, bounds.size(), |frame| {
            for (rect, focused) in self.graph.scaled_windows() {
                let (border, background) = self.colors.for_window(focused);
                let path = Path::rectangle(rect.position(), rect.size());

                frame.fill(&path, background);
                frame.stroke(&path, Stroke::default().with_color(border).with_width(1.0));
            }
        });

        vec![geometry]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: &str, stamp: u64, focused: bool) -> CompositorWindow {
        CompositorWindow {
            id: id.to_owned(),
            geometry: Some(Rectangle::new(Point::ORIGIN, Size::new(100.0, 100.0))),
            focused,
            minimized: false,
            skip_taskbar: false,
            interesting: true,
            last_interaction: stamp,
        }
    }

    fn layout(vertical: bool) -> GraphLayout {
        GraphLayout {
            vertical,
            panel_extent: 34.0,
            panel_insets: Insets {
                padding: 2.0,
                border: 0.0,
            },
            graph_insets: Insets {
                padding: 2.0,
                border: 1.0,
            },
        }
    }

    #[test]
    fn horizontal_panel_fits_height() {
        let area = Rectangle::new(Point::ORIGIN, Size::new(1920.0, 1080.0));
        let (scale, size) = compute_scale(area, &layout(false)).unwrap();

        assert_eq!(scale, 45.0);
        assert_eq!(size, Size::new(43.0, 24.0));
    }

    #[test]
    fn vertical_panel_fits_width() {
        let area = Rectangle::new(Point::ORIGIN, Size::new(1920.0, 1080.0));
        let (scale, size) = compute_scale(area, &layout(true)).unwrap();

        assert_eq!(scale, 80.0);
        assert_eq!(size, Size::new(24.0, 14.0));
    }

    #[test]
    fn panel_too_thin_has_no_scale() {
        let area = Rectangle::new(Point::ORIGIN, Size::new(1920.0, 1080.0));
        let thin = GraphLayout {
            panel_extent: 8.0,
            ..layout(false)
        };
        assert!(compute_scale(area, &thin).is_none());
    }

    #[test]
    fn windows_are_scaled_relative_to_work_area() {
        let origin = Point::new(1920.0, 0.0);
        let rect = scale_rect(
            Rectangle::new(Point::new(2370.0, 90.0), Size::new(900.0, 450.0)),
            origin,
            45.0,
        );

        assert_eq!(rect, Rectangle::new(Point::new(10.0, 2.0), Size::new(20.0, 10.0)));
    }

    #[test]
    fn offscreen_origin_is_clamped() {
        let rect = scale_rect(
            Rectangle::new(Point::new(-300.0, -10.0), Size::new(900.0, 450.0)),
            Point::ORIGIN,
            45.0,
        );

        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, 20.0);
    }

    #[test]
    fn scaled_windows_are_stable_across_repaints() {
        let workspace = CompositorWorkspace {
            id: 1,
            work_area: Rectangle::new(Point::ORIGIN, Size::new(1920.0, 1080.0)),
            windows: vec![CompositorWindow {
                geometry: Some(Rectangle::new(
                    Point::new(450.0, 90.0),
                    Size::new(1000.0, 500.0),
                )),
                ..window("a", 1, false)
            }],
        };
        let mut graph = WorkspaceGraph::new(&workspace);
        assert!(graph.scaled_windows().is_empty());

        graph.ensure_scale(&layout(false));
        let first = graph.scaled_windows();
        graph.ensure_scale(&layout(false));

        assert_eq!(first, graph.scaled_windows());
        // 1000 / 45 = 22.2
        assert_eq!(first[0].0.width, 22.0);
        assert_eq!(first[0].0.height, 11.0);
    }

    #[test]
    fn focused_window_is_painted_last() {
        let windows = vec![
            window("w3", 5, true),
            window("w2", 20, false),
            window("w1", 10, false),
        ];

        let order = paint_order(&windows)
            .into_iter()
            .map(|w| w.id.as_str())
            .collect::<Vec<_>>();

        assert_eq!(order, ["w1", "w2", "w3"]);
    }

    #[test]
    fn unlisted_windows_are_not_painted() {
        let windows = vec![
            CompositorWindow {
                minimized: true,
                ..window("min", 1, false)
            },
            CompositorWindow {
                skip_taskbar: true,
                ..window("skip", 2, false)
            },
            CompositorWindow {
                interesting: false,
                ..window("boring", 3, false)
            },
            window("shown", 4, false),
        ];

        let order = paint_order(&windows);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].id, "shown");
    }
}

use std::collections::BTreeMap;

use hintkit_core_types::{HintPlacement, OverlayGeometry, RenderHandle, RenderPort, WindowId};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedHint {
    pub window: WindowId,
    pub top: f64,
    pub left: f64,
    pub z_index: i32,
    pub label: String,
    pub visible: bool,
    pub font: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedOverlay {
    pub window: WindowId,
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i32,
    pub attached: bool,
    pub background: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderedNotifier {
    pub window: WindowId,
    pub css: String,
    pub text: String,
}

/// [`RenderPort`] that keeps every live node in memory. Removed nodes are
/// dropped, so the maps always describe what is on the page.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    hints: BTreeMap<RenderHandle, RenderedHint>,
    overlays: BTreeMap<RenderHandle, RenderedOverlay>,
    notifiers: BTreeMap<RenderHandle, RenderedNotifier>,
    stylesheets: BTreeMap<WindowId, String>,
    rules: Vec<(WindowId, String)>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> RenderHandle {
        self.next_handle += 1;
        RenderHandle(self.next_handle)
    }

    pub fn hint(&self, handle: RenderHandle) -> Option<&RenderedHint> {
        self.hints.get(&handle)
    }

    /// Live hints in creation order.
    pub fn hints(&self) -> impl Iterator<Item = &RenderedHint> {
        self.hints.values()
    }

    /// Labels of the hints currently shown, in creation order.
    pub fn visible_labels(&self) -> Vec<String> {
        self.hints
            .values()
            .filter(|hint| hint.visible)
            .map(|hint| hint.label.clone())
            .collect()
    }

    pub fn overlay(&self, handle: RenderHandle) -> Option<&RenderedOverlay> {
        self.overlays.get(&handle)
    }

    pub fn attached_overlays(&self) -> Vec<&RenderedOverlay> {
        self.overlays.values().filter(|o| o.attached).collect()
    }

    pub fn notifier_text(&self) -> Option<&str> {
        self.notifiers.values().next().map(|n| n.text.as_str())
    }

    pub fn stylesheet(&self, window: WindowId) -> Option<&str> {
        self.stylesheets.get(&window).map(String::as_str)
    }

    pub fn rules(&self) -> &[(WindowId, String)] {
        &self.rules
    }

    /// No hint, overlay or notifier is left on the page.
    pub fn is_clean(&self) -> bool {
        self.hints.is_empty() && self.overlays.is_empty() && self.notifiers.is_empty()
    }
}

impl RenderPort for RecordingRenderer {
    fn ensure_stylesheet(&mut self, window: WindowId, css: &str) {
        self.stylesheets
            .entry(window)
            .or_insert_with(|| css.to_string());
    }

    fn insert_style_rule(&mut self, window: WindowId, rule: &str) {
        self.rules.push((window, rule.to_string()));
    }

    fn create_hint(&mut self, window: WindowId, placement: HintPlacement) -> RenderHandle {
        let handle = self.allocate();
        self.hints.insert(
            handle,
            RenderedHint {
                window,
                top: placement.top,
                left: placement.left,
                z_index: placement.z_index,
                label: String::new(),
                visible: true,
                font: None,
            },
        );
        handle
    }

    fn set_hint_label(&mut self, hint: RenderHandle, text: &str) {
        if let Some(hint) = self.hints.get_mut(&hint) {
            hint.label = text.to_string();
        }
    }

    fn set_hint_visible(&mut self, hint: RenderHandle, visible: bool) {
        if let Some(hint) = self.hints.get_mut(&hint) {
            hint.visible = visible;
        }
    }

    fn set_hint_font(&mut self, hint: RenderHandle, font: &str) {
        if let Some(hint) = self.hints.get_mut(&hint) {
            hint.font = Some(font.to_string());
        }
    }

    fn create_overlay(&mut self, window: WindowId, geometry: OverlayGeometry) -> RenderHandle {
        let handle = self.allocate();
        self.overlays.insert(
            handle,
            RenderedOverlay {
                window,
                top: geometry.top,
                left: geometry.left,
                width: geometry.width,
                height: geometry.height,
                z_index: geometry.z_index,
                attached: false,
                background: None,
            },
        );
        handle
    }

    fn attach_overlay(&mut self, overlay: RenderHandle) {
        if let Some(overlay) = self.overlays.get_mut(&overlay) {
            overlay.attached = true;
        }
    }

    fn detach_overlay(&mut self, overlay: RenderHandle) {
        if let Some(overlay) = self.overlays.get_mut(&overlay) {
            overlay.attached = false;
        }
    }

    fn set_overlay_background(&mut self, overlay: RenderHandle, color: &str) {
        if let Some(overlay) = self.overlays.get_mut(&overlay) {
            overlay.background = Some(color.to_string());
        }
    }

    fn create_notifier(&mut self, window: WindowId, css: &str) -> RenderHandle {
        let handle = self.allocate();
        self.notifiers.insert(
            handle,
            RenderedNotifier {
                window,
                css: css.to_string(),
                text: String::new(),
            },
        );
        handle
    }

    fn set_notifier_text(&mut self, notifier: RenderHandle, text: &str) {
        if let Some(notifier) = self.notifiers.get_mut(&notifier) {
            notifier.text = text.to_string();
        }
    }

    fn remove(&mut self, handle: RenderHandle) {
        self.hints.remove(&handle);
        self.overlays.remove(&handle);
        self.notifiers.remove(&handle);
    }
}

use std::collections::{BTreeMap, HashMap};

use hintkit_core_types::{
    ComputedStyle, DomError, DomPort, ElementId, MouseButton, MouseEventInit, MouseEventKind,
    Rect, Viewport, WindowId,
};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use tracing::debug;

use crate::errors::FixtureError;
use crate::page::PageFixture;

const MAX_FRAME_DEPTH: usize = 16;

/// A mouse event the engine dispatched, in dispatch order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchedEvent {
    pub element: ElementId,
    pub kind: String,
    pub button: u16,
    pub bubbles: bool,
    pub cancelable: bool,
}

impl DispatchedEvent {
    fn new(element: ElementId, event: MouseEventInit) -> Self {
        Self {
            element,
            kind: event.kind.as_str().to_string(),
            button: event.button.code(),
            bubbles: event.bubbles,
            cancelable: event.cancelable,
        }
    }

    pub fn is(&self, kind: MouseEventKind) -> bool {
        self.kind == kind.as_str()
    }

    pub fn is_auxiliary(&self) -> bool {
        self.button == MouseButton::Auxiliary.code()
    }
}

#[derive(Clone, Debug)]
enum FrameLink {
    Loaded(WindowId),
    Blocked(String),
}

#[derive(Clone, Debug)]
struct NodeRecord {
    tag: String,
    attrs: BTreeMap<String, String>,
    parent: Option<usize>,
    text: String,
    inner_text: String,
    style: ComputedStyle,
    rect: Option<Rect>,
    value: Option<String>,
    selection: Option<(usize, usize)>,
    content_editable: bool,
    frame: Option<String>,
}

struct FixtureWindow {
    url: Option<String>,
    viewport: Viewport,
    html: Html,
    nodes: Vec<NodeRecord>,
    frames: HashMap<usize, FrameLink>,
    active: Option<usize>,
}

/// Style state inherited down the tree while indexing.
#[derive(Clone)]
struct Inherited {
    displayed: bool,
    visibility: String,
    editable: bool,
}

/// In-memory document implementing [`DomPort`].
///
/// Element handles pack the window index in the high 32 bits and the
/// element's preorder index in the low 32 bits. Selector matching runs on the
/// parsed markup, so attribute removals are visible to reads but not to
/// `query_all`.
pub struct FixtureDocument {
    windows: Vec<FixtureWindow>,
    events: Vec<DispatchedEvent>,
    focus_log: Vec<ElementId>,
    blur_count: usize,
}

impl FixtureDocument {
    pub fn from_page(page: &PageFixture) -> Result<Self, FixtureError> {
        let mut document = Self {
            windows: Vec::new(),
            events: Vec::new(),
            focus_log: Vec::new(),
            blur_count: 0,
        };
        document.load_window(page, "top", 0)?;
        debug!(windows = document.windows.len(), "fixture document loaded");
        Ok(document)
    }

    pub fn from_html(html: &str) -> Result<Self, FixtureError> {
        Self::from_page(&PageFixture::new(html))
    }

    fn load_window(
        &mut self,
        page: &PageFixture,
        name: &str,
        depth: usize,
    ) -> Result<WindowId, FixtureError> {
        if depth > MAX_FRAME_DEPTH {
            return Err(FixtureError::FrameDepth(name.to_string()));
        }
        let html = Html::parse_document(&page.html);
        let mut nodes = Vec::new();
        let root = Inherited {
            displayed: true,
            visibility: "visible".to_string(),
            editable: false,
        };
        index_element(html.root_element(), None, &root, &mut nodes)?;

        let id = WindowId(self.windows.len() as u32);
        self.windows.push(FixtureWindow {
            url: page.url.clone(),
            viewport: page.viewport,
            html,
            nodes,
            frames: HashMap::new(),
            active: None,
        });

        let frame_nodes: Vec<(usize, String, bool)> = self.windows[id.0 as usize]
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| {
                node.frame
                    .clone()
                    .map(|name| (idx, name, node.attrs.contains_key("data-frame-blocked")))
            })
            .collect();
        for (idx, frame_name, blocked) in frame_nodes {
            let link = if blocked {
                FrameLink::Blocked(frame_name)
            } else if let Some(child) = page.frames.get(&frame_name) {
                FrameLink::Loaded(self.load_window(child, &frame_name, depth + 1)?)
            } else {
                continue;
            };
            self.windows[id.0 as usize].frames.insert(idx, link);
        }
        Ok(id)
    }

    fn encode(window: WindowId, index: usize) -> ElementId {
        ElementId((u64::from(window.0) << 32) | index as u64)
    }

    fn decode(element: ElementId) -> (usize, usize) {
        ((element.0 >> 32) as usize, (element.0 & 0xffff_ffff) as usize)
    }

    fn window(&self, window: WindowId) -> Option<&FixtureWindow> {
        self.windows.get(window.0 as usize)
    }

    fn node(&self, element: ElementId) -> Option<&NodeRecord> {
        let (window, index) = Self::decode(element);
        self.windows.get(window)?.nodes.get(index)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut NodeRecord> {
        let (window, index) = Self::decode(element);
        self.windows.get_mut(window)?.nodes.get_mut(index)
    }

    /// First element in any window whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.windows.iter().enumerate().find_map(|(w, window)| {
            window
                .nodes
                .iter()
                .position(|node| node.attrs.get("id").map(String::as_str) == Some(id))
                .map(|index| Self::encode(WindowId(w as u32), index))
        })
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    pub fn events_for(&self, element: ElementId) -> Vec<&DispatchedEvent> {
        self.events.iter().filter(|e| e.element == element).collect()
    }

    pub fn focus_log(&self) -> &[ElementId] {
        &self.focus_log
    }

    pub fn blur_count(&self) -> usize {
        self.blur_count
    }

    /// Text of a content-editable element, including pasted text.
    pub fn editable_text(&self, element: ElementId) -> Option<String> {
        self.node(element)
            .filter(|node| node.content_editable)
            .map(|node| node.text.clone())
    }
}

fn index_element(
    element: ElementRef<'_>,
    parent: Option<usize>,
    inherited: &Inherited,
    nodes: &mut Vec<NodeRecord>,
) -> Result<(), FixtureError> {
    let value = element.value();
    let tag = value.name().to_ascii_lowercase();
    let attrs: BTreeMap<String, String> = value
        .attrs()
        .map(|(name, val)| (name.to_ascii_lowercase(), val.to_string()))
        .collect();

    let mut style = ComputedStyle {
        visibility: inherited.visibility.clone(),
        ..ComputedStyle::default()
    };
    if let Some(inline) = attrs.get("style") {
        apply_inline_style(inline, &mut style);
    }
    if attrs.contains_key("hidden") {
        style.display = "none".to_string();
    }
    let displayed = inherited.displayed && style.display != "none";
    let rect = match (displayed, attrs.get("data-rect")) {
        (true, Some(raw)) => Some(parse_rect(raw)?),
        _ => None,
    };
    let editable = match attrs.get("contenteditable").map(|v| v.to_ascii_lowercase()) {
        Some(v) if v.is_empty() || v == "true" => true,
        Some(v) if v == "false" => false,
        _ => inherited.editable,
    };

    let text: String = element.text().collect();
    let inner_text = if displayed {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        String::new()
    };
    let field_value = match tag.as_str() {
        "input" => Some(attrs.get("value").cloned().unwrap_or_default()),
        "textarea" => Some(text.clone()),
        _ => None,
    };
    let frame = match tag.as_str() {
        "frame" | "iframe" => attrs.get("data-frame").cloned(),
        _ => None,
    };

    let index = nodes.len();
    nodes.push(NodeRecord {
        tag,
        attrs,
        parent,
        text,
        inner_text,
        style: style.clone(),
        rect,
        value: field_value,
        selection: None,
        content_editable: editable,
        frame,
    });

    let next = Inherited {
        displayed,
        visibility: style.visibility,
        editable,
    };
    for child in element.children().filter_map(ElementRef::wrap) {
        index_element(child, Some(index), &next, nodes)?;
    }
    Ok(())
}

fn apply_inline_style(inline: &str, style: &mut ComputedStyle) {
    for declaration in inline.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim().to_ascii_lowercase();
        match property.trim().to_ascii_lowercase().as_str() {
            "display" => style.display = value,
            "visibility" => style.visibility = value,
            "position" => style.position = value,
            _ => {}
        }
    }
}

fn parse_rect(raw: &str) -> Result<Rect, FixtureError> {
    let parts: Vec<f64> = raw
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|_| FixtureError::InvalidRect(raw.to_string()))?;
    match parts.as_slice() {
        [left, top, width, height] => Ok(Rect::new(*left, *top, *width, *height)),
        _ => Err(FixtureError::InvalidRect(raw.to_string())),
    }
}

impl DomPort for FixtureDocument {
    fn top_window(&self) -> WindowId {
        WindowId(0)
    }

    fn query_all(&self, window: WindowId, selector: &str) -> Result<Vec<ElementId>, DomError> {
        let win = self.window(window).ok_or(DomError::UnknownWindow(window))?;
        let parsed = Selector::parse(selector).map_err(|err| DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: format!("{err:?}"),
        })?;
        // Preorder over elements, the same order `index_element` assigns.
        let found = win
            .html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .enumerate()
            .filter(|(_, el)| parsed.matches(el))
            .map(|(index, _)| Self::encode(window, index))
            .collect();
        Ok(found)
    }

    fn content_window(&self, frame: ElementId) -> Result<Option<WindowId>, DomError> {
        let (window, index) = Self::decode(frame);
        let win = self
            .windows
            .get(window)
            .ok_or(DomError::UnknownElement(frame))?;
        match win.frames.get(&index) {
            Some(FrameLink::Loaded(child)) => Ok(Some(*child)),
            Some(FrameLink::Blocked(name)) => Err(DomError::FrameAccess(name.clone())),
            None => Ok(None),
        }
    }

    fn tag_name(&self, element: ElementId) -> String {
        self.node(element)
            .map(|node| node.tag.to_ascii_uppercase())
            .unwrap_or_default()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn text_content(&self, element: ElementId) -> String {
        self.node(element)
            .map(|node| node.text.clone())
            .unwrap_or_default()
    }

    fn inner_text(&self, element: ElementId) -> String {
        self.node(element)
            .map(|node| node.inner_text.clone())
            .unwrap_or_default()
    }

    fn computed_style(&self, element: ElementId) -> ComputedStyle {
        self.node(element)
            .map(|node| node.style.clone())
            .unwrap_or_default()
    }

    /// `data-rect` is in page coordinates; client rects subtract the scroll.
    fn client_rects(&self, element: ElementId) -> Vec<Rect> {
        let (window, _) = Self::decode(element);
        let Some(viewport) = self.windows.get(window).map(|w| w.viewport) else {
            return Vec::new();
        };
        self.node(element)
            .and_then(|node| node.rect)
            .map(|rect| {
                Rect::new(
                    rect.left - viewport.scroll_x,
                    rect.top - viewport.scroll_y,
                    rect.width,
                    rect.height,
                )
            })
            .into_iter()
            .collect()
    }

    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        self.client_rects(element).into_iter().next()
    }

    fn viewport(&self, window: WindowId) -> Viewport {
        self.window(window)
            .map(|w| w.viewport)
            .unwrap_or_default()
    }

    fn body(&self, window: WindowId) -> Option<ElementId> {
        let index = self
            .window(window)?
            .nodes
            .iter()
            .position(|node| node.tag == "body")?;
        Some(Self::encode(window, index))
    }

    fn base_url(&self, window: WindowId) -> Option<String> {
        self.window(window)?.url.clone()
    }

    fn image_map_areas(&self, window: WindowId, map_name: &str) -> Vec<ElementId> {
        let Some(win) = self.window(window) else {
            return Vec::new();
        };
        let Some(map) = win.nodes.iter().position(|node| {
            node.tag == "map" && node.attrs.get("name").map(String::as_str) == Some(map_name)
        }) else {
            return Vec::new();
        };
        let inside_map = |mut index: usize| loop {
            match win.nodes[index].parent {
                Some(parent) if parent == map => break true,
                Some(parent) => index = parent,
                None => break false,
            }
        };
        win.nodes
            .iter()
            .enumerate()
            .filter(|(index, node)| node.tag == "area" && inside_map(*index))
            .map(|(index, _)| Self::encode(window, index))
            .collect()
    }

    fn active_element(&self, window: WindowId) -> Option<ElementId> {
        let index = self.window(window)?.active?;
        Some(Self::encode(window, index))
    }

    fn is_content_editable(&self, element: ElementId) -> bool {
        self.node(element).map_or(false, |node| node.content_editable)
    }

    fn value(&self, element: ElementId) -> Option<String> {
        self.node(element)?.value.clone()
    }

    fn selection_range(&self, element: ElementId) -> Option<(usize, usize)> {
        self.node(element)?.selection
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attrs.remove(&name.to_ascii_lowercase());
        }
    }

    fn focus(&mut self, element: ElementId) {
        let (window, index) = Self::decode(element);
        if let Some(win) = self.windows.get_mut(window) {
            if index < win.nodes.len() {
                win.active = Some(index);
                self.focus_log.push(element);
            }
        }
    }

    fn blur_active(&mut self, window: WindowId) {
        if let Some(win) = self.windows.get_mut(window.0 as usize) {
            if win.active.take().is_some() {
                self.blur_count += 1;
            }
        }
    }

    fn dispatch_mouse_event(&mut self, element: ElementId, event: MouseEventInit) {
        debug!(%element, kind = event.kind.as_str(), "mouse event dispatched");
        self.events.push(DispatchedEvent::new(element, event));
    }

    fn set_value(&mut self, element: ElementId, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.value = Some(value.to_string());
        }
    }

    fn set_selection_range(&mut self, element: ElementId, start: usize, end: usize) {
        if let Some(node) = self.node_mut(element) {
            node.selection = Some((start, end));
        }
    }

    fn insert_text_at_caret(&mut self, window: WindowId, text: &str) {
        let Some(active) = self.active_element(window) else {
            return;
        };
        if let Some(node) = self.node_mut(active) {
            node.text.push_str(text);
            node.inner_text.push_str(text);
        }
    }
}

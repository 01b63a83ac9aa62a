use std::fmt;

use bitflags::bitflags;
use hintkit_core_types::{ElementId, Rect, RenderHandle, WindowId};
use serde::{Deserialize, Serialize};

/// Selection scope of one hint invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    All,
    Links,
    Images,
    Editable,
    Url,
}

impl Category {
    pub fn selector(&self) -> &'static str {
        match self {
            Category::All => {
                "a, textarea, select, input:not([type=hidden]), button, frame, iframe, \
                 [onclick], [onmousedown], [role=link], [role=option], [role=button], img"
            }
            Category::Links => "a",
            Category::Images => "img",
            Category::Editable => {
                "input:not([type=hidden]), input[type=text], input[type=password], \
                 input[type=search], textarea"
            }
            Category::Url => "[src], [href]",
        }
    }

    /// Categories whose resolution is left entirely to the caller.
    pub fn defers_to_caller(&self) -> bool {
        matches!(self, Category::Images | Category::Url)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::All => "all",
            Category::Links => "links",
            Category::Images => "images",
            Category::Editable => "editable",
            Category::Url => "url",
        };
        f.write_str(name)
    }
}

/// Labeling and matching strategy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Numeric,
    Letter,
}

bitflags! {
    /// How the caller intends to open the resolved element.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Default, Serialize, Deserialize)]
    pub struct OpenMode: u8 {
        const NORMAL = 0b001;
        const NEW_VIEW = 0b010;
        const NEW_WINDOW = 0b100;
    }
}

impl OpenMode {
    pub fn opens_elsewhere(&self) -> bool {
        self.intersects(OpenMode::NEW_VIEW | OpenMode::NEW_WINDOW)
    }
}

/// One actionable element during a session.
#[derive(Clone, Debug)]
pub struct HintNode {
    pub element: ElementId,
    pub window: WindowId,
    pub variant: Variant,
    pub label: String,
    pub hint: RenderHandle,
    pub rect: Rect,
    /// Unclamped page position of the element (rect plus document offsets).
    pub page_top: f64,
    pub page_left: f64,
    /// Clamped, collision-adjusted position the label was placed at.
    pub placed_top: f64,
    pub placed_left: f64,
    pub is_area: bool,
    pub overlay: Option<RenderHandle>,
}

/// Which primitive the caller (or `perform`) should apply to the element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    None,
    Click,
    ClickFocus,
    Focus,
    MouseDown,
    MouseOver,
    ActivateAllEvents,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::None => "none",
            ActionKind::Click => "click",
            ActionKind::ClickFocus => "click-focus",
            ActionKind::Focus => "focus",
            ActionKind::MouseDown => "mousedown",
            ActionKind::MouseOver => "mouseover",
            ActionKind::ActivateAllEvents => "activate-all-events",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of the resolved element.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementClass {
    None,
    Check,
    Click,
    Input,
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementClass::None => "none",
            ElementClass::Check => "check",
            ElementClass::Click => "click",
            ElementClass::Input => "input",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Resource {
    Url(String),
    /// Synthetic `@type` marker for targets without a URL.
    Marker(String),
    None,
    Unknown,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Url(url) => f.write_str(url),
            Resource::Marker(kind) => write!(f, "@{kind}"),
            Resource::None => f.write_str("none"),
            Resource::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub element: ElementId,
    pub class: ElementClass,
    pub kind: ActionKind,
    pub resource: Resource,
    /// Normalized URL of the element, reported even when `resource` is `none`.
    pub url: Option<String>,
    /// The engine already dispatched the primitive itself.
    pub performed: bool,
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.class, self.kind, self.resource)
    }
}

/// Result of the public engine operations.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "action", rename_all = "kebab-case")]
pub enum HintOutcome {
    /// An interactive session is live and waiting for input.
    Pending,
    /// Nothing matched; the caller shows a transient indication.
    NoHints,
    Action(ActionDescriptor),
}

impl HintOutcome {
    pub fn action(&self) -> Option<&ActionDescriptor> {
        match self {
            HintOutcome::Action(action) => Some(action),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, HintOutcome::Pending)
    }
}

/// Observable phase of the incremental matcher.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchState {
    Initial,
    Filtering,
    Resolved,
    Empty,
    Escaped,
}

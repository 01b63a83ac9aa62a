//! Active-selection tracking: which hint is emphasized and what the status
//! readout says about it.

use hintkit_core_types::{DomPort, ElementId, RenderPort, WindowId};

use crate::builder::create_overlay;
use crate::errors::HintResult;
use crate::labels;
use crate::matcher::{looks_numeric, word_position};
use crate::model::Variant;
use crate::policy::HintTheme;
use crate::resolver::link_url;
use crate::session::HintSession;

/// Tokens at or past this position never win the numeric tie-break.
const WORD_POSITION_LIMIT: usize = 37;

/// Emphasize `node_idx` and restore whichever node was emphasized before.
pub fn set_active(
    session: &mut HintSession,
    node_idx: usize,
    dom: &dyn DomPort,
    render: &mut dyn RenderPort,
    theme: &HintTheme,
) {
    if let Some(previous) = session.current.take() {
        if let Some(prev) = session.nodes.get(previous) {
            if let Some(overlay) = prev.overlay {
                if theme.mark_hints {
                    render.set_overlay_background(overlay, &theme.normal_color);
                } else {
                    render.detach_overlay(overlay);
                }
            }
            render.set_hint_font(prev.hint, &theme.font);
        }
    }

    let Some(node) = session.nodes.get_mut(node_idx) else {
        return;
    };
    let overlay = create_overlay(render, theme, node);
    if let Some(overlay) = overlay {
        if !theme.mark_hints {
            render.attach_overlay(overlay);
        }
        render.set_overlay_background(overlay, &theme.active_color);
    }
    render.set_hint_font(node.hint, &theme.big_font);
    let (element, window) = (node.element, node.window);
    session.current = Some(node_idx);

    if let Some(notifier) = session.notifier {
        render.set_notifier_text(notifier, &status_text(dom, element, window));
    }
}

/// One-line description of an element for the status readout.
pub fn status_text(dom: &dyn DomPort, element: ElementId, window: WindowId) -> String {
    if let Some(url) = link_url(dom, element, window) {
        return url;
    }
    let tag = dom.tag_name(element).to_lowercase();
    if let Some(name) = dom.attribute(element, "name").filter(|n| !n.is_empty()) {
        return format!("{tag}, name={name}");
    }
    let text = dom.inner_text(element);
    let text = text.replace("\n\r", "");
    let text = text.trim();
    if !text.is_empty() {
        return format!("{tag}: {text}");
    }
    if dom.has_attribute(element, "onclick") {
        format!("{tag}: onclick")
    } else if dom.has_attribute(element, "onmousedown") {
        format!("{tag}: onmousedown")
    } else {
        tag
    }
}

/// Index into `session.active` of the best candidate for `input`.
///
/// Letter labels are prefix-free, so the first survivor always wins. Numeric
/// sessions prefer the element whose text has a word starting with the typed
/// text at the lowest position, then relabel the survivors so a short number
/// picks among them.
pub fn better_match(
    session: &mut HintSession,
    input: &str,
    dom: &dyn DomPort,
    render: &mut dyn RenderPort,
    theme: &HintTheme,
) -> HintResult<usize> {
    if session.variant == Variant::Letter || looks_numeric(input) {
        return Ok(0);
    }

    let mut best = 0;
    if !input.is_empty() {
        let mut best_position = WORD_POSITION_LIMIT;
        for (idx, node) in session.active_nodes().enumerate() {
            if best_position == 0 {
                break;
            }
            let text = dom.text_content(node.element);
            if let Some(position) = word_position(&text, input, best_position) {
                best = idx;
                best_position = position;
            }
        }
    }

    relabel_active(session, render, theme)?;
    Ok(best)
}

/// Recompute labels over the active nodes only.
pub fn relabel_active(
    session: &mut HintSession,
    render: &mut dyn RenderPort,
    theme: &HintTheme,
) -> HintResult<()> {
    let labels = labels::generate(session.active.len(), session.variant, &theme.alphabet)?;
    for (&idx, label) in session.active.iter().zip(labels) {
        let node = &mut session.nodes[idx];
        render.set_hint_label(node.hint, &label);
        node.label = label;
    }
    Ok(())
}

/// Move the emphasis one step through the active nodes, wrapping at both ends.
pub fn cycle(
    session: &mut HintSession,
    forward: bool,
    dom: &dyn DomPort,
    render: &mut dyn RenderPort,
    theme: &HintTheme,
) {
    let len = session.active.len();
    if len == 0 {
        return;
    }
    let current = session.active_index.min(len - 1);
    let next = if forward {
        (current + 1) % len
    } else {
        (current + len - 1) % len
    };
    session.active_index = next;
    let node_idx = session.active[next];
    set_active(session, node_idx, dom, render, theme);
}

use hintkit_core_types::{DomPort, ElementId, WindowId};
use tracing::{debug, warn};

const TEXT_FIELD_SELECTOR: &str = "input[type=text], input[type=password], textarea";
pub const FOCUS_OUTLINE_RULE: &str = "input:focus { outline: 2px solid #1793d1; }";

/// Insert `text` at the caret of the focused field of `window`, replacing the
/// selection. Returns whether anything was inserted.
pub fn paste_primary(dom: &mut dyn DomPort, window: WindowId, text: &str) -> bool {
    let Some(active) = dom.active_element(window) else {
        debug!("paste skipped: nothing focused");
        return false;
    };
    let tag = dom.tag_name(active).to_ascii_lowercase();
    if tag == "input" || tag == "textarea" {
        let value: Vec<char> = dom.value(active).unwrap_or_default().chars().collect();
        let len = value.len();
        let (start, end) = dom.selection_range(active).unwrap_or((len, len));
        let start = start.min(len);
        let end = end.clamp(start, len);

        let mut updated: String = value[..start].iter().collect();
        updated.push_str(text);
        updated.extend(&value[end..]);
        dom.set_value(active, &updated);

        let caret = start + text.chars().count();
        dom.set_selection_range(active, caret, caret);
        true
    } else if dom.is_content_editable(active) {
        dom.insert_text_at_caret(window, text);
        true
    } else {
        debug!(element = %active, "paste skipped: focused element is not editable");
        false
    }
}

/// Focus the text field after `current`, wrapping to the first.
pub fn next_text_field(
    dom: &mut dyn DomPort,
    window: WindowId,
    current: Option<ElementId>,
) -> Option<ElementId> {
    let fields = match dom.query_all(window, TEXT_FIELD_SELECTOR) {
        Ok(fields) => fields,
        Err(err) => {
            warn!(error = %err, "text field query failed");
            return None;
        }
    };
    let next = match current.and_then(|cur| fields.iter().position(|f| *f == cur)) {
        Some(pos) => fields.get(pos + 1).or_else(|| fields.first()),
        None => fields.first(),
    }
    .copied()?;
    dom.focus(next);
    Some(next)
}

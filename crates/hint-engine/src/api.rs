use hintkit_core_types::{DomPort, ElementId, RenderPort};
use tracing::{debug, instrument};

use crate::builder::{render_nodes, CandidateCollector};
use crate::errors::HintResult;
use crate::labels;
use crate::matcher::{matches, InputRules, InputStep};
use crate::model::{ActionDescriptor, ActionKind, Category, HintOutcome, MatchState, OpenMode};
use crate::paste::{self, FOCUS_OUTLINE_RULE};
use crate::policy::{HintPolicyView, HintTheme};
use crate::resolver::{Resolver, Target};
use crate::session::HintSession;
use crate::tracker;

/// Keyboard hint engine bound to one document and one render sink.
///
/// At most one session is live at a time. Every operation is synchronous and
/// safe to call in any state.
pub struct HintEngine<D: DomPort, R: RenderPort> {
    dom: D,
    render: R,
    theme: HintTheme,
    session: Option<HintSession>,
    open_mode: OpenMode,
    /// Target of the last resolution, kept for `perform`.
    pending: Option<Target>,
    focused_field: Option<ElementId>,
    focus_rule_installed: bool,
}

impl<D: DomPort, R: RenderPort> HintEngine<D, R> {
    pub fn new(policy: &HintPolicyView, dom: D, render: R) -> HintResult<Self> {
        let theme = policy.validate()?;
        Ok(Self {
            dom,
            render,
            theme,
            session: None,
            open_mode: OpenMode::NORMAL,
            pending: None,
            focused_field: None,
            focus_rule_installed: false,
        })
    }

    pub fn theme(&self) -> &HintTheme {
        &self.theme
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn renderer(&self) -> &R {
        &self.render
    }

    pub fn session(&self) -> Option<&HintSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> Option<MatchState> {
        self.session.as_ref().map(|session| session.state)
    }

    pub fn pending_target(&self) -> Option<ElementId> {
        self.pending.map(|target| target.element)
    }

    /// Start a session for `category`, or resolve immediately when fewer than
    /// two candidates exist.
    #[instrument(skip_all, fields(category = %category, open_mode = ?open_mode))]
    pub fn show_hints(&mut self, category: Category, open_mode: OpenMode) -> HintResult<HintOutcome> {
        self.teardown_session();
        self.pending = None;
        self.open_mode = open_mode;

        let top = self.dom.top_window();
        self.dom.blur_active(top);

        let candidates =
            CandidateCollector::new(&self.dom, &mut self.render, &self.theme, category).collect(top);
        debug!(candidates = candidates.len(), "hint candidates collected");

        match candidates.len() {
            0 => return Ok(HintOutcome::NoHints),
            1 => {
                let target = Target {
                    element: candidates[0].element,
                    window: candidates[0].window,
                };
                return Ok(HintOutcome::Action(self.resolve(target, category)));
            }
            _ => {}
        }

        let variant = self.theme.variant;
        let mut nodes = render_nodes(&mut self.render, &self.theme, variant, candidates);
        let texts = labels::generate(nodes.len(), variant, &self.theme.alphabet)?;
        for (node, label) in nodes.iter_mut().zip(texts) {
            self.render.set_hint_label(node.hint, &label);
            node.label = label;
        }

        let mut session = HintSession::new(category, variant, nodes);
        session.notifier = Some(
            self.render
                .create_notifier(top, &self.theme.notifier_css()),
        );
        tracker::set_active(&mut session, 0, &self.dom, &mut self.render, &self.theme);
        debug!(session = %session.id, nodes = session.nodes.len(), "hint session started");
        self.session = Some(session);
        Ok(HintOutcome::Pending)
    }

    /// Advance the matcher with the whole accumulated input string.
    #[instrument(skip_all, fields(category = %category, input_len = input.chars().count()))]
    pub fn update_hints(&mut self, input: &str, category: Category) -> HintResult<HintOutcome> {
        if self.session.is_none() {
            let shown = self.show_hints(category, self.open_mode)?;
            if !shown.is_pending() {
                return Ok(shown);
            }
        }

        let shrunk = self
            .session
            .as_ref()
            .and_then(|session| session.last_input.as_ref())
            .map_or(false, |last| last.chars().count() > input.chars().count());
        if shrunk {
            debug!("input shrank; rebuilding hint session");
            let shown = self.show_hints(category, self.open_mode)?;
            if !shown.is_pending() {
                return Ok(shown);
            }
        }

        self.apply_input(input, category)
    }

    fn apply_input(&mut self, input: &str, category: Category) -> HintResult<HintOutcome> {
        let Some(session) = self.session.as_mut() else {
            return Ok(HintOutcome::NoHints);
        };
        session.last_input = Some(input.to_string());

        let rules = InputRules {
            variant: session.variant,
            alphabet_lower: &self.theme.alphabet_lower,
            escape_char: self.theme.escape_char,
        };
        let query = match rules.classify(input, session.escape_offset) {
            InputStep::Escape(offset) => {
                session.escape_offset = Some(offset);
                session.state = MatchState::Escaped;
                debug!(offset, "escape seen; switching to text matching");
                return Ok(HintOutcome::Pending);
            }
            InputStep::Filter {
                query,
                escape_offset,
            } => {
                session.escape_offset = escape_offset;
                query
            }
        };

        let mut survivors = Vec::with_capacity(session.active.len());
        for &idx in &session.active {
            let node = &session.nodes[idx];
            let text = self.dom.text_content(node.element);
            if matches(session.variant, &query, &node.label, &text) {
                survivors.push(idx);
            } else {
                self.render.set_hint_visible(node.hint, false);
            }
        }
        session.active = survivors;
        debug!(active = session.active.len(), query = ?query, "hints filtered");

        if session.active.is_empty() {
            session.state = MatchState::Empty;
            self.teardown_session();
            return Ok(HintOutcome::NoHints);
        }
        if session.active.len() == 1 && self.theme.auto_follow {
            session.state = MatchState::Resolved;
            let node = &session.nodes[session.active[0]];
            let target = Target {
                element: node.element,
                window: node.window,
            };
            let action = self.resolve(target, category);
            self.teardown_session();
            return Ok(HintOutcome::Action(action));
        }

        let best = tracker::better_match(
            session,
            query.needle(),
            &self.dom,
            &mut self.render,
            &self.theme,
        )?;
        session.active_index = best;
        let node_idx = session.active[best];
        tracker::set_active(session, node_idx, &self.dom, &mut self.render, &self.theme);
        session.state = if session.escape_offset.is_some() {
            MatchState::Escaped
        } else {
            MatchState::Filtering
        };
        Ok(HintOutcome::Pending)
    }

    /// Resolve the emphasized hint regardless of remaining input.
    #[instrument(skip_all, fields(category = %category))]
    pub fn follow_active(&mut self, category: Category) -> HintResult<HintOutcome> {
        let Some(node) = self.session.as_ref().and_then(|s| s.current_node()) else {
            debug!("follow requested without an active hint");
            return Ok(HintOutcome::NoHints);
        };
        let target = Target {
            element: node.element,
            window: node.window,
        };
        if let Some(session) = self.session.as_mut() {
            session.state = MatchState::Resolved;
        }
        let action = self.resolve(target, category);
        self.teardown_session();
        Ok(HintOutcome::Action(action))
    }

    pub fn focus_next(&mut self) {
        if let Some(session) = self.session.as_mut() {
            tracker::cycle(session, true, &self.dom, &mut self.render, &self.theme);
        }
    }

    pub fn focus_prev(&mut self) {
        if let Some(session) = self.session.as_mut() {
            tracker::cycle(session, false, &self.dom, &mut self.render, &self.theme);
        }
    }

    /// Run a deferred action on the last resolved element, then clear
    /// everything. Returns whether a target existed.
    pub fn perform(&mut self, kind: ActionKind) -> bool {
        let Some(target) = self.pending.take() else {
            debug!(action = %kind, "no pending hint target");
            return false;
        };
        Resolver::new(&mut self.dom, self.open_mode).perform(target, kind);
        self.clear();
        true
    }

    /// Remove every injected node and reset all session state.
    pub fn clear(&mut self) {
        self.teardown_session();
        self.pending = None;
    }

    pub fn paste_primary(&mut self, text: &str) -> bool {
        let top = self.dom.top_window();
        paste::paste_primary(&mut self.dom, top, text)
    }

    /// Focus the next text field of the top document. `None` when the
    /// document has none.
    pub fn focus_input(&mut self) -> Option<ElementId> {
        let top = self.dom.top_window();
        let focused = paste::next_text_field(&mut self.dom, top, self.focused_field)?;
        if !self.focus_rule_installed {
            self.render.insert_style_rule(top, FOCUS_OUTLINE_RULE);
            self.focus_rule_installed = true;
        }
        self.focused_field = Some(focused);
        Some(focused)
    }

    fn resolve(&mut self, target: Target, category: Category) -> ActionDescriptor {
        let descriptor = Resolver::new(&mut self.dom, self.open_mode).evaluate(target, category);
        self.pending = Some(target);
        descriptor
    }

    fn teardown_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.teardown(&mut self.render);
        }
    }
}

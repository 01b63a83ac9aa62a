use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use dom_fixture::{DispatchedEvent, FixtureDocument, PageFixture, RecordingRenderer};
use hint_engine::{Category, HintEngine, HintOutcome, MatchState, OpenMode};
use serde::Serialize;
use tokio::task;
use tracing::{debug, info, instrument};

use super::context::CliContext;
use super::output::{emit, OutputFormat};

type FixtureEngine = HintEngine<FixtureDocument, RecordingRenderer>;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CategoryArg {
    All,
    Links,
    Images,
    Editable,
    Url,
}

impl From<CategoryArg> for Category {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::All => Category::All,
            CategoryArg::Links => Category::Links,
            CategoryArg::Images => Category::Images,
            CategoryArg::Editable => Category::Editable,
            CategoryArg::Url => Category::Url,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Page fixture (YAML, or JSON with a .json extension)
    #[arg(short, long, value_name = "FILE")]
    pub page: PathBuf,

    /// Which elements to hint
    #[arg(long, value_enum, default_value = "all")]
    pub category: CategoryArg,

    /// Keys typed after the hints appear; `<BS>`, `<TAB>` and `<S-TAB>` are
    /// backspace, next and previous
    #[arg(short, long, default_value = "")]
    pub keys: String,

    /// Open the result in a new view (middle-button click)
    #[arg(long)]
    pub new_tab: bool,

    /// Open the result in a new window
    #[arg(long)]
    pub new_window: bool,

    /// Follow the active hint once the keys are exhausted
    #[arg(long)]
    pub follow: bool,

    /// Run the resolved action on the element when the engine left it to the caller
    #[arg(long)]
    pub perform: bool,
}

impl RunArgs {
    fn open_mode(&self) -> OpenMode {
        let mut mode = OpenMode::NORMAL;
        if self.new_tab {
            mode |= OpenMode::NEW_VIEW;
        }
        if self.new_window {
            mode |= OpenMode::NEW_WINDOW;
        }
        mode
    }
}

/// One keystroke of the `--keys` sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Next,
    Previous,
}

impl Key {
    fn describe(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Backspace => "<BS>".to_string(),
            Key::Next => "<TAB>".to_string(),
            Key::Previous => "<S-TAB>".to_string(),
        }
    }
}

pub fn parse_keys(raw: &str) -> Vec<Key> {
    const SPECIAL: [(&str, Key); 3] = [
        ("<BS>", Key::Backspace),
        ("<TAB>", Key::Next),
        ("<S-TAB>", Key::Previous),
    ];
    let mut keys = Vec::new();
    let mut rest = raw;
    'outer: while let Some(c) = rest.chars().next() {
        if c == '<' {
            for (token, key) in &SPECIAL {
                if let Some(after) = rest.strip_prefix(token) {
                    keys.push(key.clone());
                    rest = after;
                    continue 'outer;
                }
            }
        }
        keys.push(Key::Char(c));
        rest = &rest[c.len_utf8()..];
    }
    keys
}

#[derive(Debug, Serialize)]
struct StepReport {
    key: String,
    outcome: HintOutcome,
    state: Option<MatchState>,
    labels: Vec<String>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    page: PathBuf,
    category: Category,
    open_mode: OpenMode,
    steps: Vec<StepReport>,
    outcome: HintOutcome,
    action: Option<String>,
    performed: bool,
    ignored_keys: Vec<String>,
    events: Vec<DispatchedEvent>,
}

fn step(engine: &FixtureEngine, key: String, outcome: &HintOutcome) -> StepReport {
    StepReport {
        key,
        outcome: outcome.clone(),
        state: engine.state(),
        labels: engine.renderer().visible_labels(),
        status: engine.renderer().notifier_text().map(str::to_string),
    }
}

async fn load_page(path: &Path) -> Result<PageFixture> {
    let owned = path.to_path_buf();
    let page = task::spawn_blocking(move || PageFixture::from_path(&owned))
        .await
        .context("page fixture loader panicked")?
        .with_context(|| format!("loading page fixture {}", path.display()))?;
    Ok(page)
}

#[instrument(skip_all, fields(page = %args.page.display(), category = ?args.category))]
pub async fn cmd_run(args: RunArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let page = load_page(&args.page).await?;
    let dom = FixtureDocument::from_page(&page).context("building fixture document")?;
    let mut engine = HintEngine::new(&ctx.config().hints, dom, RecordingRenderer::new())
        .context("invalid hint settings")?;

    let category = Category::from(args.category);
    let open_mode = args.open_mode();
    let mut outcome = engine.show_hints(category, open_mode)?;
    let mut steps = vec![step(&engine, "<show>".to_string(), &outcome)];

    let keys = parse_keys(&args.keys);
    let mut typed = String::new();
    let mut consumed = 0;
    for key in &keys {
        if !outcome.is_pending() {
            break;
        }
        consumed += 1;
        outcome = match key {
            Key::Char(c) => {
                typed.push(*c);
                engine.update_hints(&typed, category)?
            }
            Key::Backspace => {
                typed.pop();
                engine.update_hints(&typed, category)?
            }
            Key::Next => {
                engine.focus_next();
                HintOutcome::Pending
            }
            Key::Previous => {
                engine.focus_prev();
                HintOutcome::Pending
            }
        };
        debug!(key = %key.describe(), outcome = ?outcome, "key applied");
        steps.push(step(&engine, key.describe(), &outcome));
    }
    let ignored_keys: Vec<String> = keys[consumed..].iter().map(Key::describe).collect();

    if args.follow && outcome.is_pending() {
        outcome = engine.follow_active(category)?;
        steps.push(step(&engine, "<follow>".to_string(), &outcome));
    }

    let mut performed = outcome.action().map_or(false, |action| action.performed);
    if args.perform {
        if let Some(action) = outcome.action().filter(|action| !action.performed) {
            performed = engine.perform(action.kind);
        }
    }
    engine.clear();

    if let Some(action) = outcome.action() {
        info!(action = %action, performed, "hint resolved");
    }
    let report = RunReport {
        page: args.page.clone(),
        category,
        open_mode,
        steps,
        action: outcome.action().map(ToString::to_string),
        outcome,
        performed,
        ignored_keys,
        events: engine.dom().events().to_vec(),
    };
    emit(output, &report, print_human)
}

fn print_human(report: &RunReport) {
    for step in &report.steps {
        let outcome = match &step.outcome {
            HintOutcome::Pending => "pending".to_string(),
            HintOutcome::NoHints => "no hints".to_string(),
            HintOutcome::Action(action) => action.to_string(),
        };
        println!("{:>8}  {:<40} [{}]", step.key, outcome, step.labels.join(" "));
    }
    match &report.action {
        Some(action) => println!("action: {action} (performed: {})", report.performed),
        None => println!("action: none"),
    }
    if !report.ignored_keys.is_empty() {
        println!("ignored keys: {}", report.ignored_keys.join(""));
    }
}

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use hint_engine::{labels, HintStyle};
use serde::Serialize;

use super::context::CliContext;
use super::output::{emit, OutputFormat};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StyleArg {
    Letter,
    Number,
}

impl From<StyleArg> for HintStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Letter => HintStyle::Letter,
            StyleArg::Number => HintStyle::Number,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct LabelsArgs {
    /// Number of candidates to label
    #[arg(short = 'n', long)]
    pub count: usize,

    /// Label style (defaults to the configured one)
    #[arg(long, value_enum)]
    pub style: Option<StyleArg>,

    /// Letter alphabet (defaults to the configured one)
    #[arg(long)]
    pub alphabet: Option<String>,
}

#[derive(Debug, Serialize)]
struct LabelsReport {
    count: usize,
    style: HintStyle,
    labels: Vec<String>,
}

pub fn cmd_labels(args: LabelsArgs, ctx: &CliContext, output: OutputFormat) -> Result<()> {
    let mut policy = ctx.config().hints.clone();
    if let Some(style) = args.style {
        policy.style = style.into();
    }
    if let Some(alphabet) = args.alphabet {
        policy.letter_seq = alphabet;
    }
    let theme = policy.validate().context("invalid hint settings")?;
    let generated = labels::generate(args.count, theme.variant, &theme.alphabet)
        .with_context(|| format!("cannot label {} candidates", args.count))?;

    let report = LabelsReport {
        count: args.count,
        style: policy.style,
        labels: generated,
    };
    emit(output, &report, |report| {
        for label in &report.labels {
            println!("{label}");
        }
    })
}

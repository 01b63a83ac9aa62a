use anyhow::Result;

use super::context::CliContext;

pub fn cmd_info(ctx: &CliContext) -> Result<()> {
    let hints = &ctx.config().hints;
    println!("hintkit");
    println!("=======");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("HINTKIT_BUILD_DATE"));
    println!("Git Commit: {}", env!("HINTKIT_GIT_HASH"));
    println!();
    println!("Configuration: {}", ctx.config_path().display());
    println!("- Style: {:?}", hints.style);
    println!("- Alphabet: {}", hints.letter_seq);
    println!("- Font: {}", hints.font);
    println!("- Mark all hints: {}", hints.mark_hints);
    println!("- Auto follow: {}", hints.auto_follow);
    Ok(())
}

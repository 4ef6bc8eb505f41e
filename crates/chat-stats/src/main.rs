mod bootstrap;
mod report;

use anyhow::Result;
use chat_core::settings::Settings;
use chat_data::parser::ParserOptions;
use chat_data::ChatSession;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;
    settings.validate()?;

    tracing::info!("chat-stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "File: {}, Report: {}, Format: {}",
        settings.file.display(),
        settings.report,
        settings.format
    );

    let options = ParserOptions {
        date_policy: settings.date_policy(),
    };
    let mut session = ChatSession::open(&settings.file, options)?;
    tracing::info!("Total messages found: {}", session.len());

    report::apply_renames(&mut session, &settings)?;
    let result = report::build_report(&mut session, &settings)?;

    print!("{}", report::render(&result, &settings)?);
    Ok(())
}

use anyhow::Result;
use chat_core::formatting::render_report;
use chat_core::models::Report;
use chat_core::settings::Settings;
use chat_data::ChatSession;

/// Apply every `--rename` in order.
pub fn apply_renames(session: &mut ChatSession, settings: &Settings) -> Result<()> {
    for (old, new) in settings.parsed_renames()? {
        if session.rename(&old, &new) == 0 {
            tracing::warn!("No messages from \"{}\"; rename to \"{}\" had no effect", old, new);
        }
    }
    Ok(())
}

/// Run the report selected by `--report`.
pub fn build_report(session: &mut ChatSession, settings: &Settings) -> Result<Report> {
    let report = match settings.report.as_str() {
        "ranking" => session.ranking()?,
        "emoji" => session.emoji_count(),
        "week" => session.week_chart()?,
        "keyword" => {
            let keyword = settings
                .keyword
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("the keyword report needs --keyword"))?;
            session.repeated_message(keyword)?
        }
        "words" => {
            let (matrix, _title) = session.word_count();
            matrix.to_report(settings.top_rows())
        }
        "summary" => {
            session.ranking()?;
            session.week_chart()?;
            if let Some(keyword) = settings.keyword.as_deref() {
                session.repeated_message(keyword)?;
            }
            session.summary_report()
        }
        unknown => anyhow::bail!("Unknown report: {}", unknown),
    };
    Ok(report)
}

/// Render `report` in the format chosen by `--format`.
pub fn render(report: &Report, settings: &Settings) -> Result<String> {
    if settings.wants_json() {
        let mut limited = report.clone();
        if let Some(top) = settings.top_rows() {
            limited.table.rows.truncate(top);
        }
        Ok(format!("{}\n", limited.to_json()?))
    } else {
        Ok(render_report(report, settings.top_rows()))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use marquee_core::{parse_id_list, BulkImporter, ImportOutcome, Importer, ItemStatus};
use marquee_models::ContentKind;
use owo_colors::OwoColorize;
use tracing::info;

use super::{prompts, Context};
use crate::output::{records_table, search_table, summary_table, Output};

/// Batches larger than this ask before hitting the provider
const CONFIRM_ABOVE: usize = 25;

pub async fn run_search(
    context: &Context,
    query: &str,
    kind: Option<ContentKind>,
    page: u32,
    output: &Output,
) -> Result<()> {
    let query = query.trim();
    if query.chars().count() < 2 {
        return Err(eyre!("Search query must be at least 2 characters"));
    }
    if page == 0 {
        return Err(eyre!("Page must be at least 1"));
    }

    let provider = context.provider()?;
    let results = provider.search(query, kind, page).await?;

    if output.is_human() {
        if results.results.is_empty() {
            output.warn(format!("No results for '{}'", query));
        } else {
            output.table(&search_table(&results));
            output.info(format!(
                "Page {} · {} of {} results",
                page,
                results.results.len(),
                results.total
            ));
        }
    } else {
        output.data(&results);
    }
    Ok(())
}

pub async fn run_details(context: &Context, imdb_id: &str, output: &Output) -> Result<()> {
    let provider = context.provider()?;
    let record = provider.details(imdb_id).await?;

    if output.is_human() {
        output.info(format!(
            "{} ({}) [{}]",
            record.title.as_deref().unwrap_or("Untitled").bold(),
            record.year.as_deref().unwrap_or("?"),
            record.kind
        ));
        for (label, value) in [
            ("Director", &record.director),
            ("Cast", &record.actors),
            ("Genre", &record.genre),
            ("Runtime", &record.runtime),
            ("Rating", &record.rating),
            ("Seasons", &record.total_seasons),
        ] {
            if let Some(value) = value {
                output.info(format!("  {:<9} {}", label.dimmed(), value));
            }
        }
        if let Some(plot) = &record.plot {
            output.info(format!("\n{}", plot));
        }
    } else if record.raw.is_null() {
        output.data(&record);
    } else {
        output.data(&record.raw);
    }
    Ok(())
}

pub async fn run_import(
    context: &Context,
    imdb_id: &str,
    kind: ContentKind,
    category: Option<i64>,
    language: Option<i64>,
    output: &Output,
) -> Result<()> {
    let category_id = context.category_id(category)?;
    let language_id = context.language_id(language)?;
    let importer = Importer::new(context.provider()?, context.store(false).await?);

    let outcome = importer
        .import_one(imdb_id, kind, category_id, language_id)
        .await
        .wrap_err_with(|| format!("Failed to import {}", imdb_id))?;

    match &outcome {
        ImportOutcome::Created(record) => output.success(format!(
            "Imported {} '{}' (id {}, slug {})",
            kind,
            record.display_title(),
            record.id,
            record.slug()
        )),
        ImportOutcome::Existing(record) => output.warn(format!(
            "{} '{}' is already in the catalog (id {})",
            imdb_id,
            record.display_title(),
            record.id
        )),
    }
    output.data(&outcome);
    Ok(())
}

fn read_ids(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .wrap_err("Failed to read ids from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).wrap_err_with(|| format!("Failed to read {}", file.display()))
}

fn progress_bar(total: usize, output: &Output) -> ProgressBar {
    let interactive = output.is_human()
        && !output.is_quiet()
        && std::io::stdout().is_terminal()
        && std::io::stderr().is_terminal();
    if !interactive {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    bar
}

#[allow(clippy::too_many_arguments)]
pub async fn run_bulk_import(
    context: &Context,
    mut imdb_ids: Vec<String>,
    file: Option<PathBuf>,
    kind: ContentKind,
    category: Option<i64>,
    language: Option<i64>,
    assume_yes: bool,
    output: &Output,
) -> Result<()> {
    if let Some(file) = &file {
        imdb_ids.extend(parse_id_list(&read_ids(file)?));
    }
    let ids = parse_id_list(&imdb_ids.join("\n"));
    if ids.is_empty() {
        return Err(eyre!("No IMDb ids given: pass them as arguments or with --file"));
    }

    let category_id = context.category_id(category)?;
    let language_id = context.language_id(language)?;

    if ids.len() > CONFIRM_ABOVE && !assume_yes && output.is_human() && std::io::stdin().is_terminal() {
        let go = prompts::prompt_yes_no(
            &format!("Import {} {} titles from OMDB?", ids.len(), kind),
            Some(true),
        )?;
        if !go {
            output.info("Cancelled");
            return Ok(());
        }
    }

    let importer = Importer::new(context.provider()?, context.store(false).await?);
    let bulk = BulkImporter::new(importer);
    let bar = progress_bar(ids.len(), output);

    info!(count = ids.len(), %kind, category_id, language_id, "Bulk import requested");
    let summary = bulk
        .import_many_with_progress(&ids, kind, category_id, language_id, |progress| {
            bar.inc(1);
            match &progress.status {
                ItemStatus::Created => bar.set_message(format!("{} imported", progress.external_id)),
                ItemStatus::Existing => bar.set_message(format!("{} already present", progress.external_id)),
                ItemStatus::Failed(_) => bar.set_message(format!("{} failed", progress.external_id)),
            }
        })
        .await;
    bar.finish_and_clear();

    if output.is_human() {
        output.table(&summary_table(&summary));
        for error in &summary.errors {
            output.error(error);
        }
        if summary.is_clean() {
            output.success(format!("Imported {} of {}", summary.success_count, summary.total()));
        } else {
            output.warn(format!(
                "Imported {} of {}; {} failed",
                summary.success_count,
                summary.total(),
                summary.failure_count
            ));
        }
        if !summary.records.is_empty() && !output.is_quiet() {
            output.table(&records_table(&summary.records));
        }
    } else {
        output.data(&summary);
    }
    Ok(())
}

pub async fn run_list(context: &Context, kind: ContentKind, output: &Output) -> Result<()> {
    let store = context.store(false).await?;
    let records = store.list(kind).await?;

    if output.is_human() {
        if records.is_empty() {
            output.info(format!("No {} in the catalog yet", kind));
        } else {
            output.table(&records_table(&records));
            output.info(format!("{} {} title(s)", records.len(), kind));
        }
    } else {
        output.data(&records);
    }
    Ok(())
}

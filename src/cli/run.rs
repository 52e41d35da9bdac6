//! Run command - one pass of the combine pipeline

use crate::cli::CliProgress;
use crate::cli::args::Cli;
use crate::cli::context::{CommandContext, resolve_config};
use crate::cli::style::{Stylize, arrow, check, cross};
use anstream::println;
use anyhow::Context;
use combine_prs::combine::{
    AutoMergeOutcome, CombineReport, FoldResult, IndividualMerge, IndividualOutcome, RunOutcome,
    UpsertAction, run_combine,
};
use combine_prs::schedule::is_within_window;
use std::process::ExitCode;

/// Run the combine command
#[allow(clippy::future_not_send)]
pub async fn run_combine_command(cli: &Cli) -> anyhow::Result<ExitCode> {
    let config = resolve_config(cli).context("invalid configuration")?;
    let now = chrono::Local::now().naive_local();

    // Check the window before touching credentials so scheduled no-op runs
    // need no token.
    if !is_within_window(&now, config.day, config.hour) {
        println!("{}", "Outside the configured run window, nothing to do".muted());
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = CommandContext::new(cli, config)
        .await
        .context("failed to set up GitHub access")?;

    let repo = ctx.platform.config();
    println!(
        "{} {}",
        "Combining pull requests in".emphasis(),
        format!("{}/{}", repo.owner, repo.repo).accent()
    );

    let outcome = run_combine(ctx.platform.as_ref(), &ctx.config, &now, &CliProgress)
        .await
        .context("combine run failed")?;

    println!();
    match &outcome {
        RunOutcome::OutsideWindow => {
            println!("{}", "Outside the configured run window, nothing to do".muted());
        }
        RunOutcome::NoPullRequests => println!("{}", "No open pull requests".muted()),
        RunOutcome::Individual(merges) => print_individual_summary(merges),
        RunOutcome::Combined(report) => print_combine_summary(report),
    }

    if outcome.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_individual_summary(merges: &[IndividualMerge]) {
    if merges.is_empty() {
        println!("{}", "No pull requests eligible for merging".muted());
        return;
    }

    for merge in merges {
        match &merge.outcome {
            IndividualOutcome::Merged { .. } => {
                println!("{} #{} {}", check(), merge.pr_number, merge.branch.accent());
            }
            IndividualOutcome::Failed(reason) => println!(
                "{} #{} {}: {}",
                cross(),
                merge.pr_number,
                merge.branch.accent(),
                reason.warn()
            ),
        }
    }
}

fn print_combine_summary(report: &CombineReport) {
    println!("{}:", "Folds".emphasis());
    if report.folds.is_empty() {
        println!("  {}", "No candidates".muted());
    }
    for fold in &report.folds {
        let marker = match fold {
            FoldResult::Folded { .. } => check(),
            FoldResult::Skipped { .. } => arrow(),
            FoldResult::Failed { .. } => cross(),
        };
        println!("  {marker} {fold}");
    }

    if let Some(upsert) = &report.combined_pr {
        let verb = match upsert.action {
            UpsertAction::Created => "Created",
            UpsertAction::Updated => "Updated",
        };
        println!(
            "{} {} combined PR #{} ({} branch(es) listed)",
            check(),
            verb,
            upsert.pr_number.accent(),
            report.ledger.len()
        );
    }

    if let Some(outcome) = report.auto_merge() {
        let line = format!("Auto-merge: {outcome}");
        match outcome {
            AutoMergeOutcome::Merged { .. } => println!("{} {}", check(), line.success()),
            _ => println!("{} {}", arrow(), line.warn()),
        }
    }

    println!(
        "{} folded, {} failed",
        report.folded_count().accent(),
        report.failed_count().accent()
    );
}

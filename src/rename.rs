use crate::{
    config::Rename,
    error::Result,
    natural_sort::stable_natural_cmp,
    normalize::renamed,
    utils::{file_name_lossy, to_slash_path},
};
use colored::Colorize;
use std::cmp::Reverse;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub old: PathBuf,
    pub new: PathBuf,
    pub is_dir: bool,
    depth: usize,
}

impl RenameEntry {
    pub fn kind(&self) -> &'static str {
        if self.is_dir { "DIR " } else { "FILE" }
    }

    pub fn describe(&self, root: &Path) -> String {
        let rel = |p: &Path| to_slash_path(p.strip_prefix(root).unwrap_or(p));
        format!("[{}] {} -> {}", self.kind(), rel(&self.old), rel(&self.new))
    }
}

/// Every entry under `root` whose name changes, deepest paths first so a
/// directory is renamed only after everything inside it.
pub fn plan_renames(root: &Path, config: &Rename) -> Result<Vec<RenameEntry>> {
    let mut plan = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by(|a, b| stable_natural_cmp(&file_name_lossy(a), &file_name_lossy(b)))
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e, config))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                println!("{} {}: {}", "skipped".yellow(), path.yellow(), e);
                continue;
            }
        };
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(new_name) = renamed(name) else {
            continue;
        };

        plan.push(RenameEntry {
            old: entry.path().to_path_buf(),
            new: entry.path().with_file_name(new_name),
            is_dir: entry.file_type().is_dir(),
            depth: entry.depth(),
        });
    }

    plan.sort_by_key(|e| Reverse(e.depth));
    Ok(plan)
}

fn is_ignored_dir(entry: &DirEntry, config: &Rename) -> bool {
    entry.file_type().is_dir() && config.ignored_dirs.contains(&file_name_lossy(entry))
}

pub fn apply_entry(entry: &RenameEntry) -> Result<()> {
    if entry.new.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", entry.new.display()),
        )
        .into());
    }
    fs::rename(&entry.old, &entry.new)?;
    Ok(())
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    pub failed: usize,
}

/// Applies the plan in order; a failed entry is reported and skipped.
pub fn execute_plan(root: &Path, plan: &[RenameEntry]) -> RenameSummary {
    let mut summary = RenameSummary::default();
    for entry in plan {
        println!("{}", entry.describe(root).yellow());
        match apply_entry(entry) {
            Ok(()) => {
                summary.renamed += 1;
                println!("  {}", "renamed".green());
            }
            Err(e) => {
                summary.failed += 1;
                println!("  {} {}", "error:".red(), e);
            }
        }
    }
    summary
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

fn confirm(input: &mut impl BufRead) -> io::Result<bool> {
    print!("Apply these renames? (s/N): ");
    io::stdout().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

pub fn rename(
    root: &Path,
    config: &Rename,
    auto_confirm: bool,
    dry_run: bool,
) -> Result<RenameSummary> {
    println!("{} {}", "Base directory:".blue(), root.display().to_string().yellow());
    println!("{}", "Dry run, nothing is changed yet:".blue());

    let plan = plan_renames(root, config)?;
    for entry in &plan {
        println!("{}", entry.describe(root));
    }

    if plan.is_empty() {
        println!("{}", "No file or folder needs renaming!".green());
        return Ok(RenameSummary::default());
    }
    println!("{} {}", "Total changes:".blue(), plan.len().to_string().cyan());

    if dry_run {
        return Ok(RenameSummary::default());
    }

    let proceed = if auto_confirm {
        println!("{}", "Auto-confirmed via --yes".cyan());
        true
    } else {
        confirm(&mut io::stdin().lock())?
    };
    if !proceed {
        println!("{}", "Cancelled by user.".red());
        return Ok(RenameSummary::default());
    }

    println!("{}", "Applying renames:".blue());
    let summary = execute_plan(root, &plan);

    println!(
        "{} {} renamed, {} failed",
        "Done!".green(),
        summary.renamed.to_string().cyan(),
        summary.failed.to_string().cyan()
    );
    println!("{}", "Next: run `vitrine build` to refresh the catalog page.".yellow());
    Ok(summary)
}

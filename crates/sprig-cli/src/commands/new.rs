//! `sprig new`: project scaffolding from a template repository.

use std::io;
use std::path::Path;

use console::Term;
use tokio::process::Command;

use crate::cli::NewArgs;
use crate::error::{CliError, Result};
use crate::ui;

/// A named starting point for `sprig new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub repo: &'static str,
}

/// Template used when none is chosen.
pub const DEFAULT_TEMPLATE: ProjectTemplate = ProjectTemplate {
    name: "html",
    description: "Plain HTML",
    repo: "https://github.com/davezuko/html-template",
};

/// Templates offered by name and in the interactive picker.
pub const TEMPLATES: &[ProjectTemplate] = &[
    DEFAULT_TEMPLATE,
    ProjectTemplate {
        name: "react",
        description: "Web App (React)",
        repo: "davezuko/pack#templates/typescript-react",
    },
    ProjectTemplate {
        name: "preact",
        description: "Web App (Preact)",
        repo: "davezuko/pack#templates/typescript-preact",
    },
];

/// What `git clone` needs to fetch a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSource {
    pub url: String,
    pub branch: Option<String>,
}

impl CloneSource {
    /// Parse a template location.
    ///
    /// A `#ref` suffix selects a branch. `owner/repo` shorthand points at
    /// GitHub; URLs, scp-style remotes and local paths are cloned as given.
    pub fn parse(location: &str) -> Self {
        let (repo, branch) = match location.rsplit_once('#') {
            Some((repo, branch)) if !branch.is_empty() => (repo, Some(branch.to_string())),
            _ => (location.trim_end_matches('#'), None),
        };
        let url = if is_github_shorthand(repo) {
            format!("https://github.com/{repo}")
        } else {
            repo.to_string()
        };
        Self { url, branch }
    }
}

fn is_github_shorthand(repo: &str) -> bool {
    let mut parts = repo.split('/');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(owner), Some(name), None)
            if !owner.is_empty()
                && !name.is_empty()
                && !owner.starts_with('.')
                && !repo.contains(':')
    )
}

/// Look a template up by name, or by its 1-based position in [`TEMPLATES`].
pub fn find_template(choice: &str) -> Option<&'static ProjectTemplate> {
    let choice = choice.trim();
    if let Ok(index) = choice.parse::<usize>() {
        return index.checked_sub(1).and_then(|i| TEMPLATES.get(i));
    }
    TEMPLATES
        .iter()
        .find(|template| template.name.eq_ignore_ascii_case(choice))
}

/// Resolve `--template`: a known name, otherwise a repository location.
fn resolve_template(flag: &str) -> CloneSource {
    match find_template(flag).filter(|_| flag.parse::<usize>().is_err()) {
        Some(template) => CloneSource::parse(template.repo),
        None => CloneSource::parse(flag),
    }
}

/// Ask on the terminal which template to use.
fn pick_template(term: &Term) -> Result<&'static ProjectTemplate> {
    term.write_line("Select a template for your project:")?;
    for (i, template) in TEMPLATES.iter().enumerate() {
        term.write_line(&format!(
            "  {}) {} ({})",
            i + 1,
            template.description,
            template.name
        ))?;
    }
    term.write_str(&format!("Template [1-{}]: ", TEMPLATES.len()))?;
    let answer = term.read_line()?;
    find_template(&answer)
        .ok_or_else(|| CliError::InvalidArgument("Cancelled template selection".to_string()))
}

async fn choose_template(flag: Option<String>) -> Result<CloneSource> {
    if let Some(flag) = flag {
        return Ok(resolve_template(&flag));
    }
    let term = Term::stderr();
    if !term.is_term() {
        return Ok(CloneSource::parse(DEFAULT_TEMPLATE.repo));
    }
    let template = tokio::task::spawn_blocking(move || pick_template(&term))
        .await
        .map_err(|e| CliError::InvalidArgument(format!("template selection failed: {e}")))??;
    Ok(CloneSource::parse(template.repo))
}

/// Clone the template into a fresh directory and install its dependencies.
pub async fn execute(args: NewArgs, _config_path: Option<&Path>) -> Result<()> {
    let cwd = super::current_dir()?;
    let destination = cwd.join(&args.dir);
    if destination.exists() {
        return Err(CliError::InvalidArgument(format!(
            "'{}' already exists",
            args.dir.display()
        )));
    }

    let source = choose_template(args.template).await?;
    ui::info(&format!("Cloning {}", source.url));
    let mut clone = Command::new("git");
    clone.arg("clone").arg("--depth").arg("1");
    if let Some(branch) = &source.branch {
        clone.arg("--branch").arg(branch);
    }
    clone.arg(&source.url).arg(&destination).current_dir(&cwd);
    run("git clone", clone).await?;

    match tokio::fs::remove_dir_all(destination.join(".git")).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    ui::info("Installing dependencies");
    let mut install = Command::new("npm");
    install.arg("install").current_dir(&destination);
    run("npm install", install).await?;

    ui::success(&format!("Created {}", args.dir.display()));
    ui::info(&format!("Next: cd {} && sprig start", args.dir.display()));
    Ok(())
}

async fn run(name: &str, mut command: Command) -> Result<()> {
    let status = command.status().await.map_err(|e| CliError::Command {
        command: name.to_string(),
        reason: e.to_string(),
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(CliError::Command {
            command: name.to_string(),
            reason: format!("exited with {status}"),
        })
    }
}

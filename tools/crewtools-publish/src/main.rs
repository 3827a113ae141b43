//! Publish every crate under the crates root to crates.io.
//!
//! Walks each subdirectory of the crates root that contains a
//! `Cargo.toml` and, for each one: refuses to continue if the directory
//! has uncommitted changes, bumps the manifest's patch version, then runs
//! `cargo publish` bounded by a timeout.  A registry-credential check
//! runs once before any package is touched, and the first failure stops
//! the whole run.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Bump patch versions and publish the crewtools crates.
#[derive(Parser)]
#[command(
    name = "crewtools-publish",
    version,
    about = "Bump patch versions and publish the crewtools crates"
)]
struct Cli {
    /// Directory containing the crates to publish.
    #[arg(long, default_value = "crates")]
    crates_dir: PathBuf,

    /// Kill any external command that runs longer than this many seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing("info");
    run_publish(&cli).await
}

async fn run_publish(cli: &Cli) -> Result<()> {
    check_registry_login()?;

    let packages = discover_packages(&cli.crates_dir)?;
    if packages.is_empty() {
        bail!("no packages found under {}", cli.crates_dir.display());
    }

    let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
    println!("Publishing packages: {}", names.join(", "));

    for package in &packages {
        println!();
        println!("Publishing {}...", package.name);
        publish_package(package, cli.timeout_secs)
            .await
            .with_context(|| format!("failed to publish package at {}", package.path.display()))?;
    }

    println!();
    println!("All packages published successfully!");
    Ok(())
}

// ---------------------------------------------------------------------------
// Publish flow
// ---------------------------------------------------------------------------

/// A publishable crate found under the crates root.
struct Package {
    name: String,
    path: PathBuf,
}

/// Every subdirectory of `crates_dir` holding a `Cargo.toml`, sorted by name.
fn discover_packages(crates_dir: &Path) -> Result<Vec<Package>> {
    let entries = std::fs::read_dir(crates_dir)
        .with_context(|| format!("failed to read {}", crates_dir.display()))?;

    let mut packages = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", crates_dir.display()))?;
        let path = entry.path();
        if path.is_dir() && path.join("Cargo.toml").is_file() {
            packages.push(Package {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
            });
        }
    }
    packages.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(packages)
}

async fn publish_package(package: &Package, timeout_secs: u64) -> Result<()> {
    ensure_clean_tree(&package.path, timeout_secs).await?;

    let manifest_path = package.path.join("Cargo.toml");
    let manifest = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let current = package_version(&manifest)?;
    let next = bump_patch(&current)?;
    let rewritten = rewrite_manifest_version(&manifest, &next)?;
    std::fs::write(&manifest_path, rewritten)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;
    info!(package = %package.name, from = %current, to = %next, "bumped patch version");

    let output = run_command("cargo", &["publish"], &package.path, timeout_secs).await?;
    ensure_success(&output, "cargo publish")
}

/// Refuse to publish a package whose directory has uncommitted changes.
async fn ensure_clean_tree(path: &Path, timeout_secs: u64) -> Result<()> {
    let output = run_command("git", &["status", "--porcelain", "."], path, timeout_secs).await?;
    ensure_success(&output, "git status")?;
    if !is_tree_clean(&output.stdout) {
        bail!(
            "uncommitted changes under {}; commit or stash before publishing",
            path.display()
        );
    }
    Ok(())
}

fn is_tree_clean(porcelain: &str) -> bool {
    porcelain.trim().is_empty()
}

/// Read the `[package]` version out of a manifest.
fn package_version(manifest: &str) -> Result<String> {
    let parsed: toml::Value = manifest.parse().context("manifest is not valid TOML")?;
    match parsed.get("package").and_then(|p| p.get("version")) {
        Some(toml::Value::String(version)) => Ok(version.clone()),
        Some(_) => bail!("version is workspace-inherited; bump it at the workspace root instead"),
        None => bail!("manifest has no [package] version"),
    }
}

/// `"1.2.3"` -> `"1.2.4"`.  Rejects anything that is not three numeric-patch
/// parts; pre-release and build metadata are deliberately unsupported.
fn bump_patch(version: &str) -> Result<String> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        bail!("`{version}` is not a major.minor.patch version");
    }
    let patch: u64 = parts[2]
        .parse()
        .with_context(|| format!("`{version}` has a non-numeric patch component"))?;
    Ok(format!("{}.{}.{}", parts[0], parts[1], patch + 1))
}

/// Replace the `[package]` section's `version = "..."` line, leaving every
/// other line untouched.  Dependency tables keep their own version lines.
fn rewrite_manifest_version(manifest: &str, next: &str) -> Result<String> {
    let mut out = Vec::new();
    let mut in_package = false;
    let mut replaced = false;

    for line in manifest.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            in_package = trimmed == "[package]";
        } else if in_package
            && !replaced
            && (trimmed.starts_with("version ") || trimmed.starts_with("version="))
        {
            let indent = &line[..line.len() - trimmed.len()];
            out.push(format!("{indent}version = \"{next}\""));
            replaced = true;
            continue;
        }
        out.push(line.to_string());
    }

    if !replaced {
        bail!("manifest has no [package] version line to rewrite");
    }

    let mut rewritten = out.join("\n");
    if manifest.ends_with('\n') {
        rewritten.push('\n');
    }
    Ok(rewritten)
}

// ---------------------------------------------------------------------------
// External commands
// ---------------------------------------------------------------------------

/// Captured output of one bounded external command.
#[derive(Debug)]
struct CommandOutput {
    status: std::process::ExitStatus,
    stdout: String,
    stderr: String,
}

/// Run an external command in `dir`, killing it after `timeout_secs`.
async fn run_command(
    program: &str,
    args: &[&str],
    dir: &Path,
    timeout_secs: u64,
) -> Result<CommandOutput> {
    debug!(program, ?args, dir = %dir.display(), "running command");

    let child = tokio::process::Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("failed to spawn `{program}`"))?;

    // `wait_with_output` takes ownership, so on timeout the child is
    // dropped and killed via `kill_on_drop(true)`.
    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
        .await
        .map_err(|_| {
            anyhow::anyhow!(
                "`{program} {}` exceeded the {timeout_secs}s time limit",
                args.join(" ")
            )
        })?
        .with_context(|| format!("`{program}` failed to run"))?;

    Ok(CommandOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Turn a non-zero exit into an error carrying the command's stderr.
fn ensure_success(output: &CommandOutput, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        bail!("{what} failed ({})", output.status);
    }
    bail!("{what} failed ({}): {stderr}", output.status);
}

/// One-time credential check before touching any package: accept either
/// `CARGO_REGISTRY_TOKEN` or a credentials file written by `cargo login`.
fn check_registry_login() -> Result<()> {
    if std::env::var("CARGO_REGISTRY_TOKEN").is_ok_and(|t| !t.trim().is_empty()) {
        debug!("using CARGO_REGISTRY_TOKEN");
        return Ok(());
    }

    let cargo_home = std::env::var_os("CARGO_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cargo")));
    if let Some(home) = cargo_home
        && (home.join("credentials.toml").is_file() || home.join("credentials").is_file())
    {
        debug!(path = %home.display(), "found cargo credentials file");
        return Ok(());
    }

    bail!("no crates.io credentials found; run `cargo login` or set CARGO_REGISTRY_TOKEN");
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Initialize the tracing subscriber with the given default log level.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Version bumping --

    #[test]
    fn bump_patch_increments_last_component() {
        assert_eq!(bump_patch("0.1.0").unwrap(), "0.1.1");
        assert_eq!(bump_patch("1.2.9").unwrap(), "1.2.10");
        assert_eq!(bump_patch("10.0.99").unwrap(), "10.0.100");
    }

    #[test]
    fn bump_patch_rejects_malformed_versions() {
        assert!(bump_patch("1.2").is_err());
        assert!(bump_patch("1.2.3.4").is_err());
        assert!(bump_patch("1.2.x").is_err());
        assert!(bump_patch("1.2.3-alpha").is_err());
    }

    // -- Manifest parsing and rewriting --

    const MANIFEST: &str = r#"[package]
name = "demo"
version = "0.3.7"
edition = "2024"

[dependencies]
serde = { version = "1", features = ["derive"] }
toml = "0.8"
"#;

    #[test]
    fn package_version_reads_the_package_table() {
        assert_eq!(package_version(MANIFEST).unwrap(), "0.3.7");
    }

    #[test]
    fn package_version_rejects_workspace_inheritance() {
        let manifest = "[package]\nname = \"demo\"\nversion.workspace = true\n";
        let err = package_version(manifest).unwrap_err();
        assert!(err.to_string().contains("workspace-inherited"));
    }

    #[test]
    fn package_version_rejects_missing_version() {
        assert!(package_version("[package]\nname = \"demo\"\n").is_err());
    }

    #[test]
    fn rewrite_changes_only_the_package_version_line() {
        let rewritten = rewrite_manifest_version(MANIFEST, "0.3.8").unwrap();
        assert!(rewritten.contains("version = \"0.3.8\""));
        // Dependency version requirements are untouched.
        assert!(rewritten.contains("serde = { version = \"1\", features = [\"derive\"] }"));
        assert!(rewritten.contains("toml = \"0.8\""));
        // Everything else is byte-identical.
        assert_eq!(rewritten.replace("0.3.8", "0.3.7"), MANIFEST);
    }

    #[test]
    fn rewrite_preserves_trailing_newline() {
        let rewritten = rewrite_manifest_version(MANIFEST, "0.3.8").unwrap();
        assert!(rewritten.ends_with('\n'));
    }

    #[test]
    fn rewrite_fails_when_no_version_line_exists() {
        let manifest = "[package]\nname = \"demo\"\n";
        assert!(rewrite_manifest_version(manifest, "0.1.1").is_err());
    }

    // -- Clean-tree decision --

    #[test]
    fn empty_porcelain_output_is_clean() {
        assert!(is_tree_clean(""));
        assert!(is_tree_clean("\n"));
    }

    #[test]
    fn modified_files_are_dirty() {
        assert!(!is_tree_clean(" M src/main.rs\n"));
        assert!(!is_tree_clean("?? new-file\n"));
    }

    // -- Package discovery --

    #[test]
    fn discover_finds_manifest_directories_sorted() {
        let root = tempfile::tempdir().unwrap();
        for name in ["zeta", "alpha"] {
            let dir = root.path().join(name);
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("Cargo.toml"), "[package]\n").unwrap();
        }
        // A directory without a manifest and a plain file are both skipped.
        std::fs::create_dir(root.path().join("docs")).unwrap();
        std::fs::write(root.path().join("README.md"), "hi").unwrap();

        let packages = discover_packages(root.path()).unwrap();
        let names: Vec<&str> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn discover_fails_on_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("nope");
        assert!(discover_packages(&missing).is_err());
    }

    // -- Bounded commands --

    #[tokio::test]
    async fn run_command_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_command("echo", &["hello"], dir.path(), 10).await.unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn run_command_kills_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_command("sleep", &["5"], dir.path(), 1).await.unwrap_err();
        assert!(err.to_string().contains("time limit"));
    }

    #[tokio::test]
    async fn ensure_success_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_command("sh", &["-c", "echo broken >&2; exit 3"], dir.path(), 10)
            .await
            .unwrap();
        let err = ensure_success(&output, "demo step").unwrap_err();
        assert!(err.to_string().contains("demo step failed"));
        assert!(err.to_string().contains("broken"));
    }
}

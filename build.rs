use std::env;
use std::process::Command;

/// Packagers building from a tarball can set this to stamp their own revision.
const REVISION_OVERRIDE: &str = "ABSA_BOOKS_REVISION";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");
    println!("cargo:rerun-if-env-changed={REVISION_OVERRIDE}");

    let revision = env::var(REVISION_OVERRIDE)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(git_revision)
        .unwrap_or_else(|| "unknown".to_string());
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    for (name, value) in [
        ("REVISION", revision),
        ("TIMESTAMP", timestamp),
        ("TARGET", target),
        ("PROFILE", profile),
    ] {
        println!("cargo:rustc-env=ABSA_BOOKS_BUILD_{name}={value}");
    }
}

/// `abc1234`, or `abc1234-dirty` when the working tree has changes.
fn git_revision() -> Option<String> {
    let hash = command_output("git", &["rev-parse", "--short", "HEAD"])?;
    if hash.is_empty() {
        return None;
    }
    match command_output("git", &["status", "--porcelain"]) {
        Some(changes) if !changes.is_empty() => Some(format!("{hash}-dirty")),
        _ => Some(hash),
    }
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}

use std::env;
use std::path::Path;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-env-changed=CANVAS_RELEASE");
    if Path::new(".git/HEAD").exists() {
        println!("cargo:rerun-if-changed=.git/HEAD");
    }

    let release = env::var("CANVAS_RELEASE")
        .ok()
        .filter(|release| !release.is_empty())
        .or_else(git_revision)
        .unwrap_or_default();

    println!("cargo:rustc-env=CANVAS_RELEASE={release}");
}

fn git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8(output.stdout)
        .ok()
        .map(|revision| revision.trim().to_string())
}

//! Build script: embeds the version string.

use std::process::Command;

fn main() {
    // A release pipeline may pin the version; local builds ask git.
    if let Ok(version) = std::env::var("DEPLOY_CONFIGS_VERSION") {
        println!("cargo:rustc-env=DEPLOY_CONFIGS_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !version.is_empty() {
            println!("cargo:rustc-env=DEPLOY_CONFIGS_VERSION={version}");
        }
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=DEPLOY_CONFIGS_VERSION");
}

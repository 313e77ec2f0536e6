//! Build script that embeds the installer version.

use std::process::Command;

fn main() {
    // Packaging pipelines pin the version through the environment; local
    // builds fall back to git describe.
    if let Ok(version) = std::env::var("LUET_PM_INSTALLER_VERSION") {
        println!("cargo:rustc-env=LUET_PM_INSTALLER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=LUET_PM_INSTALLER_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=LUET_PM_INSTALLER_VERSION");
}

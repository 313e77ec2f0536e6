//! Command: print version information.

/// Version string baked in at build time, falling back to the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("LUET_PM_INSTALLER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the installer version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("luet-pm-installer {}", version());
}

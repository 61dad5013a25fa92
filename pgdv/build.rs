//! Build script for pgdv
//!
//! Records the cargo profile and target triple so the startup log line
//! identifies which binary produced a report.

fn main() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=PGDV_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=PGDV_BUILD_TARGET={}", target);
    println!("cargo:rerun-if-changed=build.rs");
}

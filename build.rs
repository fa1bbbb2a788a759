//! Build script for the jammer firmware
//!
//! Handles:
//! - Linker search path for the generated memory layout
//! - defmt linker script when building for the target

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Only firmware builds need the linker setup; host test builds skip it
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

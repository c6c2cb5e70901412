//! Build script for the function generator firmware
//!
//! Handles:
//! - Linker search path for the project directory
//! - cortex-m-rt and defmt linker scripts for the target binary

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Link memory.x overrides from project directory (embassy-stm32 provides one by default)
    println!("cargo:rustc-link-search={}", std::env::var("CARGO_MANIFEST_DIR").unwrap());

    // Host builds only compile the library and its tests
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
}

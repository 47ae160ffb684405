use std::env;
use std::path::PathBuf;

// Locates the native Embree 4 library when the "embree" feature is enabled.
// EMBREE_DIR points at an install prefix (lib/ underneath), VCPKG_ROOT at a vcpkg tree.
fn embree_link_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(dir) = env::var("EMBREE_DIR") {
        let root = PathBuf::from(dir);
        dirs.push(root.join("lib"));
        dirs.push(root.join("lib64"));
    }
    if let Ok(vcpkg_root) = env::var("VCPKG_ROOT") {
        let triplet = if cfg!(target_os = "windows") {
            "x64-windows"
        } else if cfg!(target_os = "macos") {
            "x64-osx"
        } else {
            "x64-linux"
        };
        dirs.push(
            PathBuf::from(vcpkg_root)
                .join("installed")
                .join(triplet)
                .join("lib"),
        );
    }
    return dirs;
}

fn main() {
    println!("cargo:rerun-if-changed=build/main.rs");
    println!("cargo:rerun-if-env-changed=EMBREE_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");

    if env::var_os("CARGO_FEATURE_EMBREE").is_some() {
        for dir in embree_link_dirs() {
            if dir.exists() {
                println!("cargo:rustc-link-search=native={}", dir.display());
            }
        }
    }
}

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=native/");
    println!("cargo:rerun-if-env-changed=VERUSHASH_LIB_DIR");
    println!("cargo:rerun-if-env-changed=VERUSHASH_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=VERUSHASH_NO_SODIUM");

    // Without the native engine the crate only builds against caller-supplied backends.
    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    let mut build = cc::Build::new();
    build
        .cpp(true)
        .include("native")
        .flag_if_supported("-std=c++11")
        .flag_if_supported("-maes")
        .flag_if_supported("-msse4.1")
        .warnings(false)
        .opt_level(2);
    if let Some(dir) = env::var_os("VERUSHASH_INCLUDE_DIR") {
        build.include(PathBuf::from(dir));
    }
    build.file("native/verushash_shim.cpp");
    build.compile("verushash_shim");

    if let Some(dir) = env::var_os("VERUSHASH_LIB_DIR") {
        println!("cargo:rustc-link-search=native={}", PathBuf::from(dir).display());
    }
    println!("cargo:rustc-link-lib=static=verushash");
    if env::var_os("VERUSHASH_NO_SODIUM").is_none() {
        println!("cargo:rustc-link-lib=sodium");
    }

    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("apple") {
        println!("cargo:rustc-link-lib=c++");
    } else {
        println!("cargo:rustc-link-lib=stdc++");
    }
}

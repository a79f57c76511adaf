use std::path::PathBuf;

use cc::Build;

fn feature_enabled(name: &str) -> bool {
    std::env::var(format!("CARGO_FEATURE_{name}")).is_ok()
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=csrc/kaminpar_shim.h");
    println!("cargo:rerun-if-changed=csrc/shim_error.hpp");
    println!("cargo:rerun-if-env-changed=KAMINPAR_DIR");

    let do_embedding = feature_enabled("EMBEDDING");
    let do_builder = feature_enabled("BUILDER");

    // lib.rs reports this too, but the shim would fail to link first
    assert!(
        !(do_embedding && do_builder),
        "features `embedding` and `builder` select different engines; enable only one"
    );

    // adapter layer only, nothing native to build
    if !do_embedding && !do_builder {
        return;
    }

    let (shim, engine_lib) = if do_embedding {
        ("csrc/embedding_shim.cc", "kaminpar_shm")
    } else {
        ("csrc/builder_shim.cc", "kaminpar")
    };
    println!("cargo:rerun-if-changed={shim}");

    // only the embedding engine is built with 64-bit edges, the shims static_assert the widths
    let wide_edges = do_embedding;
    let (include_dirs, lib_dirs) = locate_engine(wide_edges);

    let mut build = Build::new();
    build
        .cpp(true)
        .file(shim)
        .include("csrc")
        .flag_if_supported("-std=c++20")
        .warnings(false);
    if wide_edges {
        build
            .define("KAMINPAR_64BIT_EDGE_IDS", "ON")
            .define("KAMINPAR_64BIT_EDGE_WEIGHTS", "ON");
    }
    for dir in &include_dirs {
        build.include(dir);
    }
    build.compile("kaminpar_shim");

    for dir in &lib_dirs {
        println!("cargo:rustc-link-search=native={}", dir.display());
    }
    println!("cargo:rustc-link-lib=static={engine_lib}");
    println!("cargo:rustc-link-lib=dylib=tbb");
    println!("cargo:rustc-link-lib=dylib=tbbmalloc");
}

/// include and library directories of the engine
#[cfg(feature = "vendored")]
fn locate_engine(wide_edges: bool) -> (Vec<PathBuf>, Vec<PathBuf>) {
    println!("cargo:rerun-if-changed=vendor/KaMinPar");

    let width = if wide_edges { "ON" } else { "OFF" };
    let dst = cmake::Config::new("vendor/KaMinPar")
        .define("KAMINPAR_64BIT_EDGE_IDS", width)
        .define("KAMINPAR_64BIT_EDGE_WEIGHTS", width)
        .no_build_target(true)
        .build();

    let source = PathBuf::from("vendor/KaMinPar");
    let build = dst.join("build");
    (
        vec![
            source.join("include"),
            source.clone(),
            source.join("kaminpar-shm"),
            build.clone(),
        ],
        vec![build.join("kaminpar-shm"), build.join("lib")],
    )
}

#[cfg(not(feature = "vendored"))]
fn locate_engine(_wide_edges: bool) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let prefix = std::env::var("KAMINPAR_DIR").map(PathBuf::from).expect(
        "KAMINPAR_DIR must point at a KaMinPar install prefix (or enable the `vendored` feature)",
    );
    (
        vec![prefix.join("include")],
        vec![prefix.join("lib"), prefix.join("lib64")],
    )
}

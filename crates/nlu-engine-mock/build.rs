use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => dir,
        Err(_) => return,
    };
    let output_dir = PathBuf::from(&crate_dir).join("include");

    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        println!("cargo:warning=cannot create {}: {}", output_dir.display(), e);
        return;
    }

    // Record layouts live in nlu-engine-sys, so that crate is parsed too
    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("NLU_ENGINE_H")
        .with_parse_deps(true)
        .with_parse_include(&["nlu-engine-sys"])
        .generate();

    match bindings {
        Ok(bindings) => {
            bindings.write_to_file(output_dir.join("nlu_engine.h"));
        }
        Err(e) => println!("cargo:warning=header generation skipped: {}", e),
    }

    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/api.rs");
    println!("cargo:rerun-if-changed=../nlu-engine-sys/src/types.rs");
}

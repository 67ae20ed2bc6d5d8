use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let include_dir = PathBuf::from(&crate_dir).join("include");
    if let Err(e) = std::fs::create_dir_all(&include_dir) {
        println!("cargo:warning=cannot create {}: {e}", include_dir.display());
        return;
    }

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("QUAKE_FFI_H")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(include_dir.join("quake_ffi.h"));
        }
        Err(e) => println!("cargo:warning=header not generated: {e}"),
    }
}

// build.rs
use std::{env, fs, path::Path};

const ROM_GLOB: &str = "tests/roms/**/*.gb";

fn test_name(path: &str) -> String {
    let mut name: String = path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();

    // Fixes a linting issue in naming after the replacements above.
    while name.contains("__") {
        name = name.replace("__", "_");
    }

    // Reduce name length for simplicity. The prefix keeps names that
    // start with a digit valid.
    let short = name.strip_prefix("tests_roms_").unwrap_or(&name);
    format!("rom_{}", short.trim_matches('_'))
}

fn generate_rom_tests() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let destination = Path::new(&out_dir).join("generated_rom_tests.rs");

    let mut test_code = String::new();
    let roms = glob::glob(ROM_GLOB).expect("Failed to read glob pattern");

    for entry in roms.filter_map(Result::ok) {
        let path = entry.to_str().unwrap();
        test_code.push_str(&format!(
            "#[test] fn {}() {{ run_test(r#\"{}\"#); }}\n",
            test_name(path),
            path
        ));
    }

    fs::write(destination, test_code).unwrap();
}

fn main() {
    generate_rom_tests();
    println!("cargo:rerun-if-changed=tests/roms");
    println!("cargo:rerun-if-changed=build.rs");
}

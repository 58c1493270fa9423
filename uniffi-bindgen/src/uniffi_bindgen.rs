//! Generates Kotlin and Swift bindings for `didtab_core`.

fn main() {
    uniffi::uniffi_bindgen_main();
}

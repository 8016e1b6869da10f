fn main() {
    // ESP-IDF link arguments are only relevant when building for the
    // target; host builds (library + tests) must not require an IDF
    // toolchain to be present.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}

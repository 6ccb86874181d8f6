use std::env;

fn main() {
    // Host builds (tests, simulator) have no ESP-IDF toolchain to link against
    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}

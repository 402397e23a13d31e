//! WASM entry point for the demo page.
//!
//! Compiled to WebAssembly via Trunk (see `index.html`) and mounted to the
//! DOM body.

fn main() {
    #[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
    {
        console_error_panic_hook::set_once();
        passkey_demo::logging::init();
        passkey_demo::app::mount();
    }
}

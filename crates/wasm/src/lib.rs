//! WebAssembly bindings for the cachestep simulator.
//!
//! A browser UI owns one [`WasmSession`], sends it session commands as JSON,
//! and re-renders from the JSON state it returns. Timers stay on the JS side:
//! the page calls [`WasmSession::tick`] from `setInterval` while auto-advance
//! is enabled.
//!
//! ```js
//! const session = new WasmSession();
//! session.apply(JSON.stringify({ command: "init", config: { cache: { total_blocks: 8, ways: 4 } } }));
//! const state = JSON.parse(session.apply(JSON.stringify({ command: "next" })));
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use cachestep_core::session::{Command, Session};

const SEED_SCALE: f64 = 9_007_199_254_740_992.0; // 2^53

/// JS handle around a [`Session`].
#[wasm_bindgen]
#[derive(Debug)]
pub struct WasmSession {
    inner: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// Creates an empty session seeded from `Math.random()`.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_seed((js_sys::Math::random() * SEED_SCALE) as u64)
    }

    /// Creates an empty session with a fixed seed, for reproducible random test cases.
    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Session::with_seed(seed),
        }
    }

    /// Applies one JSON-encoded command and returns the new state as JSON.
    ///
    /// # Errors
    ///
    /// Throws a JS `Error` if the command does not parse or is rejected; the
    /// session is left as it was.
    pub fn apply(&mut self, command: &str) -> Result<String, JsValue> {
        let command: Command = serde_json::from_str(command).map_err(to_js_error)?;
        let outcome = self.inner.apply(command).map_err(to_js_error)?;
        web_sys::console::debug_1(&JsValue::from_str(&format!("{outcome:?}")));
        to_json(&self.inner.state())
    }

    /// Current state as JSON.
    ///
    /// # Errors
    ///
    /// Throws a JS `Error` if the state cannot be serialized.
    pub fn state(&self) -> Result<String, JsValue> {
        to_json(&self.inner.state())
    }

    /// Timer callback. Returns `true` if a step ran; `false` means the page
    /// should clear its interval.
    pub fn tick(&mut self) -> bool {
        self.inner.tick()
    }

    /// Whether auto-advance is currently running.
    #[wasm_bindgen(getter, js_name = autoEnabled)]
    pub fn auto_enabled(&self) -> bool {
        self.inner.auto().is_enabled()
    }

    /// Auto-advance delay in milliseconds.
    #[wasm_bindgen(getter, js_name = autoDelayMs)]
    pub fn auto_delay_ms(&self) -> f64 {
        self.inner.auto().delay().as_secs_f64() * 1000.0
    }
}

impl Default for WasmSession {
    fn default() -> Self {
        Self::new()
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js_error)
}

fn to_js_error<E: std::fmt::Display>(e: E) -> JsValue {
    let message = e.to_string();
    web_sys::console::warn_1(&JsValue::from_str(&message));
    js_sys::Error::new(&message).into()
}

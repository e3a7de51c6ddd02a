//! Per‑session error bookkeeping.
//!
//! Instead of process‑wide "had error" flags, the session owns one
//! [`Diagnostics`] and threads it through scanning, parsing and resolution.
//! Static errors (lex / parse / resolve) block execution of the current unit
//! and are cleared between REPL lines; runtime failures accumulate for the
//! lifetime of the session so batch mode can pick an exit status at the end.

use log::debug;

use crate::error::SinterpError;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<SinterpError>,
    had_static_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.  Static errors set the static flag; runtime errors
    /// set the sticky runtime flag.
    pub fn report(&mut self, error: SinterpError) {
        debug!("Diagnostic reported: {}", error);

        if error.is_static() {
            self.had_static_error = true;
        } else {
            self.had_runtime_error = true;
        }

        self.errors.push(error);
    }

    pub fn had_static_error(&self) -> bool {
        self.had_static_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Errors recorded since the last [`drain`](Self::drain).
    pub fn errors(&self) -> &[SinterpError] {
        &self.errors
    }

    /// Hand the recorded errors to the caller for printing.
    pub fn drain(&mut self) -> Vec<SinterpError> {
        std::mem::take(&mut self.errors)
    }

    /// Start a new execution unit (REPL line): forget static errors, keep the
    /// runtime flag.
    pub fn reset_static(&mut self) {
        debug!("Resetting static error state");

        self.had_static_error = false;
        self.errors.retain(|e| !e.is_static());
    }
}

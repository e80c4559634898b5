//! Entry point for the `nullflow` binary.
//!
//! All real work lives in `nullflow-cli`; this crate only exists so the
//! workspace produces a top-level binary the way the teacher's root `wasm`
//! package wraps its own `crates/*` workspace.

fn main() -> anyhow::Result<()> {
    nullflow_cli::run()
}

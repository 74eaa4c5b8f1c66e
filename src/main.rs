//! Ahana CLI
//!
//! Run with: cargo run --bin ahana -- --help

fn main() -> anyhow::Result<()> {
    ahana::cli::run()
}

//! # Voxel Miner Entry Point
//!
//! Calls into the library's `run()` and turns a startup failure into a non-zero exit.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release
//! ```

fn main() {
    if let Err(err) = voxel_miner::run() {
        eprintln!("voxel-miner: {err}");
        std::process::exit(1);
    }
}

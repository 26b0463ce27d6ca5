use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::Result;

/// Output directory owned exclusively by one pipeline execution
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Path of the allocated run directory
    pub run_path: PathBuf,

    /// Run identifier; always the directory's own name
    pub run_id: String,
}

/// Allocate the next free run directory under the output root
///
/// Scans for the smallest non-negative integer `n` such that `root/n` does
/// not exist and creates it. The create call is exclusive, so two concurrent
/// allocations cannot both claim the same integer; the loser sees
/// `AlreadyExists` and moves on to the next candidate. Persisted state is
/// the directory listing itself, which keeps allocation safe across process
/// restarts.
pub fn allocate(output_root: &Path) -> Result<RunContext> {
    fs_err::create_dir_all(output_root)?;

    let mut run = 0u64;
    loop {
        let run_path = output_root.join(run.to_string());
        match fs_err::create_dir(&run_path) {
            Ok(()) => {
                tracing::info!("Allocated run directory: {}", run_path.display());
                return Ok(RunContext {
                    run_path,
                    run_id: run.to_string(),
                });
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => run += 1,
            Err(err) => return Err(err.into()),
        }
    }
}

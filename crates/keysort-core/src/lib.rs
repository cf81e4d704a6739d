//! keysort core
//!
//! Lossless dictionary-key sorting for Python source files. Parsing builds
//! a formatting-preserving CST; the transform reorders the entries of every
//! dictionary literal whose keys are all plain string constants, reapplies
//! each slot's original separator formatting, and re-serializes so that
//! every untouched byte of the file survives verbatim.

pub mod cst;
pub mod discovery;
pub mod error;
pub mod orchestrator;
pub mod result;
pub mod sorting;
pub mod transform;

pub use discovery::{collect_python_files, is_python_file};
pub use error::{ErrorKind, KeysortError};
pub use orchestrator::{FileOutcome, WriteMode, process_file};
pub use result::Result;
pub use sorting::{SortMode, extract_sort_key, is_eligible};
pub use transform::{TransformOutcome, parse_checked, transform_source, transform_tree};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keysort_core=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

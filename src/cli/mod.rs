//! Command-line front ends for the `efpr` and `volcano` binaries.

mod args;
pub mod efpr;
mod logging;
pub mod volcano;

pub use args::{
    existing_dir, existing_file, fraction, EfprArgs, OutputArgs, VolcanoArgs, DEFAULT_TOP_HITS,
};
pub use efpr::EfprSummary;
pub use logging::init_logging;
pub use volcano::VolcanoSummary;

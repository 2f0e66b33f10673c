pub mod driver;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod stages;
pub mod synthetic;
pub mod wait;

mod parse;

#[cfg(test)]
mod fake;

pub use driver::chrome::ChromeLauncher;
pub use driver::{Driver, Launch, RenderSession};
pub use error::{CandidateFault, DriverError, StageError, WaitError};
pub use pipeline::{MenuPipeline, PipelineReport, SkippedCandidate};
pub use source::collect_restaurants;
pub use stages::CandidateOutcome;
pub use synthetic::generate_restaurants;

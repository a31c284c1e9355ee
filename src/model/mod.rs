pub mod artifact;
pub mod input;
pub mod options;
pub mod progress;
pub mod selection;

pub use artifact::{Artifact, OperationResult};
pub use input::{ContentSource, InputFile};
pub use options::{ArchiveLevel, CombineOptions, CompressOptions, QualityTier, ZipOptions};
pub use progress::{NoProgress, ProgressSink, ProgressState};
pub use selection::SelectionSet;

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pdf;
pub mod picker;
pub mod workflow;

pub use config::Settings;
pub use error::{DeliveryError, FlattenError, RasterError, WorkflowError};
pub use model::{
    ArchiveLevel, Artifact, CombineOptions, CompressOptions, InputFile, OperationResult,
    ProgressSink, ProgressState, QualityTier, ZipOptions,
};
pub use pdf::{PageRasterizer, PdfiumRasterizer};
pub use picker::pick;
pub use workflow::{DeliverySink, DirectorySink, MemorySink, RunContext, Workspace};

/// Merge PDFs held in memory into one document, in the order given.
///
/// Convenience wrapper for library consumers that already hold the bytes and
/// do not need selection or delivery handling.
///
/// # Example
///
/// ```no_run
/// let a = std::fs::read("a.pdf").unwrap();
/// let b = std::fs::read("b.pdf").unwrap();
/// let merged = paperclip::combine_pdfs(&[("a.pdf", &a[..]), ("b.pdf", &b[..])], true).unwrap();
/// std::fs::write("combined.pdf", merged).unwrap();
/// ```
pub fn combine_pdfs(inputs: &[(&str, &[u8])], compress_streams: bool) -> Result<Vec<u8>, WorkflowError> {
    let mut workspace = Workspace::new();
    workspace.select(
        inputs
            .iter()
            .map(|(name, bytes)| InputFile::from_bytes(*name, bytes.to_vec())),
    );
    let mut sink = MemorySink::new();
    let artifact = workspace.combine(CombineOptions { compress_streams }, &mut sink)?;
    Ok(artifact.bytes.clone())
}

use std::borrow::Cow;
use std::io;

use crate::archive::{package, ArchiveWriter};
use crate::config::defaults::*;
use crate::error::WorkflowError;
use crate::model::{
    Artifact, CombineOptions, CompressOptions, InputFile, OperationResult, ProgressState,
    SelectionSet, ZipOptions,
};
use crate::pdf::{compress_document, load_document, merge_documents, save_document, PageRasterizer};

use super::context::RunContext;
use super::delivery::DeliverySink;

/// Minimum selection sizes per operation
const COMBINE_MIN_FILES: usize = 2;
const COMPRESS_MIN_FILES: usize = 1;
const ZIP_MIN_FILES: usize = 1;

/// Selection, run state and the retained result of the last run.
///
/// Every operation follows the same shape: check the selection, mark the
/// context busy, transform each file in selection order, package, deliver
/// once, and keep the artifact for `download_again`.
#[derive(Default)]
pub struct Workspace {
    selection: SelectionSet,
    context: RunContext,
    result: Option<OperationResult>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: RunContext) -> Self {
        Self {
            context,
            ..Default::default()
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn result(&self) -> Option<&OperationResult> {
        self.result.as_ref()
    }

    /// The artifact available for another download, if the last run succeeded
    pub fn retained(&self) -> Option<&Artifact> {
        self.result.as_ref().and_then(OperationResult::artifact)
    }

    /// Add picked or dropped files; new input invalidates any previous output
    pub fn select<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = InputFile>,
    {
        let added = self.selection.extend(batch);
        self.result = None;
        self.report_selection();
        added
    }

    /// Drop one file from the selection by its selection key
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.selection.remove(key);
        if removed {
            self.result = None;
            self.report_selection();
        }
        removed
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.result = None;
        self.context.reset();
    }

    /// Merge every selected PDF, in selection order, into `combined.pdf`
    pub fn combine(
        &mut self,
        options: CombineOptions,
        sink: &mut dyn DeliverySink,
    ) -> Result<&Artifact, WorkflowError> {
        self.require(COMBINE_MIN_FILES, "Please select at least two PDF files to combine.")?;
        self.run("Combining PDFs... This may take a moment.", sink, |files, ctx| {
            combine_files(files, options, ctx)
        })
    }

    /// Re-render every selected PDF as images; several outputs are zipped
    pub fn compress(
        &mut self,
        options: CompressOptions,
        rasterizer: &dyn PageRasterizer,
        sink: &mut dyn DeliverySink,
    ) -> Result<&Artifact, WorkflowError> {
        self.require(COMPRESS_MIN_FILES, "Please select a PDF file to compress.")?;
        let label = format!("Compressing ({})... please wait.", options.tier.label());
        self.run(&label, sink, |files, ctx| {
            compress_files(files, options, rasterizer, ctx)
        })
    }

    /// Pack every selected file into one archive, keeping relative paths
    pub fn zip(
        &mut self,
        options: ZipOptions,
        sink: &mut dyn DeliverySink,
    ) -> Result<&Artifact, WorkflowError> {
        self.require(ZIP_MIN_FILES, "Please select a folder or files to compress.")?;
        let label = format!("Compressing folder ({})... please wait.", options.level.label());
        self.run(&label, sink, |files, ctx| zip_files(files, options, ctx))
    }

    /// Deliver the retained artifact again without recomputing it
    pub fn download_again(&mut self, sink: &mut dyn DeliverySink) -> Result<(), WorkflowError> {
        if self.context.is_busy() {
            return Err(WorkflowError::Busy);
        }
        let artifact = match &self.result {
            Some(OperationResult::Ready(artifact)) => artifact,
            _ => return Err(WorkflowError::NothingToDeliver),
        };

        let delivered = sink.deliver(artifact);
        self.context
            .set_status(ProgressState::message(delivery_message(artifact, &delivered)));
        delivered.map_err(WorkflowError::from)
    }

    /// Forget the retained artifact and return to an empty selection
    pub fn start_new(&mut self) {
        self.result = None;
        self.selection.clear();
        self.context.reset();
    }

    fn report_selection(&mut self) {
        self.context.set_status(ProgressState::message(format!(
            "{} files selected.",
            self.selection.len()
        )));
    }

    fn require(&mut self, required: usize, guidance: &str) -> Result<(), WorkflowError> {
        let selected = self.selection.len();
        if selected >= required {
            return Ok(());
        }
        self.context.set_status(ProgressState::message(guidance));
        Err(WorkflowError::InsufficientInput { required, selected })
    }

    fn run<F>(
        &mut self,
        label: &str,
        sink: &mut dyn DeliverySink,
        transform: F,
    ) -> Result<&Artifact, WorkflowError>
    where
        F: FnOnce(&[InputFile], &mut RunContext) -> Result<Artifact, WorkflowError>,
    {
        self.context.begin(label)?;
        log::info!("{} ({} files)", label, self.selection.len());

        let artifact = match transform(self.selection.files(), &mut self.context) {
            Ok(artifact) => artifact,
            Err(e) => {
                log::error!("{}", e);
                self.context.end(format!("Error: {}", e));
                self.result = Some(OperationResult::Failed(e.to_string()));
                return Err(e);
            }
        };

        self.selection.clear();
        let delivered = sink.deliver(&artifact);
        self.context.end(delivery_message(&artifact, &delivered));
        self.result = Some(OperationResult::Ready(artifact));
        delivered?;

        match &self.result {
            Some(OperationResult::Ready(artifact)) => Ok(artifact),
            _ => Err(WorkflowError::NothingToDeliver),
        }
    }
}

fn delivery_message<E: std::fmt::Display>(artifact: &Artifact, delivered: &Result<(), E>) -> String {
    match delivered {
        Ok(()) => format!("File \"{}\" downloaded successfully.", artifact.file_name),
        Err(e) => format!("Download failed: {}", e),
    }
}

fn read_input(file: &InputFile) -> Result<Cow<'_, [u8]>, WorkflowError> {
    file.read().map_err(|e| WorkflowError::Open {
        name: file.name.clone(),
        message: e.to_string(),
    })
}

fn combine_files(
    files: &[InputFile],
    options: CombineOptions,
    ctx: &mut RunContext,
) -> Result<Artifact, WorkflowError> {
    let mut documents = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        ctx.set_status(ProgressState::message(format!(
            "Reading {} ({} of {})...",
            file.name,
            i + 1,
            files.len()
        )));
        let bytes = read_input(file)?;
        documents.push(load_document(&file.name, &bytes)?);
    }

    let merged = merge_documents(documents)?;
    let bytes = save_document(merged, options.compress_streams)?;
    Ok(Artifact::pdf(COMBINED_FILE_NAME, bytes))
}

fn compress_files(
    files: &[InputFile],
    options: CompressOptions,
    rasterizer: &dyn PageRasterizer,
    ctx: &mut RunContext,
) -> Result<Artifact, WorkflowError> {
    let mut outputs = Vec::with_capacity(files.len());
    for file in files {
        let bytes = read_input(file)?;
        let compressed = compress_document(
            &file.name,
            &bytes,
            options.tier,
            options.flatten_forms,
            rasterizer,
            ctx,
        )?;
        log::info!(
            "Compressed {}: {} pages, {} -> {} bytes",
            file.name,
            compressed.page_count,
            bytes.len(),
            compressed.bytes.len()
        );
        outputs.push(Artifact::pdf(
            format!("{}{}.pdf", file.stem(), COMPRESSED_SUFFIX),
            compressed.bytes,
        ));
    }

    let archive_name = format!("{}-{}.zip", COMPRESSED_ARCHIVE_PREFIX, options.tier.label());
    package(outputs, &archive_name, options.archive_level, ctx)
}

fn zip_files(
    files: &[InputFile],
    options: ZipOptions,
    ctx: &mut RunContext,
) -> Result<Artifact, WorkflowError> {
    let total = files.iter().map(|f| f.len).sum();
    let mut writer = ArchiveWriter::new(options.level, total);
    for file in files {
        let bytes = file
            .read()
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", file.selection_key(), e)))?;
        writer.add(file.archive_entry_name(), &bytes, ctx)?;
    }

    let archive_name = format!("{}-{}.zip", FOLDER_ARCHIVE_PREFIX, options.level.label());
    Ok(Artifact::zip(archive_name, writer.finish(ctx)?))
}

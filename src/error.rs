use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Select at least {required} files to continue ({selected} selected)")]
    InsufficientInput { required: usize, selected: usize },

    #[error("Another operation is still running")]
    Busy,

    #[error("Failed to open \"{name}\": {message}. The file may be corrupt or encrypted.")]
    Open { name: String, message: String },

    #[error("Failed to render page {page} of \"{name}\": {message}")]
    Render {
        name: String,
        page: usize,
        message: String,
    },

    #[error("Image encoding error: {0}")]
    Encode(String),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Download failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),

    #[error("Nothing to download yet")]
    NothingToDeliver,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Could not write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Delivery refused: {0}")]
    Refused(String),
}

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Failed to bind PDFium: {0}")]
    Bind(String),

    #[error("Failed to load document: {0}")]
    Load(String),

    #[error("Page {0} does not exist")]
    PageOutOfRange(usize),

    #[error("Render failed: {0}")]
    Render(String),
}

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Failed to parse PDF for flattening: {0}")]
    Parse(String),

    #[error("Malformed form field: {0}")]
    MalformedField(String),

    #[error("Failed to save flattened PDF: {0}")]
    Save(String),
}

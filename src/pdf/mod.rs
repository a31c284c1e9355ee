//! PDF transforms built on lopdf, plus the rasterizer seam used by the
//! render-and-reencode compressor

pub mod compress;
pub mod document;
pub mod flatten;
pub mod image_page;
pub mod merge;
pub mod raster;

pub use compress::{compress_document, CompressedDocument};
pub use document::{load_document, save_document};
pub use flatten::flatten_forms;
pub use image_page::{ImagePage, ImagePageWriter};
pub use merge::merge_documents;
pub use raster::{PageRasterizer, PdfiumRasterizer, RasterDocument, RenderedPage};

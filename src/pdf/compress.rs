//! Render-and-reencode compression
//!
//! Each page is rasterized, re-encoded as JPEG and placed alone on a new
//! page. Text and vector content are discarded, so the output has no
//! selectable text and no form fields.

use std::borrow::Cow;

use crate::error::WorkflowError;
use crate::model::{ProgressSink, ProgressState, QualityTier};

use super::document::save_document;
use super::flatten::flatten_forms;
use super::image_page::{ImagePage, ImagePageWriter};
use super::raster::PageRasterizer;

/// Output of compressing one document
#[derive(Debug)]
pub struct CompressedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Whether form fields were baked in before rendering
    pub flattened: bool,
}

/// Compress one document.
///
/// Flattening failures are logged and the unflattened source is rendered
/// instead. Progress is reported after every page.
pub fn compress_document(
    name: &str,
    source: &[u8],
    tier: QualityTier,
    flatten: bool,
    rasterizer: &dyn PageRasterizer,
    progress: &mut dyn ProgressSink,
) -> Result<CompressedDocument, WorkflowError> {
    let mut flattened = false;
    let bytes: Cow<'_, [u8]> = if flatten {
        match flatten_forms(source) {
            Ok(flat) => {
                flattened = true;
                Cow::Owned(flat)
            }
            Err(e) => {
                log::warn!("Could not flatten form fields in {}: {}", name, e);
                Cow::Borrowed(source)
            }
        }
    } else {
        Cow::Borrowed(source)
    };

    let document = rasterizer.open(&bytes).map_err(|e| WorkflowError::Open {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    let total = document.page_count();
    if total == 0 {
        return Err(WorkflowError::Open {
            name: name.to_string(),
            message: "document has no pages".to_string(),
        });
    }

    let scale = tier.render_scale();
    let quality = tier.jpeg_quality();
    let mut writer = ImagePageWriter::new();

    for index in 0..total {
        let rendered = document
            .render_page(index, scale)
            .map_err(|e| WorkflowError::Render {
                name: name.to_string(),
                page: index + 1,
                message: e.to_string(),
            })?;

        let page = ImagePage::encode(
            &rendered.image,
            rendered.viewport_width,
            rendered.viewport_height,
            quality,
        )?;
        log::debug!(
            "{} page {}: {}x{} px, {} bytes",
            name,
            index + 1,
            page.pixel_width,
            page.pixel_height,
            page.jpeg.len()
        );
        writer.push(page)?;

        progress.report(&ProgressState::message(format!(
            "Compressing {}: page {} of {}...",
            name,
            index + 1,
            total
        )));
    }

    let page_count = writer.page_count();
    let bytes = save_document(writer.finish(), true)?;

    Ok(CompressedDocument {
        bytes,
        page_count,
        flattened,
    })
}

//! Page rasterization seam
//!
//! The compressor only needs "open a document, count pages, render page N at
//! a scale". PDFium provides that in production; tests plug in their own.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use pdfium_render::prelude::*;

use crate::error::RasterError;

/// A page rendered to pixels, with the viewport it was rendered into
pub struct RenderedPage {
    pub image: DynamicImage,
    /// Viewport width in PDF points (page width × scale)
    pub viewport_width: f32,
    /// Viewport height in PDF points (page height × scale)
    pub viewport_height: f32,
}

/// An open document that can render its pages
pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Render a zero-based page at `scale` × its size in points
    fn render_page(&self, index: usize, scale: f32) -> Result<RenderedPage, RasterError>;
}

/// Opens documents for rendering
pub trait PageRasterizer {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn RasterDocument + 'a>, RasterError>;
}

/// Rasterizer backed by a PDFium shared library bound at runtime
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Bind PDFium from `library_dir` if given, then the working directory,
    /// then the system library path
    pub fn new(library_dir: Option<&Path>) -> Result<Self, RasterError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(dir) = library_dir {
            candidates.push(dir.to_path_buf());
        }
        candidates.push(PathBuf::from("./"));

        let mut bindings = None;
        for dir in &candidates {
            let path = Pdfium::pdfium_platform_library_name_at_path(dir);
            match Pdfium::bind_to_library(&path) {
                Ok(found) => {
                    log::debug!("Bound PDFium from {}", path.display());
                    bindings = Some(found);
                    break;
                }
                Err(e) => log::debug!("No PDFium at {}: {}", path.display(), e),
            }
        }

        let bindings = match bindings {
            Some(bindings) => bindings,
            None => Pdfium::bind_to_system_library().map_err(|e| RasterError::Bind(e.to_string()))?,
        };

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Box<dyn RasterDocument + 'a>, RasterError> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| RasterError::Load(e.to_string()))?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<RenderedPage, RasterError> {
        let page_index = index
            .try_into()
            .map_err(|_| RasterError::PageOutOfRange(index))?;
        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|_| RasterError::PageOutOfRange(index))?;

        let viewport_width = page.width().value * scale;
        let viewport_height = page.height().value * scale;

        let config = PdfRenderConfig::new()
            .set_target_width(viewport_width.floor().max(1.0) as i32)
            .set_target_height(viewport_height.floor().max(1.0) as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| RasterError::Render(e.to_string()))?;

        Ok(RenderedPage {
            image: bitmap.as_image(),
            viewport_width,
            viewport_height,
        })
    }
}

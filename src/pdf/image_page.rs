//! Documents whose pages are a single full-bleed JPEG

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::config::defaults::OUTPUT_PDF_VERSION;
use crate::error::WorkflowError;

/// Name of the image XObject in every page's resources
const IMAGE_RESOURCE: &str = "Im0";

/// A JPEG-encoded page ready to be placed
pub struct ImagePage {
    pub jpeg: Vec<u8>,
    pub pixel_width: u32,
    pub pixel_height: u32,
    /// Page size in points
    pub width: f32,
    pub height: f32,
}

impl ImagePage {
    /// Encode a raster as baseline RGB JPEG
    pub fn encode(
        image: &DynamicImage,
        width: f32,
        height: f32,
        quality: u8,
    ) -> Result<Self, WorkflowError> {
        let rgb = image.to_rgb8();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
            .encode_image(&rgb)
            .map_err(|e| WorkflowError::Encode(e.to_string()))?;

        Ok(Self {
            jpeg,
            pixel_width: rgb.width(),
            pixel_height: rgb.height(),
            width,
            height,
        })
    }
}

/// Accumulates image pages into a new document
pub struct ImagePageWriter {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for ImagePageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImagePageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append a page sized to the image's viewport, drawing the image over it
    pub fn push(&mut self, page: ImagePage) -> Result<(), WorkflowError> {
        let mut image = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => page.pixel_width as i64,
                "Height" => page.pixel_height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            page.jpeg,
        );
        image.allows_compression = false;
        let image_id = self.doc.add_object(image);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page.width.into(),
                        0.into(),
                        0.into(),
                        page.height.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let encoded = content
            .encode()
            .map_err(|e| WorkflowError::Pdf(format!("Failed to encode page content: {}", e)))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page.width.into(), page.height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_RESOURCE => image_id,
                },
            },
        });
        self.kids.push(Object::Reference(page_id));
        Ok(())
    }

    /// Close the page tree and return the document
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc
    }
}

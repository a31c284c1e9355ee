use clap::ValueEnum;
use zip::CompressionMethod;

use crate::config::defaults::*;

/// Quality tier for the render-and-reencode compressor
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum QualityTier {
    /// Higher render scale and JPEG quality (better quality, larger file)
    #[default]
    Small,
    /// Lower render scale and JPEG quality (smaller file)
    Max,
}

impl QualityTier {
    /// Factor applied to the page size in points when rasterizing
    pub fn render_scale(&self) -> f32 {
        match self {
            QualityTier::Small => SMALL_TIER_SCALE,
            QualityTier::Max => MAX_TIER_SCALE,
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        match self {
            QualityTier::Small => SMALL_TIER_JPEG_QUALITY,
            QualityTier::Max => MAX_TIER_JPEG_QUALITY,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Small => "small",
            QualityTier::Max => "max",
        }
    }
}

/// Compression level for ZIP archives
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ArchiveLevel {
    /// No compression, fastest
    Store,
    /// Balanced deflate
    #[default]
    Default,
    /// Strongest deflate, slowest
    Max,
}

impl ArchiveLevel {
    pub fn method(&self) -> CompressionMethod {
        match self {
            ArchiveLevel::Store => CompressionMethod::Stored,
            ArchiveLevel::Default | ArchiveLevel::Max => CompressionMethod::Deflated,
        }
    }

    /// Deflate level on the 0-9 scale; `None` for stored entries
    pub fn deflate_level(&self) -> Option<i64> {
        match self {
            ArchiveLevel::Store => None,
            ArchiveLevel::Default => Some(DEFAULT_ARCHIVE_LEVEL),
            ArchiveLevel::Max => Some(MAXIMUM_ARCHIVE_LEVEL),
        }
    }

    /// Name used in archive file names, e.g. `folder-Mid.zip`
    pub fn label(&self) -> &'static str {
        match self {
            ArchiveLevel::Store => "Min",
            ArchiveLevel::Default => "Mid",
            ArchiveLevel::Max => "Max",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineOptions {
    /// Deflate content streams before saving
    pub compress_streams: bool,
}

impl Default for CombineOptions {
    fn default() -> Self {
        Self {
            compress_streams: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressOptions {
    pub tier: QualityTier,
    /// Bake form fields into page content before rendering
    pub flatten_forms: bool,
    /// Level used when several documents are packaged together
    pub archive_level: ArchiveLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZipOptions {
    pub level: ArchiveLevel,
}

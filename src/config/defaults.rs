/// Render scale for the "small compression" tier (better quality, larger file)
pub const SMALL_TIER_SCALE: f32 = 1.5;

/// JPEG quality (1-100) for the "small compression" tier
pub const SMALL_TIER_JPEG_QUALITY: u8 = 80;

/// Render scale for the "max compression" tier (lower quality, smaller file)
pub const MAX_TIER_SCALE: f32 = 1.0;

/// JPEG quality (1-100) for the "max compression" tier
pub const MAX_TIER_JPEG_QUALITY: u8 = 50;

/// Deflate level used by the balanced archive level
pub const DEFAULT_ARCHIVE_LEVEL: i64 = 6;

/// Deflate level used by the maximum archive level
pub const MAXIMUM_ARCHIVE_LEVEL: i64 = 9;

/// File name of a merged document
pub const COMBINED_FILE_NAME: &str = "combined.pdf";

/// Suffix appended to the stem of each compressed document
pub const COMPRESSED_SUFFIX: &str = "-compressed";

/// Prefix of the archive holding several compressed documents
pub const COMPRESSED_ARCHIVE_PREFIX: &str = "compressed";

/// Prefix of the archive produced by the zip operation
pub const FOLDER_ARCHIVE_PREFIX: &str = "folder";

pub const PDF_MIME: &str = "application/pdf";
pub const ZIP_MIME: &str = "application/zip";

/// PDF version written for generated documents
pub const OUTPUT_PDF_VERSION: &str = "1.5";

//! Loading and saving helpers shared by every PDF transform

use lopdf::Document;

use crate::error::WorkflowError;

/// Parse a PDF, tolerating documents encrypted with an empty user password.
///
/// A document that stays encrypted after the empty-password attempt is still
/// returned; its objects are copied as they are.
pub fn load_document(name: &str, bytes: &[u8]) -> Result<Document, WorkflowError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| WorkflowError::Open {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    if doc.is_encrypted() {
        match doc.decrypt("") {
            Ok(()) => {
                doc.trailer.remove(b"Encrypt");
                log::info!("Opened encrypted document {} with empty password", name);
            }
            Err(e) => log::warn!("Copying {} without decrypting it: {}", name, e),
        }
    }

    if doc.get_pages().is_empty() {
        return Err(WorkflowError::Open {
            name: name.to_string(),
            message: "document has no pages".to_string(),
        });
    }

    Ok(doc)
}

/// Serialize a document, optionally deflating its streams first.
///
/// Streams that already carry a filter (such as DCT-encoded images) are left
/// untouched by lopdf.
pub fn save_document(mut doc: Document, compress_streams: bool) -> Result<Vec<u8>, WorkflowError> {
    if compress_streams {
        doc.compress();
    }

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| WorkflowError::Pdf(format!("Failed to save PDF: {}", e)))?;

    Ok(output)
}

//! Page-order-preserving concatenation of whole documents

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};

use crate::config::defaults::OUTPUT_PDF_VERSION;
use crate::error::WorkflowError;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files
const MAX_PAGE_TREE_DEPTH: usize = 64;

/// Object types that belong to a source's document structure, not its pages
const STRUCTURAL_TYPES: [&[u8]; 6] = [
    b"Catalog",
    b"Pages",
    b"Outlines",
    b"Outline",
    b"ObjStm",
    b"XRef",
];

/// Concatenate documents into a new one.
///
/// Every page of every source is copied in its original order, and sources
/// are appended in slice order. Each page is re-parented under a single new
/// page tree, so attributes it used to inherit are copied onto it first.
pub fn merge_documents(documents: Vec<Document>) -> Result<Document, WorkflowError> {
    let mut merged = Document::with_version(OUTPUT_PDF_VERSION);
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut next_id = 1;

    for mut doc in documents {
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        // get_pages is keyed by page number, so this preserves page order
        let source_pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &source_pages {
            inherit_page_attributes(&mut doc, page_id)?;
        }
        log::debug!("Copying {} pages", source_pages.len());
        page_ids.extend(source_pages);

        for (id, object) in doc.objects {
            if is_structural(&object) {
                continue;
            }
            merged.objects.insert(id, object);
        }
    }

    merged.max_id = next_id.saturating_sub(1);
    let pages_id = merged.new_object_id();

    for &page_id in &page_ids {
        let page = merged
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| WorkflowError::Pdf(format!("Lost page {:?} while merging: {}", page_id, e)))?;
        page.set("Parent", pages_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);

    Ok(merged)
}

fn is_structural(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return false,
    };
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(name) => STRUCTURAL_TYPES.contains(&name),
        Err(_) => false,
    }
}

/// Copy inheritable attributes from the page tree onto the page itself
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<(), WorkflowError> {
    let page = page_dictionary(doc, page_id)?;
    let mut missing: Vec<&[u8]> = INHERITABLE_ATTRIBUTES
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut inherited: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if missing.is_empty() || depth >= MAX_PAGE_TREE_DEPTH {
            break;
        }
        let node = match doc.get_dictionary(parent_id) {
            Ok(node) => node,
            Err(_) => break,
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| WorkflowError::Pdf(e.to_string()))?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

fn page_dictionary(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, WorkflowError> {
    doc.get_dictionary(page_id)
        .map_err(|e| WorkflowError::Pdf(format!("Malformed page {:?}: {}", page_id, e)))
}

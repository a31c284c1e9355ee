//! Form flattening
//!
//! Widget annotations are replaced by their normal appearance streams drawn
//! directly into page content, and the interactive form is removed.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::FlattenError;

/// Flatten every widget on every page and return the re-saved document.
///
/// Widgets without an appearance stream are dropped, as a viewer would have
/// nothing to draw for them once the form is gone.
pub fn flatten_forms(bytes: &[u8]) -> Result<Vec<u8>, FlattenError> {
    let mut doc = Document::load_mem(bytes).map_err(|e| FlattenError::Parse(e.to_string()))?;

    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let mut total = 0;
    for page_id in page_ids {
        total += flatten_page(&mut doc, page_id)?;
    }

    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| FlattenError::Parse(e.to_string()))?;
    if let Ok(catalog) = doc.get_object_mut(catalog_id).and_then(Object::as_dict_mut) {
        catalog.remove(b"AcroForm");
    }

    log::info!("Flattened {} form fields", total);

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| FlattenError::Save(e.to_string()))?;
    Ok(output)
}

/// A widget appearance to stamp onto its page
struct Stamp {
    appearance: ObjectId,
    rect: [f32; 4],
    bbox: [f32; 4],
    /// Appearance `/Matrix`, applied by `Do` before our placement transform
    matrix: [f32; 6],
}

fn flatten_page(doc: &mut Document, page_id: ObjectId) -> Result<usize, FlattenError> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|e| FlattenError::Parse(e.to_string()))?;
    let annots = match page.get(b"Annots") {
        Ok(annots) => resolve(doc, annots)
            .as_array()
            .map_err(|e| FlattenError::MalformedField(e.to_string()))?
            .clone(),
        Err(_) => return Ok(0),
    };

    let mut kept = Vec::new();
    let mut stamps = Vec::new();
    for annot in annots {
        let widget = match resolve(doc, &annot).as_dict() {
            Ok(dict) if is_widget(dict) => Some(widget_stamp(doc, dict)?),
            _ => None,
        };
        match widget {
            Some(Some(stamp)) => stamps.push(stamp),
            Some(None) => {}
            None => kept.push(annot),
        }
    }

    if stamps.is_empty() && kept.len() == annots_len(doc, page_id) {
        return Ok(0);
    }

    let mut operations = Vec::new();
    let mut xobjects = Dictionary::new();
    for (i, stamp) in stamps.iter().enumerate() {
        let name = format!("Flat{}", i);
        mark_as_form(doc, stamp.appearance, stamp.bbox)?;
        xobjects.set(name.clone(), stamp.appearance);
        operations.extend(stamp_operations(&name, stamp));
    }

    let mut resources = page_resources(doc, page_id);
    let mut existing = match resources.get(b"XObject") {
        Ok(obj) => resolve(doc, obj).as_dict().cloned().unwrap_or_else(|_| Dictionary::new()),
        Err(_) => Dictionary::new(),
    };
    for (name, value) in xobjects.iter() {
        existing.set(name.clone(), value.clone());
    }
    resources.set("XObject", existing);

    let save_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let stamp_content = Content {
        operations: std::iter::once(Operation::new("Q", vec![]))
            .chain(operations)
            .collect::<Vec<Operation>>(),
    };
    let stamp_bytes = stamp_content
        .encode()
        .map_err(|e| FlattenError::Save(e.to_string()))?;
    let stamp_id = doc.add_object(Stream::new(dictionary! {}, stamp_bytes));

    let mut contents = vec![Object::Reference(save_id)];
    contents.extend(page_contents(doc, page_id));
    contents.push(Object::Reference(stamp_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| FlattenError::Parse(e.to_string()))?;
    page.set("Contents", contents);
    page.set("Resources", resources);
    if kept.is_empty() {
        page.remove(b"Annots");
    } else {
        page.set("Annots", kept);
    }

    Ok(stamps.len())
}

/// Content stream references of a page, with an indirect array expanded
fn page_contents(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let contents = match doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Contents"))
    {
        Ok(contents) => contents,
        Err(_) => return Vec::new(),
    };
    match resolve(doc, contents) {
        Object::Array(items) => items.clone(),
        Object::Stream(_) => vec![contents.clone()],
        _ => Vec::new(),
    }
}

fn annots_len(doc: &Document, page_id: ObjectId) -> usize {
    doc.get_dictionary(page_id)
        .ok()
        .and_then(|page| page.get(b"Annots").ok())
        .and_then(|annots| resolve(doc, annots).as_array().ok())
        .map(Vec::len)
        .unwrap_or(0)
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        _ => object,
    }
}

fn is_widget(dict: &Dictionary) -> bool {
    dict.get(b"Subtype")
        .and_then(Object::as_name)
        .map(|name| name == b"Widget")
        .unwrap_or(false)
}

/// Pick the normal appearance for the widget's current state
fn widget_stamp(doc: &Document, widget: &Dictionary) -> Result<Option<Stamp>, FlattenError> {
    let appearance = match widget
        .get(b"AP")
        .map(|ap| resolve(doc, ap))
        .and_then(Object::as_dict)
        .and_then(|ap| ap.get(b"N"))
    {
        Ok(normal) => normal,
        Err(_) => return Ok(None),
    };

    let states = match appearance {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Stream(_)) => None,
            Ok(Object::Dictionary(states)) => Some(states),
            _ => return Ok(None),
        },
        Object::Dictionary(states) => Some(states),
        _ => return Ok(None),
    };
    let appearance_id = match states {
        None => appearance.as_reference().map_err(|e| FlattenError::MalformedField(e.to_string()))?,
        Some(states) => {
            // Checkboxes and radio buttons keep one appearance per state
            let state = match widget.get(b"AS").and_then(Object::as_name) {
                Ok(state) => state,
                Err(_) => return Ok(None),
            };
            match states.get(state).and_then(Object::as_reference) {
                Ok(id) => id,
                Err(_) => return Ok(None),
            }
        }
    };

    let rect = widget
        .get(b"Rect")
        .map(|r| resolve(doc, r))
        .map_err(|e| FlattenError::MalformedField(e.to_string()))
        .and_then(|r| numbers(doc, r))?;

    let (bbox, matrix) = match doc.get_object(appearance_id) {
        Ok(Object::Stream(stream)) => {
            let bbox = match stream.dict.get(b"BBox") {
                Ok(bbox) => numbers(doc, resolve(doc, bbox))?,
                Err(_) => [0.0, 0.0, rect[2] - rect[0], rect[3] - rect[1]],
            };
            let matrix = match stream.dict.get(b"Matrix") {
                Ok(matrix) => form_matrix(doc, resolve(doc, matrix))?,
                Err(_) => IDENTITY,
            };
            (bbox, matrix)
        }
        _ => return Ok(None),
    };

    Ok(Some(Stamp {
        appearance: appearance_id,
        rect,
        bbox,
        matrix,
    }))
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn form_matrix(doc: &Document, object: &Object) -> Result<[f32; 6], FlattenError> {
    let array = object
        .as_array()
        .map_err(|e| FlattenError::MalformedField(e.to_string()))?;
    if array.len() != 6 {
        return Err(FlattenError::MalformedField(format!(
            "expected 6 matrix entries, found {}",
            array.len()
        )));
    }
    let mut out = IDENTITY;
    for (slot, value) in out.iter_mut().zip(array) {
        *slot = resolve(doc, value)
            .as_float()
            .map_err(|e| FlattenError::MalformedField(e.to_string()))?;
    }
    Ok(out)
}

/// Bounding box of `bbox` after transforming its corners by `matrix`
fn transform_bbox(bbox: [f32; 4], matrix: [f32; 6]) -> [f32; 4] {
    let [a, b, c, d, e, f] = matrix;
    let corners = [
        (bbox[0], bbox[1]),
        (bbox[2], bbox[1]),
        (bbox[0], bbox[3]),
        (bbox[2], bbox[3]),
    ];
    let mut out = [f32::MAX, f32::MAX, f32::MIN, f32::MIN];
    for (x, y) in corners {
        let tx = a * x + c * y + e;
        let ty = b * x + d * y + f;
        out[0] = out[0].min(tx);
        out[1] = out[1].min(ty);
        out[2] = out[2].max(tx);
        out[3] = out[3].max(ty);
    }
    out
}

fn numbers(doc: &Document, object: &Object) -> Result<[f32; 4], FlattenError> {
    let array = object
        .as_array()
        .map_err(|e| FlattenError::MalformedField(e.to_string()))?;
    if array.len() != 4 {
        return Err(FlattenError::MalformedField(format!(
            "expected 4 numbers, found {}",
            array.len()
        )));
    }
    let mut out = [0.0; 4];
    for (slot, value) in out.iter_mut().zip(array) {
        *slot = resolve(doc, value)
            .as_float()
            .map_err(|e| FlattenError::MalformedField(e.to_string()))?;
    }
    Ok(out)
}

fn mark_as_form(doc: &mut Document, id: ObjectId, bbox: [f32; 4]) -> Result<(), FlattenError> {
    let stream = doc
        .get_object_mut(id)
        .and_then(Object::as_stream_mut)
        .map_err(|e| FlattenError::MalformedField(e.to_string()))?;
    stream.dict.set("Type", "XObject");
    stream.dict.set("Subtype", "Form");
    if !stream.dict.has(b"BBox") {
        stream.dict.set(
            "BBox",
            bbox.iter().map(|&v| Object::Real(v)).collect::<Vec<Object>>(),
        );
    }
    Ok(())
}

/// Map the appearance's transformed bounding box onto the widget rectangle
/// and draw it
fn stamp_operations(name: &str, stamp: &Stamp) -> Vec<Operation> {
    let [x1, y1, x2, y2] = stamp.rect;
    let [bx1, by1, bx2, by2] = transform_bbox(stamp.bbox, stamp.matrix);
    let scale_x = if (bx2 - bx1).abs() > f32::EPSILON {
        (x2 - x1) / (bx2 - bx1)
    } else {
        1.0
    };
    let scale_y = if (by2 - by1).abs() > f32::EPSILON {
        (y2 - y1) / (by2 - by1)
    } else {
        1.0
    };
    let tx = x1.min(x2) - bx1 * scale_x;
    let ty = y1.min(y2) - by1 * scale_y;

    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                scale_x.into(),
                0.into(),
                0.into(),
                scale_y.into(),
                tx.into(),
                ty.into(),
            ],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// The page's effective resources as an owned dictionary
fn page_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = Some(page_id);
    let mut depth = 0;
    while let Some(id) = current {
        let Ok(node) = doc.get_dictionary(id) else {
            break;
        };
        if let Ok(resources) = node.get(b"Resources") {
            return resolve(doc, resources).as_dict().cloned().unwrap_or_else(|_| Dictionary::new());
        }
        current = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
        if depth > 64 {
            break;
        }
    }
    Dictionary::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A one-page document with a single text field that has an appearance
    fn form_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let appearance_id = doc.add_object(Stream::new(
            dictionary! { "BBox" => vec![0.into(), 0.into(), 100.into(), 20.into()] },
            b"0 0 1 rg 0 0 100 20 re f".to_vec(),
        ));
        let field_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal("name"),
            "Rect" => vec![50.into(), 700.into(), 150.into(), 720.into()],
            "AP" => dictionary! { "N" => appearance_id },
        });
        let link_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![0.into(), 0.into(), 10.into(), 10.into()],
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"0 0 m 10 10 l S".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Annots" => vec![field_id.into(), link_id.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => dictionary! { "Fields" => vec![field_id.into()] },
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_widgets_become_page_content() {
        let flat = flatten_forms(&form_pdf()).unwrap();
        let doc = Document::load_mem(&flat).unwrap();

        assert!(doc.catalog().unwrap().get(b"AcroForm").is_err());

        let page_id = *doc.get_pages().values().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();

        let annots = page.get(b"Annots").unwrap().as_array().unwrap();
        assert_eq!(annots.len(), 1, "only the link annotation remains");

        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert!(xobjects.get(b"Flat0").is_ok());

        let contents = page.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 3);
    }

    #[test]
    fn test_document_without_forms_is_unchanged_in_page_count() {
        let flat = flatten_forms(&form_pdf()).unwrap();
        let twice = flatten_forms(&flat).unwrap();
        let doc = Document::load_mem(&twice).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_stamp_maps_bbox_onto_rect() {
        let stamp = Stamp {
            appearance: (1, 0),
            rect: [50.0, 700.0, 250.0, 740.0],
            bbox: [0.0, 0.0, 100.0, 20.0],
            matrix: IDENTITY,
        };
        let ops = stamp_operations("Flat0", &stamp);
        let cm: Vec<f32> = ops[1]
            .operands
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(cm, vec![2.0, 0.0, 0.0, 2.0, 50.0, 700.0]);
    }

    #[test]
    fn test_stamp_honours_rotated_appearance_matrix() {
        // 90 degree rotation turns the 100x20 box into [-20 0 0 100]
        let stamp = Stamp {
            appearance: (1, 0),
            rect: [50.0, 700.0, 70.0, 800.0],
            bbox: [0.0, 0.0, 100.0, 20.0],
            matrix: [0.0, 1.0, -1.0, 0.0, 0.0, 0.0],
        };
        let ops = stamp_operations("Flat0", &stamp);
        let cm: Vec<f32> = ops[1]
            .operands
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(cm, vec![1.0, 0.0, 0.0, 1.0, 70.0, 700.0]);
    }

    #[test]
    fn test_scaled_appearance_matrix_is_read_from_stream() {
        let mut doc = Document::with_version("1.5");
        let appearance_id = doc.add_object(Stream::new(
            dictionary! {
                "BBox" => vec![0.into(), 0.into(), 100.into(), 20.into()],
                "Matrix" => vec![2.into(), 0.into(), 0.into(), 2.into(), 0.into(), 0.into()],
            },
            Vec::new(),
        ));
        let widget = dictionary! {
            "Subtype" => "Widget",
            "Rect" => vec![0.into(), 0.into(), 200.into(), 40.into()],
            "AP" => dictionary! { "N" => appearance_id },
        };

        let stamp = widget_stamp(&doc, &widget).unwrap().unwrap();
        assert_eq!(stamp.matrix, [2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
        let ops = stamp_operations("Flat0", &stamp);
        let cm: Vec<f32> = ops[1]
            .operands
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(cm, vec![1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_garbage_fails_to_parse() {
        assert!(matches!(flatten_forms(b"garbage"), Err(FlattenError::Parse(_))));
    }
}

use std::io::Cursor;

use crate::prelude::{Error, Result};

/// Extracts plain text from an uploaded document. Only PDF is supported.
/// Returns whatever text was extracted, possibly empty; the caller decides
/// whether empty output is acceptable.
pub fn extract_document(data: Vec<u8>, content_type: &str) -> Result<String> {
    match content_type {
        "application/pdf" => extract_text_from_pdf(&data),
        _ => Err(Error::Extraction(format!(
            "unsupported content type: {content_type}"
        ))),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String> {
    use lopdf::Document;
    let cursor = Cursor::new(data);
    let doc = Document::load_from(cursor)
        .map_err(|e| Error::Extraction(format!("could not read PDF: {e}")))?;

    let pages = doc.get_pages();
    let mut text = String::new();

    for page_num in pages.keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push(' ');
            }
            Err(e) => {
                tracing::warn!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    Ok(text.trim().to_string())
}

/// Builds a one-page PDF containing `text`, for exercising extraction and
/// the pipeline without fixture files.
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_a_pdf() {
        let data = sample_pdf("Seasoned product manager");
        let text = extract_document(data, "application/pdf").unwrap();
        assert!(text.contains("Seasoned product manager"));
    }

    #[test]
    fn rejects_unsupported_content_types() {
        let err = extract_document(b"plain text".to_vec(), "text/plain").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }

    #[test]
    fn rejects_unreadable_documents() {
        let err = extract_document(b"not a pdf at all".to_vec(), "application/pdf").unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}

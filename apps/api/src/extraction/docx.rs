use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractError;

const BODY_PART: &str = "word/document.xml";
/// Upper bound on the inflated size of any single XML part.
pub const MAX_PART_BYTES: u64 = 32 * 1024 * 1024;

/// Reads headers, the main body and footers (in that order) from the DOCX
/// container and flattens their paragraphs to text.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    extract_limited(bytes, MAX_PART_BYTES)
}

fn extract_limited(bytes: &[u8], max_part_bytes: u64) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::Docx(format!("not a DOCX container: {e}")))?;

    let mut headers = Vec::new();
    let mut footers = Vec::new();
    for name in archive.file_names() {
        if is_part(name, "word/header") {
            headers.push(name.to_string());
        } else if is_part(name, "word/footer") {
            footers.push(name.to_string());
        }
    }
    headers.sort_by_key(|n| part_order(n, "word/header"));
    footers.sort_by_key(|n| part_order(n, "word/footer"));

    if archive.by_name(BODY_PART).is_err() {
        return Err(ExtractError::Docx(format!("missing {BODY_PART}")));
    }

    let mut text = String::new();
    for part in headers
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(BODY_PART))
        .chain(footers.iter().map(String::as_str))
    {
        let xml = read_part(&mut archive, part, max_part_bytes)?;
        text.push_str(&paragraph_text(&xml)?);
    }

    Ok(text.trim_end_matches('\n').to_string())
}

fn is_part(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix) && name.ends_with(".xml")
}

/// `header2.xml` sorts before `header10.xml`; unnumbered parts go last.
fn part_order(name: &str, prefix: &str) -> (u32, String) {
    let number = name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .and_then(|digits| digits.parse::<u32>().ok())
        .unwrap_or(u32::MAX);
    (number, name.to_string())
}

/// The declared size is checked first, then the read itself is capped, since
/// the central directory can understate what a stream inflates to.
fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
    max_part_bytes: u64,
) -> Result<String, ExtractError> {
    let mut file = archive
        .by_name(name)
        .map_err(|e| ExtractError::Docx(format!("cannot open {name}: {e}")))?;
    if file.size() > max_part_bytes {
        return Err(part_too_large(name, max_part_bytes));
    }

    let mut xml = String::new();
    file.by_ref()
        .take(max_part_bytes + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::Docx(format!("cannot read {name}: {e}")))?;
    if xml.len() as u64 > max_part_bytes {
        return Err(part_too_large(name, max_part_bytes));
    }
    Ok(xml)
}

fn part_too_large(name: &str, max_part_bytes: u64) -> ExtractError {
    ExtractError::Docx(format!(
        "part too large: {name} inflates beyond {max_part_bytes} bytes"
    ))
}

/// Text runs (`w:t`) are emitted verbatim, `w:tab` as a tab, `w:br`/`w:cr`
/// as a newline, and every paragraph ends with a newline. Table cells hold
/// paragraphs, so each cell lands on its own line. Tab-stop definitions in
/// paragraph properties (`w:pPr/w:tabs/w:tab`) are not content.
fn paragraph_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;
    let mut in_paragraph_props = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:pPr" => in_paragraph_props = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" if !in_paragraph_props => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:pPr" => in_paragraph_props = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractError::Docx(format!("bad text run: {e}")))?;
                out.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::Docx(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    pub fn document_xml(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    pub fn paragraph(text: &str) -> String {
        format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
    }

    pub fn build_docx_parts(parts: &[(&str, String)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    /// One paragraph per entry, XML-escaped by the caller.
    pub fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs.iter().map(|p| paragraph(p)).collect();
        build_docx_parts(&[("word/document.xml", document_xml(&body))])
    }
}

use super::ExtractError;

/// Joins per-page text in page order with `\n`. A page without extractable
/// text becomes an empty line.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    Ok(pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n"))
}


#[cfg(test)]
mod tests {
    use super::test_support::build_pdf;
    use super::*;

    #[test]
    fn test_pages_joined_in_order() {
        let bytes = build_pdf(&["Experience: Rust services", "Education: BSc Computing"]);
        let text = extract(&bytes).unwrap();

        let experience = text.find("Experience: Rust services").expect("page 1 text");
        let education = text.find("Education: BSc Computing").expect("page 2 text");
        assert!(experience < education, "pages out of order: {text:?}");
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_blank_page_contributes_empty_line() {
        let bytes = build_pdf(&["First page", "", "Third page"]);
        let text = extract(&bytes).unwrap();
        assert!(text.contains("First page"));
        assert!(text.contains("Third page"));
        assert!(text.contains("\n\n"), "blank page should leave an empty line: {text:?}");
    }

    #[test]
    fn test_truncated_pdf_is_an_error() {
        let bytes = build_pdf(&["Experience"]);
        let err = extract(&bytes[..20]).unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }
}

use crate::RenderError;
use crate::output::fonts::usvg_options;

/// Convert SVG string to PDF bytes.
pub fn svg_to_pdf(svg: &str) -> crate::Result<Vec<u8>> {
    let opt = usvg_options();
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Pdf(e.to_string()))?;

    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), svg2pdf::PageOptions::default())
        .map_err(|e| RenderError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_header() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><line x1="0" y1="0" x2="100" y2="50" stroke="black"/></svg>"#;
        let pdf = svg_to_pdf(svg).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
    }
}

//! SVG → file format conversion.

#[cfg(feature = "pdf")]
pub mod pdf;
#[cfg(feature = "png")]
pub mod png;

#[cfg(any(feature = "png", feature = "pdf"))]
mod fonts {
    use std::sync::{Arc, OnceLock};

    static FONT_DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

    /// Parse options sharing one system font database per process.
    ///
    /// Scanning the system font directories is slow, and every figure of a
    /// run would otherwise repeat it.
    pub(crate) fn usvg_options() -> usvg::Options<'static> {
        let fontdb = FONT_DB.get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        });
        usvg::Options { fontdb: Arc::clone(fontdb), ..Default::default() }
    }
}

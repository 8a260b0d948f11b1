//! File formats handled by trsync.
//!
//! - [`tr`]: per-locale `.tr` files
//! - [`template`]: the key-only translation template

pub mod template;
pub mod tr;

use std::path::Path;

pub use template::Template;
pub use tr::{Line, Partition, Record, TrFile, TEXTDOMAIN_PREFIX, UNUSED_SEPARATOR};

/// File extension of locale files.
pub const TR_EXTENSION: &str = "tr";

/// Conventional template file name inside the locale directory.
pub const TEMPLATE_FILE_NAME: &str = "template.txt";

/// Suffix appended to a locale file path for its backup.
pub const BACKUP_SUFFIX: &str = ".old";

/// Returns true if `path` names a `.tr` file.
pub fn is_tr_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .is_some_and(|ext| ext == TR_EXTENSION)
}

/// Infers the locale from a `<textdomain>.<locale>.tr` file name.
///
/// # Example
/// ```rust
/// use trsync::formats::infer_locale_from_path;
/// assert_eq!(infer_locale_from_path("locale/mymod.pt_BR.tr").as_deref(), Some("pt_BR"));
/// assert_eq!(infer_locale_from_path("locale/template.txt"), None);
/// ```
pub fn infer_locale_from_path<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    if !is_tr_file(path) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let (_, locale) = stem.rsplit_once('.')?;
    (!locale.is_empty()).then(|| locale.to_string())
}

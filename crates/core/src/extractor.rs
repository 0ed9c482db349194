use crate::models::Fragment;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Error loading image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Error processing PDF: {0}")]
    Pdf(String),
    #[error("Error reading text file: {0}")]
    Text(#[from] std::io::Error),
}

/// File classes recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Pdf,
    Text,
    AudioVideo,
    Office,
    Unsupported,
}

impl FileKind {
    /// `ext` is the lower-cased extension without the leading dot.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "png" | "jpg" | "jpeg" => FileKind::Image,
            "pdf" => FileKind::Pdf,
            "txt" | "md" => FileKind::Text,
            "mp3" | "mp4" => FileKind::AudioVideo,
            "docx" | "pptx" => FileKind::Office,
            _ => FileKind::Unsupported,
        }
    }
}

/// Lower-cased extension; `Some("")` for a trailing dot such as `notes.`.
fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|ext| ext.to_string_lossy().to_lowercase())
}

/// Converts a file into fragments. Never fails: errors come back as a single
/// `Fragment::Text` describing the cause.
pub fn extract(path: &Path) -> Vec<Fragment> {
    let ext = extension_of(path);
    let kind = FileKind::from_extension(ext.as_deref().unwrap_or_default());
    debug!(path = %path.display(), ?kind, "extracting");

    let result = match kind {
        FileKind::Image => load_image(path),
        FileKind::Pdf => pdf_text(path),
        FileKind::Text => read_text(path),
        FileKind::AudioVideo => Ok(Fragment::Text(format!(
            "*Placeholder: Content of {} (Transcription needed)*",
            path.display()
        ))),
        FileKind::Office => Ok(Fragment::Text(format!(
            "*Placeholder: Content of {} (Docx/Pptx handler needed)*",
            path.display()
        ))),
        FileKind::Unsupported => {
            let shown = ext.map(|e| format!(".{}", e)).unwrap_or_default();
            Ok(Fragment::Text(format!("Unsupported file type: {}", shown)))
        }
    };

    match result {
        Ok(fragment) => vec![fragment],
        Err(e) => {
            warn!(path = %path.display(), error = %e, "extraction failed");
            vec![Fragment::Text(e.to_string())]
        }
    }
}

fn load_image(path: &Path) -> Result<Fragment, ExtractError> {
    // The handle lives only inside `open`/`decode`; the bitmap owns no file.
    let img = image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::IoError)?
        .decode()?;
    Ok(Fragment::Image(img))
}

fn pdf_text(path: &Path) -> Result<Fragment, ExtractError> {
    let file = fs::File::open(path).map_err(|e| ExtractError::Pdf(e.to_string()))?;
    let doc = lopdf::Document::load_from(BufReader::new(file))
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => debug!(page = page_num, error = %e, "page has no extractable text"),
        }
    }
    Ok(Fragment::Text(text))
}

fn read_text(path: &Path) -> Result<Fragment, ExtractError> {
    let mut file = fs::File::open(path)?;
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(Fragment::Text(text))
}

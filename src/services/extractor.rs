use crate::error::{LectureSplitError, Result};
use crate::types::PageText;
use lopdf::Document;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct PageExtractor;

impl PageExtractor {
    /// Reads every page of the PDF at `path` in document order.
    pub fn extract(path: &Path) -> Result<Vec<PageText>> {
        info!("Extracting page text from: {}", path.display());

        if !path.is_file() {
            return Err(LectureSplitError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        // An unreadable document counts as not found; the parse error is only logged.
        let doc = Document::load(path).map_err(|e| {
            warn!("Cannot load {} as a PDF: {}", path.display(), e);
            LectureSplitError::FileNotFound {
                path: path.display().to_string(),
            }
        })?;
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

        let pages: Vec<PageText> = page_numbers
            .iter()
            .enumerate()
            .map(|(idx, &page_number)| {
                // Undecodable pages stay in the list with empty text.
                let text = match doc.extract_text(&[page_number]) {
                    Ok(text) => text.trim().to_string(),
                    Err(e) => {
                        warn!("Could not extract text from page {}: {}", page_number, e);
                        String::new()
                    }
                };
                PageText {
                    page_number: idx + 1,
                    text,
                }
            })
            .collect();

        debug!("Extracted {} pages", pages.len());
        Ok(pages)
    }

    pub fn page_stats(pages: &[PageText]) -> HashMap<String, serde_json::Value> {
        let mut stats = HashMap::new();

        let total_chars: usize = pages.iter().map(|p| p.text.chars().count()).sum();
        let empty_pages = pages.iter().filter(|p| p.text.is_empty()).count();

        stats.insert("total_pages".to_string(), pages.len().into());
        stats.insert("empty_pages".to_string(), empty_pages.into());
        stats.insert("total_chars".to_string(), total_chars.into());

        let avg_chars_per_page = if pages.is_empty() {
            0.0
        } else {
            total_chars as f64 / pages.len() as f64
        };
        stats.insert("avg_chars_per_page".to_string(), avg_chars_per_page.into());

        stats
    }
}

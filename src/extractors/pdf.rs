//! PDF backend built on `lopdf`.
//!
//! Text is read by walking the page content stream and tracking the text
//! state operators. Run positions are in page space with Y increasing
//! upward. Glyph widths are not loaded; a run's advance is estimated as
//! `chars × font size × 0.5`, which is close enough for line grouping and
//! column detection.

use crate::error::{Error, Result};
use crate::extractors::{Bookmark, DocumentInfo, PageContent, PageExtractor, SourceInfo};
use crate::layout::TextRun;
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Average glyph advance as a fraction of the font size.
const GLYPH_WIDTH_RATIO: f32 = 0.5;

/// TJ offset (thousandths of an em) below which a word space is inserted.
const TJ_SPACE_THRESHOLD: f32 = -120.0;

/// Default leading as a multiple of the font size when `TL` was never set.
const DEFAULT_LEADING_RATIO: f32 = 1.2;

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Page extractor backed by `lopdf`.
///
/// Each call loads the file again; no parsed document is kept between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl PageExtractor for LopdfExtractor {
    fn probe(&self, path: &Path) -> Result<SourceInfo> {
        let doc = Document::load(path)?;
        let page_count = doc.get_pages().len();
        let mut info = read_info(&doc);
        if info.title.is_empty() {
            info.title = path.display().to_string();
        }

        log::debug!("Probed {}: {} pages", path.display(), page_count);
        Ok(SourceInfo { page_count, info })
    }

    fn extract_page(&self, path: &Path, page: usize) -> Result<PageContent> {
        let doc = Document::load(path).map_err(|e| Error::ExtractFailed {
            page,
            reason: e.to_string(),
        })?;

        let page_id = u32::try_from(page)
            .ok()
            .and_then(|n| doc.get_pages().get(&n).copied())
            .ok_or(Error::NullPage(page))?;

        let runs = extract_runs(&doc, page_id).map_err(|e| Error::ExtractFailed {
            page,
            reason: e.to_string(),
        })?;

        log::trace!("Page {}: {} runs", page, runs.len());
        Ok(PageContent::Runs(runs))
    }

    fn bookmarks(&self, path: &Path) -> Result<Vec<Bookmark>> {
        let doc = Document::load(path)?;

        let first = match doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| resolve(&doc, outlines))
            .and_then(|outlines| outlines.as_dict().ok())
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok())
        {
            Some(first) => first,
            None => return Ok(Vec::new()),
        };

        let page_index: HashMap<ObjectId, usize> = doc
            .get_pages()
            .into_iter()
            .map(|(number, id)| (id, number as usize))
            .collect();

        let mut visited = HashSet::new();
        Ok(read_outline_items(&doc, first, &page_index, &mut visited))
    }
}

/// Text state tracked while walking a content stream.
struct TextState {
    font: String,
    font_size: f32,
    leading: Option<f32>,
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
}

impl TextState {
    fn new() -> Self {
        Self {
            font: String::new(),
            font_size: 12.0,
            leading: None,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
        }
    }

    fn begin_text(&mut self) {
        self.text_matrix = IDENTITY;
        self.line_matrix = IDENTITY;
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix[4] += tx;
        self.line_matrix[5] += ty;
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self
            .leading
            .unwrap_or(self.font_size * DEFAULT_LEADING_RATIO);
        self.move_line(0.0, -leading);
    }

    /// Font size after the vertical scale of the text matrix.
    fn effective_size(&self) -> f32 {
        let scale = self.text_matrix[3].abs();
        if scale > 0.0 {
            self.font_size * scale
        } else {
            self.font_size
        }
    }

    /// Emit a run at the current position and advance past it.
    fn show(&mut self, text: String, runs: &mut Vec<TextRun>) {
        let size = self.effective_size();
        let width = text.chars().count() as f32 * size * GLYPH_WIDTH_RATIO;

        if !text.trim().is_empty() {
            runs.push(
                TextRun::new(text, self.text_matrix[4], self.text_matrix[5], size, width)
                    .with_font(self.font.clone()),
            );
        }
        self.text_matrix[4] += width;
    }
}

fn extract_runs(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<TextRun>> {
    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let data = doc.get_page_content(page_id)?;
    let content = Content::decode(&data)?;

    let decode = |obj: Option<&Object>, font: &str| {
        obj.and_then(|obj| decode_string(doc, &fonts, font, obj))
    };

    let mut state = TextState::new();
    let mut runs = Vec::new();
    let mut in_text = false;

    for op in &content.operations {
        let operands = &op.operands;
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                state.begin_text();
            },
            "ET" => in_text = false,
            "Tf" if operands.len() >= 2 => {
                if let Ok(name) = operands[0].as_name() {
                    state.font = String::from_utf8_lossy(name).to_string();
                }
                if let Some(size) = number(&operands[1]) {
                    state.font_size = size;
                }
            },
            "TL" => state.leading = operands.first().and_then(number),
            "Td" | "TD" if operands.len() >= 2 => {
                let tx = number(&operands[0]).unwrap_or(0.0);
                let ty = number(&operands[1]).unwrap_or(0.0);
                if op.operator == "TD" {
                    state.leading = Some(-ty);
                }
                state.move_line(tx, ty);
            },
            "Tm" if operands.len() >= 6 => {
                for (i, operand) in operands.iter().take(6).enumerate() {
                    state.text_matrix[i] = number(operand).unwrap_or(IDENTITY[i]);
                }
                state.line_matrix = state.text_matrix;
            },
            "T*" => state.next_line(),
            "Tj" if in_text => {
                if let Some(text) = decode(operands.first(), &state.font) {
                    state.show(text, &mut runs);
                }
            },
            "TJ" if in_text => {
                if let Some(Ok(items)) = operands.first().map(Object::as_array) {
                    let text = decode_tj_array(doc, &fonts, &state.font, items);
                    state.show(text, &mut runs);
                }
            },
            "'" if in_text => {
                state.next_line();
                if let Some(text) = decode(operands.first(), &state.font) {
                    state.show(text, &mut runs);
                }
            },
            "\"" if in_text => {
                state.next_line();
                if let Some(text) = decode(operands.get(2), &state.font) {
                    state.show(text, &mut runs);
                }
            },
            _ => {},
        }
    }

    Ok(runs)
}

fn decode_tj_array(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &str,
    items: &[Object],
) -> String {
    let mut text = String::new();
    for item in items {
        if let Some(part) = decode_string(doc, fonts, font, item) {
            text.push_str(&part);
        } else if let Some(offset) = number(item) {
            if offset < TJ_SPACE_THRESHOLD && !text.is_empty() && !text.ends_with(' ') {
                text.push(' ');
            }
        }
    }
    text
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decode a string operand with the current font's encoding.
fn decode_string(
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    font: &str,
    obj: &Object,
) -> Option<String> {
    let bytes = match obj {
        Object::String(bytes, _) => bytes,
        _ => return None,
    };

    if let Some(font_dict) = fonts.get(font.as_bytes()) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return Some(text);
            }
        }
    }

    Some(decode_pdf_string(bytes))
}

/// Decode a text string: UTF-16BE with BOM, then UTF-8, then Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn string_entry(doc: &Document, dict: &Dictionary, key: &[u8]) -> String {
    match dict.get(key).ok().and_then(|obj| resolve(doc, obj)) {
        Some(Object::String(bytes, _)) => decode_pdf_string(bytes).trim().to_string(),
        _ => String::new(),
    }
}

fn read_info(doc: &Document) -> DocumentInfo {
    let info = match doc
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|info| resolve(doc, info))
        .and_then(|info| info.as_dict().ok())
    {
        Some(info) => info,
        None => {
            log::debug!("No Info dictionary");
            return DocumentInfo::default();
        },
    };

    DocumentInfo {
        title: string_entry(doc, info, b"Title"),
        author: string_entry(doc, info, b"Author"),
        subject: string_entry(doc, info, b"Subject"),
        creator: string_entry(doc, info, b"Creator"),
    }
}

/// Walk a sibling chain of outline items starting at `first`.
///
/// Items whose destination cannot be resolved to a page are dropped and
/// their children take their place.
fn read_outline_items(
    doc: &Document,
    first: ObjectId,
    page_index: &HashMap<ObjectId, usize>,
    visited: &mut HashSet<ObjectId>,
) -> Vec<Bookmark> {
    let mut items = Vec::new();
    let mut next = Some(first);

    while let Some(id) = next {
        if !visited.insert(id) {
            log::warn!("Outline item {:?} visited twice, stopping", id);
            break;
        }

        let dict = match doc.get_object(id).and_then(Object::as_dict) {
            Ok(dict) => dict,
            Err(e) => {
                log::warn!("Unreadable outline item {:?}: {}", id, e);
                break;
            },
        };

        let children = dict
            .get(b"First")
            .ok()
            .and_then(|child| child.as_reference().ok())
            .map(|child| read_outline_items(doc, child, page_index, visited))
            .unwrap_or_default();

        match destination_page(doc, dict, page_index) {
            Some(page) => items.push(Bookmark {
                title: string_entry(doc, dict, b"Title"),
                page,
                children,
            }),
            None => items.extend(children),
        }

        next = dict.get(b"Next").ok().and_then(|n| n.as_reference().ok());
    }

    items
}

/// Page targeted by `/Dest` or a GoTo action's `/D`.
fn destination_page(
    doc: &Document,
    item: &Dictionary,
    page_index: &HashMap<ObjectId, usize>,
) -> Option<usize> {
    let dest = match item.get(b"Dest") {
        Ok(dest) => dest,
        Err(_) => resolve(doc, item.get(b"A").ok()?)?
            .as_dict()
            .ok()?
            .get(b"D")
            .ok()?,
    };

    let target = resolve(doc, dest)?.as_array().ok()?.first()?.as_reference().ok()?;
    page_index.get(&target).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};
    use tempfile::TempDir;

    /// Write a PDF with one page per content stream, an info title and
    /// a two-entry outline pointing at the first and last page.
    fn write_pdf(dir: &TempDir, contents: &[&[u8]], title: Option<&str>) -> std::path::PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut page_ids = Vec::new();
        for content in contents {
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => Object::Reference(pages_id),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
                "Contents" => Object::Reference(content_id),
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => Object::Reference(font_id) },
                },
            });
            page_ids.push(page_id);
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
                "Count" => page_ids.len() as i64,
            }),
        );

        let outlines_id = doc.new_object_id();
        let first_id = doc.new_object_id();
        let last_id = doc.new_object_id();
        doc.objects.insert(
            first_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Introduction"),
                "Parent" => Object::Reference(outlines_id),
                "Next" => Object::Reference(last_id),
                "Dest" => vec![Object::Reference(page_ids[0]), "Fit".into()],
            }),
        );
        doc.objects.insert(
            last_id,
            Object::Dictionary(dictionary! {
                "Title" => Object::string_literal("Appendix"),
                "Parent" => Object::Reference(outlines_id),
                "A" => dictionary! {
                    "S" => "GoTo",
                    "D" => vec![Object::Reference(page_ids[page_ids.len() - 1]), "Fit".into()],
                },
            }),
        );
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => Object::Reference(first_id),
                "Last" => Object::Reference(last_id),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
            "Outlines" => Object::Reference(outlines_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        if let Some(title) = title {
            let info_id = doc.add_object(dictionary! {
                "Title" => Object::string_literal(title),
                "Author" => Object::string_literal("A. Writer"),
                "Creator" => Object::string_literal("pdf_pager tests"),
            });
            doc.trailer.set("Info", Object::Reference(info_id));
        }

        let path = dir.path().join("sample.pdf");
        doc.save(&path).unwrap();
        path
    }

    const PAGE_ONE: &[u8] =
        b"BT /F1 12 Tf 72 700 Td (Hello) Tj 40 0 Td (World) Tj 0 -20 Td (Second line) Tj ET";
    const PAGE_TWO: &[u8] =
        b"BT /F1 24 Tf 72 720 Td (Title) Tj /F1 12 Tf 0 -30 Td [(Body)-300(text)] TJ ET";

    #[test]
    fn test_probe_reads_page_count_and_info() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, &[PAGE_ONE, PAGE_TWO], Some("Sample Doc"));

        let info = LopdfExtractor::new().probe(&path).unwrap();
        assert_eq!(info.page_count, 2);
        assert_eq!(info.info.title, "Sample Doc");
        assert_eq!(info.info.author, "A. Writer");
        assert_eq!(info.info.creator, "pdf_pager tests");
        assert!(info.info.subject.is_empty());
    }

    #[test]
    fn test_title_falls_back_to_path() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, &[PAGE_ONE], None);

        let info = LopdfExtractor::new().probe(&path).unwrap();
        assert_eq!(info.info.title, path.display().to_string());
    }

    #[test]
    fn test_extract_positioned_runs() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, &[PAGE_ONE], None);

        let runs = match LopdfExtractor::new().extract_page(&path, 1).unwrap() {
            PageContent::Runs(runs) => runs,
            other => panic!("expected runs, got {:?}", other),
        };

        let texts: Vec<&str> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "World", "Second line"]);
        assert_eq!((runs[0].x, runs[0].y), (72.0, 700.0));
        assert_eq!((runs[1].x, runs[1].y), (112.0, 700.0));
        assert_eq!((runs[2].x, runs[2].y), (112.0, 680.0));
        assert_eq!(runs[0].font_name, "F1");
        assert_eq!(runs[0].font_size, 12.0);
        assert_eq!(runs[0].width, 5.0 * 12.0 * 0.5);
    }

    #[test]
    fn test_tj_array_inserts_word_space() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, &[PAGE_TWO], None);

        let runs = match LopdfExtractor::new().extract_page(&path, 1).unwrap() {
            PageContent::Runs(runs) => runs,
            other => panic!("expected runs, got {:?}", other),
        };

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Title");
        assert_eq!(runs[0].font_size, 24.0);
        assert_eq!(runs[1].text, "Body text");
        assert_eq!(runs[1].y, 690.0);
    }

    #[test]
    fn test_missing_page_is_null_page() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, &[PAGE_ONE], None);

        let err = LopdfExtractor::new().extract_page(&path, 3).unwrap_err();
        assert!(matches!(err, Error::NullPage(3)));
    }

    #[test]
    fn test_bookmarks_resolve_dest_and_goto_action() {
        let dir = TempDir::new().unwrap();
        let path = write_pdf(&dir, &[PAGE_ONE, PAGE_TWO, PAGE_ONE], None);

        let bookmarks = LopdfExtractor::new().bookmarks(&path).unwrap();
        assert_eq!(
            bookmarks,
            vec![Bookmark::new("Introduction", 1), Bookmark::new("Appendix", 3)]
        );
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let result = LopdfExtractor::new().probe(&dir.path().join("absent.pdf"));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_pdf_string() {
        assert_eq!(decode_pdf_string(b"plain"), "plain");
        assert_eq!(decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0xE9]), "Aé");
        assert_eq!(decode_pdf_string(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }
}

/*!
 * Rich-text rendering for `.xlsx` packages.
 *
 * calamine only exposes the plain text of a cell. Formatting runs live in
 * `xl/sharedStrings.xml`, so that part is read separately and every rich entry
 * is rendered as HTML-like markup, one `<span>` per run:
 *
 * `<span style="font-size:12pt;"><b>bold</b></span>`
 *
 * Underline and font size go into the `style` attribute, bold, italic,
 * strike-through and super/subscript become nested wrapper elements. These are
 * the spans strip and replace rules are usually written against.
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;

use crate::errors::WorkbookError;
use crate::workbook::sheet::escape_markup;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Formatting of one run
#[derive(Debug, Clone, Default, PartialEq)]
struct RunFont {
    bold: bool,
    italic: bool,
    strike: bool,
    underline: bool,
    size: Option<String>,
    vertical_align: Option<String>,
}

impl RunFont {
    fn render(&self, text: &str) -> String {
        let mut style = String::new();
        if self.underline {
            style.push_str("text-decoration: underline;");
        }
        if let Some(size) = &self.size {
            style.push_str("font-size:");
            style.push_str(size);
            style.push_str("pt;");
        }

        let mut wrappers: Vec<&str> = Vec::new();
        if self.bold {
            wrappers.push("b");
        }
        if self.italic {
            wrappers.push("i");
        }
        if self.strike {
            wrappers.push("s");
        }
        match self.vertical_align.as_deref() {
            Some("superscript") | Some("super") => wrappers.push("sup"),
            Some("subscript") => wrappers.push("sub"),
            _ => {}
        }

        let mut out = format!("<span style=\"{}\">", style);
        for tag in &wrappers {
            out.push_str(&format!("<{}>", tag));
        }
        out.push_str(&escape_markup(text));
        for tag in wrappers.iter().rev() {
            out.push_str(&format!("</{}>", tag));
        }
        out.push_str("</span>");
        out
    }
}

/// Markup of the cells that reference a rich shared string
#[derive(Debug, Clone, Default)]
pub struct RichTextIndex {
    cells: HashMap<(u32, u32), String>,
}

impl RichTextIndex {
    /// Read the rich strings used by the first worksheet of an `.xlsx` package
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorkbookError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| WorkbookError::Open(e.to_string()))?;
        let mut archive = ZipArchive::new(file).map_err(|e| WorkbookError::Open(e.to_string()))?;

        let Some(shared_strings) = read_part(&mut archive, SHARED_STRINGS_PART)? else {
            debug!("No shared strings in {}", path.display());
            return Ok(Self::default());
        };

        let workbook = read_part(&mut archive, WORKBOOK_PART)?.unwrap_or_default();
        let rels = read_part(&mut archive, WORKBOOK_RELS_PART)?.unwrap_or_default();
        let Some(sheet_part) = first_sheet_part(&workbook, &rels)? else {
            return Ok(Self::default());
        };

        let Some(sheet) = read_part(&mut archive, &sheet_part)? else {
            return Err(WorkbookError::Part {
                part: sheet_part,
                message: "missing from package".to_string(),
            });
        };

        Self::from_parts(&shared_strings, &sheet)
    }

    /// Build the index from the shared strings part and a worksheet part
    pub fn from_parts(shared_strings_xml: &str, sheet_xml: &str) -> Result<Self, WorkbookError> {
        let strings = parse_shared_strings(shared_strings_xml)?;
        let mut cells = HashMap::new();

        for (position, index) in parse_shared_string_refs(sheet_xml)? {
            if let Some(Some(markup)) = strings.get(index) {
                cells.insert(position, markup.clone());
            }
        }

        debug!("{} cell(s) carry rich text", cells.len());
        Ok(Self { cells })
    }

    pub fn markup(&self, row: u32, col: u32) -> Option<&str> {
        self.cells.get(&(row, col)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>, WorkbookError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => {
            return Err(WorkbookError::Part {
                part: name.to_string(),
                message: e.to_string(),
            });
        }
    };

    let mut content = String::new();
    entry.read_to_string(&mut content).map_err(|e| WorkbookError::Part {
        part: name.to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(content))
}

fn xml_error(part: &str, error: impl std::fmt::Display) -> WorkbookError {
    WorkbookError::Part {
        part: part.to_string(),
        message: error.to_string(),
    }
}

fn attribute(start: &BytesStart<'_>, local: &[u8], prefixed: bool) -> Option<String> {
    start.attributes().flatten().find_map(|attr| {
        let key = attr.key;
        let matches = key.local_name().as_ref() == local && key.prefix().is_some() == prefixed;
        matches.then(|| String::from_utf8_lossy(&attr.value).into_owned())
    })
}

fn flag(start: &BytesStart<'_>) -> bool {
    !matches!(attribute(start, b"val", false).as_deref(), Some("0") | Some("false"))
}

/// Path of the first worksheet, resolved through the workbook relationships
fn first_sheet_part(workbook_xml: &str, rels_xml: &str) -> Result<Option<String>, WorkbookError> {
    let mut reader = Reader::from_str(workbook_xml);
    let mut relationship = None;
    loop {
        match reader.read_event().map_err(|e| xml_error(WORKBOOK_PART, e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                relationship = attribute(&e, b"id", true);
                break;
            }
            Event::Eof => break,
            _ => {}
        }
    }
    let Some(relationship) = relationship else {
        return Ok(None);
    };

    let mut reader = Reader::from_str(rels_xml);
    loop {
        match reader.read_event().map_err(|e| xml_error(WORKBOOK_RELS_PART, e))? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attribute(&e, b"Id", false).as_deref() != Some(relationship.as_str()) {
                    continue;
                }
                let Some(target) = attribute(&e, b"Target", false) else {
                    return Ok(None);
                };
                let part = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{}", target),
                };
                return Ok(Some(part));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Parse `sharedStrings.xml`; rich entries become markup, plain ones `None`
pub fn parse_shared_strings(xml: &str) -> Result<Vec<Option<String>>, WorkbookError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut strings = Vec::new();
    let mut runs: Vec<String> = Vec::new();
    let mut font = RunFont::default();
    let mut run_text = String::new();
    let mut in_run = false;
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event().map_err(|e| xml_error(SHARED_STRINGS_PART, e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => runs.clear(),
                b"r" => {
                    in_run = true;
                    font = RunFont::default();
                    run_text.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" => in_text = !in_phonetic,
                _ if in_run => apply_run_property(&mut font, &e),
                _ => {}
            },
            Event::Empty(e) => {
                if in_run {
                    apply_run_property(&mut font, &e);
                }
            }
            Event::Text(e) => {
                if in_text && in_run {
                    let text = e.unescape().map_err(|err| xml_error(SHARED_STRINGS_PART, err))?;
                    run_text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if in_text && in_run {
                    run_text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"r" => {
                    in_run = false;
                    runs.push(font.render(&run_text));
                }
                b"si" => {
                    let entry = if runs.is_empty() { None } else { Some(runs.concat()) };
                    strings.push(entry);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(strings)
}

fn apply_run_property(font: &mut RunFont, element: &BytesStart<'_>) {
    match element.local_name().as_ref() {
        b"b" => font.bold = flag(element),
        b"i" => font.italic = flag(element),
        b"strike" => font.strike = flag(element),
        b"u" => font.underline = !matches!(attribute(element, b"val", false).as_deref(), Some("none")),
        b"sz" => font.size = attribute(element, b"val", false),
        b"vertAlign" => font.vertical_align = attribute(element, b"val", false),
        _ => {}
    }
}

/// Cells of a worksheet part that reference a shared string
fn parse_shared_string_refs(xml: &str) -> Result<Vec<((u32, u32), usize)>, WorkbookError> {
    let mut reader = Reader::from_str(xml);
    let mut refs = Vec::new();
    let mut current: Option<(u32, u32)> = None;
    let mut in_value = false;

    loop {
        match reader.read_event().map_err(|e| xml_error("worksheet", e))? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"c" => {
                    let is_shared = attribute(&e, b"t", false).as_deref() == Some("s");
                    current = if is_shared {
                        attribute(&e, b"r", false).and_then(|r| decode_cell_ref(&r))
                    } else {
                        None
                    };
                }
                b"v" => in_value = true,
                _ => {}
            },
            Event::Text(e) => {
                if let (true, Some(position)) = (in_value, current) {
                    let text = e.unescape().map_err(|err| xml_error("worksheet", err))?;
                    if let Ok(index) = text.trim().parse::<usize>() {
                        refs.push((position, index));
                    }
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"v" => in_value = false,
                b"c" => current = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(refs)
}

/// Decode an `A1`-style reference into 0-based `(row, column)`
pub fn decode_cell_ref(reference: &str) -> Option<(u32, u32)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut column: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        column = column.checked_mul(26)?.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1)?;
    }

    let row: u32 = digits.parse().ok()?;
    Some((row.checked_sub(1)?, column - 1))
}

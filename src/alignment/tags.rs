/*!
 * Structural matching of configured tag patterns.
 *
 * A pattern such as `<span style="font-size:12pt;">` is parsed once into a tag
 * name plus an attribute set. Cell markup is then scanned for opening tags with
 * the same name and the same attributes (order and quoting do not matter), and
 * each match is paired with its closing tag, counting nested tags of the same
 * name. The scan is linear in the input for non-nested markup.
 */

use crate::errors::ConfigError;

/// One configured opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
    name: String,
    attributes: Vec<(String, String)>,
    source: String,
}

/// An opening tag found in cell markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenTag<'a> {
    pub name: &'a str,
    pub attributes: Vec<(&'a str, &'a str)>,
    pub self_closing: bool,
    /// Byte offset just past the closing `>`
    pub end: usize,
}

impl TagPattern {
    /// Parse a configured opening tag
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidTagPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = pattern.trim();
        if !trimmed.starts_with('<') {
            return Err(invalid("must start with '<'"));
        }

        let tag = parse_open_tag(trimmed, 0).ok_or_else(|| invalid("not a well-formed opening tag"))?;
        if tag.self_closing {
            return Err(invalid("self-closing tags have no content to match"));
        }
        if tag.end != trimmed.len() {
            return Err(invalid("unexpected text after the opening tag"));
        }

        let mut attributes: Vec<(String, String)> = tag
            .attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        attributes.sort();

        Ok(Self {
            name: tag.name.to_string(),
            attributes,
            source: trimmed.to_string(),
        })
    }

    /// Tag name, also the name of the inferred closing tag
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The opening tag exactly as configured
    pub fn opening(&self) -> &str {
        &self.source
    }

    /// The inferred closing tag
    pub fn closing(&self) -> String {
        format!("</{}>", self.name)
    }

    /// Wrap content in this tag, the inverse of stripping it
    pub fn wrap(&self, content: &str) -> String {
        format!("{}{}{}", self.source, content, self.closing())
    }

    pub(crate) fn matches(&self, tag: &OpenTag<'_>) -> bool {
        if tag.self_closing || tag.name != self.name || tag.attributes.len() != self.attributes.len() {
            return false;
        }

        let mut found: Vec<(&str, &str)> = tag.attributes.clone();
        found.sort();
        found
            .iter()
            .zip(&self.attributes)
            .all(|((k1, v1), (k2, v2))| *k1 == k2.as_str() && *v1 == v2.as_str())
    }
}

fn is_name_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '/' | '>' | '<' | '=' | '"' | '\'')
}

fn skip_whitespace(text: &str, mut pos: usize) -> usize {
    while let Some(c) = text[pos..].chars().next() {
        if !c.is_whitespace() {
            break;
        }
        pos += c.len_utf8();
    }
    pos
}

fn take_name(text: &str, start: usize) -> (&str, usize) {
    let len = text[start..]
        .char_indices()
        .find(|(_, c)| !is_name_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(text.len() - start);
    (&text[start..start + len], start + len)
}

/// Parse an opening tag starting at `start`, which must point at `<`
pub(crate) fn parse_open_tag(text: &str, start: usize) -> Option<OpenTag<'_>> {
    if !text[start..].starts_with('<') {
        return None;
    }

    let (name, mut pos) = take_name(text, start + 1);
    if name.is_empty() || name.starts_with(['!', '?']) {
        return None;
    }

    let mut attributes = Vec::new();
    loop {
        pos = skip_whitespace(text, pos);
        let rest = &text[pos..];

        if rest.starts_with('>') {
            return Some(OpenTag { name, attributes, self_closing: false, end: pos + 1 });
        }
        if rest.starts_with("/>") {
            return Some(OpenTag { name, attributes, self_closing: true, end: pos + 2 });
        }

        let (key, after_key) = take_name(text, pos);
        if key.is_empty() {
            return None;
        }
        pos = skip_whitespace(text, after_key);

        if !text[pos..].starts_with('=') {
            // Valueless attribute
            attributes.push((key, ""));
            continue;
        }
        pos = skip_whitespace(text, pos + 1);

        let quote = text[pos..].chars().next()?;
        if quote == '"' || quote == '\'' {
            let close = text[pos + 1..].find(quote)?;
            attributes.push((key, &text[pos + 1..pos + 1 + close]));
            pos += close + 2;
        } else {
            let (value, after_value) = take_name(text, pos);
            if value.is_empty() {
                return None;
            }
            attributes.push((key, value));
            pos = after_value;
        }
    }
}

/// If a closing tag for `name` starts at `pos`, return the offset past it
fn closing_tag_end(text: &str, pos: usize, name: &str) -> Option<usize> {
    let rest = text[pos..].strip_prefix("</")?.strip_prefix(name)?;
    let after_name = text.len() - rest.len();
    let end = skip_whitespace(text, after_name);
    text[end..].starts_with('>').then_some(end + 1)
}

/// Find the closing tag balancing an opening `name` tag that ended at `from`
///
/// Returns the byte range of the closing tag.
pub(crate) fn find_matching_close(text: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut cursor = from;

    while let Some(offset) = text[cursor..].find('<') {
        let pos = cursor + offset;

        if let Some(end) = closing_tag_end(text, pos, name) {
            if depth == 0 {
                return Some((pos, end));
            }
            depth -= 1;
            cursor = end;
            continue;
        }

        match parse_open_tag(text, pos) {
            Some(tag) if tag.name == name && !tag.self_closing => {
                depth += 1;
                cursor = tag.end;
            }
            Some(tag) => cursor = tag.end,
            None => cursor = pos + 1,
        }
    }

    None
}

/// Rewrite every occurrence of `pattern`, replacing its markers
///
/// With `replacement == None` the markers are dropped and only the content is
/// kept. Content of a match is rewritten as well, so nested occurrences of the
/// same pattern are handled.
pub(crate) fn rewrite(text: &str, pattern: &TagPattern, replacement: Option<&TagPattern>) -> String {
    let mut output = String::with_capacity(text.len());
    let mut copied = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('<') {
        let pos = cursor + offset;

        let Some(tag) = parse_open_tag(text, pos) else {
            cursor = pos + 1;
            continue;
        };

        if !pattern.matches(&tag) {
            cursor = tag.end;
            continue;
        }

        let Some((close_start, close_end)) = find_matching_close(text, tag.end, pattern.name()) else {
            // Unterminated: leave it alone
            cursor = tag.end;
            continue;
        };

        output.push_str(&text[copied..pos]);
        let inner = rewrite(&text[tag.end..close_start], pattern, replacement);
        match replacement {
            Some(to) => {
                output.push_str(to.opening());
                output.push_str(&inner);
                output.push_str(&to.closing());
            }
            None => output.push_str(&inner),
        }

        copied = close_end;
        cursor = close_end;
    }

    output.push_str(&text[copied..]);
    output
}

/*!
 * Rule-driven rewriting of a single cell's markup.
 *
 * Stages always run in the order strip → replace → divide. Every stage is the
 * identity when it has no rules.
 */

use log::trace;

use crate::alignment::normalize::MarkupNormalizer;
use crate::alignment::tags::{self, TagPattern};
use crate::app_config::{DivideRule, TagRuleSet};
use crate::errors::TransformError;

/// Applies the configured rewrite rules to cell markup
pub struct CellTextTransformer;

impl CellTextTransformer {
    /// Run all three stages
    pub fn transform(text: &str, rules: &TagRuleSet) -> String {
        let stripped = Self::strip_tags(text, &rules.strip);
        let replaced = Self::replace_tags(&stripped, &rules.replace);
        Self::divide_by(&replaced, &rules.divide)
    }

    /// Remove the markers of every matching tag, keeping its content
    pub fn strip_tags(text: &str, rules: &[TagPattern]) -> String {
        rules
            .iter()
            .fold(text.to_string(), |current, rule| tags::rewrite(&current, rule, None))
    }

    /// Swap the markers of every matching tag for another tag
    pub fn replace_tags(text: &str, rules: &[(TagPattern, TagPattern)]) -> String {
        rules
            .iter()
            .fold(text.to_string(), |current, (from, to)| tags::rewrite(&current, from, Some(to)))
    }

    /// Split the text at the first divide rule's delimiter
    ///
    /// Only the first rule is ever consulted: when its delimiter is missing the
    /// text comes back unchanged, whatever the later rules would match. The tail
    /// starts two characters after the delimiter position, which covers the
    /// usual `": "` style delimiters. Delimiters inside a tag, such as in an
    /// attribute value, are not split on.
    pub fn divide_by(text: &str, rules: &[DivideRule]) -> String {
        let Some(rule) = rules.first() else {
            return text.to_string();
        };

        let Some(position) = find_outside_tags(text, &rule.delimiter) else {
            trace!("Delimiter {:?} not found, leaving cell undivided", rule.delimiter);
            return text.to_string();
        };

        let head = text[..position].trim();
        let after = &text[position..];
        let tail = after
            .char_indices()
            .nth(2)
            .map(|(offset, _)| &after[offset..])
            .unwrap_or("")
            .trim();

        format!("{} <{}>{}</{}>", head, rule.wrapper, tail, rule.wrapper)
    }
}

/// Byte offset of the first `delimiter` occurring in text content
fn find_outside_tags(text: &str, delimiter: &str) -> Option<usize> {
    if delimiter.is_empty() {
        return None;
    }

    let mut in_tag = false;
    let mut quote: Option<char> = None;
    for (offset, c) in text.char_indices() {
        if in_tag {
            match quote {
                Some(open) if c == open => quote = None,
                Some(_) => {}
                None if c == '"' || c == '\'' => quote = Some(c),
                None if c == '>' => in_tag = false,
                None => {}
            }
            continue;
        }

        if text[offset..].starts_with(delimiter) {
            return Some(offset);
        }
        if c == '<' {
            in_tag = true;
        }
    }
    None
}

/// Turns raw cell markup into the content of a segment
///
/// In dirty mode the rewrite rules are skipped and the markup is only
/// re-serialized.
#[derive(Debug, Clone)]
pub struct CellFormatter {
    rules: TagRuleSet,
    dirty: bool,
}

impl CellFormatter {
    pub fn new(rules: TagRuleSet, dirty: bool) -> Self {
        Self { rules, dirty }
    }

    /// A formatter that only re-serializes markup
    pub fn dirty() -> Self {
        Self::new(TagRuleSet::empty(), true)
    }

    pub fn format(&self, markup: &str) -> Result<String, TransformError> {
        if self.dirty {
            return MarkupNormalizer::normalize(markup);
        }

        let transformed = CellTextTransformer::transform(markup, &self.rules);
        MarkupNormalizer::normalize(&transformed)
    }
}

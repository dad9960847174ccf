use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::alignment::tags::TagPattern;
use crate::errors::ConfigError;
use crate::language_utils;

// Application configuration module
// This module handles the application configuration including loading,
// validating and compiling the tag rules used by the cell pipeline.

// @const: XML element name (no namespace validation beyond the prefix colon)
static XML_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9._:\-]*$").expect("Invalid XML name regex")
});

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Opening tags whose markers are removed, keeping the inner content
    ///
    /// A configuration file that omits a rule list gets no rules of that kind;
    /// the built-in rules only apply when no file is given.
    #[serde(default)]
    pub strip_tags: Vec<String>,

    /// Opening tags whose markers are swapped for another tag
    #[serde(default)]
    pub replace_tags: Vec<ReplaceRule>,

    /// Delimiter rules; only the first one is ever applied
    #[serde(default)]
    pub divide_by: Vec<DivideRule>,

    /// Element name of every emitted segment
    #[serde(default = "default_row_tag_name")]
    pub row_tag_name: String,

    /// Element name of the document root
    #[serde(default = "default_parent_tag_name")]
    pub parent_tag_name: String,

    /// Language codes for the source and target columns
    #[serde(default)]
    pub language: Vec<String>,

    /// Append one-sided follow-up rows to the preceding segment
    #[serde(default = "default_true")]
    pub merge_continuations: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Skip every rewrite rule and only re-serialize markup
    #[serde(skip)]
    pub dirty: bool,
}

/// A `{from, to}` tag substitution
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReplaceRule {
    // @field: Opening tag to look for
    pub from: String,

    // @field: Opening tag written in its place
    pub to: String,
}

impl ReplaceRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { from: from.into(), to: to.into() }
    }
}

/// A `[delimiter, wrapperTag]` pair
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct DivideRule {
    // @field: Substring the cell text is split at
    pub delimiter: String,

    // @field: Element wrapping the text after the delimiter
    pub wrapper: String,
}

impl DivideRule {
    pub fn new(delimiter: impl Into<String>, wrapper: impl Into<String>) -> Self {
        Self { delimiter: delimiter.into(), wrapper: wrapper.into() }
    }
}

impl From<(String, String)> for DivideRule {
    fn from((delimiter, wrapper): (String, String)) -> Self {
        Self { delimiter, wrapper }
    }
}

impl From<DivideRule> for (String, String) {
    fn from(rule: DivideRule) -> Self {
        (rule.delimiter, rule.wrapper)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Compiled form of the rewrite rules, ready for the cell pipeline
#[derive(Debug, Clone, Default)]
pub struct TagRuleSet {
    /// Patterns removed by the strip stage
    pub strip: Vec<TagPattern>,

    /// `(from, to)` pattern pairs of the replace stage
    pub replace: Vec<(TagPattern, TagPattern)>,

    /// Divide rules in configuration order
    pub divide: Vec<DivideRule>,
}

impl TagRuleSet {
    /// A rule set that leaves every cell untouched
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether no rule of any stage is configured
    pub fn is_empty(&self) -> bool {
        self.strip.is_empty() && self.replace.is_empty() && self.divide.is_empty()
    }
}

fn default_strip_tags() -> Vec<String> {
    vec![r#"<span style="font-size:12pt;">"#.to_string()]
}

fn default_replace_tags() -> Vec<ReplaceRule> {
    vec![ReplaceRule::new(r#"<span style="font-size:9pt;">"#, "<topic>")]
}

fn default_divide_by() -> Vec<DivideRule> {
    vec![DivideRule::new(": ", "appendix")]
}

fn default_row_tag_name() -> String {
    "seg".to_string()
}

fn default_parent_tag_name() -> String {
    "body".to_string()
}

fn default_true() -> bool {
    true
}

fn is_xml_name(name: &str) -> bool {
    XML_NAME_REGEX.is_match(name)
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| ConfigError::Load(format!("cannot open {}: {}", path.display(), e)))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| ConfigError::Load(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// The "no cleaning" variant: same output names, no rewrite rules
    pub fn into_dirty(mut self) -> Self {
        self.strip_tags.clear();
        self.replace_tags.clear();
        self.divide_by.clear();
        self.dirty = true;
        self
    }

    /// Built-in dirty configuration
    pub fn dirty() -> Self {
        Self::default().into_dirty()
    }

    /// Language code of a column, if one is configured
    pub fn language_for_column(&self, column: usize) -> Option<&str> {
        self.language.get(column).map(String::as_str)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_xml_name(&self.row_tag_name) {
            return Err(ConfigError::InvalidTagName {
                field: "rowTagName",
                value: self.row_tag_name.clone(),
            });
        }

        if !is_xml_name(&self.parent_tag_name) {
            return Err(ConfigError::InvalidTagName {
                field: "parentTagName",
                value: self.parent_tag_name.clone(),
            });
        }

        if self.language.len() > 2 {
            return Err(ConfigError::TooManyLanguages(self.language.len()));
        }

        // Unknown codes are still written out, they only deserve a warning
        for code in &self.language {
            if language_utils::validate_language_code(code).is_err() {
                warn!("Language code '{}' is not a known ISO 639 code", code);
            }
        }

        self.rule_set().map(|_| ())
    }

    /// Parse every configured pattern into the rule set used by the pipeline
    pub fn rule_set(&self) -> Result<TagRuleSet, ConfigError> {
        let strip = self
            .strip_tags
            .iter()
            .map(|pattern| TagPattern::parse(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let replace = self
            .replace_tags
            .iter()
            .map(|rule| Ok((TagPattern::parse(&rule.from)?, TagPattern::parse(&rule.to)?)))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        for rule in &self.divide_by {
            let reason = if rule.delimiter.is_empty() {
                Some("delimiter must not be empty")
            } else if !is_xml_name(&rule.wrapper) {
                Some("wrapper must be a valid tag name")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(ConfigError::InvalidDivideRule {
                    delimiter: rule.delimiter.clone(),
                    wrapper: rule.wrapper.clone(),
                    reason: reason.to_string(),
                });
            }
        }

        Ok(TagRuleSet {
            strip,
            replace,
            divide: self.divide_by.clone(),
        })
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            strip_tags: default_strip_tags(),
            replace_tags: default_replace_tags(),
            divide_by: default_divide_by(),
            row_tag_name: default_row_tag_name(),
            parent_tag_name: default_parent_tag_name(),
            language: Vec::new(),
            merge_continuations: true,
            log_level: LogLevel::default(),
            dirty: false,
        }
    }
}

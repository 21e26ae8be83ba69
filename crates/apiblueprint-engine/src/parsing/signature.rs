//! # Signature Matcher
//!
//! Pattern classification of a block's first line. Every matcher looks at a
//! single trimmed line only; whatever follows the first line is content and
//! is never inspected here.
//!
//! Keywords match case-insensitively. HTTP methods match upper-case only.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{KeyValue, PayloadKind};

macro_rules! regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("invalid signature regex"))
        }
    };
}

macro_rules! http_methods {
    () => {
        "GET|POST|PUT|DELETE|OPTIONS|PATCH|PROPPATCH|LOCK|UNLOCK|COPY|MOVE|MKCOL|HEAD|LINK|UNLINK|CONNECT"
    };
}

regex!(body_re, r"(?i)^[ \t]*body[ \t]*$");
regex!(schema_re, r"(?i)^[ \t]*schema[ \t]*$");
regex!(headers_re, r"(?i)^[ \t]*headers[ \t]*$");
regex!(parameters_re, r"(?i)^[ \t]*parameters[ \t]*$");
regex!(values_re, r"(?i)^[ \t]*(?:values|members)[ \t]*$");
regex!(attributes_re, r"(?i)^[ \t]*attributes[ \t]*(?:\((.*)\))?[ \t]*$");
regex!(
    payload_re,
    r"(?i)^[ \t]*(request|response|model)(?:[ \t]+([^(]*?))?[ \t]*(?:\(([^)]*)\))?[ \t]*$"
);
regex!(one_of_re, r"(?i)^[ \t]*one[ \t]+of[ \t]*$");
regex!(include_re, r"(?i)^[ \t]*include[ \t]+(.+?)[ \t]*$");
regex!(member_group_re, r"(?i)^[ \t]*(properties|items|members)[ \t]*$");
regex!(sample_re, r"(?i)^[ \t]*sample(?:[ \t]*:[ \t]*(.*?))?[ \t]*$");
regex!(default_re, r"(?i)^[ \t]*default(?:[ \t]*:[ \t]*(.*?))?[ \t]*$");

regex!(group_re, r"(?i)^[ \t]*group[ \t]+(.+?)[ \t]*$");
regex!(data_structures_re, r"(?i)^[ \t]*data[ \t]+structures?[ \t]*$");
regex!(uri_re, r"^[ \t]*(/\S*)[ \t]*$");
regex!(named_uri_re, r"^[ \t]*([^\[\]]*?)[ \t]*\[[ \t]*(/[^\]\s]*)[ \t]*\][ \t]*$");
regex!(
    method_uri_re,
    concat!(r"^[ \t]*(", http_methods!(), r")[ \t]+(/\S*)[ \t]*$")
);
regex!(
    named_method_uri_re,
    concat!(
        r"^[ \t]*([^\[\]]*?)[ \t]*\[[ \t]*(",
        http_methods!(),
        r")[ \t]+(/[^\]\s]*)[ \t]*\][ \t]*$"
    )
);
regex!(method_re, concat!(r"^[ \t]*(", http_methods!(), r")[ \t]*$"));
regex!(
    named_method_re,
    concat!(
        r"^[ \t]*([^\[\]]*?)[ \t]*\[[ \t]*(",
        http_methods!(),
        r")[ \t]*\][ \t]*$"
    )
);

regex!(metadata_re, r"^[ \t]*([A-Za-z0-9_]+)[ \t]*:[ \t]*(.*?)[ \t]*$");
regex!(header_line_re, r"^[ \t]*([^:\s]+)[ \t]*:[ \t]*(.*?)[ \t]*$");
regex!(reference_re, r"^[ \t]*\[([^\]]+)\]\[\][ \t]*$");
regex!(parameter_name_re, r"^[A-Za-z0-9_.%\-]+$");

/// Result of matching a line against the asset keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSignature {
    /// No keyword; the text is treated as untyped content.
    NoSignature,
    Body,
    Schema,
}

pub fn asset_signature(line: &str) -> AssetSignature {
    let line = line.trim();
    if body_re().is_match(line) {
        AssetSignature::Body
    } else if schema_re().is_match(line) {
        AssetSignature::Schema
    } else {
        AssetSignature::NoSignature
    }
}

/// Keywords that open a list-item section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Request,
    Response,
    Model,
    Body,
    Schema,
    Headers,
    Parameters,
    Values,
    Attributes,
    OneOf,
    Include,
    MemberGroup,
    Sample,
    Default,
}

/// Matches `line` against every list-item keyword, in precedence order.
pub fn keyword(line: &str) -> Option<Keyword> {
    let line = line.trim();
    // `Members` is listed under both member groups and parameter values;
    // the member group wins here and callers remap by context.
    let table: [(fn() -> &'static Regex, Keyword); 11] = [
        (body_re, Keyword::Body),
        (schema_re, Keyword::Schema),
        (headers_re, Keyword::Headers),
        (parameters_re, Keyword::Parameters),
        (attributes_re, Keyword::Attributes),
        (one_of_re, Keyword::OneOf),
        (include_re, Keyword::Include),
        (member_group_re, Keyword::MemberGroup),
        (values_re, Keyword::Values),
        (sample_re, Keyword::Sample),
        (default_re, Keyword::Default),
    ];
    if let Some((_, keyword)) = table.iter().find(|(re, _)| re().is_match(line)) {
        return Some(*keyword);
    }
    payload_signature(line).map(|sig| match sig.kind {
        PayloadKind::Request => Keyword::Request,
        PayloadKind::Response => Keyword::Response,
        PayloadKind::Model => Keyword::Model,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadSignature {
    pub kind: PayloadKind,
    pub name: String,
    pub media_type: Option<String>,
}

pub fn payload_signature(line: &str) -> Option<PayloadSignature> {
    let caps = payload_re().captures(line.trim())?;
    let kind = match caps[1].to_ascii_lowercase().as_str() {
        "request" => PayloadKind::Request,
        "response" => PayloadKind::Response,
        _ => PayloadKind::Model,
    };
    Some(PayloadSignature {
        kind,
        name: caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        media_type: caps
            .get(3)
            .map(|m| m.as_str().trim().to_string())
            .filter(|media| !media.is_empty()),
    })
}

/// Type attributes written in the parentheses of `Attributes (...)`.
pub fn attributes_signature(line: &str) -> Option<Vec<String>> {
    let caps = attributes_re().captures(line.trim())?;
    Some(
        caps.get(1)
            .map(|m| split_outside(m.as_str(), ','))
            .unwrap_or_default(),
    )
}

/// The type named by `Include <type>`.
pub fn include_signature(line: &str) -> Option<String> {
    include_re()
        .captures(line.trim())
        .map(|caps| caps[1].to_string())
}

/// `Properties` / `Items` / `Members`, lower-cased.
pub fn member_group_signature(line: &str) -> Option<String> {
    member_group_re()
        .captures(line.trim())
        .map(|caps| caps[1].to_ascii_lowercase())
}

/// Inline value of `Sample: value` or `Default: value`; the inner option is
/// `None` when the keyword has no inline value.
pub fn sample_or_default_signature(line: &str) -> Option<Option<String>> {
    let line = line.trim();
    let caps = sample_re()
        .captures(line)
        .or_else(|| default_re().captures(line))?;
    Some(
        caps.get(1)
            .map(|m| m.as_str().to_string())
            .filter(|value| !value.is_empty()),
    )
}

pub fn group_signature(line: &str) -> Option<String> {
    group_re()
        .captures(line.trim())
        .map(|caps| caps[1].to_string())
}

pub fn is_data_structures_signature(line: &str) -> bool {
    data_structures_re().is_match(line.trim())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSignature {
    pub name: String,
    pub uri_template: String,
    /// Set when the header also declares the resource's single action.
    pub method: Option<String>,
}

pub fn resource_signature(line: &str) -> Option<ResourceSignature> {
    let line = line.trim();
    if let Some(caps) = uri_re().captures(line) {
        return Some(ResourceSignature {
            name: String::new(),
            uri_template: caps[1].to_string(),
            method: None,
        });
    }
    if let Some(caps) = method_uri_re().captures(line) {
        return Some(ResourceSignature {
            name: String::new(),
            uri_template: caps[2].to_string(),
            method: Some(caps[1].to_string()),
        });
    }
    if let Some(caps) = named_method_uri_re().captures(line) {
        return Some(ResourceSignature {
            name: caps[1].trim().to_string(),
            uri_template: caps[3].to_string(),
            method: Some(caps[2].to_string()),
        });
    }
    named_uri_re()
        .captures(line)
        .map(|caps| ResourceSignature {
            name: caps[1].trim().to_string(),
            uri_template: caps[2].to_string(),
            method: None,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSignature {
    pub name: String,
    pub method: String,
}

/// Matches action headers, including the resource forms that carry a method.
pub fn action_signature(line: &str) -> Option<ActionSignature> {
    let line = line.trim();
    if let Some(caps) = method_re().captures(line) {
        return Some(ActionSignature {
            name: String::new(),
            method: caps[1].to_string(),
        });
    }
    if let Some(caps) = named_method_re().captures(line) {
        return Some(ActionSignature {
            name: caps[1].trim().to_string(),
            method: caps[2].to_string(),
        });
    }
    match resource_signature(line) {
        Some(ResourceSignature {
            name,
            method: Some(method),
            ..
        }) => Some(ActionSignature { name, method }),
        _ => None,
    }
}

pub fn metadata_line(line: &str) -> Option<KeyValue> {
    metadata_re()
        .captures(line)
        .map(|caps| KeyValue::new(&caps[1], &caps[2]))
}

pub fn header_line(line: &str) -> Option<KeyValue> {
    header_line_re()
        .captures(line)
        .map(|caps| KeyValue::new(&caps[1], &caps[2]))
}

/// The model name of a `[Name][]` reference paragraph.
pub fn reference_signature(text: &str) -> Option<String> {
    reference_re()
        .captures(text.trim())
        .map(|caps| caps[1].trim().to_string())
}

pub fn is_valid_parameter_name(name: &str) -> bool {
    parameter_name_re().is_match(name)
}

/// A member-style signature:
/// `identifier[: value, value] [(attribute, attribute)] [- content]`.
///
/// Backtick-escaped text is taken literally; the escaping backticks are
/// removed from the identifier and values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberSignature {
    pub identifier: String,
    /// The identifier as written, escapes included.
    pub raw_identifier: String,
    pub values: Vec<String>,
    pub attributes: Vec<String>,
    pub content: String,
    /// Lines after the first, untouched.
    pub remaining: String,
}

pub fn member_signature(text: &str) -> MemberSignature {
    let (line, remaining) = crate::markdown::first_line(text);
    let (head, content) = match content_delimiter(line) {
        Some(pos) => (&line[..pos], line[pos + 1..].trim()),
        None => (line, ""),
    };
    let mut head = head.trim();

    let mut attributes = Vec::new();
    if let Some(open) = trailing_parentheses(head) {
        attributes = split_outside(&head[open + 1..head.len() - 1], ',');
        head = head[..open].trim();
    }

    let (identifier, values) = match find_outside(head, ':') {
        Some(pos) => (
            head[..pos].trim(),
            split_outside(&head[pos + 1..], ',')
                .into_iter()
                .map(|value| unescape(&value))
                .collect(),
        ),
        None => (head, Vec::new()),
    };

    MemberSignature {
        identifier: unescape(identifier),
        raw_identifier: identifier.to_string(),
        values,
        attributes,
        content: content.to_string(),
        remaining: remaining.to_string(),
    }
}

/// Removes one pair of surrounding backticks.
pub fn unescape(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix('`')
        .and_then(|t| t.strip_suffix('`'))
        .unwrap_or(text)
        .to_string()
}

/// Splits on `separator` outside backticks, parentheses and brackets.
/// Pieces are trimmed; empty pieces are dropped.
pub fn split_outside(text: &str, separator: char) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut scanner = Scanner::default();
    for (idx, c) in text.char_indices() {
        if c == separator && scanner.is_outside() {
            pieces.push(text[start..idx].trim().to_string());
            start = idx + c.len_utf8();
        } else {
            scanner.feed(c);
        }
    }
    pieces.push(text[start..].trim().to_string());
    pieces.retain(|piece| !piece.is_empty());
    pieces
}

fn find_outside(text: &str, needle: char) -> Option<usize> {
    let mut scanner = Scanner::default();
    for (idx, c) in text.char_indices() {
        if c == needle && scanner.is_outside() {
            return Some(idx);
        }
        scanner.feed(c);
    }
    None
}

/// Byte offset of the `-` that opens a member's inline description: the
/// first dash outside escapes and parentheses with whitespace (or the line
/// start) before it and whitespace (or the line end) after it.
fn content_delimiter(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut scanner = Scanner::default();
    for (idx, c) in line.char_indices() {
        if c == '-' && scanner.is_outside() {
            let before = idx == 0 || bytes[idx - 1].is_ascii_whitespace();
            let after = idx + 1 == bytes.len() || bytes[idx + 1].is_ascii_whitespace();
            if before && after {
                return Some(idx);
            }
        }
        scanner.feed(c);
    }
    None
}

/// Offset of the `(` matching a `)` that ends `text`, outside backticks.
fn trailing_parentheses(text: &str) -> Option<usize> {
    if !text.ends_with(')') {
        return None;
    }
    let mut scanner = Scanner::default();
    let mut open = None;
    for (idx, c) in text.char_indices() {
        if c == '(' && scanner.is_outside() {
            open = Some(idx);
        }
        scanner.feed(c);
    }
    // Parentheses must close exactly at the end.
    let open = open?;
    let mut depth = 0i32;
    for (idx, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return (open + idx == text.len() - 1).then_some(open);
                }
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Default)]
struct Scanner {
    in_backticks: bool,
    depth: usize,
}

impl Scanner {
    fn is_outside(&self) -> bool {
        !self.in_backticks && self.depth == 0
    }

    fn feed(&mut self, c: char) {
        match c {
            '`' => self.in_backticks = !self.in_backticks,
            '(' | '[' if !self.in_backticks => self.depth += 1,
            ')' | ']' if !self.in_backticks => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

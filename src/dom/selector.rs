//! CSS selector subset used to discover collection containers
//!
//! Supported: type and universal selectors, `#id`, `.class`, attribute
//! conditions (`[a]`, `[a=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`), descendant and
//! child combinators, and comma-separated groups.

use std::str::FromStr;

use super::{Document, NodeId, SelectorError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SelectorStep {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectorPart {
    step: SelectorStep,
    // Relation to previous (left) selector part.
    combinator: Option<Combinator>,
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    groups: Vec<Vec<SelectorPart>>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(SelectorError::Empty);
        }

        let groups = split_groups(source)?
            .iter()
            .map(|group| parse_chain(source, group))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: source.to_string(),
            groups,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the node matches any group of the selector
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.groups
            .iter()
            .any(|chain| matches_chain(doc, node, chain))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn unsupported(selector: &str, reason: impl Into<String>) -> SelectorError {
    SelectorError::Unsupported {
        selector: selector.to_string(),
        reason: reason.into(),
    }
}

fn matches_chain(doc: &Document, node: NodeId, parts: &[SelectorPart]) -> bool {
    let Some((last, rest)) = parts.split_last() else {
        return false;
    };
    if !matches_step(doc, node, &last.step) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    match last.combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|parent| matches_chain(doc, parent, rest)),
        // Every ancestor is a candidate: the nearest match may fail further left
        Combinator::Descendant => {
            let mut cursor = doc.parent(node);
            while let Some(ancestor) = cursor {
                if matches_chain(doc, ancestor, rest) {
                    return true;
                }
                cursor = doc.parent(ancestor);
            }
            false
        }
    }
}

fn matches_step(doc: &Document, node: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = doc.element(node) else {
        return false;
    };

    if let Some(tag) = &step.tag {
        if !element.tag_name().eq_ignore_ascii_case(tag) {
            return false;
        }
    }

    if let Some(id) = &step.id {
        if element.attr("id") != Some(id.as_str()) {
            return false;
        }
    }

    if step.classes.iter().any(|c| !element.has_class(c)) {
        return false;
    }

    step.attrs.iter().all(|cond| match cond {
        AttrCondition::Exists { key } => element.has_attr(key),
        AttrCondition::Eq { key, value } => element.attr(key) == Some(value.as_str()),
        AttrCondition::StartsWith { key, value } => element
            .attr(key)
            .map(|v| v.starts_with(value.as_str()))
            .unwrap_or(false),
        AttrCondition::EndsWith { key, value } => element
            .attr(key)
            .map(|v| v.ends_with(value.as_str()))
            .unwrap_or(false),
        AttrCondition::Contains { key, value } => element
            .attr(key)
            .map(|v| v.contains(value.as_str()))
            .unwrap_or(false),
    })
}

/// Split on commas that are not inside brackets or quotes
fn split_groups(selector: &str) -> Result<Vec<String>, SelectorError> {
    let mut groups = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    groups.push(current);

    if groups.iter().any(|g| g.trim().is_empty()) {
        return Err(unsupported(selector, "empty selector group"));
    }
    Ok(groups)
}

fn tokenize(group: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in group.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            current.push(ch);
            continue;
        }
        match ch {
            '"' | '\'' if depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                depth += 1;
                current.push(ch);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            '>' if depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn parse_chain(selector: &str, group: &str) -> Result<Vec<SelectorPart>, SelectorError> {
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(group) {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(unsupported(selector, "dangling '>' combinator"));
            }
            pending = Some(Combinator::Child);
            continue;
        }

        let step = parse_step(selector, &token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(SelectorPart { step, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(unsupported(selector, "incomplete selector"));
    }
    Ok(parts)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(src: &str) -> (&str, &str) {
    let end = src.find(|c: char| !is_ident_char(c)).unwrap_or(src.len());
    src.split_at(end)
}

fn parse_step(selector: &str, token: &str) -> Result<SelectorStep, SelectorError> {
    let mut step = SelectorStep::default();
    let mut rest = token;

    if let Some(after) = rest.strip_prefix('*') {
        step.universal = true;
        rest = after;
    } else {
        let (tag, after) = take_ident(rest);
        if !tag.is_empty() {
            step.tag = Some(tag.to_ascii_lowercase());
        }
        rest = after;
    }

    while let Some(first) = rest.chars().next() {
        match first {
            '#' | '.' => {
                let (ident, after) = take_ident(&rest[1..]);
                if ident.is_empty() {
                    return Err(unsupported(selector, format!("missing name after '{}'", first)));
                }
                if first == '#' {
                    step.id = Some(ident.to_string());
                } else {
                    step.classes.push(ident.to_string());
                }
                rest = after;
            }
            '[' => {
                let close = find_attr_close(rest)
                    .ok_or_else(|| unsupported(selector, "unterminated attribute selector"))?;
                step.attrs.push(parse_attr_condition(selector, &rest[1..close])?);
                rest = &rest[close + 1..];
            }
            other => {
                return Err(unsupported(selector, format!("unexpected '{}'", other)));
            }
        }
    }

    Ok(step)
}

fn find_attr_close(src: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, ch) in src.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, ']') => return Some(idx),
            _ => {}
        }
    }
    None
}

fn parse_attr_condition(selector: &str, body: &str) -> Result<AttrCondition, SelectorError> {
    let Some(eq) = body.find('=') else {
        let key = body.trim();
        if key.is_empty() || !key.chars().all(is_ident_char) {
            return Err(unsupported(selector, "invalid attribute name"));
        }
        return Ok(AttrCondition::Exists {
            key: key.to_ascii_lowercase(),
        });
    };

    let (lhs, value) = (&body[..eq], body[eq + 1..].trim());
    let (key, op) = match lhs.chars().last() {
        Some(op @ ('^' | '$' | '*')) => (&lhs[..lhs.len() - 1], Some(op)),
        _ => (lhs, None),
    };
    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() || !key.chars().all(is_ident_char) {
        return Err(unsupported(selector, "invalid attribute name"));
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
        .to_string();

    Ok(match op {
        None => AttrCondition::Eq { key, value },
        Some('^') => AttrCondition::StartsWith { key, value },
        Some('$') => AttrCondition::EndsWith { key, value },
        _ => AttrCondition::Contains { key, value },
    })
}

//! Lexer for HTML fragments using logos

use logos::Logos;

use super::ast::{Attribute, Span, StartTag};

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"<![dD][oO][cC][tT][yY][pP][eE][^>]*>", logos::skip)]
    Doctype,

    #[regex(r"<!--([^-]|-[^-])*-->", |lex| {
        let s = lex.slice();
        s[4..s.len() - 3].to_string()
    })]
    Comment(String),

    // Quoted attribute values may contain '>'
    #[regex(r#"<[a-zA-Z][a-zA-Z0-9-]*([^>"']|"[^"]*"|'[^']*')*>"#, |lex| parse_start_tag(lex.slice()))]
    StartTag(StartTag),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| end_tag_name(lex.slice()))]
    EndTag(String),

    // A '<' that does not open a tag is plain text
    #[regex(r"[^<]+", |lex| decode_entities(lex.slice()))]
    #[token("<", |_| "<".to_string())]
    Text(String),
}

/// Lex input string into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

fn end_tag_name(raw: &str) -> String {
    raw[2..raw.len() - 1].trim_end().to_ascii_lowercase()
}

fn parse_start_tag(raw: &str) -> Option<StartTag> {
    let inner = raw.strip_prefix('<')?.strip_suffix('>')?;
    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(rest) => (rest, true),
        None => (inner, false),
    };

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '/')
        .unwrap_or(inner.len());

    Some(StartTag {
        name: inner[..name_end].to_ascii_lowercase(),
        attributes: parse_attributes(&inner[name_end..]),
        self_closing,
    })
}

fn parse_attributes(src: &str) -> Vec<Attribute> {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut pos = 0;

    let skip_ws = |mut p: usize| {
        while p < len && bytes[p].is_ascii_whitespace() {
            p += 1;
        }
        p
    };

    while pos < len {
        while pos < len && (bytes[pos].is_ascii_whitespace() || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= len {
            break;
        }

        let start = pos;
        while pos < len && !bytes[pos].is_ascii_whitespace() && !matches!(bytes[pos], b'=' | b'/')
        {
            pos += 1;
        }
        if pos == start {
            // Stray '=' without a name
            pos += 1;
            continue;
        }
        let name = src[start..pos].to_ascii_lowercase();

        let after_name = skip_ws(pos);
        let value = if after_name < len && bytes[after_name] == b'=' {
            pos = skip_ws(after_name + 1);
            match bytes.get(pos) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let value_start = pos + 1;
                    let value_end = src[value_start..]
                        .find(quote as char)
                        .map(|offset| value_start + offset)
                        .unwrap_or(len);
                    pos = (value_end + 1).min(len);
                    &src[value_start..value_end]
                }
                _ => {
                    let value_start = pos;
                    while pos < len && !bytes[pos].is_ascii_whitespace() {
                        pos += 1;
                    }
                    &src[value_start..pos]
                }
            }
        } else {
            ""
        };

        if !attributes.iter().any(|a| a.name == name) {
            attributes.push(Attribute::new(name, decode_entities(value)));
        }
    }

    attributes
}

/// Replace character references with the characters they stand for
///
/// Unknown or unterminated references are kept verbatim.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|end| *end <= 10)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_start_and_end_tags() {
        let toks = tokens("<div>x</div>");
        assert_eq!(toks.len(), 3);
        assert!(matches!(&toks[0], Token::StartTag(tag) if tag.name == "div"));
        assert_eq!(toks[1], Token::Text("x".to_string()));
        assert_eq!(toks[2], Token::EndTag("div".to_string()));
    }

    #[test]
    fn test_attributes() {
        let toks = tokens(r#"<input type="text" name='a[b]' required data-x=1>"#);
        let Token::StartTag(tag) = &toks[0] else {
            panic!("expected start tag");
        };
        assert_eq!(tag.name, "input");
        assert_eq!(
            tag.attributes,
            vec![
                Attribute::new("type", "text"),
                Attribute::new("name", "a[b]"),
                Attribute::new("required", ""),
                Attribute::new("data-x", "1"),
            ]
        );
    }

    #[test]
    fn test_quoted_value_may_contain_gt() {
        let toks = tokens(r#"<div title="a > b">"#);
        assert_eq!(toks.len(), 1);
        let Token::StartTag(tag) = &toks[0] else {
            panic!("expected start tag");
        };
        assert_eq!(tag.attributes[0].value, "a > b");
    }

    #[test]
    fn test_self_closing() {
        let toks = tokens("<br/><span />");
        let flags: Vec<_> = toks
            .iter()
            .map(|t| match t {
                Token::StartTag(tag) => tag.self_closing,
                _ => false,
            })
            .collect();
        assert_eq!(flags, vec![true, true]);
    }

    #[test]
    fn test_entities_in_attribute_are_decoded() {
        let toks = tokens(r#"<div data-prototype="&lt;p&gt;__name__&lt;/p&gt;">"#);
        let Token::StartTag(tag) = &toks[0] else {
            panic!("expected start tag");
        };
        assert_eq!(tag.attributes[0].value, "<p>__name__</p>");
    }

    #[test]
    fn test_comments_and_doctype() {
        let toks = tokens("<!DOCTYPE html><!-- note -->");
        assert_eq!(toks, vec![Token::Comment(" note ".to_string())]);
    }

    #[test]
    fn test_stray_lt_is_text() {
        let toks = tokens("a < b");
        assert_eq!(
            toks,
            vec![
                Token::Text("a ".to_string()),
                Token::Text("<".to_string()),
                Token::Text(" b".to_string()),
            ]
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &amp; b"), "a & b");
        assert_eq!(decode_entities("&#65;&#x42;"), "AB");
        assert_eq!(decode_entities("&unknown; &"), "&unknown; &");
    }
}

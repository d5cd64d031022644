//! HTML to text reduction

/// Elements whose raw content runs until the matching close tag
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "title", "iframe", "noscript", "xmp"];

/// Elements whose whole subtree is not visible body text
const SKIP_TAGS: &[&str] = &["head", "template", "svg"];

/// Reduce an HTML document to its visible body text
///
/// Text inside `head`, `script`, `style` and friends is dropped, comments are
/// removed and entities decoded. Whitespace between and inside elements is
/// kept as-is; only the ends of the result are trimmed. No structure, links
/// or attributes survive.
pub fn html_to_text(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets aligned with `html`
    let lower = html.to_ascii_lowercase();
    let mut output = String::new();
    let mut skip_elements: Vec<&str> = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        let rest = &html[pos..];
        let Some(lt) = rest.find('<') else {
            if skip_elements.is_empty() {
                output.push_str(&decode_entities(rest));
            }
            break;
        };

        if skip_elements.is_empty() {
            output.push_str(&decode_entities(&rest[..lt]));
        }
        pos += lt;

        // Comments may contain '>' so they are matched on their terminator
        if html[pos..].starts_with("<!--") {
            pos = match html[pos + 4..].find("-->") {
                Some(end) => pos + 4 + end + 3,
                None => html.len(),
            };
            continue;
        }

        // A '<' not followed by a tag start is literal text
        let starts_tag = html[pos + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));
        if !starts_tag {
            if skip_elements.is_empty() {
                output.push('<');
            }
            pos += 1;
            continue;
        }

        let (tag_end, next) = match html[pos..].find('>') {
            Some(end) => (pos + end, pos + end + 1),
            None => (html.len(), html.len()),
        };
        let tag = &lower[pos + 1..tag_end];
        pos = next;

        let is_closing = tag.starts_with('/');
        let is_self_closing = tag.ends_with('/');
        let tag_name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");

        if let Some(raw) = RAW_TEXT_TAGS.iter().find(|t| **t == tag_name) {
            if !is_closing && !is_self_closing {
                pos = skip_raw_text(&lower, pos, raw);
            }
            continue;
        }

        // `</head>` may be omitted; a body start tag closes head implicitly
        if tag_name == "body" && !is_closing {
            if let Some(idx) = skip_elements.iter().position(|t| *t == "head") {
                skip_elements.truncate(idx);
            }
            continue;
        }

        if let Some(skip) = SKIP_TAGS.iter().find(|t| **t == tag_name) {
            if is_closing {
                if let Some(idx) = skip_elements.iter().rposition(|t| t == skip) {
                    skip_elements.truncate(idx);
                }
            } else if !is_self_closing {
                skip_elements.push(*skip);
            }
        }
    }

    output.trim_matches(is_js_whitespace).to_string()
}

/// Return the position just past the close tag of a raw text element
fn skip_raw_text(lower: &str, from: usize, tag_name: &str) -> usize {
    let closing = format!("</{}", tag_name);
    match lower[from..].find(&closing) {
        Some(start) => {
            let close_start = from + start;
            match lower[close_start..].find('>') {
                Some(end) => close_start + end + 1,
                None => lower.len(),
            }
        }
        None => lower.len(),
    }
}

/// Whitespace as recognised by JavaScript's `trim` and `\s`
///
/// Unicode `White_Space` minus NEL (U+0085), plus the byte order mark.
pub(crate) fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Decode HTML entities in a text run
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            output.push(c);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if next.is_whitespace() || next == '&' || entity.len() > 10 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        match decode_entity(&entity).filter(|_| terminated) {
            Some(decoded) => output.push(decoded),
            None => {
                // Unknown entity - keep original text
                output.push('&');
                output.push_str(&entity);
                if terminated {
                    output.push(';');
                }
            }
        }
    }

    output
}

/// Decode a single entity name (without `&` and `;`)
fn decode_entity(entity: &str) -> Option<char> {
    let decoded = match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "mdash" => '—',
        "ndash" => '–',
        "hellip" => '…',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "euro" => '€',
        "pound" => '£',
        _ => {
            let num_str = entity.strip_prefix('#')?;
            let code = match num_str.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num_str.parse::<u32>().ok()?,
            };
            return char::from_u32(code);
        }
    };
    Some(decoded)
}

//! Namespace-agnostic XML extraction for ONVIF responses
//!
//! ONVIF devices disagree on namespace prefixes (`tt:`, `tds:`, `ns2:`, none),
//! so elements are matched on their local name only. This is a scanner, not
//! a parser: it handles the flat, well-formed responses devices return for
//! the handful of calls used here.

/// A start, end or empty-element tag
#[derive(Debug, Clone, Copy)]
struct Tag<'a> {
    local: &'a str,
    attrs: &'a str,
    /// Byte offset of `<`
    start: usize,
    /// Byte offset just past `>`
    end: usize,
    closing: bool,
    self_closing: bool,
}

struct Tags<'a> {
    xml: &'a str,
    pos: usize,
}

fn tags(xml: &str) -> Tags<'_> {
    Tags { xml, pos: 0 }
}

impl<'a> Iterator for Tags<'a> {
    type Item = Tag<'a>;

    fn next(&mut self) -> Option<Tag<'a>> {
        loop {
            let start = self.pos + self.xml.get(self.pos..)?.find('<')?;
            let end = start + self.xml[start..].find('>')? + 1;
            self.pos = end;

            let inner = &self.xml[start + 1..end - 1];
            if inner.starts_with('?') || inner.starts_with('!') {
                continue;
            }

            let (closing, inner) = match inner.strip_prefix('/') {
                Some(rest) => (true, rest),
                None => (false, inner),
            };
            let (self_closing, inner) = match inner.strip_suffix('/') {
                Some(rest) => (true, rest),
                None => (false, inner),
            };

            let name_end = inner.find(char::is_whitespace).unwrap_or(inner.len());
            let name = &inner[..name_end];
            return Some(Tag {
                local: local_name(name),
                attrs: &inner[name_end..],
                start,
                end,
                closing,
                self_closing,
            });
        }
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Find the first opening tag with `local` and the end tag that closes it
fn find_element<'a>(xml: &'a str, local: &str) -> Option<(Tag<'a>, Option<Tag<'a>>)> {
    let mut iter = tags(xml);
    let open = iter.by_ref().find(|t| !t.closing && t.local == local)?;
    if open.self_closing {
        return Some((open, None));
    }

    let mut depth = 0usize;
    for tag in iter {
        if tag.local != local || tag.self_closing {
            continue;
        }
        if !tag.closing {
            depth += 1;
        } else if depth == 0 {
            return Some((open, Some(tag)));
        } else {
            depth -= 1;
        }
    }
    None
}

/// Text content of the first element named `local`
///
/// Returns an empty string for an empty element.
pub fn element_text(xml: &str, local: &str) -> Option<String> {
    let (open, close) = find_element(xml, local)?;
    match close {
        None => Some(String::new()),
        Some(close) => Some(unescape(xml[open.end..close.start].trim())),
    }
}

/// The first element named `local`, including its tags
pub fn section<'a>(xml: &'a str, local: &str) -> Option<&'a str> {
    let (open, close) = find_element(xml, local)?;
    let end = close.map_or(open.end, |c| c.end);
    Some(&xml[open.start..end])
}

/// Value of `attr` on every element named `local`, in document order
pub fn attribute_values(xml: &str, local: &str, attr: &str) -> Vec<String> {
    tags(xml)
        .filter(|t| !t.closing && t.local == local)
        .filter_map(|t| attribute(t.attrs, attr))
        .collect()
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    loop {
        rest = rest.trim_start();
        let eq = rest.find('=')?;
        let key = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start();
        let quote = after.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value_end = after[1..].find(quote)?;
        let value = &after[1..1 + value_end];

        if local_name(key) == name {
            return Some(unescape(value));
        }
        rest = &after[value_end + 2..];
    }
}

/// XAddr of a capability section in a GetCapabilities response
pub fn capability_xaddr(xml: &str, capability: &str) -> Option<String> {
    let caps = section(xml, "Capabilities").unwrap_or(xml);
    let block = section(caps, capability)?;
    element_text(block, "XAddr").filter(|addr| !addr.is_empty())
}

/// A SOAP fault found in a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Most specific fault code, e.g. `ter:NotAuthorized`
    pub code: Option<String>,
    pub reason: String,
}

impl Fault {
    pub fn is_not_authorized(&self) -> bool {
        self.code.as_deref().is_some_and(|c| c.ends_with("NotAuthorized"))
            || self.reason.contains("NotAuthorized")
    }
}

/// Extract a SOAP 1.1 or 1.2 fault, if the body carries one
pub fn fault(xml: &str) -> Option<Fault> {
    let body = section(xml, "Fault")?;

    // SOAP 1.2 nests Subcode/Value; the innermost is the most specific
    let code = tags(body)
        .filter(|t| !t.closing && !t.self_closing && t.local == "Value")
        .filter_map(|t| {
            let close = body[t.end..].find("</")?;
            Some(body[t.end..t.end + close].trim().to_string())
        })
        .last()
        .or_else(|| element_text(body, "faultcode"));

    let reason = element_text(body, "Text")
        .or_else(|| element_text(body, "faultstring"))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "SOAP fault".to_string());

    Some(Fault { code, reason })
}

/// Escape text for use in element content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

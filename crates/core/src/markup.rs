//! Markup rendering: author-entered content source to sanitized HTML.
//!
//! `content_rendered` is always a pure function of `content_source`,
//! recomputed on every write. The renderer escapes all raw HTML first and
//! then applies a small markdown subset (headings, lists, fenced code,
//! inline code, emphasis, absolute http/https links), so no author-supplied
//! markup can reach the output unescaped.

/// Render content source into sanitized HTML.
///
/// Deterministic and side-effect free; the same source always produces the
/// same output.
pub fn render_markup(source: &str) -> String {
    let mut out = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut list_items: Vec<String> = Vec::new();
    let mut in_code_block = false;

    for line in source.lines() {
        let trimmed = line.trim_end();

        if trimmed.trim_start().starts_with("```") {
            flush_paragraph(&mut out, &mut paragraph);
            flush_list(&mut out, &mut list_items);
            if in_code_block {
                out.push_str("</code></pre>\n");
            } else {
                out.push_str("<pre><code>");
            }
            in_code_block = !in_code_block;
            continue;
        }

        if in_code_block {
            out.push_str(&escape_html(line));
            out.push('\n');
            continue;
        }

        if trimmed.is_empty() {
            flush_paragraph(&mut out, &mut paragraph);
            flush_list(&mut out, &mut list_items);
            continue;
        }

        if let Some((level, rest)) = parse_heading(trimmed) {
            flush_paragraph(&mut out, &mut paragraph);
            flush_list(&mut out, &mut list_items);
            let body = render_inline(&escape_html(rest));
            out.push_str(&format!("<h{level}>{body}</h{level}>\n"));
            continue;
        }

        if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            flush_paragraph(&mut out, &mut paragraph);
            list_items.push(render_inline(&escape_html(item)));
            continue;
        }

        flush_list(&mut out, &mut list_items);
        paragraph.push(render_inline(&escape_html(trimmed)));
    }

    // An unterminated fence is closed rather than swallowing the rest.
    if in_code_block {
        out.push_str("</code></pre>\n");
    }
    flush_paragraph(&mut out, &mut paragraph);
    flush_list(&mut out, &mut list_items);

    out
}

fn flush_paragraph(out: &mut String, paragraph: &mut Vec<String>) {
    if !paragraph.is_empty() {
        out.push_str("<p>");
        out.push_str(&paragraph.join(" "));
        out.push_str("</p>\n");
        paragraph.clear();
    }
}

fn flush_list(out: &mut String, items: &mut Vec<String>) {
    if items.is_empty() {
        return;
    }
    out.push_str("<ul>\n");
    for item in items.iter() {
        out.push_str("<li>");
        out.push_str(item);
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");
    items.clear();
}

/// Parse an ATX heading: 1-6 `#` characters followed by a space.
fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) {
        line[hashes..].strip_prefix(' ').map(|rest| (hashes, rest))
    } else {
        None
    }
}

/// Escape the five HTML-significant characters.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render inline markup on already-escaped text.
///
/// Code spans are handled first so emphasis and link markers inside them
/// stay literal. A dangling backtick is emitted as-is.
fn render_inline(escaped: &str) -> String {
    let parts: Vec<&str> = escaped.split('`').collect();
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i % 2 == 1 && i < parts.len() - 1 {
            out.push_str("<code>");
            out.push_str(part);
            out.push_str("</code>");
        } else {
            if i % 2 == 1 {
                out.push('`');
            }
            out.push_str(&render_emphasis(&render_links(part)));
        }
    }
    out
}

/// Replace `[label](url)` spans with anchors for absolute http/https URLs.
///
/// Anything else (relative paths, other schemes) is left as literal text.
fn render_links(text: &str) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < text.len() {
        if text.as_bytes()[i] == b'[' {
            if let Some((label, url, end)) = parse_link(text, i) {
                if url.starts_with("http://") || url.starts_with("https://") {
                    out.push_str(&format!("<a href=\"{url}\">{label}</a>"));
                    i = end;
                    continue;
                }
            }
        }
        let c = text[i..].chars().next().expect("in-bounds char");
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// Parse a `[label](url)` span starting at `start`; returns the label, the
/// url, and the byte index just past the closing parenthesis.
fn parse_link(text: &str, start: usize) -> Option<(&str, &str, usize)> {
    let rest = &text[start + 1..];
    let close = rest.find(']')?;
    let after = &rest[close + 1..];
    if !after.starts_with('(') {
        return None;
    }
    let url_end = after.find(')')?;
    let label = &rest[..close];
    let url = &after[1..url_end];
    Some((label, url, start + 1 + close + 1 + url_end + 1))
}

/// Apply `**strong**` then `*em*` pair replacement.
fn render_emphasis(text: &str) -> String {
    let strong = replace_pairs(text, "**", "<strong>", "</strong>");
    replace_pairs(&strong, "*", "<em>", "</em>")
}

/// Replace delimiter pairs with open/close tags; unpaired or empty-span
/// delimiters are emitted literally.
fn replace_pairs(text: &str, delim: &str, open: &str, close: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    loop {
        let Some(a) = rest.find(delim) else {
            out.push_str(rest);
            break;
        };
        let after = &rest[a + delim.len()..];
        match after.find(delim) {
            Some(b) if b > 0 => {
                out.push_str(&rest[..a]);
                out.push_str(open);
                out.push_str(&after[..b]);
                out.push_str(close);
                rest = &after[b + delim.len()..];
            }
            _ => {
                out.push_str(&rest[..a + delim.len()]);
                rest = after;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_paragraph() {
        assert_eq!(render_markup("Hello world"), "<p>Hello world</p>\n");
    }

    #[test]
    fn adjacent_lines_join_into_one_paragraph() {
        assert_eq!(
            render_markup("line one\nline two"),
            "<p>line one line two</p>\n"
        );
    }

    #[test]
    fn blank_line_splits_paragraphs() {
        assert_eq!(
            render_markup("first\n\nsecond"),
            "<p>first</p>\n<p>second</p>\n"
        );
    }

    #[test]
    fn heading_levels() {
        assert_eq!(render_markup("# Title"), "<h1>Title</h1>\n");
        assert_eq!(render_markup("### Sub"), "<h3>Sub</h3>\n");
        // Seven hashes is not a heading.
        assert_eq!(
            render_markup("####### nope"),
            "<p>####### nope</p>\n"
        );
    }

    #[test]
    fn unordered_list() {
        assert_eq!(
            render_markup("- one\n- two"),
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n"
        );
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markup("<script>alert('x')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn strong_and_em() {
        assert_eq!(
            render_markup("a **b** *c*"),
            "<p>a <strong>b</strong> <em>c</em></p>\n"
        );
    }

    #[test]
    fn unpaired_emphasis_is_literal() {
        assert_eq!(render_markup("2 * 3"), "<p>2 * 3</p>\n");
    }

    #[test]
    fn inline_code_suppresses_emphasis() {
        assert_eq!(
            render_markup("use `*ptr*` here"),
            "<p>use <code>*ptr*</code> here</p>\n"
        );
    }

    #[test]
    fn dangling_backtick_is_literal() {
        assert_eq!(render_markup("a ` b"), "<p>a ` b</p>\n");
    }

    #[test]
    fn fenced_code_block_is_escaped_verbatim() {
        assert_eq!(
            render_markup("```\nlet x = 1 < 2;\n```"),
            "<pre><code>let x = 1 &lt; 2;\n</code></pre>\n"
        );
    }

    #[test]
    fn unterminated_fence_is_closed() {
        let html = render_markup("```\ncode");
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn https_link_rendered() {
        assert_eq!(
            render_markup("[docs](https://example.com)"),
            "<p><a href=\"https://example.com\">docs</a></p>\n"
        );
    }

    #[test]
    fn javascript_scheme_not_linked() {
        let html = render_markup("[x](javascript:alert(1))");
        assert!(!html.contains("<a "));
    }

    #[test]
    fn quotes_in_url_cannot_break_out_of_attribute() {
        let html = render_markup("[x](https://e.com/\"onmouseover=\"1)");
        assert!(!html.contains("\"onmouseover"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let source = "# T\n\npara **b** [l](https://e.com)\n\n- i\n";
        assert_eq!(render_markup(source), render_markup(source));
    }
}

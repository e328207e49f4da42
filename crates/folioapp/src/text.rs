//! Text helpers: slugs, plain-text extraction and reading time.

use pulldown_cmark::{Event, Options, Parser, TagEnd};

/// Lowercase ASCII slug with single hyphens between words.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_hyphen = true;

    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Returns `base` or the first of `base-2`, `base-3`... not rejected by `taken`.
pub fn unique_slug(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{}-{}", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Renders markdown to whitespace-normalised plain text.
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    for event in Parser::new_ext(markdown, Options::all()) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak | Event::Rule => out.push(' '),
            Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock)
            | Event::End(TagEnd::TableCell) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn word_count(markdown: &str) -> usize {
    plain_text(markdown).split_whitespace().count()
}

/// Minutes needed to read `markdown` at `words_per_minute`, rounded up.
/// Empty content takes 0 minutes, anything else at least 1.
pub fn reading_time(markdown: &str, words_per_minute: u32) -> u32 {
    let words = word_count(markdown);
    if words == 0 {
        return 0;
    }
    let wpm = words_per_minute.max(1) as usize;
    u32::try_from(words.div_ceil(wpm)).unwrap_or(u32::MAX)
}

/// First `max_chars` characters of the plain text, cut at a word boundary when
/// possible and marked with an ellipsis if shortened.
pub fn excerpt(markdown: &str, max_chars: usize) -> String {
    let text = plain_text(markdown);
    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(pos) if pos > max_chars / 2 => &cut[..pos],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end())
}

//! Markdown to HTML rendering for article bodies.
//!
//! One fixed dialect, no configuration: CommonMark plus tables,
//! strikethrough, task lists, definition lists, smart punctuation and
//! `{#id}` heading attributes. Rendering is a pure function of its input.
//!
//! On top of the stock pulldown-cmark HTML writer:
//!
//! - every heading gets an `id`, generated from its text unless one was
//!   given explicitly; repeats get `-1`, `-2`, ... suffixes
//! - every link opens in a new tab (`target="_blank"`), and bare `http(s)://`
//!   URLs in prose become links too
//! - raw HTML in the source is escaped and shows up as text, so the output
//!   never carries authored `<script>` or event-handler markup

use crate::types::SafeMarkup;
use linkify::{LinkFinder, LinkKind};
use pulldown_cmark::{
    CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html as md_html,
};
use pulldown_cmark_escape::escape_href;
use std::collections::HashSet;

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_DEFINITION_LIST
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Render markdown text to safe markup.
pub fn render(markdown: &str) -> SafeMarkup {
    let parser = TextMergeStream::new(Parser::new_ext(markdown, options()));
    let mut events = rewrite_events(parser);
    assign_heading_ids(&mut events);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    SafeMarkup::from_rendered(html)
}

/// Render raw file bytes. Invalid UTF-8 sequences become U+FFFD.
pub fn render_bytes(markdown: &[u8]) -> SafeMarkup {
    render(&String::from_utf8_lossy(markdown))
}

fn rewrite_events<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut finder = LinkFinder::new();
    finder.kinds(&[LinkKind::Url]);

    let mut out = Vec::new();
    // Depth of links, images and code blocks; no autolinking inside them.
    let mut opaque = 0usize;
    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => opaque += 1,
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque = opaque.saturating_sub(1)
            }
            _ => {}
        }
        match event {
            Event::Text(text) if opaque == 0 => push_autolinked(&finder, text, &mut out),
            other => out.push(rewrite_event(other)),
        }
    }
    out
}

/// Split a text run around bare URLs, wrapping each one in a link.
fn push_autolinked<'a>(finder: &LinkFinder, text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
    if finder.links(&text).next().is_none() {
        out.push(Event::Text(text));
        return;
    }
    for span in finder.spans(&text) {
        let piece = CowStr::from(span.as_str().to_string());
        match span.kind() {
            Some(LinkKind::Url) => {
                let open = link_open_tag(LinkType::Autolink, span.as_str(), "");
                out.push(Event::InlineHtml(open.into()));
                out.push(Event::Text(piece));
                out.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
            }
            _ => out.push(Event::Text(piece)),
        }
    }
}

fn rewrite_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            ..
        }) => Event::InlineHtml(link_open_tag(link_type, &dest_url, &title).into()),
        Event::End(TagEnd::Link) => Event::InlineHtml(CowStr::Borrowed("</a>")),
        other => other,
    }
}

fn link_open_tag(link_type: LinkType, dest: &str, title: &str) -> String {
    let href = if link_type == LinkType::Email {
        format!("mailto:{dest}")
    } else {
        dest.to_string()
    };
    let mut tag = String::from("<a href=\"");
    // Writing into a String cannot fail.
    let _ = escape_href(&mut tag, &href);
    tag.push('"');
    if !title.is_empty() {
        tag.push_str(&format!(" title=\"{}\"", escape_attr(title)));
    }
    tag.push_str(" target=\"_blank\" rel=\"noopener noreferrer\">");
    tag
}

fn escape_attr(value: &str) -> String {
    maud::html! { (value) }.into_string()
}

fn assign_heading_ids(events: &mut [Event<'_>]) {
    let mut ids = HeadingIds::default();
    // Explicit ids win wherever they appear, so reserve them all up front.
    for event in events.iter() {
        if let Event::Start(Tag::Heading { id: Some(id), .. }) = event {
            ids.reserve(id);
        }
    }
    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let anchor = ids.claim(&heading_text(&events[i + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }
}

/// Plain text of a heading, read from the events following its start tag.
fn heading_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

#[derive(Default)]
struct HeadingIds {
    used: HashSet<String>,
}

impl HeadingIds {
    fn reserve(&mut self, id: &str) {
        self.used.insert(id.to_string());
    }

    fn claim(&mut self, text: &str) -> String {
        let mut base = anchor_name(text);
        if base.is_empty() {
            base = "section".to_string();
        }
        let mut candidate = base.clone();
        let mut n = 0;
        while self.used.contains(&candidate) {
            n += 1;
            candidate = format!("{base}-{n}");
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

/// Lower-case letters and digits; any run of other characters becomes one `-`.
fn anchor_name(text: &str) -> String {
    let mut anchor = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !anchor.is_empty() {
                anchor.push('-');
            }
            pending_dash = false;
            anchor.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    anchor
}

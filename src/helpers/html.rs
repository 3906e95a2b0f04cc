//! HTML helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::date::time_tag;
use crate::config::FeedConfig;
use crate::content::{PostId, PostRecord, Storage};
use crate::filter::MonthFilter;
use crate::session::{FeedSession, Renderer};

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Characters kept as-is in an encoded URI component
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a URI component (query value or path segment)
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Share targets of a post as `(name, url)` pairs
pub fn share_links(post: &PostRecord, page_url: &str) -> Vec<(&'static str, String)> {
    let text = encode_component(&post.content);
    vec![
        (
            "Facebook",
            format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                encode_component(page_url)
            ),
        ),
        (
            "Twitter",
            format!("https://twitter.com/intent/tweet?text={}", text),
        ),
        ("WhatsApp", format!("https://wa.me/?text={}", text)),
    ]
}

/// Render one post card
pub fn post_card(post: &PostRecord, page_url: &str) -> String {
    let id = encode_component(&post.id.to_string());
    let mut html = format!(
        r#"<div class="post" id="post-{}">"#,
        html_escape(&post.id.to_string())
    );

    html.push_str(&format!(
        r#"<div class="post-header"><div class="avatar">👤</div><div class="post-meta"><span class="author-name">{}</span>{}</div></div>"#,
        html_escape(&post.author),
        time_tag(&post.timestamp)
    ));
    html.push_str(&format!(
        r#"<div class="post-content">{}</div>"#,
        html_escape(&post.content)
    ));

    html.push_str(r#"<div class="post-actions">"#);

    let (class, label) = if post.favorites {
        ("action-btn favorite active", "<span>🌟</span> Remove from favorites")
    } else {
        ("action-btn favorite", "<span>⭐</span> Favorite")
    };
    html.push_str(&format!(
        r#"<form method="post" action="/posts/{}/favorite"><button class="{}">{}</button></form>"#,
        id, class, label
    ));

    html.push_str(r#"<details class="share"><summary class="action-btn share"><span>🔗</span> Share</summary><div class="share-menu">"#);
    for (name, url) in share_links(post, page_url) {
        html.push_str(&format!(
            r#"<a href="{}" target="_blank" rel="noopener" class="share-option">{}</a>"#,
            html_escape(&url),
            name
        ));
    }
    html.push_str("</div></details>");

    if post.is_local() {
        html.push_str(&format!(
            r#"<form method="post" action="/posts/{}/delete" onsubmit="return confirm('{}')"><input type="hidden" name="confirm" value="yes"><button class="action-btn delete"><span>🗑️</span> Delete</button></form>"#,
            id,
            html_escape(crate::session::DELETE_PROMPT)
        ));
    }

    html.push_str("</div></div>");
    html
}

/// Renderer producing post cards
///
/// Every rendered post goes to the front of its list (feed or favorites),
/// so replaying an oldest-first feed yields newest-first markup.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    page_url: String,
    feed: Vec<(PostId, String)>,
    favorites: Vec<(PostId, String)>,
}

impl HtmlRenderer {
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            ..Default::default()
        }
    }

    /// Feed cards in display order
    pub fn feed_html(&self) -> String {
        self.feed.iter().map(|(_, card)| card.as_str()).collect()
    }

    /// Favorite cards in display order
    pub fn favorites_html(&self) -> String {
        self.favorites.iter().map(|(_, card)| card.as_str()).collect()
    }

    pub fn has_favorites(&self) -> bool {
        !self.favorites.is_empty()
    }
}

impl Renderer for HtmlRenderer {
    fn render_post(&mut self, post: &PostRecord) {
        self.remove_post(&post.id);
        let card = (post.id.clone(), post_card(post, &self.page_url));
        if post.favorites {
            self.favorites.insert(0, card);
        } else {
            self.feed.insert(0, card);
        }
    }

    fn remove_post(&mut self, id: &PostId) {
        self.feed.retain(|(card_id, _)| card_id != id);
        self.favorites.retain(|(card_id, _)| card_id != id);
    }
}

/// History list: `all` followed by every known month
pub fn history_list<S: Storage>(session: &FeedSession<S>) -> String {
    let active = session.active_filter();
    let mut html = r#"<ul class="history-list">"#.to_string();

    let item = |filter: &MonthFilter, label: &str| {
        let class = if filter == active {
            "history-item active"
        } else {
            "history-item"
        };
        format!(
            r#"<li class="{}"><a href="/?month={}">{}</a></li>"#,
            class,
            filter,
            html_escape(label)
        )
    };

    html.push_str(&item(&MonthFilter::All, "All"));
    for (key, label) in session.filter().months() {
        html.push_str(&item(&MonthFilter::Month(key.to_string()), label));
    }

    html.push_str("</ul>");
    html
}

/// Emoji offered by the composer picker
const EMOJIS: [&str; 8] = ["😀", "😂", "😍", "👍", "🎉", "❤️", "🔥", "😢"];

const COMPOSER_SCRIPT: &str = r#"<script>
function updatePostButton() {
  var input = document.getElementById('post-input');
  document.getElementById('post-btn').disabled = input.value.trim() === '';
}
function insertEmoji(button) {
  var input = document.getElementById('post-input');
  var start = input.selectionStart, end = input.selectionEnd;
  input.value = input.value.slice(0, start) + button.textContent + input.value.slice(end);
  input.selectionStart = input.selectionEnd = start + button.textContent.length;
  input.focus();
  updatePostButton();
}
</script>"#;

/// Emoji picker row for the composer
fn emoji_picker() -> String {
    let mut html = r#"<div class="emoji-picker">"#.to_string();
    for emoji in EMOJIS {
        html.push_str(&format!(
            r#"<button type="button" class="emoji-option" onclick="insertEmoji(this)">{}</button>"#,
            emoji
        ));
    }
    html.push_str("</div>");
    html
}

/// Render the full feed page
pub fn feed_page<S: Storage>(session: &FeedSession<S>, config: &FeedConfig) -> String {
    let mut renderer = HtmlRenderer::new(config.url.as_str());
    session.render(&mut renderer);

    let favorites_class = if renderer.has_favorites() {
        "favorites-section"
    } else {
        "favorites-section hidden"
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>.hidden {{ display: none; }}</style>
</head>
<body>
<h1>{title}</h1>
<form class="composer" method="post" action="/posts">
<textarea id="post-input" name="content" placeholder="What's on your mind?" required oninput="updatePostButton()"></textarea>
{emoji_picker}
<button id="post-btn" disabled>Post</button>
</form>
<nav class="history">{history}</nav>
<section id="favorites-section" class="{favorites_class}">
<h2>Favorites</h2>
<div id="favorites-feed">{favorites}</div>
</section>
<div id="feed">{feed}</div>
{script}
</body>
</html>
"#,
        title = html_escape(&config.title),
        history = history_list(session),
        favorites_class = favorites_class,
        favorites = renderer.favorites_html(),
        feed = renderer.feed_html(),
        emoji_picker = emoji_picker(),
        script = COMPOSER_SCRIPT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{LocalPostStore, MemoryStorage};
    use chrono::{TimeZone, Utc};

    fn post(id: i64, content: &str, day: u32) -> PostRecord {
        let date = Utc.with_ymd_and_hms(2024, 1, day, 10, 0, 0).unwrap();
        PostRecord::local(id, content.to_string(), "Moi".to_string(), date)
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_post_card_escapes_content() {
        let card = post_card(&post(1, "<script>alert(1)</script>", 1), "http://localhost/");
        assert!(card.contains("&lt;script&gt;"));
        assert!(!card.contains("<script>"));
        assert!(card.contains("/posts/1/delete"));
    }

    #[test]
    fn test_markdown_card_has_no_delete() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let md = PostRecord::markdown("doc".to_string(), "A".to_string(), date);
        let card = post_card(&md, "http://localhost/");
        assert!(!card.contains("/delete"));
        assert!(card.contains("/posts/md-1704067200000/favorite"));
    }

    #[test]
    fn test_share_links_are_encoded() {
        let links = share_links(&post(1, "a b&c", 1), "http://x.org/?p=1");
        assert_eq!(
            links[0].1,
            "https://www.facebook.com/sharer/sharer.php?u=http%3A%2F%2Fx.org%2F%3Fp%3D1"
        );
        assert_eq!(links[1].1, "https://twitter.com/intent/tweet?text=a%20b%26c");
        assert_eq!(links[2].1, "https://wa.me/?text=a%20b%26c");
    }

    #[test]
    fn test_renderer_prepends() {
        let mut renderer = HtmlRenderer::new("http://localhost/");
        renderer.render_post(&post(1, "older", 1));
        renderer.render_post(&post(2, "newer", 2));
        let html = renderer.feed_html();
        assert!(html.find("newer").unwrap() < html.find("older").unwrap());

        renderer.remove_post(&PostId::Local(2));
        assert!(!renderer.feed_html().contains("newer"));
    }

    #[test]
    fn test_renderer_splits_favorites() {
        let mut renderer = HtmlRenderer::new("http://localhost/");
        let mut fav = post(1, "starred", 1);
        fav.favorites = true;
        renderer.render_post(&fav);
        renderer.render_post(&post(2, "plain", 2));
        assert!(renderer.has_favorites());
        assert!(renderer.favorites_html().contains("starred"));
        assert!(!renderer.feed_html().contains("starred"));
    }

    #[test]
    fn test_feed_page() {
        let store = LocalPostStore::new(MemoryStorage::new());
        let session = FeedSession::new(store, vec![post(1, "hello", 3)]);
        let page = feed_page(&session, &FeedConfig::default());
        assert!(page.contains("hello"));
        assert!(page.contains(r#"href="/?month=2024-01">January 2024</a>"#));
        assert!(page.contains("favorites-section hidden"));
    }

    #[test]
    fn test_composer_controls() {
        let store = LocalPostStore::new(MemoryStorage::new());
        let session = FeedSession::new(store, Vec::new());
        let page = feed_page(&session, &FeedConfig::default());

        assert!(page.contains(r#"<button id="post-btn" disabled>Post</button>"#));
        assert!(page.contains(r#"oninput="updatePostButton()""#));
        assert!(page.contains(r#"<div class="emoji-picker">"#));
        assert_eq!(page.matches(r#"class="emoji-option""#).count(), EMOJIS.len());
        assert!(page.contains("function insertEmoji"));
    }
}

use crate::config::FETCH_CHAR_LIMIT;
use crate::domain::ports::WebClient;
use scraper::Html;

/// 不屬於可見內文的元素
const SKIPPED_ELEMENTS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Fetches the page and returns its visible text, or an empty string on any failure.
pub async fn fetch_content(web: &dyn WebClient, url: &str) -> String {
    match web.fetch_html(url).await {
        Ok(html) => {
            let text = extract_visible_text(&html, FETCH_CHAR_LIMIT);
            tracing::debug!("Scraped {} characters from {}", text.chars().count(), url);
            text
        }
        Err(e) => {
            tracing::warn!("⚠️ Failed to scrape {}: {}", url, e);
            String::new()
        }
    }
}

pub fn extract_visible_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);

    let mut fragments = Vec::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            fragments.push(&**text);
        }
    }

    let collapsed = fragments
        .iter()
        .flat_map(|fragment| fragment.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    truncate_chars(&collapsed, max_chars)
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

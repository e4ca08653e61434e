use crate::domain::ports::WebClient;

const CANDIDATE_PATTERNS: [(&str, &str); 4] = [
    ("", ".com"),
    ("", ".co"),
    ("", ".io"),
    ("www.", ".com"),
];

/// Keeps letters, digits and underscores, lower-cased; drops punctuation and whitespace.
pub fn domain_slug(company_name: &str) -> String {
    company_name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn candidate_urls(slug: &str) -> Vec<String> {
    CANDIDATE_PATTERNS
        .iter()
        .map(|(prefix, suffix)| format!("https://{}{}{}", prefix, slug, suffix))
        .collect()
}

pub fn best_guess_url(slug: &str) -> String {
    format!("https://www.{}.com", slug)
}

/// 猜測公司網站：依序探測候選網域，皆不可達時回傳未驗證的最佳猜測。
///
/// Returns `None` only for a blank name.
pub async fn resolve_website(web: &dyn WebClient, company_name: &str) -> Option<String> {
    if company_name.trim().is_empty() {
        return None;
    }

    let slug = domain_slug(company_name);
    if slug.is_empty() {
        // 名稱只有標點符號，退回原始名稱
        let raw: String = company_name
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        tracing::warn!(
            "⚠️ No usable domain characters in '{}', guessing from raw name",
            company_name
        );
        return Some(best_guess_url(&raw));
    }

    for candidate in candidate_urls(&slug) {
        if web.is_accessible(&candidate).await {
            tracing::debug!("Website candidate accessible: {}", candidate);
            return Some(candidate);
        }
    }

    let guess = best_guess_url(&slug);
    tracing::debug!("No candidate accessible for '{}', using {}", company_name, guess);
    Some(guess)
}

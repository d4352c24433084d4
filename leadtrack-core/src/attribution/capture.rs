//! Campaign parameter capture from entry URLs

use std::collections::HashSet;

use tracing::debug;
use url::Url;

use super::types::{AttributionParameters, UtmKey};

/// Base used to resolve relative entry URLs such as `/?utm_source=x`
const RELATIVE_BASE: &str = "http://localhost/";

/// Extract the recognized `utm_*` keys from a URL's query string.
///
/// Only the first occurrence of a key counts, and keys with empty values
/// are left out. Unparseable input yields an empty mapping.
pub fn capture(url: &str) -> AttributionParameters {
    let parsed = match parse_entry_url(url) {
        Some(parsed) => parsed,
        None => {
            debug!(url, "Entry URL did not parse; no campaign parameters");
            return AttributionParameters::new();
        }
    };

    let mut seen = HashSet::new();
    let mut params = AttributionParameters::new();
    for (name, value) in parsed.query_pairs() {
        let Some(key) = UtmKey::from_query_name(&name) else {
            continue;
        };
        if seen.insert(key) {
            params.insert(key, value.into_owned());
        }
    }
    params
}

fn parse_entry_url(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).ok()?.join(url).ok()
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_query_yields_empty() {
        assert!(capture("https://x.test/").is_empty());
        assert!(capture("https://x.test/landing#hero").is_empty());
    }

    #[test]
    fn unrelated_params_yield_empty() {
        assert!(capture("https://x.test/?ref=abc&gclid=123&source=ad").is_empty());
    }

    #[test]
    fn captures_exact_subset() {
        let params = capture("https://x.test/?utm_source=linkedin&utm_medium=social&utm_campaign=launch");
        assert_eq!(params.len(), 3);
        assert_eq!(params.get(UtmKey::Source), Some("linkedin"));
        assert_eq!(params.get(UtmKey::Medium), Some("social"));
        assert_eq!(params.get(UtmKey::Campaign), Some("launch"));
        assert_eq!(params.get(UtmKey::Term), None);
        assert_eq!(params.get(UtmKey::Content), None);
    }

    #[test]
    fn captures_all_five_keys_and_ignores_others() {
        let params = capture(
            "https://x.test/p?utm_source=g&utm_medium=cpc&utm_campaign=spring&utm_term=crm&utm_content=ad_b&fbclid=z",
        );
        assert_eq!(params.len(), 5);
        assert_eq!(params.get(UtmKey::Term), Some("crm"));
        assert_eq!(params.get(UtmKey::Content), Some("ad_b"));
    }

    #[test]
    fn values_are_percent_decoded_verbatim() {
        let params = capture("https://x.test/?utm_campaign=spring%20sale&utm_term=a+b");
        assert_eq!(params.get(UtmKey::Campaign), Some("spring sale"));
        assert_eq!(params.get(UtmKey::Term), Some("a b"));
    }

    #[test]
    fn empty_values_are_omitted() {
        let params = capture("https://x.test/?utm_source=&utm_medium=email");
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(UtmKey::Source), None);
    }

    #[test]
    fn first_occurrence_wins() {
        let params = capture("https://x.test/?utm_source=first&utm_source=second");
        assert_eq!(params.get(UtmKey::Source), Some("first"));

        let params = capture("https://x.test/?utm_source=&utm_source=second");
        assert_eq!(params.get(UtmKey::Source), None);
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!(capture("https://x.test/?UTM_SOURCE=x").is_empty());
    }

    #[test]
    fn relative_urls_are_accepted() {
        let params = capture("/blog?utm_source=twitter");
        assert_eq!(params.get(UtmKey::Source), Some("twitter"));

        let params = capture("?utm_medium=email");
        assert_eq!(params.get(UtmKey::Medium), Some("email"));
    }

    #[test]
    fn garbage_yields_empty() {
        assert!(capture("http://[::1").is_empty());
        assert!(capture("").is_empty());
    }
}

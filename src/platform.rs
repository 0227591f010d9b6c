/// Supported platforms and the hostname registry that picks an adapter
/// for the current page.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A third-party platform we can capture bookmarks from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    X,
    Reddit,
    LinkedIn,
    ChatGpt,
}

impl Platform {
    /// Wire name used in messages and backend payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::X => "x",
            Platform::Reddit => "reddit",
            Platform::LinkedIn => "linkedin",
            Platform::ChatGpt => "chatgpt",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hostname registry, checked in order; the first match wins.
///
/// Matching is by exact hostname or suffix ("old.reddit.com" matches
/// "reddit.com"), so subdomains pick up the same adapter.
const HOST_REGISTRY: &[(&[&str], Platform)] = &[
    (&["x.com", "twitter.com"], Platform::X),
    (&["reddit.com"], Platform::Reddit),
    (&["linkedin.com"], Platform::LinkedIn),
    (&["chatgpt.com", "chat.openai.com"], Platform::ChatGpt),
];

/// Resolve the platform for a page hostname, if any adapter applies.
pub fn platform_for_hostname(hostname: &str) -> Option<Platform> {
    let hostname = hostname.trim().to_ascii_lowercase();

    for (domains, platform) in HOST_REGISTRY {
        for domain in domains.iter() {
            if hostname == *domain || hostname.ends_with(&format!(".{domain}")) {
                return Some(*platform);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_wire_names() {
        assert_eq!(Platform::X.as_str(), "x");
        assert_eq!(Platform::Reddit.as_str(), "reddit");
        assert_eq!(Platform::LinkedIn.as_str(), "linkedin");
        assert_eq!(Platform::ChatGpt.as_str(), "chatgpt");
    }

    #[test]
    fn test_platform_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Platform::ChatGpt).unwrap(), "\"chatgpt\"");
        let parsed: Platform = serde_json::from_str("\"linkedin\"").unwrap();
        assert_eq!(parsed, Platform::LinkedIn);
    }

    #[test]
    fn test_registry_exact_hosts() {
        assert_eq!(platform_for_hostname("x.com"), Some(Platform::X));
        assert_eq!(platform_for_hostname("twitter.com"), Some(Platform::X));
        assert_eq!(platform_for_hostname("reddit.com"), Some(Platform::Reddit));
        assert_eq!(platform_for_hostname("linkedin.com"), Some(Platform::LinkedIn));
        assert_eq!(platform_for_hostname("chatgpt.com"), Some(Platform::ChatGpt));
        assert_eq!(platform_for_hostname("chat.openai.com"), Some(Platform::ChatGpt));
    }

    #[test]
    fn test_registry_subdomains() {
        assert_eq!(platform_for_hostname("www.reddit.com"), Some(Platform::Reddit));
        assert_eq!(platform_for_hostname("old.reddit.com"), Some(Platform::Reddit));
        assert_eq!(platform_for_hostname("www.linkedin.com"), Some(Platform::LinkedIn));
        assert_eq!(platform_for_hostname("mobile.x.com"), Some(Platform::X));
    }

    #[test]
    fn test_registry_unknown_hosts() {
        assert_eq!(platform_for_hostname("example.com"), None);
        assert_eq!(platform_for_hostname("notreddit.com"), None);
        assert_eq!(platform_for_hostname(""), None);
    }

    #[test]
    fn test_registry_case_insensitive() {
        assert_eq!(platform_for_hostname("WWW.Reddit.COM"), Some(Platform::Reddit));
    }
}

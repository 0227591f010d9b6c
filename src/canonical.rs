/// Canonical URL extraction rules, one strategy per platform.
///
/// Everything here is pure string/URL work so the rules stay testable
/// without a DOM. Adapters feed in whatever they pulled out of the page
/// (an href, a permalink attribute, an input value) and get back either
/// a canonical absolute URL or a typed failure.
use thiserror::Error;
use url::Url;

pub const REDDIT_ORIGIN: &str = "https://www.reddit.com";
pub const LINKEDIN_UPDATE_BASE: &str = "https://www.linkedin.com/feed/update";
pub const CHATGPT_SHARE_PREFIX: &str = "https://chatgpt.com/share/";

/// URN prefixes LinkedIn uses for feed posts; anything else is rejected.
pub const LINKEDIN_URN_PREFIXES: [&str; 2] = ["urn:li:activity:", "urn:li:share:"];

/// Why a canonical URL could not be produced for one intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("content container not found for the triggering control")]
    ContainerNotFound,
    #[error("no permalink found in content container")]
    PermalinkMissing,
    #[error("identifier `{0}` does not match an accepted prefix")]
    IdentifierRejected(String),
    #[error("`{url}` is not a valid absolute URL: {reason}")]
    InvalidUrl { url: String, reason: String },
}

fn parse_absolute(raw: &str) -> Result<Url, ExtractError> {
    Url::parse(raw).map_err(|e| ExtractError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// X/Twitter permalinks come off a timestamp anchor and are already
/// canonical; we only verify the href parses as an absolute URL.
pub fn x_status_url(href: &str) -> Result<String, ExtractError> {
    let parsed = parse_absolute(href)?;
    Ok(parsed.into())
}

/// Normalize a Reddit permalink to scheme+host+path.
///
/// The `permalink` attribute on post elements is site-relative; the
/// fallback anchors inside the shadow root are absolute. Either way the
/// query string and fragment are stripped so the same post always
/// produces the same URL.
pub fn reddit_post_url(raw: &str) -> Result<String, ExtractError> {
    let absolute = if raw.starts_with('/') {
        format!("{REDDIT_ORIGIN}{raw}")
    } else {
        raw.to_string()
    };

    let parsed = parse_absolute(&absolute)?;
    Ok(format!(
        "{}{}",
        parsed.origin().ascii_serialization(),
        parsed.path()
    ))
}

/// Synthesize the canonical feed-update URL from a post URN.
///
/// Only `urn:li:activity:` and `urn:li:share:` identifiers are
/// accepted; anything else aborts the intent.
pub fn linkedin_update_url(urn: &str) -> Result<String, ExtractError> {
    if LINKEDIN_URN_PREFIXES.iter().any(|p| urn.starts_with(p)) {
        Ok(format!("{LINKEDIN_UPDATE_BASE}/{urn}/"))
    } else {
        Err(ExtractError::IdentifierRejected(urn.to_string()))
    }
}

/// A ChatGPT share link is read verbatim from the dialog's input; it
/// only counts if it carries the share-URL prefix.
pub fn chatgpt_share_url(value: &str) -> Result<String, ExtractError> {
    if value.starts_with(CHATGPT_SHARE_PREFIX) {
        Ok(value.to_string())
    } else {
        Err(ExtractError::IdentifierRejected(value.to_string()))
    }
}

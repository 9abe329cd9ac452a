use std::net::IpAddr;

use scraper::{Html, Selector};
use url::Url;

use crate::error::{PreviewError, PreviewResult};
use crate::models::LinkPreview;

// ── Address checks ─────────────────────────────────────────────────────────

/// Returns `true` if `ip` is a private, loopback, link-local, unspecified or
/// broadcast address.
pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            matches!(
                o,
                [127, ..]
                    | [10, ..]
                    | [169, 254, ..]
                    | [192, 168, ..]
                    | [0, ..]
                    | [255, 255, 255, 255]
            ) || (o[0] == 172 && (16..=31).contains(&o[1]))
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00 == 0xfc00)
                || (v6.segments()[0] & 0xffc0 == 0xfe80)
                || v6.to_ipv4_mapped().is_some_and(|v4| is_private_ip(IpAddr::V4(v4)))
        }
    }
}

/// Parse `link` and make sure it is an http(s) URL with a host.
pub fn parse_link(link: &str) -> PreviewResult<Url> {
    let parsed = Url::parse(link).map_err(|_| PreviewError::Validation("Invalid URL".into()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(PreviewError::Validation(
                "Only http/https URLs are supported".into(),
            ))
        }
    }

    if parsed.host_str().is_none() {
        return Err(PreviewError::Validation("URL has no host".into()));
    }

    Ok(parsed)
}

/// Resolve the host of `url` and fail if any of its addresses is private.
pub async fn ensure_public_host(url: &Url) -> PreviewResult<()> {
    let host = url
        .host_str()
        .ok_or_else(|| PreviewError::Validation("URL has no host".into()))?;
    let port = url.port_or_known_default().unwrap_or(80);

    let addrs = tokio::net::lookup_host((host, port))
        .await
        .map_err(|_| PreviewError::Validation("Could not resolve URL host".into()))?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(PreviewError::Validation(
                "URL resolves to a private or reserved address".into(),
            ));
        }
    }

    Ok(())
}

// ── Tag extraction ─────────────────────────────────────────────────────────

/// Read the Open Graph tags the processor cares about from `html`.
///
/// `<title>` stands in for a missing `og:title` and `meta[name=description]`
/// for a missing `og:description`. Blank values count as missing.
pub fn extract_og_data(html: &str) -> LinkPreview {
    let document = Html::parse_document(html);

    LinkPreview {
        title: meta_content(&document, "property", "og:title")
            .or_else(|| title_text(&document)),
        description: meta_content(&document, "property", "og:description")
            .or_else(|| meta_content(&document, "name", "description")),
        image: meta_content(&document, "property", "og:image"),
    }
}

fn meta_content(doc: &Html, attr: &str, key: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[{attr}="{key}"]"#)).ok()?;
    doc.select(&selector)
        .find_map(|el| el.value().attr("content"))
        .and_then(non_blank)
}

fn title_text(doc: &Html) -> Option<String> {
    let selector = Selector::parse("head > title").ok()?;
    let el = doc.select(&selector).next()?;
    non_blank(&el.text().collect::<String>())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

use anyhow::{Context, Result};
use regex::Regex;

const SCHEMES: [&str; 2] = ["https://", "http://"];
const WWW_PREFIX: &str = "www.";

// [scheme://]label(.label)+[:port][/path]
const HOST_SHAPE: &str =
    r"(?i)^(?:https?://)?(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9-]{2,}(?::\d{1,5})?(?:/\S*)?$";

/// Compiles the pattern a submitted URL must match before it is looked up.
pub fn host_pattern() -> Result<Regex> {
    Regex::new(HOST_SHAPE).context("Failed to compile hostname pattern")
}

pub fn looks_like_host(raw: &str, pattern: &Regex) -> bool {
    pattern.is_match(raw)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Reduces a website identifier to the key used for lookups and deduplication.
///
/// Drops a leading `http://`/`https://` and `www.` (both case-insensitive) and
/// everything from the first `/` on. The case of the remaining host, ports and
/// trailing dots are left untouched, so `Example.com` and `example.com` are
/// different keys.
pub fn normalize_host(raw: &str) -> String {
    let mut rest = raw;

    for scheme in SCHEMES {
        if let Some(stripped) = strip_prefix_ignore_case(rest, scheme) {
            rest = stripped;
            break;
        }
    }

    // Repeated so that normalizing twice never strips again.
    while let Some(stripped) = strip_prefix_ignore_case(rest, WWW_PREFIX) {
        rest = stripped;
    }

    match rest.find('/') {
        Some(slash) => rest[..slash].to_string(),
        None => rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_www_and_path() {
        assert_eq!(normalize_host("https://www.Example.com/path"), "Example.com");
        assert_eq!(normalize_host("http://github.com"), "github.com");
        assert_eq!(normalize_host("HTTPS://WWW.news.site/a/b?c=d"), "news.site");
        assert_eq!(normalize_host("www.discord.com"), "discord.com");
        assert_eq!(normalize_host("youtube.com/watch"), "youtube.com");
    }

    #[test]
    fn keeps_port_and_trailing_dot() {
        assert_eq!(normalize_host("http://localhost.dev:8080/x"), "localhost.dev:8080");
        assert_eq!(normalize_host("example.com."), "example.com.");
    }

    #[test]
    fn leaves_inner_www_alone() {
        assert_eq!(normalize_host("https://blog.www.example.com"), "blog.www.example.com");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "https://www.Example.com/path",
            "http://http://example.com/a",
            "www.www.example.com",
            "Example.com",
            "",
            "https://",
            "ftp://example.com/x",
        ];
        for input in inputs {
            let once = normalize_host(input);
            assert_eq!(normalize_host(&once), once, "input: {input}");
        }
    }

    #[test]
    fn host_shape_accepts_urls_and_bare_hosts() {
        let pattern = host_pattern().unwrap();
        assert!(looks_like_host("example.com", &pattern));
        assert!(looks_like_host("https://www.example.com/about", &pattern));
        assert!(looks_like_host("HTTP://Sub.Example.co.uk", &pattern));
        assert!(looks_like_host("example.com:8443/path", &pattern));
    }

    #[test]
    fn host_shape_rejects_garbage() {
        let pattern = host_pattern().unwrap();
        assert!(!looks_like_host("not a url", &pattern));
        assert!(!looks_like_host("localhost", &pattern));
        assert!(!looks_like_host("https://", &pattern));
        assert!(!looks_like_host("ftp://example.com", &pattern));
        assert!(!looks_like_host("example.c", &pattern));
        assert!(!looks_like_host("-bad-.com", &pattern));
    }
}

//! The fixed upstream origin.

use thiserror::Error;
use url::Url;

/// Error returned when the configured upstream origin is unusable.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported upstream scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("upstream URL has no host")]
    MissingHost,
}

/// Scheme, host and port of the upstream every request is forwarded to.
///
/// Path, query and fragment of the configured URL are discarded; at request time
/// they come from the inbound request instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAddress {
    origin: Url,
    hostname: String,
}

impl TargetAddress {
    pub fn parse(input: &str) -> Result<Self, TargetError> {
        let mut origin = Url::parse(input)?;

        match origin.scheme() {
            "http" | "https" => {}
            other => return Err(TargetError::UnsupportedScheme(other.to_string())),
        }

        let hostname = match origin.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(TargetError::MissingHost),
        };

        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);

        Ok(Self { origin, hostname })
    }

    pub fn scheme(&self) -> &str {
        self.origin.scheme()
    }

    /// Host without port.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Explicit port, `None` when the scheme default is used.
    pub fn port(&self) -> Option<u16> {
        self.origin.port()
    }

    /// Outbound URL: this origin with the inbound path and query copied in.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.origin.clone();
        url.set_path(path);
        url.set_query(query);
        url
    }

    /// Value for the outbound `Origin` header: `<scheme>://<hostname>`.
    pub fn origin_header(&self) -> String {
        format!("{}://{}", self.scheme(), self.hostname)
    }

    /// Value for the outbound `Referer` header: `<scheme>://<hostname><path>`.
    pub fn referer_for(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme(), self.hostname, path)
    }
}

impl std::fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.port() {
            Some(port) => write!(f, "{}://{}:{}", self.scheme(), self.hostname, port),
            None => write!(f, "{}://{}", self.scheme(), self.hostname),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_scheme_host_port() {
        let target = TargetAddress::parse("https://ecsc-expat.sy:8443").unwrap();
        assert_eq!(target.scheme(), "https");
        assert_eq!(target.hostname(), "ecsc-expat.sy");
        assert_eq!(target.port(), Some(8443));
        assert_eq!(target.to_string(), "https://ecsc-expat.sy:8443");
    }

    #[test]
    fn test_parse_discards_path_and_query() {
        let target = TargetAddress::parse("http://backend.local/base?x=1#frag").unwrap();
        let url = target.url_for("/api/items", None);
        assert_eq!(url.as_str(), "http://backend.local/api/items");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            TargetAddress::parse("ftp://files.example"),
            Err(TargetError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            TargetAddress::parse("not a url"),
            Err(TargetError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_url_for_copies_path_and_query() {
        let target = TargetAddress::parse("https://ecsc-expat.sy:8443").unwrap();
        let url = target.url_for("/secure/auth/login", Some("lang=ar&next=%2Fhome"));

        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("ecsc-expat.sy"));
        assert_eq!(url.port(), Some(8443));
        assert_eq!(url.path(), "/secure/auth/login");
        assert_eq!(url.query(), Some("lang=ar&next=%2Fhome"));
    }

    #[test]
    fn test_identity_headers_omit_port() {
        let target = TargetAddress::parse("https://ecsc-expat.sy:8443").unwrap();
        assert_eq!(target.origin_header(), "https://ecsc-expat.sy");
        assert_eq!(
            target.referer_for("/secure/auth/login"),
            "https://ecsc-expat.sy/secure/auth/login"
        );
    }
}

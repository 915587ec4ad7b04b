//! Config line representation and the recognized URI schemes.

/// URI scheme of a proxy config line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Vmess,
    Vless,
    Trojan,
    Shadowsocks,
    ShadowsocksR,
    Hysteria2,
    Tuic,
}

impl Scheme {
    /// Every scheme the extractor recognizes.
    pub const ALL: [Scheme; 7] = [
        Scheme::Vmess,
        Scheme::Vless,
        Scheme::Trojan,
        Scheme::Shadowsocks,
        Scheme::ShadowsocksR,
        Scheme::Hysteria2,
        Scheme::Tuic,
    ];

    /// The URI prefix for this scheme, including the `://` separator.
    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Vmess => "vmess://",
            Scheme::Vless => "vless://",
            Scheme::Trojan => "trojan://",
            Scheme::Shadowsocks => "ss://",
            Scheme::ShadowsocksR => "ssr://",
            Scheme::Hysteria2 => "hy2://",
            Scheme::Tuic => "tuic://",
        }
    }

    /// Detect the scheme of a raw line, if it carries a recognized prefix.
    pub fn detect(line: &str) -> Option<Scheme> {
        Scheme::ALL.into_iter().find(|s| line.starts_with(s.prefix()))
    }
}

/// A single proxy config line in one of the recognized schemes.
///
/// The trailing `#fragment` is a display tag and not part of the line's
/// identity; [`ConfigLine::canonical_key`] strips it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    raw: String,
    scheme: Scheme,
}

impl ConfigLine {
    /// Wrap a raw line if, after trimming, it starts with a recognized scheme.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        Scheme::detect(line).map(|scheme| Self {
            raw: line.to_string(),
            scheme,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The line with its fragment stripped; two lines with equal canonical
    /// keys address the same endpoint.
    pub fn canonical_key(&self) -> &str {
        match self.raw.find('#') {
            Some(pos) => &self.raw[..pos],
            None => &self.raw,
        }
    }

    /// Rewrite the fragment to `tag`, discarding any original fragment.
    pub fn retag(&self, tag: &str) -> String {
        format!("{}#{}", self.canonical_key(), tag)
    }
}

/// A config line with its computed score and, in validating mode, the
/// measured connect latency in seconds.
#[derive(Debug, Clone)]
pub struct ScoredConfig {
    pub line: ConfigLine,
    pub score: i32,
    pub latency: Option<f64>,
}

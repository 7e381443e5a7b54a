use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Canonical form used to compare locale tags: lower case, `-` separated.
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Language selection used to pick translated text.
///
/// Equality (and hashing) is defined on the [selection
/// chain](ContentLocale::selection_chain): two locales are equal exactly when
/// they would pick the same variant out of any overlay. The display form does
/// not matter, so `pt-BR` and `pt_br` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentLocale {
    language: String,
    region: Option<String>,
    #[serde(default)]
    fallbacks: Vec<String>,
}

impl ContentLocale {
    pub fn new(language: impl AsRef<str>) -> Self {
        Self {
            language: language.as_ref().trim().to_string(),
            region: None,
            fallbacks: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: impl AsRef<str>) -> Self {
        let region = region.as_ref().trim();
        self.region = (!region.is_empty()).then(|| region.to_string());
        self
    }

    /// Append a tag tried after the locale's own language.
    pub fn with_fallback(mut self, tag: impl AsRef<str>) -> Self {
        self.fallbacks.push(tag.as_ref().trim().to_string());
        self
    }

    /// Parse `language[-_]region`, e.g. `pt-BR` or `en`.
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        let mut parts = tag.splitn(2, ['-', '_']);
        let language = parts.next().filter(|l| !l.is_empty())?;
        if !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let locale = Self::new(language);
        Some(match parts.next() {
            Some(region) if !region.is_empty() => locale.with_region(region),
            Some(_) => return None,
            None => locale,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    /// Normalized tag of the most specific variant this locale asks for.
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => normalize_tag(&format!("{}-{}", self.language, region)),
            None => normalize_tag(&self.language),
        }
    }

    /// Normalized tags in the order they are tried: the full tag, the bare
    /// language, then the explicit fallbacks. Duplicates are dropped.
    pub fn selection_chain(&self) -> Vec<String> {
        let mut chain: Vec<String> = Vec::with_capacity(2 + self.fallbacks.len());
        let candidates = std::iter::once(self.tag())
            .chain(std::iter::once(normalize_tag(&self.language)))
            .chain(self.fallbacks.iter().map(|f| normalize_tag(f)));
        for tag in candidates {
            if !tag.is_empty() && !chain.contains(&tag) {
                chain.push(tag);
            }
        }
        chain
    }
}

impl Default for ContentLocale {
    fn default() -> Self {
        Self::new("en")
    }
}

impl PartialEq for ContentLocale {
    fn eq(&self, other: &Self) -> bool {
        self.selection_chain() == other.selection_chain()
    }
}

impl Eq for ContentLocale {}

impl Hash for ContentLocale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.selection_chain().hash(state);
    }
}

impl fmt::Display for ContentLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => f.write_str(&self.language),
        }
    }
}

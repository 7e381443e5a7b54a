use std::fmt;
use std::sync::Arc;

/// Stable identifier of a provider node.
///
/// Keys must encode every parameter the computation depends on, because the
/// registry hands back the existing node whenever a key is registered twice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProviderKey(Arc<str>);

impl ProviderKey {
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// Join `parts` with `:`, escaping `%` and `:` inside each part so that
    /// distinct part lists never produce the same key.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = parts
            .into_iter()
            .map(|part| part.as_ref().replace('%', "%25").replace(':', "%3A"))
            .collect::<Vec<_>>()
            .join(":");
        Self::from(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProviderKey {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl From<&ProviderKey> for ProviderKey {
    fn from(value: &ProviderKey) -> Self {
        value.clone()
    }
}

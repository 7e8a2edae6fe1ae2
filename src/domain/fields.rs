//! Application settings: the declared field table and the collected record.

/// Key of the generated secret field.
pub const SECRET_KEY: &str = "JWT_SECRET";

/// Minimum accepted length for a user-supplied secret.
pub const SECRET_MIN_LEN: usize = 32;

/// Descriptor for one application setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Environment variable name, also the key written to the env file
    pub key: &'static str,
    /// Human-readable prompt
    pub prompt: &'static str,
    /// Value used when nothing is supplied
    pub default: &'static str,
    /// Empty values are fatal
    pub required: bool,
}

impl FieldSpec {
    const fn new(
        key: &'static str,
        prompt: &'static str,
        default: &'static str,
        required: bool,
    ) -> Self {
        Self {
            key,
            prompt,
            default,
            required,
        }
    }

    /// Whether this is the generated secret field.
    pub fn is_secret(&self) -> bool {
        self.key == SECRET_KEY
    }
}

/// Declared settings, in the order they are collected and written.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::new(SECRET_KEY, "JWT Secret (min 32 chars)", "", true),
    FieldSpec::new("VITE_STORE_NAME", "Store Name", "ListPull", false),
    FieldSpec::new("VITE_STORE_EMAIL", "Store Email", "contact@example.com", false),
    FieldSpec::new("VITE_STORE_PHONE", "Store Phone", "(555) 123-4567", false),
    FieldSpec::new("VITE_STORE_ADDRESS", "Store Address", "123 Main Street", false),
    FieldSpec::new("VITE_ORDER_PREFIX", "Order Prefix", "LP", false),
    FieldSpec::new("VITE_ORDER_HOLD_DAYS", "Order Hold Days", "7", false),
    FieldSpec::new("VITE_MAX_FILE_SIZE_MB", "Max File Size (MB)", "1", false),
    FieldSpec::new("VITE_MAX_DECKLIST_CARDS", "Max Decklist Cards", "500", false),
    FieldSpec::new("SMTP_HOST", "SMTP Host (optional)", "", false),
    FieldSpec::new("SMTP_PORT", "SMTP Port", "587", false),
    FieldSpec::new("SMTP_USER", "SMTP Username (optional)", "", false),
    FieldSpec::new("SMTP_PASS", "SMTP Password (optional)", "", false),
    FieldSpec::new("FROM_EMAIL", "From Email (optional)", "", false),
];

/// Collected settings, preserving insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigRecord {
    entries: Vec<(String, String)>,
}

impl ConfigRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Replaces in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

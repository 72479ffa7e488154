//! Package metadata store
//!
//! Insertion-ordered property bag describing the package: scalar values
//! plus one practical level of nesting for grouped properties such as
//! `authors`. Lookup by name is case-insensitive and depth-one; the
//! pipeline only ever reads it.

/// A single metadata property: a scalar value, a nested group, or both
///
/// When an entry carries children the group is its effective value and
/// the scalar is ignored.
#[derive(Debug, Clone, Default)]
pub struct MetadataEntry {
    name: String,
    value: Option<String>,
    children: Vec<MetadataEntry>,
}

impl MetadataEntry {
    /// A plain `name = value` property
    pub fn scalar(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            children: Vec::new(),
        }
    }

    /// A property whose value is a nested mapping
    pub fn group(name: impl Into<String>, children: Vec<MetadataEntry>) -> Self {
        Self {
            name: name.into(),
            value: None,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the nested mapping is the effective value
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Scalar value, `None` when this entry is a group
    pub fn text(&self) -> Option<&str> {
        if self.is_group() {
            None
        } else {
            self.value.as_deref()
        }
    }

    pub fn children(&self) -> &[MetadataEntry] {
        &self.children
    }

    /// Exact-name child lookup inside a group
    fn child(&self, name: &str) -> Option<&MetadataEntry> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// The package description consumed by the control-file renderers
#[derive(Debug, Clone, Default)]
pub struct MetadataStore {
    entries: Vec<MetadataEntry>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<MetadataEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: MetadataEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive depth-one lookup; first match in insertion order
    pub fn get(&self, name: &str) -> Option<&MetadataEntry> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Scalar value of a property, `None` when absent or a group
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(MetadataEntry::text)
    }

    /// Scalar value of a property, or the given default
    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.text(name).unwrap_or(default)
    }

    /// Nested entries of a group property, `None` when absent or scalar
    pub fn group(&self, name: &str) -> Option<&[MetadataEntry]> {
        self.get(name).and_then(|e| {
            if e.is_group() {
                Some(e.children())
            } else {
                None
            }
        })
    }

    /// First name under the `authors` group
    pub fn author(&self) -> Option<&str> {
        self.group("authors")?.first().map(MetadataEntry::name)
    }

    /// The `e-mail` child of the first author
    pub fn author_email(&self) -> Option<&str> {
        self.group("authors")?.first()?.child("e-mail")?.text()
    }

    /// Explicit `Maintainer` property, else `"<author> <<e-mail>>"`
    pub fn maintainer(&self) -> Option<String> {
        if let Some(explicit) = self.text("Maintainer") {
            return Some(explicit.to_string());
        }
        let author = self.author()?;
        let email = self.author_email().unwrap_or("");
        Some(format!("{} <{}>", author, email))
    }
}

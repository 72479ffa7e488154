//! Build script sections
//!
//! Named raw text blocks referenced by the control templates. Sections a
//! template always needs fall back to fixed per-format defaults, so every
//! referenced placeholder resolves to something.

use crate::core::format::PackageFormat;

/// A named block of raw text from the recipe
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    value: String,
}

impl Section {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Insertion-ordered list of sections with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: Vec<Section>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section, normalizing away recipe-file indentation
    pub fn add(&mut self, name: impl Into<String>, text: &str) {
        self.sections.push(Section {
            name: name.into(),
            value: normalize_text(text),
        });
    }

    /// Case-insensitive lookup; first match in insertion order
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(Section::value)
    }

    /// Registered text, else the per-format fallback
    pub fn resolve(&self, name: &str, format: PackageFormat) -> String {
        if let Some(text) = self.get(name) {
            return text.to_string();
        }
        fallback(name, format)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn fallback(name: &str, format: PackageFormat) -> String {
    match name.to_ascii_lowercase().as_str() {
        "preparing" => "echo \"Nothing to prepare\"".to_string(),
        "build" => "echo \"Nothing to build\"".to_string(),
        "install" | "clean" if format == PackageFormat::Rpm => {
            "rm -rf $RPM_BUILD_ROOT".to_string()
        }
        _ => format!("# {}", name),
    }
}

/// Strip recipe-file indentation from a text block
///
/// Outer whitespace is trimmed, then every line is left-trimmed. Blank
/// lines inside the block survive.
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n")
}

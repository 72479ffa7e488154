//! Control-file template rendering
//!
//! Pure `${Token}` substitution over template text. Tokens missing from
//! the substitution map pass through verbatim, so stray placeholders stay
//! visible in the rendered file instead of silently vanishing.

use std::collections::BTreeMap;

use regex::Regex;

/// Token-to-value map for one rendering
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: BTreeMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token value; the name is used without the `${}` wrapper
    pub fn set(&mut self, token: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(token.into(), value.into());
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace every known `${Token}` in `template`
pub fn render(template: &str, substitutions: &Substitutions) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();

    let mut last_end = 0;
    let mut output = String::new();

    for cap in re.captures_iter(template) {
        let full_match = match cap.get(0) {
            Some(m) => m,
            None => continue,
        };
        let token = &cap[1];

        output.push_str(&template[last_end..full_match.start()]);

        match substitutions.get(token) {
            Some(value) => output.push_str(value),
            // Unknown tokens stay in place, verbatim
            None => output.push_str(full_match.as_str()),
        }

        last_end = full_match.end();
    }

    output.push_str(&template[last_end..]);
    output
}

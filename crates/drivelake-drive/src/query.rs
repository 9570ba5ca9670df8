//! Structured builder for Drive `q` filter expressions.
//!
//! Every value is escaped when a term is added, so call sites never splice
//! raw strings into the query language.

/// Conjunction of filter terms, rendered as `term and term and ...`.
#[derive(Debug, Clone, Default)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact name match.
    pub fn name_eq(mut self, name: &str) -> Self {
        self.terms.push(format!("name = '{}'", escape(name)));
        self
    }

    /// Exact MIME type match.
    pub fn mime_eq(mut self, mime_type: &str) -> Self {
        self.terms.push(format!("mimeType = '{}'", escape(mime_type)));
        self
    }

    /// Objects directly inside the given folder.
    pub fn parent(mut self, folder_id: &str) -> Self {
        self.terms.push(format!("'{}' in parents", escape(folder_id)));
        self
    }

    /// Exclude trashed objects.
    pub fn not_trashed(mut self) -> Self {
        self.terms.push("trashed = false".to_string());
        self
    }

    /// Objects carrying the given custom property.
    pub fn app_property(mut self, key: &str, value: &str) -> Self {
        self.terms.push(format!(
            "appProperties has {{ key='{}' and value='{}' }}",
            escape(key),
            escape(value)
        ));
        self
    }

    /// Render the `q` parameter value.
    pub fn build(&self) -> String {
        self.terms.join(" and ")
    }
}

/// Escape a value for embedding between single quotes in a query string.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

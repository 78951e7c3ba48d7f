// url_migrator/src/rewrite.rs
// Literal URL substitution over the declared fields of a document.

use mongodb::bson::{Bson, Document};

/// Replaces every occurrence of `old` with `new`.
///
/// Matching is a case-sensitive literal substring match, never a pattern.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct UrlRewrite {
    old: String,
    new: String,
}

impl UrlRewrite {
    pub fn new(old: impl Into<String,>, new: impl Into<String,>,) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn old(&self,) -> &str {
        &self.old
    }

    /// The rewritten value, or `None` when `value` does not contain the old literal.
    pub fn rewrite_value(&self, value: &str,) -> Option<String,> {
        if self.old.is_empty() || !value.contains(self.old.as_str(),) {
            return None;
        }
        Some(value.replace(self.old.as_str(), &self.new,),)
    }

    /// Builds the `$set` document for `doc`, restricted to `fields`.
    ///
    /// Absent, null and non-string fields are skipped; the result is empty when
    /// nothing needs to change.
    pub fn compute_update(&self, doc: &Document, fields: &[String],) -> Document {
        let mut changes = Document::new();
        for field in fields {
            if let Some(Bson::String(current,),) = doc.get(field,) {
                if let Some(rewritten,) = self.rewrite_value(current,) {
                    tracing::debug!("Replaced URL in field '{}'", field);
                    changes.insert(field.clone(), Bson::String(rewritten,),);
                }
            }
        }
        changes
    }

    /// Whether any declared field of `doc` still holds the old literal.
    pub fn matches(&self, doc: &Document, fields: &[String],) -> bool {
        fields.iter().any(|field| {
            matches!(doc.get(field), Some(Bson::String(value)) if value.contains(self.old.as_str()))
        },)
    }
}

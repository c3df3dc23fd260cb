//! Enrolled fingerprint templates keyed by identity label.
//!
//! The database is built or loaded once and then shared read-only by every
//! identification call. Entries keep their enrollment order, which is also
//! the order used to break score ties.

#[cfg(feature = "serde")]
mod json;

use crate::minutiae::MinutiaeSet;
use crate::template::FingerprintTemplate;

/// One enrolled identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Enrollment {
    pub label: String,
    pub template: FingerprintTemplate,
}

/// Insertion-ordered map from label to template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateDatabase {
    entries: Vec<Enrollment>,
}

impl TemplateDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a template under `label`. An existing label keeps its position
    /// and gets the new template; the old one is returned.
    pub fn insert(
        &mut self,
        label: impl Into<String>,
        template: FingerprintTemplate,
    ) -> Option<FingerprintTemplate> {
        let label = label.into();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.label == label) {
            return Some(std::mem::replace(&mut entry.template, template));
        }
        self.entries.push(Enrollment { label, template });
        None
    }

    /// Builds a template with `k` neighbours and stores it under `label`.
    pub fn enroll(
        &mut self,
        label: impl Into<String>,
        minutiae: &MinutiaeSet,
        k: usize,
    ) -> Option<FingerprintTemplate> {
        self.insert(label, FingerprintTemplate::build(minutiae, k))
    }

    /// Template enrolled under `label`.
    pub fn get(&self, label: &str) -> Option<&FingerprintTemplate> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| &e.template)
    }

    /// Enrollments in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Enrollment> + '_ {
        self.entries.iter()
    }

    pub(crate) fn entries(&self) -> &[Enrollment] {
        &self.entries
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, FingerprintTemplate)> for TemplateDatabase {
    fn from_iter<I: IntoIterator<Item = (L, FingerprintTemplate)>>(iter: I) -> Self {
        let mut db = Self::new();
        for (label, template) in iter {
            db.insert(label, template);
        }
        db
    }
}

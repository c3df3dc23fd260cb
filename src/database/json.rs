//! JSON persistence for template databases (`serde` feature).
//!
//! Layout:
//!
//! ```text
//! { "<label>": { "Termination": { "(x, y)": [[ratios..], [angles..]], .. },
//!                "Bifurcation": { .. } }, .. }
//! ```
//!
//! Maps are read in document order so enrollment order survives a round
//! trip.

use super::TemplateDatabase;
use crate::minutiae::PointKey;
use crate::profile::{ProfileSet, TupleProfile};
use crate::template::FingerprintTemplate;
use crate::util::{FingerMatchError, FingerMatchResult};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

impl Serialize for ProfileSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, profile) in self.iter() {
            map.serialize_entry(&key.to_string(), profile)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProfileSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ProfileSetVisitor;

        impl<'de> Visitor<'de> for ProfileSetVisitor {
            type Value = ProfileSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from \"(x, y)\" keys to [ratios, angles]")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ProfileSet, A::Error> {
                let mut set = ProfileSet::new();
                while let Some((key, profile)) = access.next_entry::<String, TupleProfile>()? {
                    let key: PointKey = key.parse().map_err(de::Error::custom)?;
                    set.insert(key, profile);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(ProfileSetVisitor)
    }
}

impl Serialize for TemplateDatabase {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for entry in self.iter() {
            map.serialize_entry(&entry.label, &entry.template)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TemplateDatabase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DatabaseVisitor;

        impl<'de> Visitor<'de> for DatabaseVisitor {
            type Value = TemplateDatabase;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from labels to fingerprint templates")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<TemplateDatabase, A::Error> {
                let mut db = TemplateDatabase::new();
                while let Some((label, template)) =
                    access.next_entry::<String, FingerprintTemplate>()?
                {
                    db.insert(label, template);
                }
                Ok(db)
            }
        }

        deserializer.deserialize_map(DatabaseVisitor)
    }
}

impl TemplateDatabase {
    /// Parses a database from JSON text.
    pub fn from_json_str(text: &str) -> FingerMatchResult<Self> {
        serde_json::from_str(text).map_err(|err| FingerMatchError::DatabaseFormat {
            reason: err.to_string(),
        })
    }

    /// Serializes the database to compact JSON.
    pub fn to_json_string(&self) -> FingerMatchResult<String> {
        serde_json::to_string(self).map_err(|err| FingerMatchError::DatabaseFormat {
            reason: err.to_string(),
        })
    }

    /// Loads a database from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> FingerMatchResult<Self> {
        let file = File::open(path).map_err(|err| FingerMatchError::DatabaseIo {
            reason: err.to_string(),
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|err| {
            if err.is_io() {
                FingerMatchError::DatabaseIo {
                    reason: err.to_string(),
                }
            } else {
                FingerMatchError::DatabaseFormat {
                    reason: err.to_string(),
                }
            }
        })
    }

    /// Writes the database to a JSON file, replacing it.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> FingerMatchResult<()> {
        let io_err = |err: std::io::Error| FingerMatchError::DatabaseIo {
            reason: err.to_string(),
        };
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self).map_err(|err| FingerMatchError::DatabaseIo {
            reason: err.to_string(),
        })?;
        writer.flush().map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::TemplateDatabase;
    use crate::minutiae::PointKey;
    use crate::util::FingerMatchError;

    const LEGACY: &str = r#"{
        "person_b": {
            "Termination": {"(5, 9)": [[0.5, 0.25, 0.5], [90.0, 45.5, 45.5]]},
            "Bifurcation": {}
        },
        "person_a": {
            "Termination": {},
            "Bifurcation": {
                "(30, 2)": [[0.9], [10.0]],
                "(1, 1)": [[0.7], [120.0]]
            }
        }
    }"#;

    #[test]
    fn reads_legacy_layout_in_document_order() {
        let db = TemplateDatabase::from_json_str(LEGACY).unwrap();
        assert_eq!(db.labels().collect::<Vec<_>>(), vec!["person_b", "person_a"]);

        let b = db.get("person_b").unwrap();
        let profile = b.terminations().get(&PointKey::new(5, 9)).unwrap();
        assert_eq!(profile.ratios(), &[0.5, 0.25, 0.5]);
        assert_eq!(profile.angles(), &[90.0, 45.5, 45.5]);

        let a = db.get("person_a").unwrap();
        let keys: Vec<_> = a.bifurcations().keys().collect();
        assert_eq!(keys, vec![PointKey::new(30, 2), PointKey::new(1, 1)]);
    }

    #[test]
    fn write_then_read_preserves_contents() {
        let db = TemplateDatabase::from_json_str(LEGACY).unwrap();
        let text = db.to_json_string().unwrap();
        assert!(text.contains("\"(5, 9)\""));
        assert_eq!(TemplateDatabase::from_json_str(&text).unwrap(), db);
    }

    #[test]
    fn rejects_mismatched_profile() {
        let text = r#"{"x": {"Termination": {"(1, 1)": [[0.5, 0.6], [10.0]]}}}"#;
        let err = TemplateDatabase::from_json_str(text).unwrap_err();
        assert!(matches!(err, FingerMatchError::DatabaseFormat { .. }));
        assert!(err.to_string().contains("2 ratios but 1 angles"));
    }

    #[test]
    fn rejects_malformed_key() {
        let text = r#"{"x": {"Termination": {"1;1": [[0.5], [10.0]]}}}"#;
        let err = TemplateDatabase::from_json_str(text).unwrap_err();
        assert!(err.to_string().contains("invalid point key"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TemplateDatabase::load_json("/nonexistent/fingermatch/db.json").unwrap_err();
        assert!(matches!(err, FingerMatchError::DatabaseIo { .. }));
    }
}

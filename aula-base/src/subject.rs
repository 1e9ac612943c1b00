// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Subject module.
//!
//! Subjects partition questions and exams. They have no lifecycle of their
//! own: a subject exists once something has been stored under it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{db::Database, error::Error};

/// Maximum length, in characters, of a subject identifier.
pub const MAX_SUBJECT_LEN: usize = 64;

/// Validated, case-sensitive subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subject(String);

impl Subject {
    pub fn new(subject: &str) -> Result<Self, Error> {
        if subject.is_empty() {
            return Err(Error::MalformedRequest(
                "subject is required".to_owned(),
            ));
        }
        if subject.chars().count() > MAX_SUBJECT_LEN {
            return Err(Error::MalformedRequest(format!(
                "subject must be at most {} characters",
                MAX_SUBJECT_LEN
            )));
        }
        if !subject
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::MalformedRequest(format!(
                "subject '{}' may only contain letters, digits, '-' and '_'",
                subject
            )));
        }
        Ok(Self(subject.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Subject {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Subject::new(&value)
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.0
    }
}

/// Read side of the subjects in use.
#[derive(Clone)]
pub struct SubjectRegistry {
    db: Database,
}

impl SubjectRegistry {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Distinct subjects with at least one question or exam, ascending.
    pub async fn list(&self) -> Result<Vec<Subject>, Error> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT subject FROM questions UNION SELECT subject FROM exams ORDER BY subject",
                )?;
                let subjects = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(subjects.into_iter().map(Subject).collect())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use test_log::test;

    #[test]
    fn test_valid_subjects() {
        for subject in ["matematica", "Matemática", "fisica-2", "quimica_organica"] {
            assert_eq!(Subject::new(subject).unwrap().as_str(), subject);
        }
    }

    #[test]
    fn test_subjects_are_case_sensitive() {
        assert_ne!(
            Subject::new("Matematica").unwrap(),
            Subject::new("matematica").unwrap()
        );
    }

    #[test]
    fn test_invalid_subjects() {
        let too_long = "a".repeat(MAX_SUBJECT_LEN + 1);
        for subject in ["", " ", "mate matica", "drop;table", "a/b", too_long.as_str()] {
            assert!(
                matches!(Subject::new(subject), Err(Error::MalformedRequest(_))),
                "{subject:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_deserialize_validates() {
        let subject: Subject = serde_json::from_str("\"historia\"").unwrap();
        assert_eq!(subject.to_string(), "historia");
        assert!(serde_json::from_str::<Subject>("\"\"").is_err());
    }

    #[test(tokio::test)]
    async fn test_registry_lists_distinct_subjects() {
        let db = Database::open(&DbConfig::Memory).await.unwrap();
        db.call(|conn| {
            conn.execute_batch(
                "INSERT INTO questions (name, difficulty, statement, options, answer, subject) VALUES ('q', 'easy', 's', '{}', 'A', 'matematica');
                 INSERT INTO questions (name, difficulty, statement, options, answer, subject) VALUES ('q', 'easy', 's', '{}', 'A', 'matematica');
                 INSERT INTO exams (name, subject, created_at) VALUES ('e', 'fisica', '2025-01-01T00:00:00Z');",
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let registry = SubjectRegistry::new(db);
        let subjects: Vec<String> = registry
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(subjects, vec!["fisica", "matematica"]);
    }
}

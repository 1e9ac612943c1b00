// Copyright 2025 Kore Ledger, SL
// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Question module.
//!
//! Owns question records. A question is validated in two passes before it is
//! stored: first the presence and shape of every required field, then its
//! answer key. Records are immutable once written.

use std::{collections::BTreeMap, fmt, str::FromStr};

use rusqlite::{OptionalExtension, Row, params, types::Type};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::{db::Database, error::Error, subject::Subject};

pub use answer_key::is_valid_answer_key;

mod answer_key;

const TARGET_QUESTION: &str = "Aula-Question";

/// Option label reserved for the answer key when it travels inside `options`.
pub const ANSWER_LABEL: &str = "answer";

/// Number of questions returned when listing a subject.
pub const SUBJECT_LISTING_LIMIT: i64 = 10;

/// Columns read by [`read_question`], for a `questions` table aliased `q`.
pub(crate) const QUESTION_COLUMNS: &str =
    "q.id, q.name, q.difficulty, q.statement, q.options, q.answer, q.subject";

/// Question difficulty. Unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(other) => other,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Difficulty::Other(_))
    }
}

impl FromStr for Difficulty {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            other => Difficulty::Other(other.to_owned()),
        })
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        let Ok(difficulty) = Difficulty::from_str(&value);
        Ok(difficulty)
    }
}

/// Stored question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub name: String,
    pub difficulty: Difficulty,
    pub statement: String,
    pub subject: Subject,
    pub options: BTreeMap<String, String>,
    pub answer: String,
}

/// Question creation input, exactly as received.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewQuestion {
    pub name: Option<String>,
    pub difficulty: Option<String>,
    pub statement: Option<String>,
    pub options: Option<Value>,
    /// Decoded loosely so that a non-string key is classified here.
    pub answer: Option<Value>,
}

/// A question that passed validation and can be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuestionDraft {
    name: String,
    difficulty: Difficulty,
    statement: String,
    subject: Subject,
    options: BTreeMap<String, String>,
    answer: String,
}

fn required(field: &str, value: Option<String>) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MalformedRequest(format!("{} is required", field))),
    }
}

/// Labels given to options sent as a list, in order.
const LIST_LABELS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn list_label(position: usize) -> String {
    match LIST_LABELS.chars().nth(position) {
        Some(label) => label.to_string(),
        None => (position + 1).to_string(),
    }
}

/// Options with the answer key candidates found inside them.
type ParsedOptions = (BTreeMap<String, String>, Vec<Value>);

/// Splits the raw `options` into labelled texts and the answer key
/// candidates embedded in them.
///
/// Two shapes are accepted: an object of label to text, which may carry the
/// key under [`ANSWER_LABEL`], and a list of `{text, isCorrect}` entries,
/// labelled `A`, `B`, ... in order.
fn parse_options(options: Option<Value>) -> Result<ParsedOptions, Error> {
    let (labelled, embedded) = match options {
        Some(Value::Object(map)) => parse_option_map(map)?,
        Some(Value::Array(list)) => parse_option_list(list)?,
        None | Some(Value::Null) => {
            return Err(Error::MalformedRequest(
                "options is required".to_owned(),
            ));
        }
        Some(_) => {
            return Err(Error::MalformedRequest(
                "options must be an object of label to text".to_owned(),
            ));
        }
    };

    if labelled.is_empty() {
        return Err(Error::MalformedRequest(
            "options must contain at least one option".to_owned(),
        ));
    }

    Ok((labelled, embedded))
}

fn parse_option_map(
    map: serde_json::Map<String, Value>,
) -> Result<ParsedOptions, Error> {
    let mut labelled = BTreeMap::new();
    let mut embedded = vec![];
    for (label, text) in map {
        if label == ANSWER_LABEL {
            embedded.push(text);
            continue;
        }
        if label.trim().is_empty() {
            return Err(Error::MalformedRequest(
                "option labels must not be empty".to_owned(),
            ));
        }
        let Value::String(text) = text else {
            return Err(Error::MalformedRequest(format!(
                "option '{}' must be a string",
                label
            )));
        };
        labelled.insert(label, text);
    }
    Ok((labelled, embedded))
}

fn parse_option_list(list: Vec<Value>) -> Result<ParsedOptions, Error> {
    let mut labelled = BTreeMap::new();
    let mut embedded = vec![];
    for (position, entry) in list.into_iter().enumerate() {
        let label = list_label(position);
        let Value::Object(mut entry) = entry else {
            return Err(Error::MalformedRequest(format!(
                "option {} must be an object with a text",
                position + 1
            )));
        };
        let Some(Value::String(text)) = entry.remove("text") else {
            return Err(Error::MalformedRequest(format!(
                "option {} must have a string text",
                position + 1
            )));
        };
        match entry.remove("isCorrect") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {}
            Some(Value::Bool(true)) => embedded.push(Value::String(label.clone())),
            Some(_) => {
                return Err(Error::MalformedRequest(format!(
                    "isCorrect of option {} must be a boolean",
                    position + 1
                )));
            }
        }
        labelled.insert(label, text);
    }
    Ok((labelled, embedded))
}

/// Picks the answer key: the top-level value wins over embedded ones.
fn answer_key(
    answer: Option<Value>,
    mut embedded: Vec<Value>,
) -> Result<Option<String>, Error> {
    let answer = match answer {
        Some(Value::Null) | None => {
            if embedded.len() > 1 {
                return Err(Error::InvalidAnswerKey(format!(
                    "{} options are marked as the answer",
                    embedded.len()
                )));
            }
            embedded.pop()
        }
        answer => answer,
    };

    match answer {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(answer)) => Ok(Some(answer)),
        Some(_) => Err(Error::InvalidAnswerKey(
            "answer must be an option label".to_owned(),
        )),
    }
}

impl QuestionDraft {
    fn validate(subject: &str, question: NewQuestion) -> Result<Self, Error> {
        let subject = Subject::new(subject)?;
        let name = required("name", question.name)?;
        let difficulty = required("difficulty", question.difficulty)?;
        let statement = required("statement", question.statement)?;
        let (options, embedded) = parse_options(question.options)?;

        let answer = answer_key(question.answer, embedded)?;
        if !is_valid_answer_key(&options, answer.as_deref()) {
            return Err(match answer {
                None => Error::InvalidAnswerKey("answer is required".to_owned()),
                Some(answer) => Error::InvalidAnswerKey(format!(
                    "answer '{}' is not one of the option labels",
                    answer
                )),
            });
        }
        let answer = answer.unwrap_or_default();

        let Ok(difficulty) = Difficulty::from_str(&difficulty);
        if !difficulty.is_recognized() {
            debug!(
                TARGET_QUESTION,
                "Unrecognized difficulty '{}' kept as is", difficulty
            );
        }

        Ok(Self {
            name,
            difficulty,
            statement,
            subject,
            options,
            answer,
        })
    }
}

/// Maps a row selected with [`QUESTION_COLUMNS`].
pub(crate) fn read_question(row: &Row<'_>) -> rusqlite::Result<Question> {
    let options: String = row.get(4)?;
    let options = serde_json::from_str(&options).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
    })?;
    let subject: String = row.get(6)?;
    let subject = Subject::new(&subject).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
    })?;
    let difficulty: String = row.get(2)?;
    let Ok(difficulty) = Difficulty::from_str(&difficulty);

    Ok(Question {
        id: row.get(0)?,
        name: row.get(1)?,
        difficulty,
        statement: row.get(3)?,
        subject,
        options,
        answer: row.get(5)?,
    })
}

#[derive(Clone)]
pub struct QuestionStore {
    db: Database,
}

impl QuestionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validates and persists a question under `subject`.
    pub async fn create(
        &self,
        subject: &str,
        question: NewQuestion,
    ) -> Result<Question, Error> {
        let draft = QuestionDraft::validate(subject, question)?;
        let options = serde_json::to_string(&draft.options).map_err(|e| {
            Error::Database(format!("Can not encode options: {}", e))
        })?;

        let question = self
            .db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO questions (name, difficulty, statement, options, answer, subject) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        draft.name,
                        draft.difficulty.as_str(),
                        draft.statement,
                        options,
                        draft.answer,
                        draft.subject.as_str()
                    ],
                )?;
                Ok(Question {
                    id: conn.last_insert_rowid(),
                    name: draft.name,
                    difficulty: draft.difficulty,
                    statement: draft.statement,
                    subject: draft.subject,
                    options: draft.options,
                    answer: draft.answer,
                })
            })
            .await?;

        debug!(
            TARGET_QUESTION,
            "Question {} stored under {}", question.id, question.subject
        );
        Ok(question)
    }

    /// Looks a question up. A missing id is `Ok(None)`.
    pub async fn get(&self, id: i64) -> Result<Option<Question>, Error> {
        self.db
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM questions q WHERE q.id = ?1",
                    QUESTION_COLUMNS
                );
                Ok(conn
                    .query_row(&sql, params![id], read_question)
                    .optional()?)
            })
            .await
    }

    /// Latest questions of `subject`, newest first.
    pub async fn list_by_subject(
        &self,
        subject: &str,
    ) -> Result<Vec<Question>, Error> {
        let subject = Subject::new(subject)?;
        self.db
            .call(move |conn| {
                let sql = format!(
                    "SELECT {} FROM questions q WHERE q.subject = ?1 ORDER BY q.id DESC LIMIT ?2",
                    QUESTION_COLUMNS
                );
                let mut stmt = conn.prepare(&sql)?;
                let questions = stmt
                    .query_map(
                        params![subject.as_str(), SUBJECT_LISTING_LIMIT],
                        read_question,
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(questions)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use serde_json::json;
    use test_log::test;

    fn new_question(options: Value, answer: Option<&str>) -> NewQuestion {
        NewQuestion {
            name: Some("Q1".to_owned()),
            difficulty: Some("easy".to_owned()),
            statement: Some("1+1?".to_owned()),
            options: Some(options),
            answer: answer.map(Value::from),
        }
    }

    async fn store() -> QuestionStore {
        QuestionStore::new(Database::open(&DbConfig::Memory).await.unwrap())
    }

    async fn count(store: &QuestionStore) -> i64 {
        store
            .db
            .call(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM questions", [], |row| {
                    row.get(0)
                })?)
            })
            .await
            .unwrap()
    }

    #[test]
    fn test_difficulty_roundtrip() {
        assert_eq!(Difficulty::from_str("hard").unwrap(), Difficulty::Hard);
        let other = Difficulty::from_str("legendary").unwrap();
        assert_eq!(other, Difficulty::Other("legendary".to_owned()));
        assert!(!other.is_recognized());
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("legendary"));
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        let mut question = new_question(json!({"A": "1"}), Some("A"));
        question.name = None;
        assert_eq!(
            QuestionDraft::validate("matematica", question),
            Err(Error::MalformedRequest("name is required".to_owned()))
        );

        let mut question = new_question(json!({"A": "1"}), Some("A"));
        question.statement = Some("   ".to_owned());
        assert_eq!(
            QuestionDraft::validate("matematica", question),
            Err(Error::MalformedRequest("statement is required".to_owned()))
        );

        let mut question = new_question(json!({"A": "1"}), Some("A"));
        question.options = None;
        assert_eq!(
            QuestionDraft::validate("matematica", question),
            Err(Error::MalformedRequest("options is required".to_owned()))
        );
    }

    #[test]
    fn test_structure_checked_before_answer_key() {
        let mut question = new_question(json!({"A": "1"}), None);
        question.difficulty = None;
        assert!(matches!(
            QuestionDraft::validate("matematica", question),
            Err(Error::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_options_shape() {
        for options in [json!([]), json!({}), json!({"A": 1}), json!({"": "x"}), json!({"answer": "A"})] {
            assert!(
                matches!(
                    QuestionDraft::validate("matematica", new_question(options.clone(), Some("A"))),
                    Err(Error::MalformedRequest(_))
                ),
                "{options} should be rejected"
            );
        }
    }

    #[test]
    fn test_answer_key_errors() {
        assert_eq!(
            QuestionDraft::validate("matematica", new_question(json!({"A": "x", "B": "y"}), None)),
            Err(Error::InvalidAnswerKey("answer is required".to_owned()))
        );
        assert_eq!(
            QuestionDraft::validate("matematica", new_question(json!({"A": "x"}), Some("C"))),
            Err(Error::InvalidAnswerKey(
                "answer 'C' is not one of the option labels".to_owned()
            ))
        );
    }

    #[test]
    fn test_embedded_answer_is_lifted() {
        let draft = QuestionDraft::validate(
            "matematica",
            new_question(json!({"A": "4", "B": "5", "C": "6", "answer": "B"}), None),
        )
        .unwrap();
        assert_eq!(draft.answer, "B");
        assert_eq!(draft.options.len(), 3);
        assert!(!draft.options.contains_key(ANSWER_LABEL));
    }

    #[test]
    fn test_non_string_answer_same_for_both_sources() {
        let mut top_level = new_question(json!({"A": "x", "B": "y"}), None);
        top_level.answer = Some(json!(1));
        let embedded = new_question(json!({"A": "x", "B": "y", "answer": 1}), None);

        let expected = Err(Error::InvalidAnswerKey(
            "answer must be an option label".to_owned(),
        ));
        assert_eq!(QuestionDraft::validate("matematica", top_level), expected);
        assert_eq!(QuestionDraft::validate("matematica", embedded), expected);
    }

    #[test]
    fn test_option_list_is_labelled() {
        let draft = QuestionDraft::validate(
            "matematica",
            new_question(
                json!([
                    {"text": "3", "isCorrect": false},
                    {"text": "4", "isCorrect": true},
                    {"text": "5"}
                ]),
                None,
            ),
        )
        .unwrap();
        assert_eq!(draft.answer, "B");
        assert_eq!(
            draft.options,
            BTreeMap::from([
                ("A".to_owned(), "3".to_owned()),
                ("B".to_owned(), "4".to_owned()),
                ("C".to_owned(), "5".to_owned()),
            ])
        );
    }

    #[test]
    fn test_option_list_answer_errors() {
        let none_marked = new_question(json!([{"text": "3"}, {"text": "4"}]), None);
        assert_eq!(
            QuestionDraft::validate("matematica", none_marked),
            Err(Error::InvalidAnswerKey("answer is required".to_owned()))
        );

        let two_marked = new_question(
            json!([{"text": "3", "isCorrect": true}, {"text": "4", "isCorrect": true}]),
            None,
        );
        assert!(matches!(
            QuestionDraft::validate("matematica", two_marked),
            Err(Error::InvalidAnswerKey(_))
        ));

        for options in [json!(["3"]), json!([{"isCorrect": true}]), json!([{"text": "3", "isCorrect": "yes"}])] {
            assert!(matches!(
                QuestionDraft::validate("matematica", new_question(options, None)),
                Err(Error::MalformedRequest(_))
            ));
        }
        assert_eq!(list_label(1), "B");
        assert_eq!(list_label(26), "27");
    }

    #[test]
    fn test_top_level_answer_wins() {
        let draft = QuestionDraft::validate(
            "matematica",
            new_question(json!({"A": "4", "B": "5", "answer": "B"}), Some("A")),
        )
        .unwrap();
        assert_eq!(draft.answer, "A");
    }

    #[test(tokio::test)]
    async fn test_create_and_get() {
        let store = store().await;
        let question = store
            .create("matematica", new_question(json!({"A": "1", "B": "2"}), Some("B")))
            .await
            .unwrap();
        assert!(question.id > 0);
        assert_eq!(question.subject.as_str(), "matematica");

        let stored = store.get(question.id).await.unwrap();
        assert_eq!(stored, Some(question));
        assert_eq!(store.get(99_999_999).await.unwrap(), None);
    }

    #[test(tokio::test)]
    async fn test_rejected_question_not_persisted() {
        let store = store().await;
        let result = store
            .create("matematica", new_question(json!({"A": "x", "B": "y"}), None))
            .await;
        assert!(matches!(result, Err(Error::InvalidAnswerKey(_))));
        let result = store
            .create("matematica", new_question(json!({"A": "x"}), Some("Z")))
            .await;
        assert!(matches!(result, Err(Error::InvalidAnswerKey(_))));
        assert_eq!(count(&store).await, 0);
    }

    #[test(tokio::test)]
    async fn test_list_by_subject() {
        let store = store().await;
        for _ in 0..(SUBJECT_LISTING_LIMIT + 2) {
            store
                .create("matematica", new_question(json!({"A": "1"}), Some("A")))
                .await
                .unwrap();
        }
        store
            .create("fisica", new_question(json!({"A": "1"}), Some("A")))
            .await
            .unwrap();

        let listed = store.list_by_subject("matematica").await.unwrap();
        assert_eq!(listed.len() as i64, SUBJECT_LISTING_LIMIT);
        assert!(listed.windows(2).all(|pair| pair[0].id > pair[1].id));
        assert!(listed.iter().all(|q| q.subject.as_str() == "matematica"));

        assert!(store.list_by_subject("biologia").await.unwrap().is_empty());
        assert!(matches!(
            store.list_by_subject("no spaces").await,
            Err(Error::MalformedRequest(_))
        ));
    }
}

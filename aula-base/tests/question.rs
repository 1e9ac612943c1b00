mod common;

use aula_base::{error::Error, question::is_valid_answer_key};
use common::{create_api, create_question, question_request};
use test_log::test;

#[test(tokio::test)]
async fn test_question_by_id() {
    let api = create_api().await;
    let stored = create_question(&api, "Q1").await;

    let found = api.question(stored.id).await.unwrap();
    assert_eq!(found, Some(stored.clone()));
    assert!(is_valid_answer_key(&stored.options, Some(&stored.answer)));

    // Absent ids are not an error.
    assert_eq!(api.question(stored.id + 1000).await.unwrap(), None);
}

#[test(tokio::test)]
async fn test_rejected_question_leaves_no_trace() {
    let api = create_api().await;

    assert!(matches!(
        api.create_question("matematica", question_request("Q", None)).await,
        Err(Error::InvalidAnswerKey(_))
    ));
    assert!(matches!(
        api.create_question("no valid", question_request("Q", Some("B")))
            .await,
        Err(Error::MalformedRequest(_))
    ));

    assert!(api.questions_by_subject("matematica").await.unwrap().is_empty());
    assert!(api.subjects().await.unwrap().is_empty());
    assert_eq!(api.metrics().questions_created(), 0);
}

use aula_base::{
    Api,
    config::Config,
    exam::NewExam,
    question::{NewQuestion, Question},
};
use prometheus_client::registry::Registry;
use serde_json::{Value, json};

pub async fn create_api() -> Api {
    let mut registry = Registry::default();
    Api::new(Config::in_memory(), &mut registry).await.unwrap()
}

pub fn question_request(name: &str, answer: Option<&str>) -> NewQuestion {
    NewQuestion {
        name: Some(name.to_owned()),
        difficulty: Some("easy".to_owned()),
        statement: Some("1+1?".to_owned()),
        options: Some(json!({"A": "1", "B": "2"})),
        answer: answer.map(Value::from),
    }
}

pub fn exam_request(questions: Vec<i64>) -> NewExam {
    NewExam {
        name: Some("E1".to_owned()),
        description: Some("d".to_owned()),
        subject: Some("matematica".to_owned()),
        questions: Some(questions),
    }
}

pub async fn create_question(api: &Api, name: &str) -> Question {
    api.create_question("matematica", question_request(name, Some("B")))
        .await
        .unwrap()
}

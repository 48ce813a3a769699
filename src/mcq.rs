use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The designated correct answer as the backend sent it.
///
/// Some responses carry the option text, others a zero-based index. The
/// received form is kept as-is so exported JSON matches the server's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Index(usize),
    Text(String),
}

/// Question id; database rows use numbers, the AI processor sometimes strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum McqId {
    Number(u64),
    Text(String),
}

/// One extracted multiple-choice question.
///
/// Keys this struct does not name (`explanation`, `pdf_id`, `created_at`, ...)
/// are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<McqId>,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<AnswerKey>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Mcq {
    pub fn new(question: impl Into<String>, options: Vec<String>, answer: AnswerKey) -> Self {
        Self {
            id: None,
            question: question.into(),
            options,
            answer: Some(answer),
            correct_answer: None,
            extra: Map::new(),
        }
    }

    fn answer_keys(&self) -> impl Iterator<Item = &AnswerKey> {
        self.answer.iter().chain(self.correct_answer.iter())
    }

    /// Position of the correct option.
    ///
    /// An in-range numeric key from `answer` or `correct_answer` wins;
    /// otherwise the first option whose text matches a text key
    /// case-insensitively (ignoring surrounding whitespace).
    pub fn correct_index(&self) -> Option<usize> {
        let by_index = self.answer_keys().find_map(|key| match key {
            AnswerKey::Index(index) => (*index < self.options.len()).then_some(*index),
            AnswerKey::Text(_) => None,
        });

        by_index.or_else(|| {
            self.answer_keys().find_map(|key| match key {
                AnswerKey::Text(text) => {
                    let wanted = text.trim().to_lowercase();
                    self.options
                        .iter()
                        .position(|option| option.trim().to_lowercase() == wanted)
                }
                AnswerKey::Index(_) => None,
            })
        })
    }

    pub fn is_correct(&self, option_index: usize) -> bool {
        self.correct_index() == Some(option_index)
    }
}

/// `A`, `B`, … `Z`, then `AA`, `AB`, …
pub fn option_label(index: usize) -> String {
    let mut label = String::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.insert(0, (b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    label
}

/// Indented JSON as offered by "Copy JSON" and local downloads.
pub fn to_pretty_json(mcqs: &[Mcq]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(mcqs)
}

pub fn from_json(json: &str) -> serde_json::Result<Vec<Mcq>> {
    let value: Value = serde_json::from_str(json)?;
    Ok(mcqs_from_value(&value)?.unwrap_or_default())
}

/// Pulls the question list out of any response shape the backend uses:
/// a bare array, `{mcqs}`, `{status, mcqs}`, `{success, mcqs, count}` or
/// `{data: {mcqs}}`. `Ok(None)` means the payload holds no list at all.
pub fn mcqs_from_value(value: &Value) -> serde_json::Result<Option<Vec<Mcq>>> {
    match value {
        Value::Array(_) => Ok(Some(Vec::<Mcq>::deserialize(value)?)),
        Value::Object(map) => {
            if let Some(list) = map.get("mcqs") {
                if list.is_null() {
                    return Ok(Some(Vec::new()));
                }
                return Ok(Some(Vec::<Mcq>::deserialize(list)?));
            }
            match map.get("data") {
                Some(data) => mcqs_from_value(data),
                None => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn capitals(answer: AnswerKey) -> Mcq {
        Mcq::new(
            "What is the capital of France?",
            vec!["Paris".into(), "London".into(), "Rome".into(), "Berlin".into()],
            answer,
        )
    }

    #[test]
    fn text_answer_marks_matching_option_only() {
        let mcq = capitals(AnswerKey::Text("Paris".into()));
        let marked: Vec<usize> = (0..4).filter(|i| mcq.is_correct(*i)).collect();
        assert_eq!(marked, vec![0]);
    }

    #[test]
    fn text_answer_is_case_insensitive() {
        let mcq = capitals(AnswerKey::Text("  rome ".into()));
        assert_eq!(mcq.correct_index(), Some(2));
    }

    #[test]
    fn index_answer_ignores_option_text() {
        let mut mcq = capitals(AnswerKey::Index(2));
        mcq.options[2] = "Paris".into();
        assert_eq!(mcq.correct_index(), Some(2));
        assert!(!mcq.is_correct(0));
    }

    #[test]
    fn unmatched_or_out_of_range_answers_mark_nothing() {
        assert_eq!(capitals(AnswerKey::Index(4)).correct_index(), None);
        assert_eq!(capitals(AnswerKey::Text("Madrid".into())).correct_index(), None);

        let mut mcq = capitals(AnswerKey::Index(0));
        mcq.answer = None;
        assert_eq!(mcq.correct_index(), None);
    }

    #[test]
    fn correct_answer_key_accepts_index() {
        let mcq: Mcq = serde_json::from_value(json!({
            "question": "2 + 2?",
            "options": ["3", "4", "5", "22"],
            "correct_answer": 1
        }))
        .unwrap();
        assert_eq!(mcq.answer, None);
        assert_eq!(mcq.correct_answer, Some(AnswerKey::Index(1)));
        assert_eq!(mcq.correct_index(), Some(1));
    }

    #[test]
    fn both_answer_keys_prefer_the_index() {
        let mcq: Mcq = serde_json::from_value(json!({
            "question": "Q",
            "options": ["a", "b", "c"],
            "answer": "a",
            "correct_answer": 2
        }))
        .unwrap();
        assert_eq!(mcq.correct_index(), Some(2));

        let mcq: Mcq = serde_json::from_value(json!({
            "question": "Q",
            "options": ["a", "b", "c"],
            "answer": 7,
            "correct_answer": "B"
        }))
        .unwrap();
        assert_eq!(mcq.correct_index(), Some(1));
    }

    #[test]
    fn string_and_numeric_ids() {
        let mcqs = mcqs_from_value(&json!({"mcqs": [
            {"id": "q1", "question": "A?", "options": ["x"], "answer": "x"},
            {"id": 2, "question": "B?", "options": ["y"], "answer": 0}
        ]}))
        .unwrap()
        .unwrap();

        assert_eq!(mcqs[0].id, Some(McqId::Text("q1".into())));
        assert_eq!(mcqs[1].id, Some(McqId::Number(2)));
    }

    #[test]
    fn server_fields_survive_export() {
        let payload = json!({"mcqs": [{
            "id": 1,
            "pdf_id": 3,
            "question": "Q",
            "options": ["a", "b"],
            "answer": "a",
            "explanation": "because",
            "created_at": "2024-05-01T10:00:00"
        }]});

        let mcqs = mcqs_from_value(&payload).unwrap().unwrap();
        let json = to_pretty_json(&mcqs).unwrap();
        assert!(json.contains("\"explanation\": \"because\""));
        assert!(json.contains("\"pdf_id\": 3"));
        assert!(json.contains("created_at"));

        let back = from_json(&json).unwrap();
        assert_eq!(back, mcqs);
        assert_eq!(back[0].extra.get("explanation"), Some(&json!("because")));
    }

    #[test]
    fn pretty_json_round_trip_preserves_order_and_fields() {
        let mut first = capitals(AnswerKey::Text("Paris".into()));
        first.id = Some(McqId::Number(1));
        let second = Mcq::new(
            "Largest planet?",
            vec!["Mars".into(), "Jupiter".into(), "Venus".into(), "Earth".into()],
            AnswerKey::Index(1),
        );
        let list = vec![first, second];

        let json = to_pretty_json(&list).unwrap();
        assert!(json.contains("\n  {"));
        assert_eq!(from_json(&json).unwrap(), list);
    }

    #[test]
    fn payload_shapes() {
        let item = json!({"question": "Q", "options": ["a", "b"], "answer": "a"});

        let bare = json!([item.clone()]);
        let wrapped = json!({"mcqs": [item.clone()]});
        let with_status = json!({"status": "success", "mcqs": [item.clone()], "count": 1});
        let nested = json!({"success": true, "data": {"mcqs": [item]}});

        for payload in [bare, wrapped, with_status, nested] {
            let mcqs = mcqs_from_value(&payload).unwrap().unwrap();
            assert_eq!(mcqs.len(), 1);
            assert_eq!(mcqs[0].question, "Q");
        }

        let ack = json!({"status": "success", "message": "queued"});
        assert_eq!(mcqs_from_value(&ack).unwrap(), None);
        assert_eq!(
            mcqs_from_value(&json!({"mcqs": null})).unwrap(),
            Some(Vec::new())
        );
    }

    #[test]
    fn labels() {
        assert_eq!(option_label(0), "A");
        assert_eq!(option_label(3), "D");
        assert_eq!(option_label(25), "Z");
        assert_eq!(option_label(26), "AA");
    }
}

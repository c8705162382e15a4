use super::check_len;
use super::normalize::{Failure, ObjectReader};
use crate::constants::{EXAMPLE_ANSWER_LEN, EXAMPLE_INTENT_LEN, EXAMPLE_QUESTION_LEN};
use crate::violation::{FieldPath, Violation};
use serde::Serialize;
use serde_json::Value;

/// A question with its ideal answer, grounded in documentation pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FewShotExample {
    pub intent: String,
    pub question: String,
    pub ideal_answer: String,
    pub source_pages: Vec<String>,
    #[serde(skip)]
    pub path: FieldPath,
}

impl FewShotExample {
    pub fn normalize(value: &Value, path: FieldPath) -> Result<FewShotExample, Vec<Failure>> {
        let mut r = ObjectReader::new(value, path).map_err(|f| vec![f])?;
        let intent = r.required_str("intent");
        let question = r.required_str("question");
        let ideal_answer = r.required_str("ideal_answer");
        let source_pages = r.str_list("source_pages");
        let path = r.path().clone();

        match (intent, question, ideal_answer) {
            (Some(intent), Some(question), Some(ideal_answer)) if !r.has_failures() => {
                Ok(FewShotExample {
                    intent,
                    question,
                    ideal_answer,
                    source_pages,
                    path,
                })
            }
            _ => Err(r.into_failures()),
        }
    }

    pub fn check(&self) -> Vec<Violation> {
        let p = &self.path;
        let mut out: Vec<Violation> = [
            check_len(&p.key("intent"), &self.intent, EXAMPLE_INTENT_LEN),
            check_len(&p.key("question"), &self.question, EXAMPLE_QUESTION_LEN),
            check_len(&p.key("ideal_answer"), &self.ideal_answer, EXAMPLE_ANSWER_LEN),
        ]
        .into_iter()
        .flatten()
        .collect();
        out.extend(super::check_url_list(&p.key("source_pages"), &self.source_pages));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_answer_and_bad_source_are_reported() {
        let v = json!({
            "intent": "install",
            "question": "How do I install it?",
            "ideal_answer": "Use cargo.",
            "source_pages": ["https://docs.example.com/install", "install.md"]
        });
        let path = FieldPath::root().key("few_shot_examples").index(2);
        let e = FewShotExample::normalize(&v, path).unwrap();
        let found: Vec<String> = e.check().iter().map(|v| v.path.to_string()).collect();
        assert_eq!(
            found,
            vec![
                "few_shot_examples[2].ideal_answer",
                "few_shot_examples[2].source_pages[1]"
            ]
        );
    }

    #[test]
    fn missing_question_fails_normalization() {
        let v = json!({ "intent": "install", "ideal_answer": "Run the installer script." });
        let failures = FewShotExample::normalize(&v, FieldPath::root()).unwrap_err();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.to_string(), "question");
    }
}

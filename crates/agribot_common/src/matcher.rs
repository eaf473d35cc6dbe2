//! Knowledge base lookup.
//!
//! Case-insensitive substring containment, first match in file order wins.
//! Q&A pairs are tried before plants. Only "entry text inside the question"
//! is checked, and empty entry text never matches.

use crate::answer::AnswerResult;
use crate::knowledge::{KnowledgeBase, PlantRecord, QaRecord};
use crate::language::Language;

/// Find a canned answer for `question`, or `None` to fall through to the model
pub fn lookup(kb: &KnowledgeBase, question: &str, language: &Language) -> Option<AnswerResult> {
    let question = question.to_lowercase();

    for qa in kb.basic_qa() {
        if contained_in(qa.question.as_deref(), &question) {
            return Some(english_pair(qa));
        }
        if language.is_hindi() && contained_in(qa.hindi_question.as_deref(), &question) {
            return Some(hindi_pair(qa));
        }
    }

    kb.plants()
        .iter()
        .find(|plant| {
            contained_in(plant.name.as_deref(), &question)
                || contained_in(plant.hindi_name.as_deref(), &question)
        })
        .map(plant_pair)
}

fn contained_in(candidate: Option<&str>, question: &str) -> bool {
    match candidate {
        Some(text) if !text.is_empty() => question.contains(&text.to_lowercase()),
        _ => false,
    }
}

fn non_empty(value: &Option<String>) -> Option<&String> {
    value.as_ref().filter(|s| !s.is_empty())
}

/// Hindi answer, or the English one when the Hindi text is empty or missing
fn hindi_or_english(qa: &QaRecord) -> Option<String> {
    non_empty(&qa.hindi_answer)
        .or(qa.answer.as_ref())
        .cloned()
}

fn english_pair(qa: &QaRecord) -> AnswerResult {
    AnswerResult::from_knowledge(qa.answer.clone().unwrap_or_default(), hindi_or_english(qa))
}

fn hindi_pair(qa: &QaRecord) -> AnswerResult {
    let hindi = hindi_or_english(qa);
    AnswerResult::from_knowledge(hindi.clone().unwrap_or_default(), hindi)
}

fn plant_pair(plant: &PlantRecord) -> AnswerResult {
    AnswerResult::from_knowledge(
        plant.description.clone().unwrap_or_default(),
        Some(plant.hindi_description.clone().unwrap_or_default()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Source;

    fn kb() -> KnowledgeBase {
        KnowledgeBase::from_json(
            r#"{
                "plants": [
                    {"name": "Wheat", "hindi_name": "गेहूं", "description": "A cereal grain.", "hindi_description": "एक अनाज।"},
                    {"name": "Rice", "hindi_name": "चावल", "description": "A staple grain."},
                    {"name": "", "hindi_name": "", "description": "Should never match."}
                ],
                "introduction": {
                    "basic_qa": [
                        {"question": "What is organic farming", "hindi_question": "जैविक खेती क्या है",
                         "answer": "Farming without synthetic inputs.", "hindi_answer": "रासायनिक इनपुट के बिना खेती।"},
                        {"question": "best fertilizer", "hindi_question": "सबसे अच्छा उर्वरक",
                         "answer": "Compost works well."},
                        {"question": "", "hindi_question": "", "answer": "Empty never matches."}
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_wheat_example() {
        let kb = KnowledgeBase::from_json(
            r#"{"plants": [{"name": "wheat", "description": "A cereal grain."}]}"#,
        )
        .unwrap();

        let result = lookup(&kb, "What is wheat?", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("A cereal grain."));
        assert_eq!(result.hindi_answer.as_deref(), Some(""));
        assert_eq!(result.source, Source::Json);
    }

    #[test]
    fn test_english_question_case_insensitive() {
        let result = lookup(&kb(), "Tell me: WHAT IS ORGANIC FARMING?", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("Farming without synthetic inputs."));
        assert_eq!(result.hindi_answer.as_deref(), Some("रासायनिक इनपुट के बिना खेती।"));
        assert_eq!(result.source, Source::Json);
    }

    #[test]
    fn test_missing_hindi_answer_falls_back_to_english() {
        let result = lookup(&kb(), "what is the best fertilizer?", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("Compost works well."));
        assert_eq!(result.hindi_answer.as_deref(), Some("Compost works well."));
    }

    #[test]
    fn test_hindi_question_only_in_hindi_mode() {
        let question = "जैविक खेती क्या है?";

        let hindi = lookup(&kb(), question, &Language::hindi()).unwrap();
        assert_eq!(hindi.answer.as_deref(), Some("रासायनिक इनपुट के बिना खेती।"));
        assert_eq!(hindi.hindi_answer.as_deref(), Some("रासायनिक इनपुट के बिना खेती।"));

        // English mode skips Hindi questions and no plant name matches
        assert!(lookup(&kb(), question, &Language::english()).is_none());
    }

    #[test]
    fn test_hindi_question_without_hindi_answer() {
        let result = lookup(&kb(), "सबसे अच्छा उर्वरक बताइए", &Language::hindi()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("Compost works well."));
        assert_eq!(result.hindi_answer.as_deref(), Some("Compost works well."));
    }

    #[test]
    fn test_plant_by_hindi_name() {
        let result = lookup(&kb(), "गेहूं कैसे उगाएं", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("A cereal grain."));
        assert_eq!(result.hindi_answer.as_deref(), Some("एक अनाज।"));
    }

    #[test]
    fn test_missing_hindi_description_is_empty() {
        let result = lookup(&kb(), "how to grow rice", &Language::hindi()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("A staple grain."));
        assert_eq!(result.hindi_answer.as_deref(), Some(""));
    }

    #[test]
    fn test_empty_entries_never_match() {
        assert!(lookup(&kb(), "how do tractors work", &Language::english()).is_none());
        assert!(lookup(&kb(), "how do tractors work", &Language::hindi()).is_none());
    }

    #[test]
    fn test_question_inside_entry_does_not_match() {
        // "organic" is part of an entry question, but the entry question is not in the input
        assert!(lookup(&kb(), "organic", &Language::english()).is_none());
    }

    #[test]
    fn test_first_match_in_file_order_wins() {
        let kb = KnowledgeBase::from_json(
            r#"{"introduction": {"basic_qa": [
                {"question": "grow", "answer": "first"},
                {"question": "grow tomatoes", "answer": "second"}
            ]}}"#,
        )
        .unwrap();
        let result = lookup(&kb, "how to grow tomatoes", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("first"));

        let plants = KnowledgeBase::from_json(
            r#"{"plants": [
                {"name": "Potato", "description": "Tuber."},
                {"name": "Tomato", "description": "Fruit."}
            ]}"#,
        )
        .unwrap();
        let result = lookup(&plants, "tomato or potato?", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("Tuber."));
    }

    #[test]
    fn test_qa_beats_plant() {
        let kb = KnowledgeBase::from_json(
            r#"{
                "plants": [{"name": "wheat", "description": "plant answer"}],
                "introduction": {"basic_qa": [{"question": "wheat price", "answer": "qa answer"}]}
            }"#,
        )
        .unwrap();
        let result = lookup(&kb, "what is the wheat price today", &Language::english()).unwrap();
        assert_eq!(result.answer.as_deref(), Some("qa answer"));
    }

    #[test]
    fn test_every_english_question_is_found() {
        let kb = kb();
        for qa in kb.basic_qa() {
            let Some(question) = qa.question.as_deref().filter(|q| !q.is_empty()) else {
                continue;
            };
            let input = format!("please answer: {}?", question.to_uppercase());
            let result = lookup(&kb, &input, &Language::english()).unwrap();
            assert_eq!(result.source, Source::Json);
            assert_eq!(result.answer, qa.answer);
        }
    }
}

pub mod activity;
pub mod kind;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::PracticeError;
use crate::utils::strip_paragraph_markup;
use activity::{
    decode_options, payload_type, CorrectOptions, OptionIndex, PracticeActivity, PracticeOption, SubQuestion,
};
use kind::ActivityKind;

/// One question in the shape the content platform understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedQuestion {
    pub id: String,
    pub prompt: String,
    /// Candidate answers in source option order.
    pub all_answers: Vec<String>,
    /// Correct answers in the order their indices were listed.
    pub correct_answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Question {
    SingleSelect(NormalizedQuestion),
    MultipleSelect(NormalizedQuestion),
}

impl Question {
    pub fn inner(&self) -> &NormalizedQuestion {
        match self {
            Question::SingleSelect(q) | Question::MultipleSelect(q) => q,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Question::SingleSelect(_) => "single_selection",
            Question::MultipleSelect(_) => "multiple_selection",
        }
    }
}

/// Questions for the raw `practice` payload of a practice page.
///
/// The type is read before anything else is decoded, so an unknown widget is
/// skipped whatever its other fields hold. Mistyped fields of a known widget
/// are logged like any other unusable payload.
pub fn questions_from_payload(payload: &Value, practice_id: &str, source: &str) -> Vec<Question> {
    let practice_type = payload_type(payload);
    let decoded = match ActivityKind::parse(&practice_type) {
        ActivityKind::Unrecognized(raw) => Err(PracticeError::Unrecognized(raw)),
        _ => PracticeActivity::from_payload(&practice_type, payload),
    };
    match decoded {
        Ok(activity) => {
            let description = activity.description.as_deref().unwrap_or("");
            build_questions(&practice_type, &activity, description, practice_id, source)
        }
        Err(e) => {
            report(&practice_type, source, e);
            Vec::new()
        }
    }
}

/// Classify a practice payload and build its questions.
///
/// Failures are logged with `source` (the practice page URL) and produce an
/// empty list; the caller then skips the exercise for that lesson.
pub fn build_questions(
    practice_type: &str,
    activity: &PracticeActivity,
    description: &str,
    practice_id: &str,
    source: &str,
) -> Vec<Question> {
    try_build_questions(practice_type, activity, description, practice_id).unwrap_or_else(|e| {
        report(practice_type, source, e);
        Vec::new()
    })
}

fn report(practice_type: &str, source: &str, err: PracticeError) {
    match err {
        PracticeError::Unrecognized(kind) => {
            warn!("Unrecognized practice type `{}` at {}, skipping exercise", kind, source)
        }
        e => warn!("Unusable `{}` practice at {}: {}", practice_type, source, e),
    }
}

pub fn try_build_questions(
    practice_type: &str,
    activity: &PracticeActivity,
    description: &str,
    practice_id: &str,
) -> Result<Vec<Question>, PracticeError> {
    use ActivityKind::*;

    let kind = ActivityKind::parse(practice_type);
    match &kind {
        SelectRight | SwitchesText | StrikeThrough | TagCloud => {
            multiple_select(&kind, activity, description, practice_id).map(|q| vec![q])
        }
        SwipeSelector | TwitterDragAndDrop | ImageSlider => {
            single_select(&kind, activity, description, practice_id).map(|q| vec![q])
        }
        TextDrawer | BooleanSelector => sub_questions(&kind, activity, description, practice_id),
        Unrecognized(raw) => Err(PracticeError::Unrecognized(raw.clone())),
    }
}

fn multiple_select(
    kind: &ActivityKind,
    activity: &PracticeActivity,
    description: &str,
    practice_id: &str,
) -> Result<Question, PracticeError> {
    let options: Vec<PracticeOption> = decode_options(kind.as_str(), &activity.options)?;
    let all_answers = options
        .iter()
        .enumerate()
        .map(|(index, o)| {
            o.text
                .as_deref()
                .map(strip_paragraph_markup)
                .ok_or(PracticeError::MissingLabel { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let indices = correct_indices(activity.correct_option.as_ref())?;
    let correct_answers = pick(&all_answers, indices)?;

    Ok(Question::MultipleSelect(NormalizedQuestion {
        id: format!("{}-question", practice_id),
        prompt: description.to_string(),
        all_answers,
        correct_answers,
    }))
}

fn single_select(
    kind: &ActivityKind,
    activity: &PracticeActivity,
    description: &str,
    practice_id: &str,
) -> Result<Question, PracticeError> {
    let options: Vec<PracticeOption> = decode_options(kind.as_str(), &activity.options)?;
    let unit = activity.unit.as_deref().map(str::trim).filter(|u| !u.is_empty());
    let all_answers = options
        .iter()
        .enumerate()
        .map(|(index, o)| match (&o.text, &o.value) {
            (Some(text), _) => Ok(strip_paragraph_markup(text)),
            (None, Some(value)) => Ok(match unit {
                Some(unit) => format!("{} {}", value, unit),
                None => value.to_string(),
            }),
            (None, None) => Err(PracticeError::MissingLabel { index }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let index = single_index(activity.correct_option.as_ref())?;
    let correct_answers = pick(&all_answers, std::slice::from_ref(index))?;

    Ok(Question::SingleSelect(NormalizedQuestion {
        id: format!("{}-question", practice_id),
        prompt: description.to_string(),
        all_answers,
        correct_answers,
    }))
}

fn sub_questions(
    kind: &ActivityKind,
    activity: &PracticeActivity,
    description: &str,
    practice_id: &str,
) -> Result<Vec<Question>, PracticeError> {
    let subs: Vec<SubQuestion> = decode_options(kind.as_str(), &activity.options)?;

    subs.iter()
        .map(|sub| {
            let all_answers = sub
                .options
                .iter()
                .enumerate()
                .map(|(index, o)| {
                    o.answer
                        .as_deref()
                        .or(o.text.as_deref())
                        .map(strip_paragraph_markup)
                        .ok_or(PracticeError::MissingLabel { index })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let index = single_index(sub.correct_option.as_ref())?;
            let correct_answers = pick(&all_answers, std::slice::from_ref(index))?;

            let prompt = if description.is_empty() {
                sub.text.clone()
            } else {
                format!("{}\n{}", description, sub.text)
            };

            Ok(Question::SingleSelect(NormalizedQuestion {
                id: format!("{}-question-{}", practice_id, sub.id),
                prompt,
                all_answers,
                correct_answers,
            }))
        })
        .collect()
}

fn correct_indices(correct: Option<&CorrectOptions>) -> Result<&[OptionIndex], PracticeError> {
    match correct.map(CorrectOptions::indices) {
        Some(indices) if !indices.is_empty() => Ok(indices),
        _ => Err(PracticeError::MissingCorrect),
    }
}

fn single_index(correct: Option<&CorrectOptions>) -> Result<&OptionIndex, PracticeError> {
    match correct_indices(correct)? {
        [only] => Ok(only),
        many => Err(PracticeError::AmbiguousAnswer { count: many.len() }),
    }
}

/// Map positional indices onto the answers built from the same option list.
fn pick(all_answers: &[String], indices: &[OptionIndex]) -> Result<Vec<String>, PracticeError> {
    indices
        .iter()
        .map(|i| {
            let index = i.position()?;
            all_answers
                .get(index)
                .cloned()
                .ok_or(PracticeError::IndexOutOfRange {
                    index,
                    len: all_answers.len(),
                })
        })
        .collect()
}

// ── Tests ──

//! Response schemas in the model's native schema dialect.
//!
//! These are sent as `generationConfig.responseSchema` so the model is
//! constrained to the same shapes the [`super::Validate`] impls check.

use serde_json::{json, Value};

fn string(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

fn string_list(description: &str) -> Value {
    json!({ "type": "ARRAY", "description": description, "items": { "type": "STRING" } })
}

/// Schema for [`super::TranscriptData`].
pub fn transcript_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": string("A concise summary of the entire video"),
            "segments": {
                "type": "ARRAY",
                "description": "Transcribed segments in chronological order",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "timestamp": string("Start of the segment in MM:SS format"),
                        "speaker": string("Speaker label, e.g. Speaker 1, or the name if known"),
                        "text": string("The spoken text of this segment"),
                        "language": string("Language name, e.g. English"),
                        "language_code": string("Language code, e.g. en")
                    },
                    "required": ["timestamp", "speaker", "text", "language", "language_code"]
                }
            }
        },
        "required": ["summary", "segments"]
    })
}

/// Schema for [`super::CourseData`].
pub fn course_response_schema() -> Value {
    let subsection = json!({
        "type": "OBJECT",
        "properties": {
            "heading": string("Subsection heading"),
            "content": string("Thorough explanation written for a first-time learner"),
            "examples": string_list("Examples, analogies or use cases for the concept")
        },
        "required": ["heading", "content"]
    });

    let technical_term = json!({
        "type": "OBJECT",
        "properties": {
            "term": string("The technical term"),
            "definition": string("A clear, accessible definition")
        },
        "required": ["term", "definition"]
    });

    let section = json!({
        "type": "OBJECT",
        "properties": {
            "title": string("Section title"),
            "objectiveId": {
                "type": "INTEGER",
                "description": "id of the learning objective this section addresses"
            },
            "subsections": {
                "type": "ARRAY",
                "description": "At least one subsection; split complex topics into several",
                "items": subsection
            },
            "technicalTerms": {
                "type": "ARRAY",
                "description": "Technical terms used in the section with definitions",
                "items": technical_term
            },
            "keyPoints": string_list("Essential points of the section (2-6 items)"),
            "commonMisconceptions": string_list("Mistakes learners commonly make about the topic"),
            "practicalApplications": string_list("Real-world situations where this applies")
        },
        "required": ["title", "objectiveId", "subsections", "keyPoints"]
    });

    let question = json!({
        "type": "OBJECT",
        "properties": {
            "question": string("A question testing understanding rather than recall"),
            "options": {
                "type": "ARRAY",
                "description": "Exactly four plausible answer options",
                "items": { "type": "STRING" }
            },
            "correctIndex": {
                "type": "INTEGER",
                "description": "Index of the correct option (0-3)"
            },
            "explanation": string("Why the answer is correct and the others are not")
        },
        "required": ["question", "options", "correctIndex", "explanation"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "title": string("An engaging, descriptive title for the study materials"),
            "description": string("Overview of what the materials cover"),
            "transcriptSummary": string("Summary of all major points in the video"),
            "prerequisites": string_list("Knowledge the learner should have beforehand"),
            "learningObjectives": {
                "type": "ARRAY",
                "description": "2-6 measurable learning objectives",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": {
                            "type": "INTEGER",
                            "description": "Unique identifier starting from 1"
                        },
                        "objective": string("What the learner will be able to do")
                    },
                    "required": ["id", "objective"]
                }
            },
            "sections": {
                "type": "ARRAY",
                "description": "Study sections covering every major topic (at least 2)",
                "items": section
            },
            "keyTakeaways": string_list("The most important concepts of the video (3-8 items)"),
            "quiz": {
                "type": "ARRAY",
                "description": "Multiple choice questions (3-8)",
                "items": question
            }
        },
        "required": [
            "title",
            "description",
            "transcriptSummary",
            "learningObjectives",
            "sections",
            "keyTakeaways",
            "quiz"
        ]
    })
}

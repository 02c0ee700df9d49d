//! Shared fixtures for unit tests.

use serde_json::{json, Value};

pub(crate) const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// A transcript reply that passes validation.
pub(crate) fn transcript_json() -> Value {
    json!({
        "summary": "A short lesson on adding numbers.",
        "segments": [
            {
                "timestamp": "00:00",
                "speaker": "Speaker 1",
                "text": "Today we add two and two.",
                "language": "English",
                "language_code": "en"
            },
            {
                "timestamp": "00:06",
                "speaker": "Speaker 1",
                "text": "The answer is four.",
                "language": "English",
                "language_code": "en"
            }
        ]
    })
}

/// A minimal course that passes every constraint.
pub(crate) fn course_json() -> Value {
    let section = |title: &str, objective_id: i64| {
        json!({
            "title": title,
            "objectiveId": objective_id,
            "subsections": [{ "heading": "Basics", "content": "Explained." }],
            "keyPoints": ["one", "two"]
        })
    };
    let question = json!({
        "question": "What is 2 + 2?",
        "options": ["1", "2", "3", "4"],
        "correctIndex": 3,
        "explanation": "Arithmetic."
    });

    json!({
        "title": "Intro to Arithmetic",
        "description": "Adding small numbers.",
        "transcriptSummary": "The speaker adds numbers.",
        "learningObjectives": [
            { "id": 1, "objective": "Add numbers" },
            { "id": 2, "objective": "Explain addition" }
        ],
        "sections": [section("Adding", 1), section("Why it works", 2)],
        "keyTakeaways": ["a", "b", "c"],
        "quiz": [question.clone(), question.clone(), question]
    })
}

/// Serve the API on a loopback port, backed by a stub replaying `replies`.
///
/// Returns the server's base URL and the stub.
pub(crate) async fn spawn_server(
    replies: &[String],
) -> (String, std::sync::Arc<crate::provider::stub::StubGenerator>) {
    use crate::cli::commands::{router, AppState};
    use crate::config::{Prompts, ServerSettings};
    use crate::generation::{GenerationService, VideoCache};
    use crate::provider::stub::StubGenerator;
    use crate::schema::ReferencePolicy;
    use std::sync::Arc;

    let stub = Arc::new(StubGenerator::new(
        replies.iter().map(|r| Ok(r.clone())).collect(),
    ));
    let service = GenerationService::with_components(
        stub.clone(),
        Prompts::default(),
        ReferencePolicy::Repair,
        VideoCache::disabled(),
    );
    let app = router(Arc::new(AppState { service }), &ServerSettings::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

//! End-to-end pipeline tests over both index backends

mod common;

use std::sync::Arc;

use remind_rag::generation::NO_DOCUMENTS_MESSAGE;
use remind_rag::storage::SqliteVectorStore;
use remind_rag::{Error, RagPipeline};

use common::{memory_pipeline, test_config, HashEmbedder, RecordingLlm};

fn long_document() -> String {
    (0..40)
        .map(|i| {
            format!(
                "Section {} explains how the garden irrigation schedule works in detail. \
                 Water is released at dawn and the valves close before noon.",
                i
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[tokio::test]
async fn ingest_short_text_gives_one_chunk() {
    let (pipeline, _) = memory_pipeline();
    let result = pipeline
        .ingest("This is test content.", "test.txt")
        .await
        .unwrap();

    assert_eq!(result.chunk_count, 1);
    assert_eq!(result.filename, "test.txt");
}

#[tokio::test]
async fn query_returns_matching_source() {
    let (pipeline, llm) = memory_pipeline();
    pipeline
        .ingest("This is test content.", "test.txt")
        .await
        .unwrap();

    let result = pipeline.query("What is this content?").await.unwrap();
    assert_eq!(result.answer, "Grounded answer.");
    assert!(!result.sources.is_empty());
    assert_eq!(result.sources[0].filename, "test.txt");
    for source in &result.sources {
        assert!((-1.0..=1.0).contains(&source.similarity));
    }

    let prompts = llm.prompts.lock();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("[Source 1 - test.txt]\nThis is test content."));
    assert!(prompts[0].contains("What is this content?"));
}

#[tokio::test]
async fn query_before_ingest_returns_no_documents() {
    let (pipeline, llm) = memory_pipeline();

    let result = pipeline.query("What is React?").await.unwrap();
    assert_eq!(result.answer, NO_DOCUMENTS_MESSAGE);
    assert!(result.sources.is_empty());
    assert!(llm.prompts.lock().is_empty());
}

#[tokio::test]
async fn long_document_is_split_and_top_k_bounded() {
    let (pipeline, _) = memory_pipeline();
    let result = pipeline.ingest(&long_document(), "garden.txt").await.unwrap();
    assert!(result.chunk_count > 1);

    let answer = pipeline.query("When is water released?").await.unwrap();
    assert_eq!(answer.sources.len(), 5);

    let ranks: Vec<usize> = answer.sources.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    for pair in answer.sources.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[tokio::test]
async fn delete_removes_document_from_results() {
    let (pipeline, _) = memory_pipeline();
    let kept = pipeline.ingest("Cats sleep all day.", "cats.txt").await.unwrap();
    let gone = pipeline.ingest("Dogs bark at night.", "dogs.txt").await.unwrap();

    assert!(pipeline.delete_document(&gone.id).await.unwrap());
    assert!(!pipeline.delete_document(&gone.id).await.unwrap());

    let docs = pipeline.list_documents().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id, kept.id);

    let result = pipeline.query("Do dogs bark?").await.unwrap();
    assert!(result.sources.iter().all(|s| s.filename == "cats.txt"));
}

#[tokio::test]
async fn blank_question_is_validation_error() {
    let (pipeline, _) = memory_pipeline();
    let err = pipeline.query("   ").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn sqlite_backend_persists_across_pipelines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remind.db");
    let config = test_config();

    let build = || {
        RagPipeline::from_config(
            &config,
            Arc::new(HashEmbedder),
            Arc::new(RecordingLlm::default()),
            Arc::new(SqliteVectorStore::new(&path).unwrap()),
        )
    };

    let first = build();
    first.ingest(&long_document(), "garden.txt").await.unwrap();
    drop(first);

    let second = build();
    let docs = second.list_documents().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert!(docs[0].chunk_count > 1);

    let result = second.query("irrigation valves").await.unwrap();
    assert_eq!(result.sources[0].filename, "garden.txt");
    assert_eq!(result.answer, "Grounded answer.");
}

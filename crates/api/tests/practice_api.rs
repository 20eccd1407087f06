//! Integration tests for the per-user practice surface over the local
//! backend: attempts, review queue, stats, notes, favorites, badges, reset.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, expect_json, get, post_json, put_json};
use serde_json::json;

const USER: &str = "018f0000-0000-7000-8000-000000000001";
const DOC: &str = "00000000-0000-0000-0000-00000000d0c1";

fn attempt(word_id: i32, is_correct: bool) -> serde_json::Value {
    json!({
        "doc_id": DOC,
        "word_id": word_id,
        "original": "كتاب",
        "modern": "kitap",
        "is_correct": is_correct
    })
}

fn practice_uri(tail: &str) -> String {
    format!("/api/v1/users/{USER}/practice{tail}")
}

#[tokio::test]
async fn first_correct_attempt_schedules_and_unlocks_first_word() {
    let app = common::build_test_app();

    let recorded = expect_json(
        post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await,
        StatusCode::CREATED,
    )
    .await;

    let data = &recorded["data"];
    assert_eq!(data["attempt"]["word_id"], 1);
    assert_eq!(data["attempt"]["is_correct"], true);
    assert_eq!(data["profile"]["xp"], 10);
    assert_eq!(data["profile"]["total_attempts"], 1);
    assert_eq!(data["profile"]["streak"], 1);
    assert_eq!(data["profile"]["level"], "beginner");

    let badge_ids: Vec<&str> = data["new_badges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect();
    assert_eq!(badge_ids, ["first_word"]);

    // The unlock is persisted with a timestamp.
    let badges = body_json(get(app, &practice_uri("/badges")).await).await;
    assert_eq!(badges["data"][0]["id"], "first_word");
    assert!(badges["data"][0]["unlocked_at"].is_string());
}

#[tokio::test]
async fn badges_are_not_unlocked_twice() {
    let app = common::build_test_app();

    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await;
    let second = body_json(
        post_json(app.clone(), &practice_uri("/attempts"), attempt(2, true)).await,
    )
    .await;

    assert!(second["data"]["new_badges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_answers_still_earn_xp() {
    let app = common::build_test_app();

    let recorded = body_json(
        post_json(app.clone(), &practice_uri("/attempts"), attempt(1, false)).await,
    )
    .await;
    assert_eq!(recorded["data"]["profile"]["xp"], 2);
    assert_eq!(recorded["data"]["profile"]["total_correct"], 0);
    assert!(recorded["data"]["new_badges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn fresh_attempts_are_not_due_for_review_yet() {
    let app = common::build_test_app();

    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await;

    // A just-recorded attempt is scheduled at least one day out.
    let due = body_json(get(app, &practice_uri("/review")).await).await;
    assert!(due["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn difficult_words_require_more_wrong_than_correct() {
    let app = common::build_test_app();

    // Word 1 tied (excluded), word 2 net wrong (included).
    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, false)).await;
    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await;
    post_json(app.clone(), &practice_uri("/attempts"), attempt(2, false)).await;
    post_json(app.clone(), &practice_uri("/attempts"), attempt(2, false)).await;

    let hard = body_json(get(app, &practice_uri("/difficult")).await).await;
    let words = hard["data"].as_array().unwrap();
    assert_eq!(words.len(), 1);
    assert_eq!(words[0]["word_id"], 2);
}

#[tokio::test]
async fn stats_reflect_the_recorded_attempts() {
    let app = common::build_test_app();

    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await;
    post_json(app.clone(), &practice_uri("/attempts"), attempt(2, true)).await;
    post_json(app.clone(), &practice_uri("/attempts"), attempt(3, false)).await;

    let stats = body_json(get(app, &practice_uri("/stats")).await).await;
    let data = &stats["data"];
    assert_eq!(data["total_learned"], 2);
    assert_eq!(data["total_correct"], 2);
    assert_eq!(data["total_wrong"], 1);
    assert_eq!(data["accuracy"], 67);
    assert_eq!(data["today_attempts"], 3);
    assert_eq!(data["xp"], 22);
}

#[tokio::test]
async fn stats_for_a_fresh_user_are_all_zero() {
    let app = common::build_test_app();
    let stats = body_json(get(app, &practice_uri("/stats")).await).await;
    assert_eq!(stats["data"]["accuracy"], 0);
    assert_eq!(stats["data"]["total_learned"], 0);
    assert_eq!(stats["data"]["streak"], 0);
}

#[tokio::test]
async fn note_put_is_an_upsert() {
    let app = common::build_test_app();
    let note = json!({ "doc_id": DOC, "word_id": 3, "text": "hatt-ı rık'a" });

    let first = body_json(put_json(app.clone(), &practice_uri("/notes"), note).await).await;
    assert_eq!(first["data"]["text"], "hatt-ı rık'a");

    let replaced = json!({ "doc_id": DOC, "word_id": 3, "text": "düzeltildi" });
    put_json(app.clone(), &practice_uri("/notes"), replaced).await;

    let notes = body_json(get(app, &practice_uri("/notes")).await).await;
    let items = notes["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "düzeltildi");
}

#[tokio::test]
async fn favorite_toggle_flips_membership() {
    let app = common::build_test_app();
    let word = json!({ "doc_id": DOC, "word_id": 5 });

    let on = body_json(
        post_json(app.clone(), &practice_uri("/favorites"), word.clone()).await,
    )
    .await;
    assert_eq!(on["data"]["is_favorite"], true);

    let favorites = body_json(get(app.clone(), &practice_uri("/favorites")).await).await;
    assert_eq!(favorites["data"][0], format!("{DOC}-5"));

    let off = body_json(post_json(app.clone(), &practice_uri("/favorites"), word).await).await;
    assert_eq!(off["data"]["is_favorite"], false);

    let favorites = body_json(get(app, &practice_uri("/favorites")).await).await;
    assert!(favorites["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn users_do_not_see_each_others_state() {
    let app = common::build_test_app();
    let other = "018f0000-0000-7000-8000-000000000002";

    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await;

    let stats = body_json(
        get(app, &format!("/api/v1/users/{other}/practice/stats")).await,
    )
    .await;
    assert_eq!(stats["data"]["total_correct"], 0);
}

#[tokio::test]
async fn reset_drops_all_learning_state() {
    let app = common::build_test_app();

    post_json(app.clone(), &practice_uri("/attempts"), attempt(1, true)).await;
    put_json(
        app.clone(),
        &practice_uri("/notes"),
        json!({ "doc_id": DOC, "word_id": 1, "text": "n" }),
    )
    .await;

    assert_eq!(
        delete(app.clone(), &practice_uri("")).await.status(),
        StatusCode::NO_CONTENT
    );

    let stats = body_json(get(app.clone(), &practice_uri("/stats")).await).await;
    assert_eq!(stats["data"]["total_correct"], 0);
    let notes = body_json(get(app.clone(), &practice_uri("/notes")).await).await;
    assert!(notes["data"].as_array().unwrap().is_empty());
    let badges = body_json(get(app, &practice_uri("/badges")).await).await;
    assert!(badges["data"].as_array().unwrap().is_empty());
}

// Composition tests — the pipelines end to end with in-memory models.
//
// The ONNX classifiers are replaced by deterministic fakes so these tests
// exercise loading, defaulting, aggregation and report writing without
// model files. Inputs and outputs live under the system temp directory.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use sentiscope::bot::features::ProfileFeatures;
use sentiscope::bot::traits::{BotDetector, BotVerdict};
use sentiscope::pipeline;
use sentiscope::report::models::{AccountReport, CommentSentiment};
use sentiscope::sentiment::traits::{Sentiment, SentimentClassifier, SentimentResult};

/// Keyword classifier: "love"/"great" are positive, "hate"/"awful" negative,
/// everything else neutral.
struct KeywordClassifier {
    calls: AtomicUsize,
}

impl KeywordClassifier {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SentimentClassifier for KeywordClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        let result = if lower.contains("love") || lower.contains("great") {
            SentimentResult {
                sentiment: Sentiment::Positive,
                confidence: 0.9,
            }
        } else if lower.contains("hate") || lower.contains("awful") {
            SentimentResult {
                sentiment: Sentiment::Negative,
                confidence: 0.8,
            }
        } else {
            SentimentResult {
                sentiment: Sentiment::Neutral,
                confidence: 0.6,
            }
        };
        Ok(result)
    }
}

/// Flags accounts with fewer than 10 followers as bots.
struct FollowerThresholdDetector;

impl BotDetector for FollowerThresholdDetector {
    fn detect(&self, features: &ProfileFeatures) -> Result<BotVerdict> {
        if features.followers < 10.0 {
            Ok(BotVerdict::new(true, 0.92))
        } else {
            Ok(BotVerdict::new(false, 0.07))
        }
    }
}

struct FailingClassifier;

#[async_trait]
impl SentimentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<SentimentResult> {
        anyhow::bail!("model exploded")
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sentiscope-it-{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(path: &PathBuf, value: &Value) {
    std::fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
}

fn sample_profile() -> Value {
    json!({
        "username": "chai_and_code",
        "fullName": "Priya Sharma",
        "biography": "I love building things ☕",
        "externalUrl": "https://priya.dev",
        "followersCount": 1520,
        "followsCount": 310,
        "postsCount": 2,
        "hasProfilePic": true,
        "isPrivate": false,
        "profilePicUrl": "https://cdn.example/small.jpg",
        "profilePicUrlHD": "https://cdn.example/hd.jpg"
    })
}

fn sample_posts() -> Value {
    json!([
        {
            "id": "3300000000000000001",
            "shortCode": "C1aaa",
            "url": "https://www.instagram.com/p/C1aaa/",
            "displayUrl": "https://cdn.example/1.jpg",
            "caption": "Great day at the conference",
            "hashtags": ["rust", "conf"],
            "likesCount": 120,
            "commentsCount": 3,
            "timestamp": "2025-01-05T10:00:00.000Z",
            "latestComments": [
                {"text": "love this!", "ownerUsername": "ana", "ownerProfilePicUrl": "a.jpg"},
                {"text": "awful lighting", "ownerUsername": "ben"},
                {"text": "where is this?", "ownerUsername": "cy"}
            ]
        },
        {
            "id": "3300000000000000002",
            "shortCode": "C1bbb",
            "url": "https://www.instagram.com/p/C1bbb/",
            "caption": "bahut accha laga 😍",
            "likesCount": -1,
            "commentsCount": 0
        }
    ])
}

// ============================================================
// Account pipeline
// ============================================================

#[tokio::test]
async fn account_report_has_expected_shape_and_totals() {
    let dir = scratch_dir("account-shape");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    let output_path = dir.join("out").join("processed.json");
    write(&profile_path, &sample_profile());
    write(&posts_path, &sample_posts());

    let classifier = KeywordClassifier::new();
    let report = pipeline::account::run(
        &profile_path,
        &posts_path,
        &output_path,
        &classifier,
        &FollowerThresholdDetector,
    )
    .await
    .unwrap();

    assert_eq!(report.username, "chai_and_code");
    assert_eq!(report.profile_pic_url.as_deref(), Some("https://cdn.example/hd.jpg"));
    assert!(!report.is_bot);
    assert!((report.bot_confidence_score - 7.0).abs() < 1e-9);
    assert_eq!(report.biography_sentiment.sentiment, Sentiment::Positive);

    // Totals are plain sums, hidden-like sentinel included
    assert_eq!(report.total_likes, 119);
    assert_eq!(report.total_comments, 3);

    assert_eq!(report.latest_posts.len(), 2);
    assert_eq!(report.latest_posts[0].caption_sentiment, Sentiment::Positive);
    assert_eq!(report.latest_posts[1].caption_sentiment, Sentiment::Neutral);
    assert_eq!(report.latest_posts[1].alt, "");
    assert!(report.latest_posts[1].hashtags.is_empty());

    let first = &report.sentiment_response[0];
    assert_eq!(first.post_url.as_deref(), Some("https://www.instagram.com/p/C1aaa/"));
    assert_eq!(first.summary.positive, 1);
    assert_eq!(first.summary.negative, 1);
    assert_eq!(first.summary.neutral, 1);
    assert_eq!(first.comments[1].user.as_deref(), Some("ben"));
    assert_eq!(first.comments[1].profile_pic_url, None);

    assert!(report.sentiment_response[1].comments.is_empty());

    // bio + 2 captions + 3 comments
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 6);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn account_report_file_round_trips() {
    let dir = scratch_dir("account-roundtrip");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    let output_path = dir.join("processed.json");
    write(&profile_path, &sample_profile());
    write(&posts_path, &sample_posts());

    let report = pipeline::account::run(
        &profile_path,
        &posts_path,
        &output_path,
        &KeywordClassifier::new(),
        &FollowerThresholdDetector,
    )
    .await
    .unwrap();

    let text = std::fs::read_to_string(&output_path).unwrap();
    assert!(text.contains("bahut accha laga 😍"), "non-ASCII must be written verbatim");
    assert!(text.starts_with("{\n  \"fullName\""), "two-space indent, fullName first");

    let back: AccountReport = serde_json::from_str(&text).unwrap();
    assert_eq!(back, report);

    let raw: Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&str> = raw.as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "fullName",
        "username",
        "biography",
        "followersCount",
        "followsCount",
        "postsCount",
        "profilePicUrl",
        "isBot",
        "botConfidenceScore",
        "biographySentiment",
        "totalLikes",
        "totalComments",
        "latestPosts",
        "sentimentResponse",
    ] {
        assert!(keys.contains(&key), "missing key {key}");
    }
    assert_eq!(raw["latestPosts"][0]["shortcode"], "C1aaa");
    assert_eq!(raw["latestPosts"][0]["takenAtTimestamp"], "2025-01-05T10:00:00.000Z");
    assert_eq!(raw["sentimentResponse"][0]["comments"][0]["profile_pic_url"], "a.jpg");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn empty_profile_and_no_posts() {
    let dir = scratch_dir("account-empty");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    let output_path = dir.join("processed.json");
    write(&profile_path, &json!({}));
    write(&posts_path, &json!([]));

    let report = pipeline::account::run(
        &profile_path,
        &posts_path,
        &output_path,
        &KeywordClassifier::new(),
        &FollowerThresholdDetector,
    )
    .await
    .unwrap();

    assert_eq!(report.total_likes, 0);
    assert_eq!(report.total_comments, 0);
    assert!(report.latest_posts.is_empty());
    assert!(report.sentiment_response.is_empty());
    assert_eq!(report.profile_pic_url, None);
    // Zero followers trips the fake detector
    assert!(report.is_bot);
    assert!(report.bot_confidence_score >= 0.0 && report.bot_confidence_score <= 100.0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn missing_posts_file_is_reported() {
    let dir = scratch_dir("account-missing");
    let profile_path = dir.join("profile.json");
    write(&profile_path, &sample_profile());

    let err = pipeline::account::run(
        &profile_path,
        &dir.join("nope.json"),
        &dir.join("processed.json"),
        &KeywordClassifier::new(),
        &FollowerThresholdDetector,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().starts_with("Input file not found"));
    assert!(!dir.join("processed.json").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn classifier_failure_leaves_no_report() {
    let dir = scratch_dir("account-failure");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    write(&profile_path, &sample_profile());
    write(&posts_path, &sample_posts());

    let result = pipeline::account::run(
        &profile_path,
        &posts_path,
        &dir.join("processed.json"),
        &FailingClassifier,
        &FollowerThresholdDetector,
    )
    .await;

    assert!(result.is_err());
    assert!(!dir.join("processed.json").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn like_total_overflow_is_an_error() {
    let dir = scratch_dir("account-overflow");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    let output_path = dir.join("processed.json");
    write(&profile_path, &sample_profile());
    write(
        &posts_path,
        &json!([
            {"shortCode": "Cbig1", "likesCount": 9_000_000_000_000_000_000i64},
            {"shortCode": "Cbig2", "likesCount": 9_000_000_000_000_000_000i64}
        ]),
    );

    let err = pipeline::account::run(
        &profile_path,
        &posts_path,
        &output_path,
        &KeywordClassifier::new(),
        &FollowerThresholdDetector,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Cbig2"), "got: {err}");
    assert!(!output_path.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn empty_object_posts_file_means_no_posts() {
    let dir = scratch_dir("account-empty-object");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    let output_path = dir.join("processed.json");
    write(&profile_path, &sample_profile());
    write(&posts_path, &json!({}));

    let report = pipeline::account::run(
        &profile_path,
        &posts_path,
        &output_path,
        &KeywordClassifier::new(),
        &FollowerThresholdDetector,
    )
    .await
    .unwrap();

    assert!(report.latest_posts.is_empty());
    assert_eq!(report.total_likes, 0);
    assert!(output_path.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn non_empty_object_posts_file_is_rejected() {
    let dir = scratch_dir("account-object");
    let profile_path = dir.join("profile.json");
    let posts_path = dir.join("posts.json");
    write(&profile_path, &sample_profile());
    write(&posts_path, &json!({"caption": "single post, not a list"}));

    let err = pipeline::account::run(
        &profile_path,
        &posts_path,
        &dir.join("processed.json"),
        &KeywordClassifier::new(),
        &FollowerThresholdDetector,
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("array of post objects"));

    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================
// Comment pipeline
// ============================================================

#[tokio::test]
async fn comments_pipeline_defaults_missing_owner() {
    let dir = scratch_dir("comments-defaults");
    let input = dir.join("comments.json");
    let output = dir.join("sentiment.json");
    write(
        &input,
        &json!([
            {"text": "I love it", "owner": {"username": "ana", "profile_pic_url": "a.jpg"}},
            {"text": "hate this"},
            {"owner": {"username": "cy"}}
        ]),
    );

    let results = pipeline::comments::run(&input, &output, &KeywordClassifier::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].sentiment, Sentiment::Positive);
    assert_eq!(results[1].user.as_deref(), Some("unknown"));
    assert_eq!(results[1].profile_pic_url.as_deref(), Some(""));
    assert_eq!(results[1].sentiment, Sentiment::Negative);
    assert_eq!(results[2].text, "");
    assert_eq!(results[2].sentiment, Sentiment::Neutral);

    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("[\n    {"), "four-space indent");
    let back: Vec<CommentSentiment> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, results);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn comments_pipeline_rejects_non_array() {
    let dir = scratch_dir("comments-object");
    let input = dir.join("comments.json");
    let output = dir.join("sentiment.json");
    write(&input, &json!({"text": "not a list"}));

    let err = pipeline::comments::run(&input, &output, &KeywordClassifier::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("array of comment objects"));
    assert!(!output.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn comments_pipeline_rejects_malformed_json() {
    let dir = scratch_dir("comments-malformed");
    let input = dir.join("comments.json");
    std::fs::write(&input, "[{\"text\": ").unwrap();

    let err = pipeline::comments::run(&input, &dir.join("out.json"), &KeywordClassifier::new())
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Failed to parse JSON"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn comments_pipeline_handles_more_than_one_chunk() {
    let dir = scratch_dir("comments-chunks");
    let input = dir.join("comments.json");
    let output = dir.join("sentiment.json");
    let comments: Vec<Value> = (0..75)
        .map(|i| {
            let text = if i % 3 == 0 { "great" } else { "ok" };
            json!({"text": text, "owner": {"username": format!("u{i}")}})
        })
        .collect();
    write(&input, &Value::Array(comments));

    let results = pipeline::comments::run(&input, &output, &KeywordClassifier::new())
        .await
        .unwrap();

    assert_eq!(results.len(), 75);
    assert_eq!(results[74].user.as_deref(), Some("u74"));
    let positives = results
        .iter()
        .filter(|c| c.sentiment == Sentiment::Positive)
        .count();
    assert_eq!(positives, 25);

    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================
// Comments -> summarize
// ============================================================

#[tokio::test]
async fn summarize_counts_written_file() {
    let dir = scratch_dir("summarize");
    let input = dir.join("comments.json");
    let output = dir.join("sentiment.json");
    write(
        &input,
        &json!([
            {"text": "love"},
            {"text": "great"},
            {"text": "awful"},
            {"text": "fine"}
        ]),
    );

    pipeline::comments::run(&input, &output, &KeywordClassifier::new())
        .await
        .unwrap();
    let (comments, summary) = pipeline::summarize_file(&output).unwrap();

    assert_eq!(comments.len(), 4);
    assert_eq!(summary.positive, 2);
    assert_eq!(summary.negative, 1);
    assert_eq!(summary.neutral, 1);
    assert_eq!(summary.total() as usize, comments.len());

    std::fs::remove_dir_all(&dir).unwrap();
}

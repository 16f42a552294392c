// Account pipeline: profile + posts -> enriched account report.
//
// 1. Load the profile and score it for bot likelihood
// 2. Load the posts
// 3. Classify the biography
// 4. For each post, classify the caption and its latest comments in one
//    batch, tally the comment sentiments and accumulate like/comment totals
// 5. Write the report once

use std::path::Path;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::{debug, info};

use crate::bot::features::ProfileFeatures;
use crate::bot::traits::BotDetector;
use crate::instagram::models::{Post, Profile};
use crate::instagram::read_json;
use crate::report::models::{
    AccountReport, CommentSentiment, LatestPost, PostSentiment, ScoredSentiment,
};
use crate::report::summary::SentimentSummary;
use crate::sentiment::traits::SentimentClassifier;

/// Indentation of the account report file.
pub const REPORT_INDENT: usize = 2;

/// Run the account pipeline end to end and return the written report.
pub async fn run(
    profile_path: &Path,
    posts_path: &Path,
    output_path: &Path,
    classifier: &dyn SentimentClassifier,
    detector: &dyn BotDetector,
) -> Result<AccountReport> {
    let profile: Profile = read_json(profile_path)?;
    let posts = parse_posts(read_json(posts_path)?)
        .with_context(|| format!("Invalid posts file {}", posts_path.display()))?;

    info!(
        username = %profile.username,
        posts = posts.len(),
        "Loaded scraped account data"
    );

    let report = build_report(&profile, &posts, classifier, detector).await?;

    crate::output::write_json(output_path, &report, REPORT_INDENT)
        .with_context(|| format!("Failed to save report to {}", output_path.display()))?;
    info!(path = %output_path.display(), "Account report written");

    Ok(report)
}

/// Turn the posts file body into posts. The scraper writes `{}` when an
/// account has no items, which counts as no posts.
pub fn parse_posts(value: Value) -> Result<Vec<Post>> {
    match value {
        Value::Array(_) => serde_json::from_value(value).context("Malformed post record"),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        _ => anyhow::bail!("Expected an array of post objects"),
    }
}

fn post_label(post: &Post) -> &str {
    post.short_code.as_deref().unwrap_or("<no shortcode>")
}

/// Build the enriched report from already-loaded records.
pub async fn build_report(
    profile: &Profile,
    posts: &[Post],
    classifier: &dyn SentimentClassifier,
    detector: &dyn BotDetector,
) -> Result<AccountReport> {
    let features = ProfileFeatures::from_profile(profile);
    let verdict = detector
        .detect(&features)
        .context("Bot detection failed")?;

    let bio = classifier
        .classify(&profile.biography)
        .await
        .context("Failed to classify biography")?;

    let mut total_likes = 0i64;
    let mut total_comments = 0i64;
    let mut latest_posts = Vec::with_capacity(posts.len());
    let mut sentiment_response = Vec::with_capacity(posts.len());

    let pb = ProgressBar::new(posts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Posts [{bar:30}] {pos}/{len} ({eta})")
            .context("Invalid progress template")?,
    );

    for post in posts {
        total_likes = total_likes
            .checked_add(post.likes_count)
            .with_context(|| format!("Like total overflows at post {}", post_label(post)))?;
        total_comments = total_comments
            .checked_add(post.comments_count)
            .with_context(|| format!("Comment total overflows at post {}", post_label(post)))?;

        let (latest, comments) = analyze_post(post, classifier).await?;
        latest_posts.push(latest);
        sentiment_response.push(comments);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(AccountReport {
        full_name: profile.full_name.clone(),
        username: profile.username.clone(),
        biography: profile.biography.clone(),
        followers_count: profile.followers_count,
        follows_count: profile.follows_count,
        posts_count: profile.posts_count,
        profile_pic_url: profile.best_profile_pic_url(),
        is_bot: verdict.is_bot,
        bot_confidence_score: verdict.confidence,
        biography_sentiment: ScoredSentiment {
            sentiment: bio.sentiment,
            score: bio.confidence,
        },
        total_likes,
        total_comments,
        latest_posts,
        sentiment_response,
    })
}

/// Classify one post's caption and comments with a single batch call.
/// The caption is always the first text in the batch.
async fn analyze_post(
    post: &Post,
    classifier: &dyn SentimentClassifier,
) -> Result<(LatestPost, PostSentiment)> {
    let mut texts = Vec::with_capacity(post.latest_comments.len() + 1);
    texts.push(post.caption.clone());
    texts.extend(post.latest_comments.iter().map(|c| c.text.clone()));

    let results = classifier.classify_batch(&texts).await.with_context(|| {
        format!("Failed to classify post {}", post_label(post))
    })?;
    if results.len() != texts.len() {
        anyhow::bail!(
            "Classifier returned {} results for {} texts",
            results.len(),
            texts.len()
        );
    }

    let caption = results[0];
    let mut summary = SentimentSummary::default();
    let comments: Vec<CommentSentiment> = post
        .latest_comments
        .iter()
        .zip(&results[1..])
        .map(|(comment, result)| {
            summary.record(result.sentiment);
            CommentSentiment {
                user: comment.owner_username.clone(),
                text: comment.text.clone(),
                sentiment: result.sentiment,
                profile_pic_url: comment.owner_profile_pic_url.clone(),
                confidence: result.confidence.abs(),
            }
        })
        .collect();

    debug!(
        shortcode = ?post.short_code,
        caption_sentiment = %caption.sentiment,
        comments = comments.len(),
        "Analyzed post"
    );

    let latest = LatestPost {
        id: post.id.clone(),
        shortcode: post.short_code.clone(),
        display_url: post.display_url.clone(),
        alt: post.alt.clone(),
        caption: post.caption.clone(),
        hashtags: post.hashtags.clone(),
        like_count: post.likes_count,
        comment_count: post.comments_count,
        taken_at_timestamp: post.timestamp.clone(),
        caption_sentiment: caption.sentiment,
    };

    let sentiment = PostSentiment {
        post_url: post.url.clone(),
        comments,
        summary,
    };

    Ok((latest, sentiment))
}

// Colored terminal output for finished reports.

use colored::Colorize;

use crate::report::models::{AccountReport, CommentSentiment};
use crate::report::summary::SentimentSummary;
use crate::sentiment::traits::Sentiment;

/// Display the headline numbers of an account report.
pub fn display_account_report(report: &AccountReport) {
    println!(
        "\n{}",
        format!("=== Account report for @{} ===", report.username).bold()
    );
    if !report.full_name.is_empty() {
        println!("  Name: {}", report.full_name);
    }
    println!(
        "  Followers: {}  Following: {}  Posts: {}",
        report.followers_count, report.follows_count, report.posts_count
    );

    let bot_str = if report.is_bot {
        "likely bot".red().bold().to_string()
    } else {
        "likely human".green().to_string()
    };
    println!(
        "  Bot check: {} ({:.1}% bot confidence)",
        bot_str, report.bot_confidence_score
    );
    println!(
        "  Biography sentiment: {} ({:.2})",
        colorize_sentiment(report.biography_sentiment.sentiment),
        report.biography_sentiment.score
    );
    println!(
        "  Posts analyzed: {}  Total likes: {}  Total comments: {}",
        report.latest_posts.len(),
        report.total_likes,
        report.total_comments
    );

    let mut overall = SentimentSummary::default();
    for post in &report.sentiment_response {
        overall += post.summary;
    }
    if overall.total() > 0 {
        println!("\n  Comment sentiment across all posts:");
        display_summary(&overall);
    }
}

/// Display a positive / negative / neutral breakdown.
pub fn display_summary(summary: &SentimentSummary) {
    for (sentiment, count) in [
        (Sentiment::Positive, summary.positive),
        (Sentiment::Negative, summary.negative),
        (Sentiment::Neutral, summary.neutral),
    ] {
        println!(
            "    {:<10} {:>5}  ({:.0}%)",
            colorize_sentiment(sentiment),
            count,
            summary.percent(sentiment)
        );
    }
}

/// Display the most confident negative comments, if any.
pub fn display_negative_comments(comments: &[CommentSentiment], limit: usize) {
    let mut negative: Vec<&CommentSentiment> = comments
        .iter()
        .filter(|c| c.sentiment == Sentiment::Negative)
        .collect();
    if negative.is_empty() {
        return;
    }
    negative.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    println!("\n  Most negative comments:");
    for comment in negative.into_iter().take(limit) {
        let user = comment.user.as_deref().unwrap_or("unknown");
        let preview = super::truncate_chars(&comment.text, 100);
        println!(
            "    {} @{}: {}",
            format!("[{:.2}]", comment.confidence).dimmed(),
            user,
            preview.dimmed()
        );
    }
}

fn colorize_sentiment(sentiment: Sentiment) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => sentiment.as_str().green(),
        Sentiment::Negative => sentiment.as_str().red(),
        Sentiment::Neutral => sentiment.as_str().normal(),
    }
}

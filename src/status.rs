// System status display — where models are expected and whether they exist.

use std::path::Path;

use colored::Colorize;

use crate::config::Config;
use crate::sentiment::download::{
    SENTIMENT_CONFIG_FILE, SENTIMENT_MODEL_FILE, SENTIMENT_TOKENIZER_FILE,
};

/// Display model and configuration status to the terminal.
pub fn show(config: &Config) {
    println!("Model directory: {}", config.model_dir.display());

    println!("\nSentiment model: {}", config.sentiment_dir.display());
    for file in [SENTIMENT_MODEL_FILE, SENTIMENT_TOKENIZER_FILE, SENTIMENT_CONFIG_FILE] {
        print_file(file, &config.sentiment_dir.join(file));
    }
    if !crate::sentiment::download::sentiment_files_present(&config.sentiment_dir) {
        println!("  Run `sentiscope download-model` to fetch it.");
        println!("{}", crate::sentiment::download::EXPORT_HINT);
    }

    println!("\nBot detection:");
    print_file("model", &config.bot_model_path);
    print_file("scaler", &config.bot_scaler_path);

    println!(
        "\nInference: max {} tokens per text, batches of {}",
        config.max_tokens, config.batch_size
    );
}

fn print_file(label: &str, path: &Path) {
    match std::fs::metadata(path) {
        Ok(meta) => println!(
            "  {} {:<16} {} ({})",
            "✓".green(),
            label,
            path.display(),
            format_bytes(meta.len())
        ),
        Err(_) => println!(
            "  {} {:<16} {} (missing)",
            "✗".red(),
            label,
            path.display()
        ),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

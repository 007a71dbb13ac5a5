use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{ItemId, Rating, RatingLabel, UserId};
use server::{EngineConfig, MovieRecommendation, RecommendationEngine};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;

/// RiceRecs - Content-based Movie Recommendation Engine
#[derive(Parser)]
#[command(name = "rice-recs")]
#[command(about = "Movie recommendations from likes and dislikes using TF-IDF content similarity", long_about = None)]
struct Cli {
    /// Path to the movie catalog CSV
    #[arg(long, default_value = "data/filmes.csv")]
    catalog: PathBuf,

    /// Path to the ratings CSV
    #[arg(long, default_value = "data/avaliacoes.csv")]
    ratings: PathBuf,

    /// Optional JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return (default from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Show which liked title each recommendation is closest to
        #[arg(long)]
        explain: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Rate a movie, then show the updated recommendations
    Rate {
        #[arg(long)]
        user_id: UserId,

        /// Catalog index of the movie
        #[arg(long)]
        item_id: ItemId,

        /// 1/like or 0/dislike
        #[arg(long, value_parser = parse_label)]
        label: RatingLabel,

        /// Number of recommendations to show afterwards
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Precision, recall and F1 of the recommendations against the ratings
    Evaluate {
        /// Evaluate a single user
        #[arg(long, conflicts_with = "all", required_unless_present = "all")]
        user_id: Option<UserId>,

        /// Evaluate every user and report averages
        #[arg(long)]
        all: bool,

        /// Size of the recommendation list
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the catalog
    Items {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Show a user's ratings
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

fn parse_label(value: &str) -> Result<RatingLabel, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "like" | "liked" => Ok(RatingLabel::Liked),
        "0" | "dislike" | "disliked" => Ok(RatingLabel::Disliked),
        other => Err(format!("expected 1/like or 0/dislike, got '{}'", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::load_or_default(cli.config.as_deref())?;
    debug!("Engine config: {:?}", config);

    // Load and index the catalog (this may take a moment)
    let start = Instant::now();
    let engine = RecommendationEngine::from_files(&cli.catalog, &cli.ratings, config)
        .context("Failed to start recommendation engine")?;
    eprintln!(
        "{} Indexed {} movies in {:?}",
        "✓".green(),
        engine.list_items().len(),
        start.elapsed()
    );

    let default_limit = engine.config().default_limit;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            explain,
            json,
        } => handle_recommend(&engine, user_id, limit.unwrap_or(default_limit), explain, json).await?,
        Commands::Rate {
            user_id,
            item_id,
            label,
            limit,
        } => handle_rate(&engine, user_id, item_id, label, limit.unwrap_or(default_limit)).await?,
        Commands::Evaluate { user_id, all, limit } => {
            let limit = limit.unwrap_or(default_limit);
            match (user_id, all) {
                (_, true) => handle_evaluate_all(&engine, limit).await?,
                (Some(user_id), false) => handle_evaluate(&engine, user_id, limit).await?,
                (None, false) => bail!("Either --user-id or --all is required"),
            }
        }
        Commands::Items { json } => handle_items(&engine, json)?,
        Commands::Search { title } => handle_search(&engine, &title),
        Commands::User { user_id } => handle_user(&engine, user_id)?,
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(&engine, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    engine: &RecommendationEngine,
    user_id: UserId,
    limit: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    let Some(recommendations) = engine.get_recommendations(user_id, limit).await? else {
        println!(
            "{}",
            format!("User {} has not liked any movie yet, nothing to recommend", user_id).yellow()
        );
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(&recommendations, explain);
    }
    Ok(())
}

/// Handle the 'rate' command
async fn handle_rate(
    engine: &RecommendationEngine,
    user_id: UserId,
    item_id: ItemId,
    label: RatingLabel,
    limit: usize,
) -> Result<()> {
    let previous = engine.record_rating(Rating::new(user_id, item_id, label))?;

    let model = engine.model();
    let title = model
        .catalog()
        .resolve(item_id)
        .and_then(|index| model.catalog().title(index))
        .unwrap_or("?");
    let verb = if label.is_liked() { "liked".green() } else { "disliked".red() };
    match previous {
        Some(old) if old != label => println!("User {} now {} {} (was {:?})", user_id, verb, title, old),
        _ => println!("User {} {} {}", user_id, verb, title),
    }
    println!();

    handle_recommend(engine, user_id, limit, false, false).await
}

/// Handle the 'evaluate --user-id' command
async fn handle_evaluate(engine: &RecommendationEngine, user_id: UserId, limit: usize) -> Result<()> {
    let Some(metrics) = engine.evaluate_user(user_id, limit).await? else {
        println!(
            "{}",
            format!("User {} has not liked any movie yet, nothing to evaluate", user_id).yellow()
        );
        return Ok(());
    };

    println!("{}", format!("Evaluation for user {} (top {}):", user_id, limit).bold().blue());
    println!("{}Precision: {:.4}", "• ".cyan(), metrics.precision);
    println!("{}Recall:    {:.4}", "• ".cyan(), metrics.recall);
    println!("{}F1:        {:.4}", "• ".cyan(), metrics.f1);

    let sections = [
        ("True positives", &metrics.true_positives),
        ("False positives", &metrics.false_positives),
        ("False negatives", &metrics.false_negatives),
        ("True negatives", &metrics.true_negatives),
    ];
    for (name, titles) in sections {
        println!("{} ({}):", name, titles.len());
        for title in titles {
            println!("  - {}", title);
        }
    }
    Ok(())
}

/// Handle the 'evaluate --all' command
async fn handle_evaluate_all(engine: &RecommendationEngine, limit: usize) -> Result<()> {
    let summary = engine.evaluate_all(limit).await?;

    println!("{}", format!("Evaluation over all users (top {}):", limit).bold().blue());
    println!("{}Users evaluated: {}", "• ".cyan(), summary.users);
    println!("{}Mean precision:  {:.4}", "• ".cyan(), summary.precision);
    println!("{}Mean recall:     {:.4}", "• ".cyan(), summary.recall);
    println!("{}Mean F1:         {:.4}", "• ".cyan(), summary.f1);
    Ok(())
}

/// Handle the 'items' command
fn handle_items(engine: &RecommendationEngine, json: bool) -> Result<()> {
    let items = engine.list_items();
    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    for entry in &items {
        println!(
            "{}: {} ({}) [{}]",
            entry.index.to_string().green(),
            entry.title,
            entry.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string()),
            entry.genres.join(", ")
        );
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(engine: &RecommendationEngine, title: &str) {
    let matches = engine.search_items(title);

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for entry in matches.iter().take(20) {
        println!(
            "{}: {} [{}]",
            entry.index.to_string().green(),
            entry.title,
            entry.genres.join(", ")
        );
    }
}

/// Handle the 'user' command
fn handle_user(engine: &RecommendationEngine, user_id: UserId) -> Result<()> {
    let ratings = engine.user_ratings(user_id);
    if ratings.is_empty() {
        return Err(anyhow!("User {} has no ratings", user_id));
    }

    let model = engine.model();
    let catalog = model.catalog();
    let title_of = |rating: &Rating| {
        catalog
            .resolve(rating.item_id)
            .and_then(|index| catalog.title(index))
            .map(str::to_string)
            .unwrap_or_else(|| format!("<unknown item {}>", rating.item_id))
    };

    let (liked, disliked): (Vec<&Rating>, Vec<&Rating>) = ratings.iter().partition(|r| r.label.is_liked());

    println!("{}", format!("User ID: {}", user_id).bold().blue());
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    println!("{}Liked: {}", "• ".green(), liked.len());
    for rating in &liked {
        println!("  - {}", title_of(*rating));
    }
    println!("{}Disliked: {}", "• ".red(), disliked.len());
    for rating in &disliked {
        println!("  - {}", title_of(*rating));
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(engine: &RecommendationEngine, requests: usize, concurrent: usize) -> Result<()> {
    let users = engine.users();
    if users.is_empty() {
        bail!("No ratings loaded, nothing to benchmark");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Pick random users that have ratings
    let user_ids: Vec<UserId> = (0..requests)
        .map(|_| users[rand::random::<u32>() as usize % users.len()])
        .collect();

    let start = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for batch in user_ids.chunks(concurrent.max(1)) {
        let mut handles = vec![];
        for &user_id in batch {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                engine.get_recommendations(user_id, 20).await?;
                Ok::<_, anyhow::Error>(start.elapsed())
            }));
        }
        for handle in handles {
            timings.push(handle.await??);
        }
    }
    let wall_time = start.elapsed();

    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / timings.len() as u32;
    timings.sort();
    let percentile = |p: f32| timings[((timings.len() as f32 * p) as usize).min(timings.len() - 1)];
    let throughput = requests as f32 / wall_time.as_secs_f32();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", requests, concurrent.max(1));
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[MovieRecommendation], explain: bool) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("  (every movie has been rated already)");
    }

    for (i, rec) in recommendations.iter().enumerate() {
        let rank = i + 1;
        println!(
            "{}. {} ({}) [{}] - Score: {}",
            rank.to_string().green(),
            rec.title,
            rec.year.map(|y| y.to_string()).unwrap_or_else(|| "????".to_string()),
            rec.genres.join(", "),
            rec.display_score()
        );
        if let Some(poster) = &rec.poster_link {
            println!("   Poster: {}", poster);
        }
        if explain {
            println!("   Explanation: {}", rec.explanation);
        }
    }
}

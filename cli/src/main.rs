use anyhow::{anyhow, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

use siteseek_core::config::{StopWordSet, Thesaurus};
use siteseek_core::rank::{validate_query, QueryEngine};
use siteseek_core::{cluster, persist, report, EngineError, Index};
use siteseek_crawler::{domain_url, Crawler, HttpFetcher};

#[derive(Parser)]
#[command(name = "siteseek")]
#[command(about = "Crawl a bounded web domain, index it, and answer ranked queries")]
struct Cli {
    /// Seed URL: root of the crawl and its scope boundary
    #[arg(long)]
    seed: String,
    /// Maximum number of pages to index (minimum 2)
    #[arg(long, default_value_t = 60)]
    page_limit: usize,
    /// Newline-separated stop word list
    #[arg(long, default_value = "input/stopwords.txt")]
    stop_words: String,
    /// Comma-separated thesaurus (word,alternative,...)
    #[arg(long, default_value = "input/thesaurus.csv")]
    thesaurus: String,
    /// Index blob path for import/export
    #[arg(long, default_value = "output/index.bin")]
    index_path: String,
    /// Frequency matrix CSV export path
    #[arg(long, default_value = "output/tf_matrix.csv")]
    matrix_path: String,
    /// Request timeout in seconds
    #[arg(long, default_value_t = 12)]
    timeout_secs: u64,
    /// Results returned per query
    #[arg(long, default_value_t = 6)]
    results: usize,
    /// Leaders for document clustering
    #[arg(long, default_value_t = 5)]
    leaders: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Cli::parse();

    if args.page_limit < 2 {
        return Err(anyhow!(
            "you must crawl a minimum of 2 pages; otherwise, why would you need a search engine?"
        ));
    }

    // A bad config file leaves the corresponding setting empty; the program
    // still runs.
    let stop_words = match StopWordSet::load(Path::new(&args.stop_words)) {
        Ok(s) => s,
        Err(err) => {
            println!("{err}");
            StopWordSet::default()
        }
    };
    let thesaurus = match Thesaurus::load(Path::new(&args.thesaurus)) {
        Ok(t) => t,
        Err(err) => {
            println!("{err}");
            Thesaurus::default()
        }
    };

    run_menu(&args, &stop_words, &thesaurus)
}

fn run_menu(args: &Cli, stop_words: &StopWordSet, thesaurus: &Thesaurus) -> Result<()> {
    let mut index: Option<Index> = None;

    loop {
        show_main_menu();
        let choice = prompt("Please select an option: ")?;
        print_divider();

        match choice.as_str() {
            "0" => break,
            "1" => build_index(args, stop_words, &mut index)?,
            "2" => match &index {
                Some(ix) => {
                    if !search_loop(args, ix, stop_words, thesaurus)? {
                        break;
                    }
                }
                None => println!("You must build the index first."),
            },
            _ => continue,
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn show_main_menu() {
    print_divider();
    println!(
        "|    Siteseek                                                        |\n\
         |                                                                    |\n\
         |    [0] Exit                                                        |\n\
         |    [1] Build Index                                                 |\n\
         |    [2] Search Documents                                            |"
    );
    print_divider();
}

fn build_index(args: &Cli, stop_words: &StopWordSet, slot: &mut Option<Index>) -> Result<()> {
    if slot.is_some() {
        println!(
            "Index has already been built.\nYou'll need to restart the program to build a new one."
        );
        return Ok(());
    }

    if prompt_yes_no("Would you like to import the index from disk? (y/n) ")? {
        // Prior in-memory state is only replaced on a successful load.
        match persist::load_index(Path::new(&args.index_path)) {
            Ok(ix) => {
                *slot = Some(ix);
                println!("Index successfully imported from disk.");
            }
            Err(err) => println!("{err}"),
        }
        return Ok(());
    }

    println!("\nSeed URL: {}", args.seed);
    println!("Page limit: {}", args.page_limit);
    println!("Stop words: {}", args.stop_words);
    println!("Thesaurus: {}", args.thesaurus);

    println!("\nBeginning crawling...\n");
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let crawler = Crawler::new(&args.seed, args.page_limit, &fetcher, stop_words)?;
    tracing::info!(seed = %args.seed, page_limit = args.page_limit, "starting crawl");
    let outcome = crawler.run()?;
    tracing::info!(
        crawled = outcome.report.pages_crawled,
        indexed = outcome.report.pages_indexed,
        "crawl complete"
    );
    println!("\nIndex built.");
    print_divider();

    if prompt_yes_no("Would you like to see info about the pages crawled? (y/n) ")? {
        println!("{}", outcome.report);
    }

    print_divider();
    print!("Building Term Frequency matrix...");
    io::stdout().flush()?;
    let mut index = Index::build(outcome.documents);
    println!(" Done.");

    let csv = report::frequency_matrix_csv(&index);
    if let Some(dir) = Path::new(&args.matrix_path).parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(&args.matrix_path, csv)?;
    println!("\n\nComplete frequency matrix has been exported to {}", args.matrix_path);
    print_divider();

    if prompt_yes_no("\nWould you like to see the most frequent terms? (y/n) ")? {
        print_divider();
        println!("Most Common Stemmed Terms:\n");
        println!("{: <15} {: >25} {: >25}", "Term", "Term Frequency", "Document Frequency");
        println!("{: <15} {: >25} {: >25}", "----", "--------------", "------------------");
        for (n, (term, total, doc_freq)) in report::top_terms(&index, 20).iter().enumerate() {
            println!("{: <15} {: >25} {: >25}", format!("{}. {term}", n + 1), total, doc_freq);
        }
    }
    print_divider();

    println!("\nBeginning clustering...");
    let mut rng = rand::rng();
    index.clusters = Some(cluster::cluster_documents(&index.matrix, args.leaders, &mut rng));

    if prompt_yes_no("\nDocuments clustered. Would you like to see their clustering? (y/n) ")? {
        print_divider();
        display_clusters(&index);
    }

    if prompt_yes_no("\nWould you like to export this index to disk? (y/n) ")? {
        persist::save_index(Path::new(&args.index_path), &index)?;
        println!("Exported to {}.", args.index_path);
    }

    *slot = Some(index);
    Ok(())
}

/// Returns `Ok(false)` when the user asked to stop the whole program.
fn search_loop(
    args: &Cli,
    index: &Index,
    stop_words: &StopWordSet,
    thesaurus: &Thesaurus,
) -> Result<bool> {
    let domain = domain_url(&args.seed);
    let engine = QueryEngine::new(index, stop_words, thesaurus, &domain);

    loop {
        let query = prompt("\nPlease enter a query or \"stop\": ")?;

        if validate_query(&query).is_err() {
            println!("Invalid query.");
            continue;
        }
        if query.contains("stop") {
            return Ok(false);
        }

        match engine.process(&query, args.results) {
            Ok(hits) if hits.is_empty() => println!("No results found."),
            Ok(hits) => {
                print_divider();
                for (n, hit) in hits.iter().enumerate() {
                    println!("{}.\t[{:06.4}]  {} ({})", n + 1, hit.score, hit.title, hit.url);
                    println!();
                    println!("\t\"{}\"", hit.snippet);
                    println!();
                }
                print_divider();
            }
            Err(EngineError::QueryValidation(_)) => println!("Invalid query."),
            Err(err) => println!("{err}"),
        }
    }
}

fn display_clusters(index: &Index) {
    match &index.clusters {
        Some(clusters) => {
            for cluster in clusters {
                if cluster.followers.is_empty() {
                    println!("Doc{}:\tNo followers\n", cluster.leader);
                    continue;
                }
                println!("Doc{}:", cluster.leader);
                for (follower, distance) in &cluster.followers {
                    println!("\t\t+ Doc{follower} (Distance: {distance})");
                }
                println!();
            }
        }
        None => println!("Documents not yet clustered."),
    }
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_yes_no(message: &str) -> Result<bool> {
    loop {
        match prompt(message)?.to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {}
        }
    }
}

fn print_divider() {
    println!("{}", "-".repeat(70));
}

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use clap::Parser;
use civic_scrapers::{spiders, CrawlConfig, Crawler, DiskStorage, HttpFetcher};
use log::{error, info};

#[derive(Parser, Debug)]
#[command(name = "civic_scrapers", about = "Scrape public meeting schedules from civic agency sites")]
struct Args {
    /// Spiders to run. Runs every spider when empty.
    spiders: Vec<String>,

    /// Directory the JSON lines output is written under
    #[arg(short, long, default_value = "data")]
    output: String,

    /// Reference time for meeting status, as YYYY-MM-DDTHH:MM. Defaults to local time.
    #[arg(long)]
    now: Option<String>,

    /// Maximum concurrent page fetches per spider
    #[arg(short, long, default_value_t = 4)]
    concurrency: usize,

    /// List available spiders and exit
    #[arg(long)]
    list: bool,

    /// Log progress at info level
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .init();

    if args.list {
        for spider in spiders::all()? {
            println!("{:<24} {}", spider.name(), spider.agency());
        }
        return Ok(());
    }

    let now = match &args.now {
        Some(raw) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
            .with_context(|| format!("invalid --now value {:?}", raw))?,
        None => chrono::Local::now().naive_local(),
    };

    let selected = if args.spiders.is_empty() {
        spiders::all()?
    } else {
        args.spiders
            .iter()
            .map(|name| spiders::by_name(name.as_str()))
            .collect::<Result<Vec<_>, _>>()?
    };

    let storage = DiskStorage::new(&args.output)
        .with_context(|| format!("cannot create output directory {}", args.output))?;
    let crawler = Crawler::new(Box::new(HttpFetcher::new()?))
        .with_config(CrawlConfig::default().with_concurrency(args.concurrency));

    let mut failed = Vec::new();
    for spider in &selected {
        match crawler.run(spider.as_ref(), &storage, now).await {
            Ok(summary) => info!(
                "{}: {} meetings written to {}",
                summary.spider,
                summary.meetings,
                storage.output_path(&summary.spider).display()
            ),
            Err(e) => {
                error!("Spider {} failed: {}", spider.name(), e);
                failed.push(spider.name().to_string());
            }
        }
    }

    let stats = crawler.stats();
    stats.finish();
    stats.print_summary();

    if !failed.is_empty() {
        bail!("{} spider(s) failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}

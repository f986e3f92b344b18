use std::{path::PathBuf, str::FromStr};

use aceshub::{
    budget::{format_currency, format_money},
    dashboard::Summary, seed, DateTime, Hub, Query, TransactionTotals,
};
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};

#[derive(Parser, Debug)]
#[clap(name = "aceshub", about, version)]
struct Args {
    /// Increase output logging verbosity.
    #[clap(short, long, global = true)]
    verbose: bool,

    /// Configuration file describing where to load data from. If it doesn't
    /// exist, the built-in data is used.
    #[clap(short, long, global = true, default_value = "aceshub.yaml")]
    config: PathBuf,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search and filter the records of a collection.
    List {
        /// The collection to list (e.g. members, events, announcements).
        collection: String,

        /// Only show records containing this text.
        #[clap(short, long, default_value = "")]
        query: String,

        /// Facet selection of the form name=value (e.g. year=3rd Year). Can
        /// be given multiple times.
        #[clap(short, long = "facet")]
        facets: Vec<String>,

        /// Reference time for upcoming/past facets (defaults to now).
        #[clap(long)]
        now: Option<String>,

        /// Print matching records as JSON instead of rendering them.
        #[clap(long)]
        json: bool,
    },
    /// Print the dashboard summary.
    Summary {
        /// Reference time (defaults to now).
        #[clap(long)]
        now: Option<String>,

        #[clap(long)]
        json: bool,
    },
    /// Print the budget overview.
    Budget,
}

fn main() {
    let args = Args::parse();
    simple_logger::init_with_level(if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Info
    })
    .unwrap();

    if let Err(e) = run(args) {
        log::error!("Failed: {:?}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let hub = Hub::load(&args.config)?;
    match args.command {
        Command::List {
            collection,
            query,
            facets,
            now,
            json,
        } => {
            let now = parse_now(now)?;
            let mut q = Query::new().with_text(query);
            for facet in &facets {
                let (name, value) = Query::parse_facet_selection(facet)?;
                q.select(name, value);
            }
            if json {
                let records = hub.filter(&collection, &q, now)?;
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!("{}", hub.render(&collection, &q, now)?);
            }
        }
        Command::Summary { now, json } => {
            let summary = Summary::compute(&hub, parse_now(now)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        Command::Budget => print_budget(&hub)?,
    }
    Ok(())
}

fn parse_now(maybe_now: Option<String>) -> Result<DateTime> {
    match maybe_now {
        Some(s) => Ok(DateTime::from_str(&s).wrap_err("invalid --now timestamp")?),
        None => Ok(DateTime::now()),
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "Members:        {} ({} on the committee)",
        summary.total_members, summary.committee_members
    );
    match &summary.next_event {
        Some(next) => println!(
            "Events:         {} upcoming, next: {} ({} - {} @ {}, {} registered)",
            summary.upcoming_events,
            next.title,
            next.date.to_display_date(),
            next.date.to_display_time(),
            next.location,
            next.registered
        ),
        None => println!("Events:         no upcoming events scheduled"),
    }
    println!(
        "Announcements:  {} ({} pinned)",
        summary.announcements, summary.pinned_announcements
    );
    if let Some(pct) = summary.budget_percent_spent {
        println!("Budget:         {}% utilized", pct);
    }
    if !summary.latest_announcements.is_empty() {
        println!();
        println!("Latest announcements:");
        for a in &summary.latest_announcements {
            println!("  {} ({})", a.title, a.age);
        }
    }
}

fn print_budget(hub: &Hub) -> Result<()> {
    let budget = hub
        .budget()
        .ok_or_else(|| eyre::eyre!("no budget has been loaded"))?;
    println!("Budget overview: {}", budget.period);
    println!(
        "  Spent {} of {} ({}% spent, {}% remaining)",
        format_money(budget.spent, false),
        format_money(budget.total_budget, false),
        budget.percent_spent(),
        budget.percent_remaining()
    );
    println!(
        "  Allocated {}, remaining {}",
        format_money(budget.allocated, false),
        format_money(budget.remaining, false)
    );
    println!();
    println!("Categories:");
    for c in &budget.categories {
        println!(
            "  {:<14} {:>8} / {:<8} {:>3}%  ({} left)",
            c.name,
            format_money(c.spent, false),
            format_money(c.allocated, false),
            c.percent_spent(),
            format_money(c.remaining(), false)
        );
    }
    if let Ok(transactions) = hub.collection(seed::TRANSACTIONS) {
        let totals = TransactionTotals::from_collection(transactions);
        println!();
        println!(
            "Recent transactions: {} in, {} out, net {}",
            format_currency(totals.income, false),
            format_currency(totals.expenses, false),
            format_currency(totals.net(), true)
        );
    }
    Ok(())
}

//! Command-line interface for the dashboard client.

use std::io::Write as _;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use clap::{Parser, Subcommand};
use console::style;
use jobdash_listings::JobPosting;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::ClientConfig;
use crate::dashboard::CachedDashboard;
use crate::error::{ClientError, Result};
use crate::http::{DashboardApi, DashboardClient};
use crate::render::{render_details, render_stats, render_view};
use crate::view::{load, ExplicitParams, ListingView, Section, JOB_TITLES};

/// jobdash - browse scraped job postings from the terminal.
#[derive(Parser)]
#[command(name = "jobdash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dashboard server URL (default: $DASHBOARD_URL or http://localhost:8000)
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of job postings.
    Jobs {
        /// Section: `all` or a site name (linkedin, indeed, glassdoor, google, zip_recruiter)
        #[arg(short, long, default_value = "all")]
        site: String,

        #[arg(short, long)]
        page: Option<u32>,

        /// Rows per page
        #[arg(short, long)]
        limit: Option<u32>,

        /// Search title, company, description and location
        #[arg(long)]
        search: Option<String>,

        /// Only remote postings
        #[arg(short, long)]
        remote: bool,

        /// Job title filter (glassdoor only)
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Print total, today's and per-site counts.
    Stats,

    /// Browse interactively; type `help` for commands.
    Browse {
        #[arg(short, long, default_value = "all")]
        site: String,
    },
}

/// One line of input in `browse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Goto(u32),
    Search(String),
    Title(String),
    Titles,
    /// 1-based row on the current page.
    Details(u32),
    ToggleRemote,
    Rows(u32),
    Section(Section),
    Site(Option<jobdash_listings::Site>),
    Refresh,
    Help,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let (cmd, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        let number = |arg: &str| {
            arg.parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| format!("expected a positive number, got '{arg}'"))
        };

        match cmd {
            "n" | "next" | "" => Ok(BrowseCommand::Next),
            "p" | "prev" => Ok(BrowseCommand::Previous),
            "g" | "goto" => number(arg).map(BrowseCommand::Goto),
            "s" | "search" => Ok(BrowseCommand::Search(arg.to_string())),
            "t" | "title" => match arg.parse::<usize>() {
                Ok(n) => n
                    .checked_sub(1)
                    .and_then(|i| JOB_TITLES.get(i))
                    .map(|title| BrowseCommand::Title(title.to_string()))
                    .ok_or_else(|| format!("no preset title {n}, type 'titles'")),
                Err(_) => Ok(BrowseCommand::Title(arg.to_string())),
            },
            "titles" => Ok(BrowseCommand::Titles),
            "d" | "details" | "show" => number(arg).map(BrowseCommand::Details),
            "r" | "remote" => Ok(BrowseCommand::ToggleRemote),
            "l" | "rows" => number(arg).map(BrowseCommand::Rows),
            "section" => Section::parse(arg)
                .map(BrowseCommand::Section)
                .ok_or_else(|| format!("unknown section '{arg}'")),
            "site" if arg == "all" => Ok(BrowseCommand::Site(None)),
            "site" => arg
                .parse()
                .map(|site| BrowseCommand::Site(Some(site)))
                .map_err(|_| format!("unknown site '{arg}'")),
            "refresh" => Ok(BrowseCommand::Refresh),
            "h" | "help" | "?" => Ok(BrowseCommand::Help),
            "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(format!("unknown command '{other}', type 'help'")),
        }
    }
}

const BROWSE_HELP: &str = "\
  n, next            next page
  p, prev            previous page
  g, goto N          jump to page N
  s, search TERM     search (empty clears)
  t, title TITLE|N   job title filter (glassdoor); N picks a preset
  titles             list preset job titles
  d, details N       show row N of the current page
  r, remote          toggle remote only
  l, rows N          rows per page
  section NAME       switch section (all or a site)
  site NAME|all      narrow the overview to one site
  refresh            reload (served from cache while fresh)
  q, quit            leave";

fn parse_section(raw: &str) -> Result<Section> {
    Section::parse(raw).ok_or_else(|| ClientError::Config(format!("unknown section '{raw}'")))
}

/// Run the CLI.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.url {
        config = ClientConfig::new(url)
            .with_timeout(config.timeout)
            .with_cache(config.cache);
    }

    let dashboard = CachedDashboard::new(DashboardClient::new(&config)?, config.cache);

    match cli.command {
        Commands::Jobs {
            site,
            page,
            limit,
            search,
            remote,
            title,
        } => {
            let explicit = ExplicitParams {
                page,
                limit,
                search,
                job_title: title,
                remote_only: remote.then_some(true),
            };
            jobs_command(&dashboard, parse_section(&site)?, &explicit).await
        }
        Commands::Stats => stats_command(&dashboard).await,
        Commands::Browse { site } => browse_command(&dashboard, parse_section(&site)?).await,
    }
}

async fn jobs_command<A: DashboardApi>(
    dashboard: &CachedDashboard<A>,
    section: Section,
    explicit: &ExplicitParams,
) -> Result<()> {
    let view = Mutex::new(ListingView::mount(section, explicit, dashboard.jobs_cache()));
    load(&view, dashboard).await;

    let view = view.into_inner().unwrap_or_else(PoisonError::into_inner);
    print!("{}", render_view(&view, Utc::now()));

    match view.error() {
        Some(banner) => Err(ClientError::Api {
            error: banner.to_string(),
            details: None,
        }),
        None => Ok(()),
    }
}

async fn stats_command<A: DashboardApi>(dashboard: &CachedDashboard<A>) -> Result<()> {
    let stats = dashboard.stats().await?;
    println!("{}", style("Overview").bold().underlined());
    print!("{}", render_stats(&stats));
    Ok(())
}

async fn browse_command<A: DashboardApi>(
    dashboard: &CachedDashboard<A>,
    section: Section,
) -> Result<()> {
    let view = Mutex::new(ListingView::mount(
        section,
        &ExplicitParams::default(),
        dashboard.jobs_cache(),
    ));
    let snapshot = |view: &Mutex<ListingView>| {
        view.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    };

    load(&view, dashboard).await;
    print!("{}", render_view(&snapshot(&view), Utc::now()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style(">").cyan().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };

        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", style(message).yellow());
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => return Ok(()),
            BrowseCommand::Help => {
                println!("{BROWSE_HELP}");
                continue;
            }
            BrowseCommand::Titles => {
                for (i, title) in JOB_TITLES.iter().enumerate() {
                    println!("  {:>2}  {title}", i + 1);
                }
                continue;
            }
            BrowseCommand::Details(row) => {
                let current = snapshot(&view);
                match row_at(current.rows(), row) {
                    Some(posting) => print!("{}", render_details(posting)),
                    None => println!("{}", style(format!("no row {row} on this page")).yellow()),
                }
                continue;
            }
            BrowseCommand::Section(next) => {
                // Re-entering a section restores its last state from the cache.
                let mounted =
                    ListingView::mount(next, &ExplicitParams::default(), dashboard.jobs_cache());
                *view.lock().unwrap_or_else(PoisonError::into_inner) = mounted;
            }
            other => {
                let mut current = view.lock().unwrap_or_else(PoisonError::into_inner);
                apply(&mut current, other);
            }
        }

        load(&view, dashboard).await;
        println!();
        print!("{}", render_view(&snapshot(&view), Utc::now()));
    }
}

fn apply(view: &mut ListingView, command: BrowseCommand) {
    match command {
        BrowseCommand::Next => view.next_page(),
        BrowseCommand::Previous => view.previous_page(),
        BrowseCommand::Goto(page) => view.set_page(page),
        BrowseCommand::Search(term) => view.search(term),
        BrowseCommand::Title(title) => {
            if !view.filter_job_title(title) {
                println!("{}", style("This section has no job title filter").yellow());
            }
        }
        BrowseCommand::ToggleRemote => {
            let remote = !view.remote_only();
            view.set_remote(remote);
        }
        BrowseCommand::Rows(limit) => view.set_rows_per_page(limit),
        BrowseCommand::Site(site) => {
            if !view.set_site(site) {
                println!("{}", style("Use 'section' to switch boards").yellow());
            }
        }
        BrowseCommand::Refresh
        | BrowseCommand::Section(_)
        | BrowseCommand::Titles
        | BrowseCommand::Details(_)
        | BrowseCommand::Help
        | BrowseCommand::Quit => {}
    }
}

fn row_at(rows: &[JobPosting], row: u32) -> Option<&JobPosting> {
    let index = usize::try_from(row).ok()?.checked_sub(1)?;
    rows.get(index)
}

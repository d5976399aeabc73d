use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wardaqi_core::domain::dashboard::Timeframe;
use wardaqi_core::feed::{FeedClient, HttpFeedClient};
use wardaqi_core::query::{SortKey, SourceFilter, WardQuery};
use wardaqi_core::view::{DashboardDigest, DashboardState, DashboardView, WardsPage};

mod render;

#[derive(Debug, Parser)]
#[command(name = "wardaqi")]
struct Args {
    /// Print shaped data as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// City KPIs, priority alerts, trend and ward risk ranking.
    Dashboard {
        /// Trend window: 7days, 30days or 90days.
        #[arg(long, default_value = "7days")]
        timeframe: Timeframe,

        /// Keep the dashboard open and refresh it periodically.
        #[arg(long)]
        watch: bool,
    },
    /// Every ward with its pollution source breakdown.
    Wards {
        /// Case-insensitive substring of the ward name.
        #[arg(long, default_value = "")]
        search: String,

        /// all, traffic or industrial.
        #[arg(long, default_value = "all")]
        source: String,

        /// aqi_desc, aqi_asc, traffic, industrial or name.
        #[arg(long, default_value = "aqi_desc")]
        sort: String,

        /// Highlight the ward with exactly this name.
        #[arg(long)]
        ward: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = wardaqi_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let client = Arc::new(HttpFeedClient::from_settings(&settings)?);
    tracing::debug!(base_url = client.base_url(), "feed client ready");

    let res = match args.command {
        Command::Dashboard { timeframe, watch } => {
            let view = DashboardView::new(client);
            if watch {
                watch_dashboard(&view, timeframe, settings.refresh_period(), args.json).await
            } else {
                show_dashboard(&view, timeframe, args.json).await
            }
        }
        Command::Wards {
            search,
            source,
            sort,
            ward,
        } => {
            let query = WardQuery::new(
                search,
                SourceFilter::parse_lenient(&source),
                SortKey::parse_lenient(&sort),
            );
            show_wards(client.as_ref(), &query, ward.as_deref(), args.json).await
        }
    };

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
    }
    res
}

async fn show_dashboard(view: &DashboardView, timeframe: Timeframe, json: bool) -> anyhow::Result<()> {
    view.load().await;
    let state = view.state();
    print_dashboard(&state, timeframe, json)?;

    if let DashboardState::Failed { error } = state {
        anyhow::bail!("dashboard unavailable: {error}");
    }
    Ok(())
}

async fn watch_dashboard(
    view: &DashboardView,
    timeframe: Timeframe,
    period: std::time::Duration,
    json: bool,
) -> anyhow::Result<()> {
    let mut rx = view.subscribe();
    let task = view.mount(period);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut retrying: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                print_dashboard(&state, timeframe, json)?;
            }
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(_)) if matches!(view.state(), DashboardState::Failed { .. }) => {
                        spawn_retry(view, &mut retrying);
                    }
                    Ok(Some(_)) => {}
                    // No terminal attached; refresh continues until ctrl-c.
                    Ok(None) | Err(_) => stdin_open = false,
                }
            }
        }
    }

    if let Some(handle) = retrying {
        handle.abort();
    }
    task.stop().await;
    Ok(())
}

/// Starts a retry off the select loop so ctrl-c is seen while the fetch runs.
/// A retry still in flight is left alone.
fn spawn_retry(view: &DashboardView, slot: &mut Option<JoinHandle<()>>) {
    if slot.as_ref().is_some_and(|h| !h.is_finished()) {
        return;
    }
    let view = view.clone();
    *slot = Some(tokio::spawn(async move { view.retry().await }));
}

fn print_dashboard(state: &DashboardState, timeframe: Timeframe, json: bool) -> anyhow::Result<()> {
    let digest = state.snapshot().map(|s| DashboardDigest::new(s, timeframe));

    if json {
        let value = match (&digest, state) {
            (Some(d), _) => serde_json::to_value(d)?,
            (None, DashboardState::Failed { error }) => serde_json::json!({ "error": error }),
            (None, _) => serde_json::json!({ "loading": state.is_loading() }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render::dashboard(state, digest.as_ref())?);
    }
    Ok(())
}

async fn show_wards(
    client: &dyn FeedClient,
    query: &WardQuery,
    highlight: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let page = WardsPage::load(client).await;
    let cards = page.cards(query, highlight);

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print!("{}", render::wards(page.count, &cards)?);
    }
    Ok(())
}

fn init_sentry(settings: &wardaqi_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

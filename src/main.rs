//! Wiring & DI. Entry point: load config, bootstrap adapters, inject into services, run the command.
//! No business logic here.

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tgifreezeday::adapters::google_calendar::client::GoogleCalendarClient;
use tgifreezeday::adapters::google_calendar::{BlockerCalendar, HolidayCalendar};
use tgifreezeday::domain::SyncWindow;
use tgifreezeday::ports::{BlockerSink, HolidaySource};
use tgifreezeday::shared::config::AppConfig;
use tgifreezeday::usecases::{BlockerService, SyncService};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(
    name = "tgifreezeday",
    version,
    about = "Block production freeze days on a shared Google Calendar"
)]
struct Cli {
    /// Config file (defaults to TGIF_CONFIG, then tgifreezeday.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate the freeze rules over the window and rewrite its blockers
    Sync {
        /// Print the freeze days instead of touching the calendar
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete every blocker in the window
    WipeBlockers,
    /// Print every blocker in the window
    ListBlockers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv::dotenv();
    tgifreezeday::shared::logging::init();
    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => debug!("no .env found (check CWD)"),
    }

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref()).context("configuration is invalid")?;

    let token = cfg
        .google_access_token()
        .context("Set TGIF_GOOGLE_ACCESS_TOKEN (env or .env) to a Calendar API access token")?;
    let client = Arc::new(GoogleCalendarClient::new(token)?);
    let calendar_id = cfg.write_to.google_calendar.id.clone();

    // One reference zone for the whole run: configured, else the destination calendar's.
    let tz = match cfg.timezone()? {
        Some(tz) => tz,
        None => client
            .time_zone(&calendar_id)
            .await
            .context("failed to read destination calendar time zone")?,
    };
    let today = Utc::now().with_timezone(&tz).date_naive();
    let window = SyncWindow::around(today, cfg.shared.lookback_days, cfg.shared.lookahead_days);
    info!(
        %today,
        timezone = %tz,
        start = %window.start,
        end = %window.end,
        "window"
    );

    let sink: Arc<dyn BlockerSink> =
        Arc::new(BlockerCalendar::new(Arc::clone(&client), calendar_id, tz));

    match cli.command {
        Command::Sync { dry_run } => {
            let holidays: Arc<dyn HolidaySource> = Arc::new(HolidayCalendar::for_country(
                Arc::clone(&client),
                &cfg.read_from.google_calendar.country_code,
                tz,
            )?);
            let service =
                SyncService::new(holidays, sink, cfg.freeze_rules()?, cfg.blocker_summary());

            if dry_run {
                let plan = service.plan(window).await?;
                for day in &plan {
                    println!("{}  {}  ({})", day.date, day.date.format("%a"), day.reason);
                }
                info!(freeze_days = plan.len(), "dry run: calendar untouched");
                return Ok(());
            }

            let stats = service.sync(window).await?;
            if stats.failures > 0 {
                warn!(failures = stats.failures, "some blockers were not written");
                anyhow::bail!(
                    "{} of {} blockers failed to write",
                    stats.failures,
                    stats.freeze_days
                );
            }
        }
        Command::WipeBlockers => {
            let deleted = BlockerService::new(sink).wipe(window).await?;
            println!("deleted {} blocker(s)", deleted);
        }
        Command::ListBlockers => {
            let blockers = BlockerService::new(sink).list(window).await?;
            for b in &blockers {
                println!(
                    "{}  {} - {}  {}  [{}]",
                    b.start.format("%Y-%m-%d"),
                    b.start.format("%H:%M"),
                    b.end.format("%H:%M"),
                    b.summary,
                    b.id
                );
            }
            if blockers.is_empty() {
                println!("no blockers between {} and {}", window.start, window.end);
            }
        }
    }

    Ok(())
}

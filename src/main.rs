// Month grid calendar
// Command-line entry point

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};

use month_grid::models::event::{EventRecord, DEFAULT_CATEGORY_ID};
use month_grid::models::grid::MonthGrid;
use month_grid::models::settings::Settings;
use month_grid::services::category::CategoryService;
use month_grid::services::database::Database;
use month_grid::services::event::EventService;
use month_grid::services::holiday::{CalendarificClient, HolidayService};
use month_grid::services::month_view::{render_month, MonthView};
use month_grid::services::settings::SettingsService;
use month_grid::services::year_view::{render_day, render_year, YearView};
use month_grid::utils::date::{parse_date, parse_time};

#[derive(Parser)]
#[command(name = "month-grid")]
#[command(about = "Lay out and browse a month of calendar events")]
struct Cli {
    /// Settings file to use instead of the default config.toml
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Two-letter holiday country for this run, overriding the settings
    #[arg(long, global = true)]
    country: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a laid-out month
    Show {
        #[arg(long)]
        year: Option<i32>,

        #[arg(long)]
        month: Option<u32>,

        /// Skip the public holiday feed
        #[arg(long)]
        no_holidays: bool,
    },
    /// Print the twelve months of a year, and optionally one date's events
    Year {
        #[arg(long)]
        year: Option<i32>,

        /// Date whose events to list (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Skip the public holiday feed
        #[arg(long)]
        no_holidays: bool,
    },
    /// Create an event and print its month with the event on top
    Add {
        name: String,

        /// First date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Last date (YYYY-MM-DD), defaults to the start date
        #[arg(long)]
        end: Option<String>,

        /// Time range, e.g. "09:00-10:30"
        #[arg(long)]
        time: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        all_day: bool,
    },
    /// Delete an event by id
    Delete { id: String },
    /// Find events by name, location or notes
    Search { query: String },
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories and whether they are shown
    List,
    /// Show or hide a category's events
    Toggle { id: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings_service = match &cli.config {
        Some(path) => SettingsService::with_path(path.clone()),
        None => SettingsService::new()?,
    };
    let mut settings = settings_service.load()?;
    if let Some(country) = cli.country {
        settings.holiday_country = country;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid --country: {}", e))?;
    }
    let db = open_database(&settings)?;

    match cli.command {
        Commands::Show {
            year,
            month,
            no_holidays,
        } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            let view = load_month(&db, &settings, year, month, !no_holidays)?;
            print!(
                "{}",
                render_month(view.grid(), view.records(), settings.max_visible_rows)
            );
        }
        Commands::Year {
            year,
            date,
            no_holidays,
        } => {
            let date = date.as_deref().map(parse_cli_date).transpose()?;
            let year = year
                .or_else(|| date.map(|d| d.year()))
                .unwrap_or_else(|| Local::now().date_naive().year());

            let mut holidays = if no_holidays {
                None
            } else {
                holiday_service(&settings)
            };
            let view = YearView::load(
                year,
                &EventService::new(db.connection()),
                holidays
                    .as_mut()
                    .map(|service| (service, settings.holiday_country.as_str())),
                CategoryService::new(db.connection()).visibility()?,
            )?;
            print!("{}", render_year(&view));

            if let Some(date) = date {
                let entries = view
                    .events_on(date)
                    .ok_or_else(|| anyhow!("{} is not shown in the {} calendar", date, year))?;
                println!();
                print!("{}", render_day(date, &entries));
            }
        }
        Commands::Add {
            name,
            start,
            end,
            time,
            category,
            all_day,
        } => {
            let record = build_record(name, &start, end.as_deref(), time.as_deref(), category, all_day)?;
            let start = record.span.start();
            let mut view = load_month(&db, &settings, start.year(), start.month(), settings.show_holidays)?;

            let created = EventService::new(db.connection()).create(record)?;
            println!("Created event {}", created.id);
            view.event_created(created);
            print!(
                "{}",
                render_month(view.grid(), view.records(), settings.max_visible_rows)
            );
        }
        Commands::Delete { id } => {
            EventService::new(db.connection()).delete(&id)?;
            println!("Deleted event {}", id);
        }
        Commands::Search { query } => {
            let events = EventService::new(db.connection()).search(&query)?;
            if events.is_empty() {
                println!("No events match '{}'", query);
            }
            for event in events {
                println!(
                    "{}  {:<30} {}",
                    event.span.start(),
                    event.name,
                    event.id
                );
            }
        }
        Commands::Category { command } => {
            let categories = CategoryService::new(db.connection());
            match command {
                CategoryCommands::List => {
                    for category in categories.list_all()? {
                        println!(
                            "{:<38} {:<20} {} {}",
                            category.id,
                            category.name,
                            category.color,
                            if category.visible { "shown" } else { "hidden" }
                        );
                    }
                }
                CategoryCommands::Toggle { id } => {
                    let category = categories
                        .get(&id)?
                        .ok_or_else(|| anyhow!("Category with id {} not found", id))?;
                    categories.set_visible(&id, !category.visible)?;
                    println!(
                        "{} is now {}",
                        category.name,
                        if category.visible { "hidden" } else { "shown" }
                    );
                }
            }
        }
    }

    Ok(())
}

fn open_database(settings: &Settings) -> Result<Database> {
    let path = SettingsService::database_path(settings)?;
    let db = Database::new(&path.to_string_lossy())?;
    db.initialize_schema()?;
    CategoryService::new(db.connection()).initialize_defaults()?;
    Ok(db)
}

fn load_month(
    db: &Database,
    settings: &Settings,
    year: i32,
    month: u32,
    with_holidays: bool,
) -> Result<MonthView> {
    let range = MonthGrid::new(year, month)?.date_range();

    let holidays = if with_holidays {
        holiday_service(settings)
            .map(|mut service| service.records_for_range(&settings.holiday_country, &range))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    let events = EventService::new(db.connection());
    let visibility = CategoryService::new(db.connection()).visibility()?;
    MonthView::load(year, month, &events, holidays, visibility)
}

/// The holiday feed, or `None` when it is switched off or has no API key.
fn holiday_service(settings: &Settings) -> Option<HolidayService> {
    if !settings.show_holidays {
        return None;
    }

    match CalendarificClient::from_settings(settings.holiday_api_key.as_deref()) {
        Ok(client) => Some(HolidayService::new(Box::new(client))),
        Err(e) => {
            log::warn!("Holidays disabled: {:#}", e);
            None
        }
    }
}

fn build_record(
    name: String,
    start: &str,
    end: Option<&str>,
    time: Option<&str>,
    category: Option<String>,
    all_day: bool,
) -> Result<EventRecord> {
    let start = parse_cli_date(start)?;
    let mut builder = EventRecord::builder()
        .name(name)
        .start(start)
        .category(category.unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()))
        .all_day(all_day);

    if let Some(end) = end {
        builder = builder.end(parse_cli_date(end)?);
    }
    if let Some(time) = time {
        let (from, to) = parse_time_range(time)?;
        builder = builder.time(from, to);
    }

    Ok(builder.build()?)
}

fn parse_cli_date(value: &str) -> Result<NaiveDate> {
    parse_date(value).with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

fn parse_time_range(value: &str) -> Result<(NaiveTime, NaiveTime)> {
    let (from, to) = value
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid time range '{}', expected HH:MM-HH:MM", value))?;
    let from = parse_time(from.trim()).with_context(|| format!("Invalid start time '{}'", from))?;
    let to = parse_time(to.trim()).with_context(|| format!("Invalid end time '{}'", to))?;
    Ok((from, to))
}

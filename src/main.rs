mod config;
mod mood_entry;
mod mood_store;
mod ui;
mod week;

use color_eyre::eyre::{Result, WrapErr};
use config::{Config, LogFormat};
use mood_entry::MoodEntry;
use mood_store::MoodStore;
use std::fs::File;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{Action, UI};

fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config)?;
    info!(log_file = %config.log_file.display(), "mood journal starting");

    let mut store = MoodStore::new();
    let mut ui = UI::new(config.default_mood)?;
    ui.splash(config.splash)?;

    loop {
        ui.display(&store)?;

        if let Some(action) = ui.handle_input(&store)? {
            match action {
                Action::Record(mood) => {
                    let today = MoodStore::today();
                    if store.has_mood_on(mood, today) {
                        ui.set_status(format!(
                            "{mood} is already recorded for {}",
                            store.get_today()
                        ));
                        continue;
                    }
                    let tags = ui.get_tags(mood)?;
                    let inserted = store.add_mood(MoodEntry::new(mood, today, tags));
                    ui.set_status(ui::record_status(mood, inserted));
                }
                Action::View(id) => {
                    ui.view_details(&mut store, &id)?;
                }
                Action::Delete(id) => {
                    store.delete_mood(&id);
                }
                Action::Search => {
                    let query = ui.get_search_query()?;
                    if !query.trim().is_empty() {
                        info!(query = %query, "search");
                        ui.display_search_results(&mut store, &query)?;
                    }
                }
                Action::Quit => break,
            }
        }
    }

    let per_day: Vec<usize> = store.get_current_week_moods().iter().map(Vec::len).collect();
    info!(
        entries = store.len(),
        days = ?store.get_last_7_days_labels(),
        per_day = ?per_day,
        "mood journal exiting"
    );
    Ok(())
}

// The terminal belongs to the UI, so events go to a file.
fn init_tracing(config: &Config) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .wrap_err_with(|| format!("failed to open log file {}", config.log_file.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "mood_journal=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false);

    match config.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

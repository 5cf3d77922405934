use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::{load_settings, settings_file_exists, settings_path};
use crate::store::{load_rows, SqliteStore};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    let not_set = |s: &str| if s.is_empty() { "(not set)".to_string() } else { s.to_string() };
    println!(
        "Settings:   {}{}",
        settings_path().display(),
        if settings_file_exists() { "" } else { " (defaults)" }
    );
    println!("Company:    {}", not_set(&settings.company_name));
    println!("Period:     {}", not_set(&settings.period_label));
    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let store = SqliteStore::open(&db_path)?;
        let rows = load_rows(&store)?.map_or(0, |r| r.len());
        println!();
        println!("Stored rows:   {rows}");
        println!("Stored keys:   {}", store.keys()?.join(", "));
    } else {
        println!();
        println!("Database not found. Run `trialbal init` or `trialbal import <FILE>`.");
    }

    Ok(())
}

use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};
use crate::store::SqliteStore;

pub fn run(data_dir: Option<String>, company: Option<String>, period: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }
    if let Some(name) = company {
        settings.company_name = name;
    }
    if let Some(label) = period {
        settings.period_label = label;
    }

    let data_path = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(data_path.join("exports"))?;
    SqliteStore::open(&settings.db_path())?;
    save_settings(&settings)?;

    println!("Settings:   {}", settings_path().display());
    println!("Data dir:   {}", data_path.display());
    println!("Database:   {}", settings.db_path().display());
    Ok(())
}

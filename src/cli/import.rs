use colored::Colorize;

use crate::error::Result;
use crate::reports;
use crate::store::{save_reports, save_rows};

use super::parse::format_audit;
use super::{open_store, parse_path};

pub fn run(file: &str) -> Result<()> {
    let parsed = parse_path(file)?;
    let generated = reports::generate(&parsed.rows);

    let mut store = open_store()?;
    save_rows(&mut store, &parsed.rows)?;
    save_reports(
        &mut store,
        &generated.profit_loss,
        &generated.balance_sheet,
        &generated.ratio_inputs,
    )?;

    println!("{}", format_audit(&parsed.audit));
    println!(
        "{} {} rows stored; reports regenerated (net {} {})",
        "Imported".green().bold(),
        parsed.rows.len(),
        if generated.profit_loss.net_profit >= 0.0 { "profit" } else { "loss" },
        crate::fmt::money(generated.profit_loss.net_profit.abs()),
    );
    Ok(())
}

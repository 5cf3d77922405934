use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::{Result, TrialBalError};
use crate::fmt::{money, percent, ratio};
use crate::reports::{BalanceSheet, ProfitLoss, RatioInputs, ReportItem};
use crate::settings::load_settings;
use crate::store::{load_balance_sheet, load_profit_loss, load_ratio_inputs};

use super::open_store;

/// Prepend company name and period as header lines when set.
fn with_header(company_name: &str, period: &str, body: String) -> String {
    let mut out = String::new();
    for line in [company_name, period] {
        if !line.is_empty() {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(&body);
    out
}

fn not_imported() -> TrialBalError {
    TrialBalError::Other("No reports stored yet. Run `trialbal import <FILE>` first.".to_string())
}

// ---------------------------------------------------------------------------
// Store-reading wrappers (used by dispatch)
// ---------------------------------------------------------------------------

pub fn pnl() -> Result<()> {
    let store = open_store()?;
    let data = load_profit_loss(&store)?.ok_or_else(not_imported)?;
    let settings = load_settings();
    println!("{}", with_header(&settings.company_name, &settings.period_label, format_pnl(&data)));
    Ok(())
}

pub fn balance() -> Result<()> {
    let store = open_store()?;
    let data = load_balance_sheet(&store)?.ok_or_else(not_imported)?;
    let settings = load_settings();
    println!("{}", with_header(&settings.company_name, &settings.period_label, format_balance(&data)));
    Ok(())
}

pub fn ratios() -> Result<()> {
    let store = open_store()?;
    let data = load_ratio_inputs(&store)?.ok_or_else(not_imported)?;
    let settings = load_settings();
    println!("{}", with_header(&settings.company_name, &settings.period_label, format_ratios(&data)));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (report data → String)
// ---------------------------------------------------------------------------

fn add_section(table: &mut Table, label: &str, items: &[ReportItem], total_label: &str, total: f64) {
    table.add_row(vec![Cell::new(label.bold()), Cell::new("")]);
    for item in items {
        table.add_row(vec![
            Cell::new(format!("  {}", item.name)),
            Cell::new(money(item.amount)),
        ]);
    }
    table.add_row(vec![Cell::new(total_label.bold()), Cell::new(money(total))]);
}

pub fn format_pnl(pnl: &ProfitLoss) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Particulars", "Amount"]);

    add_section(&mut table, "INCOME", &pnl.incomes, "Total Income", pnl.total_income);
    table.add_row(vec![Cell::new(""), Cell::new("")]);
    add_section(&mut table, "EXPENSES", &pnl.expenses, "Total Expenses", pnl.total_expenses);
    table.add_row(vec![Cell::new(""), Cell::new("")]);

    let (label, net) = if pnl.net_profit >= 0.0 {
        ("NET PROFIT".green().bold(), money(pnl.net_profit).green())
    } else {
        ("NET LOSS".red().bold(), money(pnl.net_profit.abs()).red())
    };
    table.add_row(vec![Cell::new(label), Cell::new(net)]);

    format!("Profit & Loss Account\n{table}")
}

pub fn format_balance(data: &BalanceSheet) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Particulars", "Amount"]);

    add_section(&mut table, "LIABILITIES", &data.liabilities, "Total Liabilities", data.total_liabilities);
    table.add_row(vec![Cell::new(""), Cell::new("")]);
    add_section(&mut table, "ASSETS", &data.assets, "Total Assets", data.total_assets);

    let diff = data.total_assets - data.total_liabilities;
    let note = if diff.abs() < 0.005 {
        "Balanced".green().to_string()
    } else {
        format!("Out of balance by {}", money(diff)).yellow().to_string()
    };
    format!("Balance Sheet\n{table}\n\n{note}")
}

pub fn format_ratios(data: &RatioInputs) -> String {
    let r = data.ratios();

    let mut inputs = Table::new();
    inputs.set_header(vec!["Figure", "Amount"]);
    for (label, value) in [
        ("Sales", data.sales),
        ("Net Profit", data.net_profit),
        ("Total Assets", data.total_assets),
        ("Current Assets", data.current_assets),
        ("Current Liabilities", data.current_liabilities),
        ("Total Liabilities", data.total_liabilities),
        ("Equity", data.equity),
    ] {
        inputs.add_row(vec![Cell::new(label), Cell::new(money(value))]);
    }

    let mut derived = Table::new();
    derived.set_header(vec!["Ratio", "Value"]);
    derived.add_row(vec![Cell::new("Current Ratio"), Cell::new(ratio(r.current_ratio))]);
    derived.add_row(vec![Cell::new("Debt to Equity"), Cell::new(ratio(r.debt_to_equity))]);
    derived.add_row(vec![Cell::new("Net Profit Margin"), Cell::new(percent(r.net_profit_margin))]);
    derived.add_row(vec![Cell::new("Return on Assets"), Cell::new(percent(r.return_on_assets))]);

    format!("Ratio Inputs\n{inputs}\n\nRatios\n{derived}")
}

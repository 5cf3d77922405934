use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::CanonicalRow;

// ---------------------------------------------------------------------------
// Classification tables
// ---------------------------------------------------------------------------

pub const INCOME_ACCOUNTS: &[&str] = &[
    "Sales",
    "Commission Received",
    "Discount",
    "Dividend Received",
    "Accrued Income",
];

pub const EXPENSE_ACCOUNTS: &[&str] = &[
    "Trade Expenses",
    "Salaries",
    "Carriage Outwards",
    "Rent",
    "Purchases",
    "Insurance",
    "Carriage Inwards",
    "Office Expenses",
    "Electricity Charges",
    "Telephone Expenses",
    "Printing & Stationery",
    "Advertising",
    "Interest Paid",
    "Depreciation",
    "Bad Debts",
    "Repairs & Maintenance",
    "Miscellaneous Expenses",
    "Legal Fees",
    "Audit Fees",
    "Travelling Expenses",
    "Wages",
];

pub const ASSET_ACCOUNTS: &[&str] = &[
    "Sundry Debtors",
    "Stock (01.01.2008)",
    "Cash in Hand",
    "Plant & Machinery",
    "Business Premises",
    "Cash at Bank",
    "Prepaid Insurance",
];

pub const LIABILITY_ACCOUNTS: &[&str] = &[
    "Bank Overdraft",
    "Sundry Creditors",
    "Bills Payable",
    "Capital",
    "Loan from Bank",
];

const CURRENT_ASSETS: &[&str] = &["Sundry Debtors", "Cash in Hand", "Cash at Bank", "Stock (01.01.2008)"];
const CURRENT_LIABILITIES: &[&str] = &["Sundry Creditors", "Bills Payable", "Bank Overdraft"];

pub const NET_PROFIT: &str = "Net Profit";
pub const NET_LOSS: &str = "Net Loss";
const CAPITAL: &str = "Capital";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Income,
    Expense,
    Asset,
    Liability,
}

fn matches_any(name: &str, list: &[&str]) -> bool {
    list.iter().any(|account| name.contains(account))
}

/// Section by substring match on the account name, lists checked in order.
pub fn classify(name: &str) -> Option<Section> {
    if matches_any(name, INCOME_ACCOUNTS) {
        Some(Section::Income)
    } else if matches_any(name, EXPENSE_ACCOUNTS) {
        Some(Section::Expense)
    } else if matches_any(name, ASSET_ACCOUNTS) {
        Some(Section::Asset)
    } else if matches_any(name, LIABILITY_ACCOUNTS) {
        Some(Section::Liability)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLoss {
    pub incomes: Vec<ReportItem>,
    pub expenses: Vec<ReportItem>,
    pub net_profit: f64,
    pub total_income: f64,
    pub total_expenses: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub assets: Vec<ReportItem>,
    pub liabilities: Vec<ReportItem>,
    pub total_assets: f64,
    pub total_liabilities: f64,
}

/// Raw figures the ratio view works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioInputs {
    pub sales: f64,
    pub net_profit: f64,
    pub total_assets: f64,
    pub current_assets: f64,
    pub current_liabilities: f64,
    pub total_liabilities: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    pub current_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub net_profit_margin: Option<f64>,
    pub return_on_assets: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reports {
    pub profit_loss: ProfitLoss,
    pub balance_sheet: BalanceSheet,
    pub ratio_inputs: RatioInputs,
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

fn total(items: &[ReportItem]) -> f64 {
    items.iter().map(|i| i.amount).sum()
}

fn sum_named(items: &[ReportItem], names: &[&str]) -> f64 {
    items
        .iter()
        .filter(|i| names.contains(&i.name.as_str()))
        .map(|i| i.amount)
        .sum()
}

fn first_named(items: &[ReportItem], name: &str) -> f64 {
    items.iter().find(|i| i.name == name).map_or(0.0, |i| i.amount)
}

pub fn generate(rows: &[CanonicalRow]) -> Reports {
    let mut incomes = Vec::new();
    let mut expenses = Vec::new();
    let mut assets = Vec::new();
    let mut liabilities = Vec::new();

    for row in rows {
        let name = row.name.trim().to_string();
        let debit = row.debit.value_or_zero();
        let credit = row.credit.value_or_zero();
        match classify(&name) {
            Some(Section::Income) => incomes.push(ReportItem { name, amount: credit }),
            Some(Section::Expense) => expenses.push(ReportItem { name, amount: debit }),
            Some(Section::Asset) => assets.push(ReportItem { name, amount: debit }),
            Some(Section::Liability) => liabilities.push(ReportItem { name, amount: credit }),
            None => {
                if debit > 0.0 && credit == 0.0 {
                    assets.push(ReportItem { name, amount: debit });
                } else if credit > 0.0 && debit == 0.0 {
                    liabilities.push(ReportItem { name, amount: credit });
                } else {
                    debug!(account = %name, "account left unclassified");
                }
            }
        }
    }

    let total_income = total(&incomes);
    let total_expenses = total(&expenses);
    let net_profit = total_income - total_expenses;

    if net_profit > 0.0 {
        liabilities.push(ReportItem { name: NET_PROFIT.to_string(), amount: net_profit });
    } else if net_profit < 0.0 {
        assets.push(ReportItem { name: NET_LOSS.to_string(), amount: net_profit.abs() });
    }

    let total_assets = total(&assets);
    let total_liabilities = total(&liabilities);
    let capital = first_named(&liabilities, CAPITAL);
    let profit_line = first_named(&liabilities, NET_PROFIT);

    let ratio_inputs = RatioInputs {
        sales: total_income,
        net_profit,
        total_assets,
        current_assets: sum_named(&assets, CURRENT_ASSETS),
        current_liabilities: sum_named(&liabilities, CURRENT_LIABILITIES),
        total_liabilities: total_liabilities - capital - profit_line,
        equity: capital + profit_line,
    };

    debug!(
        incomes = incomes.len(),
        expenses = expenses.len(),
        assets = assets.len(),
        liabilities = liabilities.len(),
        net_profit,
        "generated reports"
    );

    Reports {
        profit_loss: ProfitLoss {
            incomes,
            expenses,
            net_profit,
            total_income,
            total_expenses,
        },
        balance_sheet: BalanceSheet {
            assets,
            liabilities,
            total_assets,
            total_liabilities,
        },
        ratio_inputs,
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

impl RatioInputs {
    pub fn ratios(&self) -> Ratios {
        Ratios {
            current_ratio: ratio(self.current_assets, self.current_liabilities),
            debt_to_equity: ratio(self.total_liabilities, self.equity),
            net_profit_margin: ratio(self.net_profit, self.sales).map(|r| r * 100.0),
            return_on_assets: ratio(self.net_profit, self.total_assets).map(|r| r * 100.0),
        }
    }
}

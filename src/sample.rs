use std::path::Path;

use crate::error::Result;
use crate::export::{self, OutputFormat};
use crate::models::{Amount, CanonicalRow};

pub const SAMPLE_SHEET: &str = "Trial Balance";

// (account, debit, credit)
const SAMPLE: &[(&str, f64, f64)] = &[
    // Assets
    ("Cash in Hand", 15000.0, 0.0),
    ("Cash at Bank", 85000.0, 0.0),
    ("Sundry Debtors", 124000.0, 0.0),
    ("Inventory", 230000.0, 0.0),
    ("Equipment", 175000.0, 0.0),
    ("Furniture and Fixtures", 52000.0, 0.0),
    ("Computer and IT Equipment", 38500.0, 0.0),
    ("Prepaid Rent", 24000.0, 0.0),
    ("Prepaid Insurance", 12000.0, 0.0),
    ("Investments", 150000.0, 0.0),
    ("Land", 350000.0, 0.0),
    ("Buildings", 650000.0, 0.0),
    ("Vehicles", 95000.0, 0.0),
    ("Office Supplies", 8500.0, 0.0),
    ("Plant & Machinery", 120000.0, 0.0),
    // Liabilities
    ("Accounts Payable", 0.0, 95000.0),
    ("Loan from Bank", 0.0, 250000.0),
    ("Bank Overdraft", 0.0, 15000.0),
    ("Credit Card Payable", 0.0, 7500.0),
    ("Sundry Creditors", 0.0, 82000.0),
    ("Bills Payable", 0.0, 45000.0),
    ("Interest Payable", 0.0, 12000.0),
    ("Salary Payable", 0.0, 32000.0),
    ("Taxes Payable", 0.0, 28500.0),
    ("Unearned Revenue", 0.0, 18000.0),
    ("Mortgage Payable", 0.0, 350000.0),
    // Equity
    ("Capital", 0.0, 500000.0),
    ("Retained Earnings", 0.0, 247000.0),
    ("Owner's Drawing", 35000.0, 0.0),
    // Income
    ("Sales", 0.0, 785000.0),
    ("Service Revenue", 0.0, 245000.0),
    ("Interest Income", 0.0, 12500.0),
    ("Rental Income", 0.0, 36000.0),
    ("Commission Received", 0.0, 28000.0),
    ("Discount Received", 0.0, 7500.0),
    ("Dividend Received", 0.0, 22000.0),
    // Expenses
    ("Purchases", 450000.0, 0.0),
    ("Salaries", 245000.0, 0.0),
    ("Rent", 60000.0, 0.0),
    ("Electricity Charges", 35000.0, 0.0),
    ("Insurance", 28000.0, 0.0),
    ("Depreciation", 45000.0, 0.0),
    ("Advertising", 32000.0, 0.0),
    ("Printing & Stationery", 8500.0, 0.0),
    ("Telephone Expenses", 12000.0, 0.0),
    ("Repairs & Maintenance", 24000.0, 0.0),
    ("Legal Fees", 15000.0, 0.0),
    ("Audit Fees", 12000.0, 0.0),
    ("Interest Paid", 22000.0, 0.0),
    ("Bad Debts", 14000.0, 0.0),
    ("Travelling Expenses", 21000.0, 0.0),
    ("Office Expenses", 13500.0, 0.0),
    ("Miscellaneous Expenses", 11500.0, 0.0),
    ("Stock (01.01.2008)", 185000.0, 0.0),
    ("Carriage Inwards", 25000.0, 0.0),
    ("Carriage Outwards", 18000.0, 0.0),
    ("Trade Expenses", 24000.0, 0.0),
    ("Wages", 195000.0, 0.0),
];

fn side(value: f64) -> Amount {
    if value == 0.0 {
        Amount::Empty
    } else {
        Amount::Number(value)
    }
}

/// Demonstration trial balance covering every report section.
pub fn sample_rows() -> Vec<CanonicalRow> {
    SAMPLE
        .iter()
        .map(|&(name, debit, credit)| CanonicalRow {
            name: name.to_string(),
            debit: side(debit),
            credit: side(credit),
        })
        .collect()
}

pub fn write_csv(path: &Path) -> Result<()> {
    export::write_csv(&sample_rows(), path)
}

/// Write the sample as `.csv` or as a workbook, chosen by extension.
pub fn write(path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path);
    match format {
        OutputFormat::Csv => write_csv(path)?,
        OutputFormat::Xlsx => export::write_sheet(&sample_rows(), SAMPLE_SHEET, path)?,
    }
    Ok(format)
}

//! Budget tracking.

use std::{fs, path::Path};

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{Collection, Error, SupportedFormat};

/// Spending within a single budget category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub allocated: f64,
    pub spent: f64,
}

impl Category {
    pub fn remaining(&self) -> f64 {
        self.allocated - self.spent
    }

    /// Percentage of the allocation that has been spent, rounded to the
    /// nearest whole number.
    pub fn percent_spent(&self) -> i64 {
        percent(self.spent, self.allocated)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: String,
    pub amount: f64,
}

/// The organization's budget for a single period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub period: String,
    pub total_budget: f64,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub monthly_spending: Vec<MonthlySpending>,
}

impl Budget {
    /// Load a budget from the given file, detecting its format from the file's
    /// extension.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let fmt = SupportedFormat::from_path(path)?;
        let content = fs::read_to_string(path)
            .wrap_err_with(|| Error::FailedToLoadBudget(path.to_path_buf()))?;
        let budget = fmt
            .deserialize(&content)
            .wrap_err_with(|| Error::FailedToLoadBudget(path.to_path_buf()))?;
        debug!("Loaded budget from {}", path.display());
        Ok(budget)
    }

    /// Percentage of the total budget that has been spent.
    pub fn percent_spent(&self) -> i64 {
        percent(self.spent, self.total_budget)
    }

    pub fn percent_remaining(&self) -> i64 {
        100 - self.percent_spent()
    }
}

/// Income and expense totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TransactionTotals {
    pub income: f64,
    /// Always non-negative.
    pub expenses: f64,
}

impl TransactionTotals {
    /// Sums the `amount` field of every transaction. Positive amounts are
    /// income, negative amounts are expenses. Transactions without a numeric
    /// amount are skipped.
    pub fn from_collection(transactions: &Collection) -> Self {
        transactions
            .iter()
            .filter_map(|t| t.get("amount").and_then(|a| a.as_f64()))
            .fold(Self::default(), |mut totals, amount| {
                if amount >= 0.0 {
                    totals.income += amount;
                } else {
                    totals.expenses -= amount;
                }
                totals
            })
    }

    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

fn percent(part: f64, whole: f64) -> i64 {
    if whole == 0.0 {
        return 0;
    }
    (part / whole * 100.0).round() as i64
}

/// Formats an amount of money in US dollars with thousands separators, e.g.
/// `$15,000` or `-$1,200.50`. Cents are only shown when there are any. With
/// `signed`, positive amounts get a leading `+`.
pub fn format_money(amount: f64, signed: bool) -> String {
    dollars(amount, signed, false)
}

/// Like [`format_money`], but always with two decimal places, e.g.
/// `+$5,000.00`. Used for individual transaction amounts.
pub fn format_currency(amount: f64, signed: bool) -> String {
    dollars(amount, signed, true)
}

fn dollars(amount: f64, signed: bool, always_cents: bool) -> String {
    let sign = if amount < 0.0 {
        "-"
    } else if signed && amount > 0.0 {
        "+"
    } else {
        ""
    };
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if frac == 0 && !always_cents {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, frac)
    }
}

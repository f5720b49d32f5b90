// 🖨️ Display formatting - amounts, dates, file names

use chrono::NaiveDate;

/// Format a rupee amount with thousands separators, truncating paise.
///
/// Example: `123456.78` → `"Rs. 123,456"`
pub fn format_amount(amount: f64) -> String {
    let whole = amount.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if whole < 0 {
        format!("Rs. -{}", grouped)
    } else {
        format!("Rs. {}", grouped)
    }
}

/// Invoice date format: `dd-mm-YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Letter date format: `April 01, 2017`
pub fn letter_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Collapse runs of whitespace and trim
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn an advisor name into a file-name fragment.
///
/// Spaces become underscores; path separators and characters Windows
/// rejects are dropped.
pub fn file_stem(name: &str) -> String {
    normalize_whitespace(name)
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

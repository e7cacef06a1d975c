use crate::utils::error::{ErpError, Result};
use chrono::{DateTime, Duration, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const MAX_BACKOFF_EXPONENT: u32 = 10;

/// Minutes to wait before the next delivery attempt: `2^retry_count`,
/// capped at `2^10`. Negative counts behave like a first retry.
pub fn backoff_delay_minutes(retry_count: i64) -> u64 {
    let exponent = retry_count.clamp(0, i64::from(MAX_BACKOFF_EXPONENT)) as u32;
    1u64 << exponent
}

pub fn next_retry_at(failed_at: DateTime<Utc>, retry_count: i64) -> DateTime<Utc> {
    failed_at + Duration::minutes(backoff_delay_minutes(retry_count) as i64)
}

pub fn should_retry(retry_count: u32, max_retries: u32) -> bool {
    retry_count < max_retries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl NotificationPriority {
    pub fn label(self) -> &'static str {
        match self {
            NotificationPriority::Low => "Low",
            NotificationPriority::Normal => "Normal",
            NotificationPriority::High => "High",
            NotificationPriority::Urgent => "Urgent",
        }
    }
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z0-9_.]+)\s*\}\}").expect("placeholder pattern compiles")
});

/// Fills `{{name}}` placeholders. Every placeholder must have a value.
pub fn render_template(template: &str, vars: &HashMap<String, String>) -> Result<String> {
    let mut missing: Vec<String> = Vec::new();

    let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        match vars.get(name) {
            Some(value) => value.clone(),
            None => {
                if !missing.iter().any(|m| m == name) {
                    missing.push(name.to_string());
                }
                String::new()
            }
        }
    });

    if !missing.is_empty() {
        return Err(ErpError::validation(format!(
            "template placeholders without a value: {}",
            missing.join(", ")
        )));
    }

    Ok(rendered.into_owned())
}

/// `Rp 1.234.567`, rounded to whole rupiah.
pub fn format_currency_idr(amount: f64) -> String {
    let rounded = amount.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-Rp {}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}

pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}

use chrono::{Datelike, Utc};
use rand::Rng;

/// Source of human-legible order numbers. Uniqueness is enforced by the store,
/// not here: callers retry with a fresh number on conflict.
pub trait OrderNumberGenerator: Send + Sync + 'static {
    fn next_number(&self) -> String;
}

/// Longest prefix that still fits `orders.order_number` (32 characters)
/// once `-<year>-<NNNNNN>` is appended.
pub const MAX_PREFIX_LEN: usize = 20;

/// `<PREFIX>-<year>-<NNNNNN>` with a random six-digit suffix.
#[derive(Debug, Clone)]
pub struct RandomOrderNumbers {
    prefix: String,
}

impl RandomOrderNumbers {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl OrderNumberGenerator for RandomOrderNumbers {
    fn next_number(&self) -> String {
        let suffix = rand::thread_rng().gen_range(100_000..=999_999);
        format_order_number(&self.prefix, Utc::now().year(), suffix)
    }
}

pub fn format_order_number(prefix: &str, year: i32, suffix: u32) -> String {
    format!("{prefix}-{year}-{suffix:06}")
}

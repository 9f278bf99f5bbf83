// src/utils/id.rs

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use uuid::Uuid;

/// Mints every identifier the form model hands out.
///
/// Form and question ids are millisecond timestamps, bumped so that two ids
/// minted in the same millisecond still differ and never go backwards.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    /// A generator whose next id is at least `stamp + 1`.
    pub fn starting_after(stamp: i64) -> Self {
        Self {
            last: AtomicI64::new(stamp),
        }
    }

    fn next_stamp(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = if now > prev { now } else { prev + 1 };
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }

    pub fn form_id(&self) -> String {
        format!("form-{}", self.next_stamp())
    }

    pub fn question_id(&self) -> String {
        format!("question-{}", self.next_stamp())
    }

    /// Responses are never ordered by id, so a random one is enough.
    pub fn response_id(&self) -> String {
        format!("response-{}", Uuid::new_v4())
    }
}

use chrono::{FixedOffset, NaiveDate, Utc};

/// Date format of the canonical `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of "today". Injected into the run so tests can pin the date.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    fn today_string(&self) -> String {
        self.today().format(DATE_FORMAT).to_string()
    }
}

/// Wall clock resolved in a fixed civil-time zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

/// Clock that always returns the same date.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

use chrono::{NaiveDateTime, Utc};

pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";
pub const DISPLAY_FMT: &str = "%Y-%m-%d %H:%M:%S";

// Clock supplies the current time to anything that measures elapsed loan days.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

// FixedClock stands still until advanced; clones share the same instant.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FixedClock {
    instant: std::rc::Rc<std::cell::Cell<NaiveDateTime>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self {
            instant: std::rc::Rc::new(std::cell::Cell::new(instant)),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.instant.set(self.instant.get() + by);
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant.get()
    }
}

// whole days between two instants, truncated toward zero
pub fn whole_days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_days()
}

pub mod serializer {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::DATE_FMT;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time_to_json(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        if let Ok(time) = DateTime::parse_from_rfc3339(&str_time) {
            return Ok(time.naive_utc());
        }
        NaiveDateTime::parse_from_str(&str_time, DATE_FMT).map_err(D::Error::custom)
    }

    fn time_to_json(t: NaiveDateTime) -> String {
        DateTime::<Utc>::from_naive_utc_and_offset(t, Utc).to_rfc3339()
    }
}

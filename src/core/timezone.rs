use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Hotel-local calendar handling
/// Timestamps are taken in UTC and shifted by the hotel's fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotelClock {
    offset: FixedOffset,
}

impl HotelClock {
    /// Build a clock from an offset in minutes east of UTC.
    /// Offsets outside +/- 24h fall back to UTC.
    pub fn from_offset_minutes(minutes: i32) -> Self {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Calendar date of `instant` in hotel-local time
    pub fn date_at(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// Today's date in hotel-local time
    pub fn today(&self) -> NaiveDate {
        self.date_at(Utc::now())
    }
}

impl Default for HotelClock {
    fn default() -> Self {
        Self::utc()
    }
}

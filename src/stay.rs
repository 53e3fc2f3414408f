// Default stay window for availability searches

use chrono::{Days, Local, NaiveDate};

pub const DEFAULT_DAYS_AHEAD: u64 = 3;
pub const DEFAULT_NIGHTS: u64 = 7;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayWindow {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl StayWindow {
    // Check-in `days_ahead` days after `today`, check-out `nights` days after check-in
    pub fn starting_from(today: NaiveDate, days_ahead: u64, nights: u64) -> Self {
        let check_in = today
            .checked_add_days(Days::new(days_ahead))
            .unwrap_or(NaiveDate::MAX);
        let check_out = check_in
            .checked_add_days(Days::new(nights))
            .unwrap_or(NaiveDate::MAX);

        Self {
            check_in,
            check_out,
        }
    }

    pub fn from_today(days_ahead: u64, nights: u64) -> Self {
        Self::starting_from(Local::now().date_naive(), days_ahead, nights)
    }

    pub fn check_in_str(&self) -> String {
        self.check_in.format(DATE_FORMAT).to_string()
    }

    pub fn check_out_str(&self) -> String {
        self.check_out.format(DATE_FORMAT).to_string()
    }
}

impl Default for StayWindow {
    fn default() -> Self {
        Self::from_today(DEFAULT_DAYS_AHEAD, DEFAULT_NIGHTS)
    }
}

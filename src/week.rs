use crate::models::WeekResponse;
use chrono::{Datelike, Local, NaiveDate};

/// Saturday runs alternate between two parks by ISO week parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn of(week: u32) -> Self {
        if week % 2 == 0 { Parity::Even } else { Parity::Odd }
    }

    pub fn label(self) -> &'static str {
        match self {
            Parity::Even => "Even week",
            Parity::Odd => "Odd week",
        }
    }

    pub fn saturday_location(self) -> &'static str {
        match self {
            Parity::Even => "Busse Woods",
            Parity::Odd => "Century Park",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekInfo {
    pub week: u32,
    pub parity: Parity,
    pub year: i32,
}

impl WeekInfo {
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    /// `year` is the calendar year (footer), not the ISO week-based year.
    pub fn for_date(date: NaiveDate) -> Self {
        let week = iso_week_number(date);
        Self {
            week,
            parity: Parity::of(week),
            year: date.year(),
        }
    }

    pub fn badge(&self) -> String {
        format!("Week {}", self.week)
    }

    pub fn inline(&self) -> String {
        format!("Week {} ({})", self.week, self.parity.label().to_lowercase())
    }

    pub fn to_response(&self) -> WeekResponse {
        WeekResponse {
            week: self.week,
            parity: self.parity.label(),
            saturday_location: self.parity.saturday_location(),
            year: self.year,
        }
    }
}

/// Monday-based week; week 1 holds the year's first Thursday.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

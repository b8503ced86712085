use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// Closed set of auction lifecycle states. Creation always starts at
/// `Upcoming`; later transitions happen only through the generic PATCH on
/// the status column (which the auction allow-list deliberately excludes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuctionStatus {
    Upcoming,
    Active,
    Closed,
}

impl AuctionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Upcoming => "Upcoming",
            AuctionStatus::Active => "Active",
            AuctionStatus::Closed => "Closed",
        }
    }
}

impl FromStr for AuctionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Upcoming" => Ok(AuctionStatus::Upcoming),
            "Active" => Ok(AuctionStatus::Active),
            "Closed" => Ok(AuctionStatus::Closed),
            other => Err(format!("unknown auction status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Auction {
    pub auction_id: i64,
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

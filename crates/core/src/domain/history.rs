use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A completed booking at the price actually paid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub actual_price: f64,
    #[serde(default)]
    pub check_in_date: Option<NaiveDate>,
    /// Days between booking and check-in, when the channel reports it.
    #[serde(default)]
    pub advance_days: Option<u32>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl Transaction {
    pub fn new(actual_price: f64, check_in_date: NaiveDate) -> Self {
        Self {
            actual_price,
            check_in_date: Some(check_in_date),
            advance_days: None,
            platform: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    #[serde(alias = "adopted", alias = "采纳")]
    Accepted,
    #[serde(alias = "拒绝")]
    Rejected,
    #[serde(alias = "调整")]
    Adjusted,
}

/// Owner reaction to an earlier recommendation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub actual_price: Option<f64>,
    #[serde(default)]
    pub suggested_price: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Feedback {
    pub fn new(feedback_type: FeedbackType) -> Self {
        Self { feedback_type, actual_price: None, suggested_price: None, note: None }
    }

    pub fn adjusted(suggested_price: f64, actual_price: f64) -> Self {
        Self {
            feedback_type: FeedbackType::Adjusted,
            actual_price: Some(actual_price),
            suggested_price: Some(suggested_price),
            note: None,
        }
    }
}

/// Transactions are expected in chronological order; the trend signal
/// splits them positionally.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalData {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
}

impl HistoricalData {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.feedbacks.is_empty()
    }
}

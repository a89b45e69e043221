use serde::Serialize;

/// Bluecoins stores amounts as integers scaled by one million.
pub const AMOUNT_SCALE: f64 = 1_000_000.0;

/// `deletedTransaction` value Bluecoins uses for a distinct deletion state.
/// Counted in the export summary, never filtered on.
pub const DELETED_SENTINEL: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Cleared,
    Pending,
    Void,
    Unknown,
}

impl Status {
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Self::Cleared,
            Some(1) => Self::Pending,
            Some(2) => Self::Void,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cleared => "Cleared",
            Self::Pending => "Pending",
            Self::Void => "Void",
            Self::Unknown => "Unknown",
        }
    }
}

impl Serialize for Status {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One denormalized output row. Field order is the CSV column order.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    #[serde(rename = "TransactionID")]
    pub id: i64,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Amount")]
    pub amount: Option<f64>,
    #[serde(rename = "Currency")]
    pub currency: Option<String>,
    #[serde(rename = "ConversionRate")]
    pub conversion_rate: Option<f64>,
    #[serde(rename = "Account")]
    pub account: Option<String>,
    #[serde(rename = "AccountType")]
    pub account_type: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "ParentCategory")]
    pub parent_category: Option<String>,
    #[serde(rename = "CategoryGroup")]
    pub category_group: Option<String>,
    #[serde(rename = "TransactionType")]
    pub transaction_type: Option<String>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
    #[serde(rename = "StatusCode")]
    pub status_code: Option<i64>,
    #[serde(rename = "ToAccountID")]
    pub to_account_id: Option<i64>,
    #[serde(rename = "ToAccount")]
    pub to_account: Option<String>,
    #[serde(rename = "DeletedFlag")]
    pub deleted_flag: Option<i64>,
    #[serde(rename = "TransferPairID")]
    pub transfer_pair_id: Option<i64>,
    #[serde(rename = "RecurringFlag")]
    pub recurring_flag: Option<i64>,
    #[serde(rename = "CreditCardInstallment")]
    pub installment_flag: Option<i64>,
    #[serde(rename = "Status")]
    pub status: Status,
}

pub const CSV_COLUMNS: [&str; 21] = [
    "TransactionID",
    "Date",
    "Title",
    "Amount",
    "Currency",
    "ConversionRate",
    "Account",
    "AccountType",
    "Category",
    "ParentCategory",
    "CategoryGroup",
    "TransactionType",
    "Notes",
    "StatusCode",
    "ToAccountID",
    "ToAccount",
    "DeletedFlag",
    "TransferPairID",
    "RecurringFlag",
    "CreditCardInstallment",
    "Status",
];

pub fn scale_amount(raw: f64) -> f64 {
    raw / AMOUNT_SCALE
}

//! Response group template model and the transaction status taxonomy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Transaction status taxonomy shared with the transaction pipeline.
///
/// The set is open-ended: templates may carry codes this service has no label
/// for yet, so records store the raw integer and this enum only decorates
/// known codes with a label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxnStatus {
    NotProcessed,
    Processing,
    Waiting,
    Success,
    Failed,
    WrongNumber,
    InvalidAmount,
    ProviderDown,
}

impl TxnStatus {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::NotProcessed),
            7 => Some(Self::Processing),
            9 => Some(Self::Waiting),
            10 => Some(Self::Success),
            20 => Some(Self::Failed),
            21 => Some(Self::WrongNumber),
            22 => Some(Self::InvalidAmount),
            23 => Some(Self::ProviderDown),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::NotProcessed => 0,
            Self::Processing => 7,
            Self::Waiting => 9,
            Self::Success => 10,
            Self::Failed => 20,
            Self::WrongNumber => 21,
            Self::InvalidAmount => 22,
            Self::ProviderDown => 23,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NotProcessed => "Not Processed",
            Self::Processing => "Processing",
            Self::Waiting => "Waiting",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::WrongNumber => "Wrong Number",
            Self::InvalidAmount => "Invalid Amount",
            Self::ProviderDown => "Provider Down",
        }
    }
}

/// Fields a template can extract from a raw provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractField {
    Number,
    Amount,
    Sn,
    RefId,
    ModuleBal,
    LapuId,
    Roffer,
}

impl ExtractField {
    /// Canonical extraction order. The matcher's forward scan walks fields in
    /// this order, so markers are expected to appear in the message this way.
    pub const ALL: [ExtractField; 7] = [
        Self::Number,
        Self::Amount,
        Self::Sn,
        Self::RefId,
        Self::ModuleBal,
        Self::LapuId,
        Self::Roffer,
    ];

    /// Field key as it appears in marker column names and API payloads.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Amount => "amount",
            Self::Sn => "sn",
            Self::RefId => "refid",
            Self::ModuleBal => "module_bal",
            Self::LapuId => "lapu_id",
            Self::Roffer => "roffer",
        }
    }

    /// Recharge templates always carry the target number and amount; the
    /// remaining fields depend on what the provider echoes back.
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Self::Number | Self::Amount)
    }

    /// Fields whose extracted slice must parse as a decimal number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Amount | Self::ModuleBal)
    }
}

/// A named template of before/after text markers used to classify and extract
/// fields from a raw provider response string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseGroup {
    pub id: Uuid,
    pub group_name: String,
    /// Substring that must appear in the message for this group to apply.
    pub txt_required: String,
    /// Substring that disqualifies the group when present.
    pub txt_not_required: Option<String>,
    pub txt_b_number: Option<String>,
    pub txt_a_number: Option<String>,
    pub txt_b_amount: Option<String>,
    pub txt_a_amount: Option<String>,
    pub txt_b_sn: Option<String>,
    pub txt_a_sn: Option<String>,
    pub txt_b_refid: Option<String>,
    pub txt_a_refid: Option<String>,
    pub txt_b_module_bal: Option<String>,
    pub txt_a_module_bal: Option<String>,
    pub txt_b_lapu_id: Option<String>,
    pub txt_a_lapu_id: Option<String>,
    pub txt_b_roffer: Option<String>,
    pub txt_a_roffer: Option<String>,
    /// Transaction status assigned when this template matches.
    pub status_code: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResponseGroup {
    /// Raw before/after marker options for `field`.
    pub fn raw_markers(&self, field: ExtractField) -> (Option<&str>, Option<&str>) {
        let (b, a) = match field {
            ExtractField::Number => (&self.txt_b_number, &self.txt_a_number),
            ExtractField::Amount => (&self.txt_b_amount, &self.txt_a_amount),
            ExtractField::Sn => (&self.txt_b_sn, &self.txt_a_sn),
            ExtractField::RefId => (&self.txt_b_refid, &self.txt_a_refid),
            ExtractField::ModuleBal => (&self.txt_b_module_bal, &self.txt_a_module_bal),
            ExtractField::LapuId => (&self.txt_b_lapu_id, &self.txt_a_lapu_id),
            ExtractField::Roffer => (&self.txt_b_roffer, &self.txt_a_roffer),
        };
        (b.as_deref(), a.as_deref())
    }

    /// Both markers for `field`, when the pair is fully configured.
    ///
    /// Empty strings count as unset so that a cleared form field never turns
    /// into a zero-length marker that matches everywhere.
    pub fn marker_pair(&self, field: ExtractField) -> Option<(&str, &str)> {
        let (b, a) = self.raw_markers(field);
        match (non_empty(b), non_empty(a)) {
            (Some(before), Some(after)) => Some((before, after)),
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Summary row returned by the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseGroupSummary {
    pub id: Uuid,
    pub group_name: String,
    pub txt_required: String,
    pub status_code: i32,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResponseGroup> for ResponseGroupSummary {
    fn from(group: &ResponseGroup) -> Self {
        Self {
            id: group.id,
            group_name: group.group_name.clone(),
            txt_required: group.txt_required.clone(),
            status_code: group.status_code,
            updated_at: group.updated_at,
        }
    }
}

/// Payload for creating a response group.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateResponseGroup {
    #[validate(length(min = 1, max = 100, message = "group_name is required"))]
    pub group_name: String,
    #[validate(length(min = 1, message = "txt_required is required"))]
    pub txt_required: String,
    pub txt_not_required: Option<String>,
    pub txt_b_number: Option<String>,
    pub txt_a_number: Option<String>,
    pub txt_b_amount: Option<String>,
    pub txt_a_amount: Option<String>,
    pub txt_b_sn: Option<String>,
    pub txt_a_sn: Option<String>,
    pub txt_b_refid: Option<String>,
    pub txt_a_refid: Option<String>,
    pub txt_b_module_bal: Option<String>,
    pub txt_a_module_bal: Option<String>,
    pub txt_b_lapu_id: Option<String>,
    pub txt_a_lapu_id: Option<String>,
    pub txt_b_roffer: Option<String>,
    pub txt_a_roffer: Option<String>,
    #[validate(range(min = 0, message = "status_code must be non-negative"))]
    pub status_code: i32,
}

/// Payload for updating a response group.
///
/// Absent fields keep their stored value. For the nullable text fields an
/// explicit empty string clears the value, matching how the admin form
/// submits cleared inputs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResponseGroup {
    pub group_name: Option<String>,
    pub txt_required: Option<String>,
    pub txt_not_required: Option<String>,
    pub txt_b_number: Option<String>,
    pub txt_a_number: Option<String>,
    pub txt_b_amount: Option<String>,
    pub txt_a_amount: Option<String>,
    pub txt_b_sn: Option<String>,
    pub txt_a_sn: Option<String>,
    pub txt_b_refid: Option<String>,
    pub txt_a_refid: Option<String>,
    pub txt_b_module_bal: Option<String>,
    pub txt_a_module_bal: Option<String>,
    pub txt_b_lapu_id: Option<String>,
    pub txt_a_lapu_id: Option<String>,
    pub txt_b_roffer: Option<String>,
    pub txt_a_roffer: Option<String>,
    pub status_code: Option<i32>,
}

// Marketing API ad account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{ExtraData, lenient_code_enum};

lenient_code_enum! {
    /// `account_status` of an ad account.
    pub enum AccountStatus {
        Active => 1,
        Disabled => 2,
        Unsettled => 3,
        PendingRiskReview => 7,
        PendingSettlement => 8,
        InGracePeriod => 9,
        PendingClosure => 100,
        Closed => 101,
        AnyActive => 201,
        AnyClosed => 202,
    }
}

lenient_code_enum! {
    /// `disable_reason` of an ad account. `0` means not disabled.
    pub enum DisableReason {
        NoReason => 0,
        AdsIntegrityPolicy => 1,
        AdsIpReview => 2,
        RiskPayment => 3,
        GrayAccountShutdown => 4,
        AdsAfcReview => 5,
        BusinessIntegrityRar => 6,
        PermanentClose => 7,
        UnusedResellerAccount => 8,
        UnusedAccount => 9,
    }
}

impl AccountStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::AnyActive)
    }
}

/// An ad account (`act_<account_id>`).
///
/// Money fields are strings in the account currency's minor unit, exactly as
/// sent by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdAccount {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub account_status: Option<AccountStatus>,
    #[serde(default)]
    pub disable_reason: Option<DisableReason>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub timezone_name: Option<String>,
    #[serde(default)]
    pub amount_spent: Option<String>,
    #[serde(default)]
    pub balance: Option<String>,
    #[serde(default)]
    pub spend_cap: Option<String>,
    #[serde(default, with = "crate::decode::datetime")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: ExtraData,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_enums_tolerate_new_codes() {
        let account: AdAccount = serde_json::from_value(json!({
            "id": "act_1",
            "account_status": 1,
            "disable_reason": 0,
            "currency": "USD"
        }))
        .unwrap();
        assert!(account.account_status.unwrap().is_active());
        assert_eq!(account.disable_reason, Some(DisableReason::NoReason));

        let future: AdAccount =
            serde_json::from_value(json!({"id": "act_2", "account_status": 777})).unwrap();
        assert_eq!(future.account_status, Some(AccountStatus::Unknown(777)));
        assert_eq!(
            serde_json::to_value(&future).unwrap()["account_status"],
            json!(777)
        );
    }
}

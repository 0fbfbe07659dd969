use serde::{Deserialize, Serialize};

/// 선물 계좌 자산별 잔고
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub asset: String,
    pub balance: String,
    #[serde(default)]
    pub available_balance: Option<String>,
}

impl AccountBalance {
    pub fn new(asset: impl Into<String>, balance: impl Into<String>, available: Option<&str>) -> Self {
        AccountBalance {
            asset: asset.into(),
            balance: balance.into(),
            available_balance: available.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balance_entry() {
        let raw = r#"{"accountAlias":"SgsR","asset":"USDT","balance":"122607.35137903","crossWalletBalance":"23.72469206","availableBalance":"23.72469206","maxWithdrawAmount":"23.72469206","marginAvailable":true,"updateTime":1617939110373}"#;
        let b: AccountBalance = serde_json::from_str(raw).unwrap();
        assert_eq!(b.asset, "USDT");
        assert_eq!(b.available_balance.as_deref(), Some("23.72469206"));
    }
}

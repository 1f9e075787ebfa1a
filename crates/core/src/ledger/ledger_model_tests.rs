#[cfg(test)]
mod tests {
    use crate::constants::MANUAL_ENTRY_SOURCE;
    use crate::errors::{Error, ValidationError};
    use crate::ledger::*;

    fn new_tx(action: &str, quantity: f64, price: f64, fees: f64) -> NewTransaction {
        NewTransaction {
            id: None,
            ticker: " aapl ".to_string(),
            trade_date: "2024-01-02".to_string(),
            action: action.to_string(),
            quantity,
            price,
            fees,
            currency: None,
            source_file: None,
            raw_data: None,
        }
    }

    #[test]
    fn test_amount_derivation_per_action() {
        let buy = new_tx("buy", 100.0, 150.0, 5.0).into_transaction().unwrap();
        assert_eq!(buy.amount, 15005.0);
        assert_eq!(buy.action, TransactionAction::Buy);

        let sell = new_tx("SELL", 100.0, 150.0, 5.0)
            .into_transaction()
            .unwrap();
        assert_eq!(sell.amount, 14995.0);

        let watch = new_tx("watch", 0.0, 150.0, 0.0).into_transaction().unwrap();
        assert_eq!(watch.amount, 0.0);
        assert_eq!(watch.action, TransactionAction::Watch);
    }

    #[test]
    fn test_into_transaction_normalizes_fields() {
        let tx = new_tx("BUY", 1.0, 1.0, 0.0).into_transaction().unwrap();
        assert_eq!(tx.ticker, "AAPL");
        assert_eq!(tx.currency, "USD");
        assert_eq!(tx.trade_date.to_string(), "2024-01-02 00:00:00");
        assert!(uuid::Uuid::parse_str(&tx.id).is_ok());
    }

    #[test]
    fn test_unknown_action_is_preserved() {
        let tx = new_tx("split", 2.0, 0.0, 0.0).into_transaction().unwrap();
        assert_eq!(tx.action, TransactionAction::Other("SPLIT".to_string()));
        assert_eq!(tx.action.as_str(), "SPLIT");
    }

    #[test]
    fn test_validation_rejects_bad_input() {
        assert!(matches!(
            new_tx("BUY", -1.0, 10.0, 0.0).validate(),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));
        assert!(new_tx("BUY", 1.0, f64::NAN, 0.0).validate().is_err());
        assert!(new_tx("BUY", 1.0, 10.0, -0.5).validate().is_err());

        let mut missing_ticker = new_tx("BUY", 1.0, 1.0, 0.0);
        missing_ticker.ticker = "  ".to_string();
        assert!(matches!(
            missing_ticker.validate(),
            Err(Error::Validation(ValidationError::MissingField(f))) if f == "ticker"
        ));

        let mut bad_date = new_tx("BUY", 1.0, 1.0, 0.0);
        bad_date.trade_date = "yesterday".to_string();
        assert!(bad_date.validate().is_err());
    }

    #[test]
    fn test_sell_fees_cannot_exceed_proceeds() {
        let err = new_tx("SELL", 1.0, 0.5, 1.0).into_transaction().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidInput(_))
        ));

        let break_even = new_tx("SELL", 1.0, 1.0, 1.0).into_transaction().unwrap();
        assert_eq!(break_even.amount, 0.0);

        // BUY fees add to the cost, so any size is fine.
        let buy = new_tx("BUY", 1.0, 0.5, 1.0).into_transaction().unwrap();
        assert_eq!(buy.amount, 1.5);
    }

    #[test]
    fn test_transaction_serializes_action_and_date_as_strings() {
        let tx = new_tx("BUY", 1.0, 2.0, 0.0).into_transaction().unwrap();
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["action"], "BUY");
        assert_eq!(json["tradeDate"], "2024-01-02 00:00:00");

        let back: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_manual_trade_provenance() {
        let trade = ManualTrade {
            ticker: "TSLA".to_string(),
            trade_date: "2024-05-01 10:00:00".to_string(),
            action: "BUY".to_string(),
            quantity: 3.0,
            price: 200.0,
            fees: 1.0,
            currency: None,
        };
        let new_tx = trade.into_new_transaction().unwrap();
        assert_eq!(new_tx.source_file.as_deref(), Some(MANUAL_ENTRY_SOURCE));

        let raw: serde_json::Value =
            serde_json::from_str(new_tx.raw_data.as_deref().unwrap()).unwrap();
        assert_eq!(raw["source"], "manual_entry");
        assert_eq!(raw["quantity"], 3.0);
    }

    #[test]
    fn test_cash_flow_sign_normalization() {
        let make = |kind: &str, amount: f64| NewCashFlow {
            id: None,
            date: "2024-01-01".to_string(),
            amount,
            cash_flow_type: kind.to_string(),
            description: None,
        };

        assert_eq!(make("DEPOSIT", -500.0).into_cash_flow().unwrap().amount, 500.0);
        assert_eq!(
            make("withdrawal", 500.0).into_cash_flow().unwrap().amount,
            -500.0
        );
        assert_eq!(make("DIVIDEND", -3.0).into_cash_flow().unwrap().amount, -3.0);
        assert!(make("TRANSFER", 1.0).into_cash_flow().is_err());
        assert!(make("DEPOSIT", f64::INFINITY).into_cash_flow().is_err());
    }

    #[test]
    fn test_cash_flow_accepts_datetime_date() {
        let cf = NewCashFlow {
            id: Some("cf-1".to_string()),
            date: "2024-02-03 12:00:00".to_string(),
            amount: 10.0,
            cash_flow_type: "DEPOSIT".to_string(),
            description: Some(String::new()),
        }
        .into_cash_flow()
        .unwrap();
        assert_eq!(cf.id, "cf-1");
        assert_eq!(cf.date.to_string(), "2024-02-03");
        assert_eq!(cf.description, None);
    }

    #[test]
    fn test_derive_amount_other_action() {
        let other = TransactionAction::from("REINVEST");
        assert_eq!(derive_amount(&other, 2.0, 5.0, 1.0), 10.0);
    }
}

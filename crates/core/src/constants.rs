/// Quantity threshold below which a position counts as closed.
pub const QUANTITY_EPSILON: f64 = 1e-4;

/// Currency assigned to transactions that do not specify one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Provenance recorded for trades entered by hand.
pub const MANUAL_ENTRY_SOURCE: &str = "MANUAL_ENTRY";

/// Storage format for trade dates.
pub const TRADE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage format for calendar dates (cash flows, snapshots).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Purchase of a security. Decreases cash and increases quantity.
pub const TRANSACTION_ACTION_BUY: &str = "BUY";

/// Disposal of a security. Increases cash and decreases quantity.
pub const TRANSACTION_ACTION_SELL: &str = "SELL";

/// Ticker tracked without a position. No cash or quantity impact.
pub const TRANSACTION_ACTION_WATCH: &str = "WATCH";

/// Incoming funds. Stored positive.
pub const CASH_FLOW_TYPE_DEPOSIT: &str = "DEPOSIT";

/// Outgoing funds. Stored negative.
pub const CASH_FLOW_TYPE_WITHDRAWAL: &str = "WITHDRAWAL";

/// Dividend paid into the account. Stored as given.
pub const CASH_FLOW_TYPE_DIVIDEND: &str = "DIVIDEND";

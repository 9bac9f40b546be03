pub mod api_keys;
pub mod merchants;
pub mod payment_links;
pub mod transaction_analytics;
pub mod transactions;

use solpay_sdk::objects::{
    Network as SdkNetwork, PaymentLinkStatus as SdkPaymentLinkStatus,
    TokenSymbol as SdkTokenSymbol, TransactionStatus as SdkTransactionStatus,
};

/// Token symbol for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `solpay_sdk::objects::TokenSymbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE", type_name = "token_symbol")]
pub enum TokenSymbol {
    Sol,
    Usdc,
    Ray,
    Srm,
    Fida,
}

impl From<TokenSymbol> for SdkTokenSymbol {
    fn from(value: TokenSymbol) -> Self {
        match value {
            TokenSymbol::Sol => SdkTokenSymbol::Sol,
            TokenSymbol::Usdc => SdkTokenSymbol::Usdc,
            TokenSymbol::Ray => SdkTokenSymbol::Ray,
            TokenSymbol::Srm => SdkTokenSymbol::Srm,
            TokenSymbol::Fida => SdkTokenSymbol::Fida,
        }
    }
}

impl From<SdkTokenSymbol> for TokenSymbol {
    fn from(value: SdkTokenSymbol) -> Self {
        match value {
            SdkTokenSymbol::Sol => TokenSymbol::Sol,
            SdkTokenSymbol::Usdc => TokenSymbol::Usdc,
            SdkTokenSymbol::Ray => TokenSymbol::Ray,
            SdkTokenSymbol::Srm => TokenSymbol::Srm,
            SdkTokenSymbol::Fida => TokenSymbol::Fida,
        }
    }
}

/// Solana cluster for database operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "solana_network")]
pub enum SolanaNetwork {
    Devnet,
    Mainnet,
}

impl From<SolanaNetwork> for SdkNetwork {
    fn from(value: SolanaNetwork) -> Self {
        match value {
            SolanaNetwork::Devnet => SdkNetwork::Devnet,
            SolanaNetwork::Mainnet => SdkNetwork::Mainnet,
        }
    }
}

impl From<SdkNetwork> for SolanaNetwork {
    fn from(value: SdkNetwork) -> Self {
        match value {
            SdkNetwork::Devnet => SolanaNetwork::Devnet,
            SdkNetwork::Mainnet => SolanaNetwork::Mainnet,
        }
    }
}

/// Transaction status for database operations. Only advances
/// `pending` → `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "transaction_status")]
pub enum TransactionStatus {
    Pending,
    Completed,
}

impl From<TransactionStatus> for SdkTransactionStatus {
    fn from(value: TransactionStatus) -> Self {
        match value {
            TransactionStatus::Pending => SdkTransactionStatus::Pending,
            TransactionStatus::Completed => SdkTransactionStatus::Completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "payment_link_status")]
pub enum PaymentLinkStatus {
    Active,
    Inactive,
}

impl From<PaymentLinkStatus> for SdkPaymentLinkStatus {
    fn from(value: PaymentLinkStatus) -> Self {
        match value {
            PaymentLinkStatus::Active => SdkPaymentLinkStatus::Active,
            PaymentLinkStatus::Inactive => SdkPaymentLinkStatus::Inactive,
        }
    }
}

impl From<SdkPaymentLinkStatus> for PaymentLinkStatus {
    fn from(value: SdkPaymentLinkStatus) -> Self {
        match value {
            SdkPaymentLinkStatus::Active => PaymentLinkStatus::Active,
            SdkPaymentLinkStatus::Inactive => PaymentLinkStatus::Inactive,
        }
    }
}

/// Seconds since the epoch, as exposed on the API.
pub fn unix_timestamp(at: time::PrimitiveDateTime) -> i64 {
    at.assume_utc().unix_timestamp()
}

pub mod analytics;
pub mod api_key;
pub mod merchant;
pub mod pay;
pub mod payment_link;
pub mod tokens;
pub mod transaction;

pub use analytics::{
    AnalyticsQuery, AnalyticsResponse, DailyAnalytics, TransactionSummary, VolumePoint,
};
pub use api_key::{ApiKeyResponse, CreateApiKeyRequest, CreatedApiKey, ToggleApiKeyRequest};
pub use merchant::{
    CreateMerchantRequest, CreatedMerchant, MerchantProfile, MerchantSettings, PublicMerchant,
    SettingsValidationError,
};
pub use pay::{
    AttachTransferRequest, CheckoutView, CompleteTransactionRequest, ErrorBody,
    OpenTransactionRequest, ReceiptQuery, ReceiptView,
};
pub use payment_link::{
    CreatePaymentLinkRequest, PaymentLinkResponse, PaymentLinkStatus,
    PaymentLinkValidationError, PublicPaymentLink, SetPaymentLinkStatusRequest,
};
pub use tokens::{ACCEPTED_TOKENS, Network, TokenInfo, TokenSymbol};
pub use transaction::{
    ListTransactionsQuery, TRANSACTION_PAGE_SIZE, TransactionPage, TransactionResponse,
    TransactionSortColumn, TransactionStatus,
};

//! The customer payment flow.
//!
//! One sequential pass per attempt:
//!
//! 1. load the link and its merchant (rejecting unknown or inactive links);
//! 2. connect the wallet;
//! 3. write a pending record;
//! 4. transfer the invoiced amount to the merchant and wait for confirmation;
//! 5. if the customer paid in another token than the merchant settles in,
//!    quote, sign, submit and confirm a swap;
//! 6. complete the record with both signatures.
//!
//! Nothing is retried and nothing is rolled back. Once the transfer has
//! confirmed, later failures surface as [`CheckoutError::Unreconciled`].

use std::str::FromStr;
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::VersionedTransaction;
use solpay_sdk::explorer::explorer_tx_url;
use solpay_sdk::objects::{CheckoutView, Network, TokenInfo, TokenSymbol, TransactionResponse};
use uuid::Uuid;

use crate::chain::{self, ChainClient, ChainError};
use crate::ledger::{LedgerError, PaymentLedger};
use crate::swap::{AggregatorError, DEFAULT_SLIPPAGE_BPS, QuoteRequest, SwapAggregator};
use crate::tokens::{AmountError, to_base_units};
use crate::wallet::{Wallet, WalletError};

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("payment link not found")]
    NotFound,
    #[error("payment link is inactive")]
    LinkInactive,
    #[error("no wallet is installed")]
    WalletNotInstalled,
    #[error("wallet connection rejected: {0}")]
    WalletConnectionRejected(String),
    #[error("wallet is not connected")]
    WalletNotConnected,
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
    #[error("transaction {signature} was not confirmed in time")]
    ConfirmationTimeout { signature: String },
    #[error("swap aggregator error: {0}")]
    Aggregator(#[from] AggregatorError),
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("token {0} is not accepted")]
    UnsupportedToken(TokenSymbol),
    #[error("invalid amount: {0}")]
    AmountPrecision(#[from] AmountError),
    /// The transfer confirmed on chain but a later step failed.
    #[error("transfer {transaction_signature} confirmed but not reconciled: {source}")]
    Unreconciled {
        transaction_id: Uuid,
        transaction_signature: String,
        #[source]
        source: Box<CheckoutError>,
    },
}

impl CheckoutError {
    /// Notification text for the customer.
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::NotFound => "Payment link not found.".to_string(),
            CheckoutError::LinkInactive => "This payment link is no longer active.".to_string(),
            CheckoutError::WalletNotInstalled => {
                "No wallet is installed. Please install one first.".to_string()
            }
            CheckoutError::WalletConnectionRejected(_) => {
                "Failed to connect to wallet. Please try again.".to_string()
            }
            CheckoutError::WalletNotConnected => {
                "Wallet is not connected. Please connect your wallet first.".to_string()
            }
            CheckoutError::SubmissionFailed(reason) => {
                format!("Failed to process payment: {reason}")
            }
            CheckoutError::ConfirmationTimeout { .. } => {
                "Payment was sent but not confirmed. Please check your wallet for details."
                    .to_string()
            }
            CheckoutError::Aggregator(_) => "Failed to swap tokens. Please try again.".to_string(),
            CheckoutError::Persistence(_) => {
                "Failed to record the payment. Please contact the merchant.".to_string()
            }
            CheckoutError::UnsupportedToken(symbol) => {
                format!("{symbol} is not accepted for this payment.")
            }
            CheckoutError::AmountPrecision(e) => format!("Invalid payment amount: {e}."),
            CheckoutError::Unreconciled {
                transaction_signature,
                ..
            } => format!(
                "Your payment {transaction_signature} went through, but settlement did not \
                 complete. Please contact the merchant with this signature."
            ),
        }
    }
}

impl From<LedgerError> for CheckoutError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound => CheckoutError::NotFound,
            LedgerError::LinkInactive => CheckoutError::LinkInactive,
            LedgerError::Persistence(msg) => CheckoutError::Persistence(msg),
        }
    }
}

impl From<WalletError> for CheckoutError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotInstalled => CheckoutError::WalletNotInstalled,
            WalletError::ConnectionRejected(reason) => {
                CheckoutError::WalletConnectionRejected(reason)
            }
            WalletError::NotConnected => CheckoutError::WalletNotConnected,
            WalletError::Signing(reason) => CheckoutError::SubmissionFailed(reason),
        }
    }
}

impl From<ChainError> for CheckoutError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::ConfirmationTimeout { signature, .. } => {
                CheckoutError::ConfirmationTimeout {
                    signature: signature.to_string(),
                }
            }
            other => CheckoutError::SubmissionFailed(other.to_string()),
        }
    }
}

/// Outcome of a completed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub transaction: TransactionResponse,
    pub transaction_signature: String,
    pub swap_signature: Option<String>,
    pub explorer_url: String,
    /// `/pay/{link_id}/success?tx={signature}`
    pub redirect_path: String,
}

pub struct Checkout {
    ledger: Arc<dyn PaymentLedger>,
    wallet: Arc<dyn Wallet>,
    chain: Arc<dyn ChainClient>,
    aggregator: Arc<dyn SwapAggregator>,
    slippage_bps: u16,
}

impl Checkout {
    pub fn new(
        ledger: Arc<dyn PaymentLedger>,
        wallet: Arc<dyn Wallet>,
        chain: Arc<dyn ChainClient>,
        aggregator: Arc<dyn SwapAggregator>,
    ) -> Self {
        Self {
            ledger,
            wallet,
            chain,
            aggregator,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u16) -> Self {
        self.slippage_bps = slippage_bps;
        self
    }

    /// Validate the link and resolve its merchant.
    pub async fn load(&self, link_id: Uuid) -> Result<CheckoutView, CheckoutError> {
        Ok(self.ledger.checkout_view(link_id).await?)
    }

    pub async fn connect_wallet(&self) -> Result<Pubkey, CheckoutError> {
        Ok(self.wallet.connect().await?)
    }

    /// Load, connect and pay in one go.
    pub async fn run(
        &self,
        link_id: Uuid,
        token: TokenSymbol,
    ) -> Result<PaymentReceipt, CheckoutError> {
        let view = self.load(link_id).await?;
        self.connect_wallet().await?;
        self.pay(&view, token).await
    }

    /// Pay the link shown in `view` with `token`. The wallet must already be
    /// connected.
    #[tracing::instrument(skip_all, fields(link_id = %view.link.id, %token))]
    pub async fn pay(
        &self,
        view: &CheckoutView,
        token: TokenSymbol,
    ) -> Result<PaymentReceipt, CheckoutError> {
        if !self.wallet.is_connected() {
            return Err(CheckoutError::WalletNotConnected);
        }
        let payer = self
            .wallet
            .public_key()
            .ok_or(CheckoutError::WalletNotConnected)?;

        let paid_with = find_token(view, token)?;
        let settle_in = find_token(view, view.merchant.preferred_token)?;
        let amount = to_base_units(view.link.amount, paid_with.decimals)?;
        let recipient = Pubkey::from_str(&view.merchant.wallet_address).map_err(|_| {
            CheckoutError::SubmissionFailed(format!(
                "invalid merchant wallet address {}",
                view.merchant.wallet_address
            ))
        })?;
        let network = view.merchant.network;

        let record = self.ledger.open_pending(view.link.id, token).await?;
        tracing::info!(transaction_id = %record.id, "Pending transaction recorded");

        let instructions =
            chain::build_transfer_instructions(&payer, &recipient, paid_with, amount)?;
        let transfer_sig = self.sign_and_submit(network, &payer, instructions).await?;
        let transfer_sig = transfer_sig.to_string();
        tracing::info!(signature = %transfer_sig, "Transfer confirmed");

        if let Err(e) = self
            .ledger
            .attach_transfer(view.link.id, record.id, &transfer_sig)
            .await
        {
            tracing::warn!(error = %e, transaction_id = %record.id, "Failed to attach transfer signature");
        }

        let unreconciled = |source: CheckoutError| {
            tracing::error!(
                transaction_id = %record.id,
                signature = %transfer_sig,
                error = %source,
                "Transfer confirmed but payment not reconciled"
            );
            CheckoutError::Unreconciled {
                transaction_id: record.id,
                transaction_signature: transfer_sig.clone(),
                source: Box::new(source),
            }
        };

        let swap_sig = if token != view.merchant.preferred_token {
            let sig = self
                .swap(network, &payer, paid_with, settle_in, amount)
                .await
                .map_err(&unreconciled)?;
            tracing::info!(signature = %sig, "Swap confirmed");
            Some(sig)
        } else {
            None
        };

        let completed = self
            .ledger
            .complete(view.link.id, record.id, &transfer_sig, swap_sig.as_deref())
            .await
            .map_err(|e| unreconciled(e.into()))?;

        Ok(PaymentReceipt {
            explorer_url: explorer_tx_url(network, &transfer_sig),
            redirect_path: format!("/pay/{}/success?tx={transfer_sig}", view.link.id),
            transaction: completed,
            transaction_signature: transfer_sig,
            swap_signature: swap_sig,
        })
    }

    async fn sign_and_submit(
        &self,
        network: Network,
        payer: &Pubkey,
        instructions: Vec<solana_sdk::instruction::Instruction>,
    ) -> Result<solana_sdk::signature::Signature, CheckoutError> {
        let blockhash = self.chain.latest_blockhash(network).await?;
        let tx = chain::unsigned_transaction(payer, &instructions, blockhash)?;
        self.submit(network, tx).await
    }

    async fn submit(
        &self,
        network: Network,
        tx: VersionedTransaction,
    ) -> Result<solana_sdk::signature::Signature, CheckoutError> {
        let signed = self.wallet.sign_transaction(tx).await?;
        Ok(self.chain.submit_and_confirm(network, &signed).await?)
    }

    async fn swap(
        &self,
        network: Network,
        payer: &Pubkey,
        from: &TokenInfo,
        to: &TokenInfo,
        amount: u64,
    ) -> Result<String, CheckoutError> {
        let quote = self
            .aggregator
            .quote(&QuoteRequest {
                input_mint: from.mint.clone(),
                output_mint: to.mint.clone(),
                amount,
                slippage_bps: self.slippage_bps,
            })
            .await?;
        let tx = self.aggregator.swap_transaction(&quote, payer).await?;
        let sig = self.submit(network, tx).await?;
        Ok(sig.to_string())
    }
}

fn find_token(view: &CheckoutView, symbol: TokenSymbol) -> Result<&TokenInfo, CheckoutError> {
    view.tokens
        .iter()
        .find(|t| t.symbol == symbol)
        .ok_or(CheckoutError::UnsupportedToken(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swap::Quote;
    use crate::tokens::TokenCatalog;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use solana_sdk::hash::Hash;
    use solana_sdk::signature::{Keypair, Signature, Signer};
    use solana_sdk::system_instruction;
    use solpay_sdk::objects::{PublicMerchant, PublicPaymentLink, TransactionStatus};
    use std::sync::Mutex;
    use std::time::Duration;

    const MERCHANT_WALLET: &str = "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R";

    // ---- fakes -------------------------------------------------------------

    #[derive(Default)]
    struct FakeLedger {
        inactive: bool,
        fail_complete: bool,
        records: Mutex<Vec<TransactionResponse>>,
        /// Every status each record went through, in order.
        history: Mutex<Vec<TransactionStatus>>,
        view: Mutex<Option<CheckoutView>>,
    }

    impl FakeLedger {
        fn with_view(view: CheckoutView) -> Self {
            Self {
                view: Mutex::new(Some(view)),
                ..Default::default()
            }
        }

        fn records(&self) -> Vec<TransactionResponse> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PaymentLedger for FakeLedger {
        async fn checkout_view(&self, link_id: Uuid) -> Result<CheckoutView, LedgerError> {
            if self.inactive {
                return Err(LedgerError::LinkInactive);
            }
            self.view
                .lock()
                .unwrap()
                .clone()
                .filter(|v| v.link.id == link_id)
                .ok_or(LedgerError::NotFound)
        }

        async fn open_pending(
            &self,
            link_id: Uuid,
            token: TokenSymbol,
        ) -> Result<TransactionResponse, LedgerError> {
            if self.inactive {
                return Err(LedgerError::LinkInactive);
            }
            let view = self.view.lock().unwrap().clone().ok_or(LedgerError::NotFound)?;
            let record = TransactionResponse {
                id: Uuid::new_v4(),
                merchant_id: view.merchant.id,
                payment_link_id: link_id,
                amount: view.link.amount,
                token,
                target_token: view.merchant.preferred_token,
                status: TransactionStatus::Pending,
                transaction_signature: None,
                swap_signature: None,
                created_at: 0,
            };
            self.records.lock().unwrap().push(record.clone());
            self.history.lock().unwrap().push(TransactionStatus::Pending);
            Ok(record)
        }

        async fn attach_transfer(
            &self,
            _link_id: Uuid,
            transaction_id: Uuid,
            transaction_signature: &str,
        ) -> Result<TransactionResponse, LedgerError> {
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.id == transaction_id && r.status == TransactionStatus::Pending)
                .ok_or(LedgerError::NotFound)?;
            record.transaction_signature = Some(transaction_signature.to_string());
            Ok(record.clone())
        }

        async fn complete(
            &self,
            _link_id: Uuid,
            transaction_id: Uuid,
            transaction_signature: &str,
            swap_signature: Option<&str>,
        ) -> Result<TransactionResponse, LedgerError> {
            if self.fail_complete {
                return Err(LedgerError::Persistence("database unavailable".to_string()));
            }
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.id == transaction_id && r.status == TransactionStatus::Pending)
                .ok_or(LedgerError::NotFound)?;
            record.status = TransactionStatus::Completed;
            record.transaction_signature = Some(transaction_signature.to_string());
            record.swap_signature = swap_signature.map(str::to_string);
            self.history.lock().unwrap().push(TransactionStatus::Completed);
            Ok(record.clone())
        }
    }

    struct FakeWallet {
        installed: bool,
        keypair: Keypair,
        connected: Mutex<bool>,
    }

    impl FakeWallet {
        fn new() -> Self {
            Self {
                installed: true,
                keypair: Keypair::new(),
                connected: Mutex::new(false),
            }
        }

        fn not_installed() -> Self {
            Self {
                installed: false,
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl Wallet for FakeWallet {
        async fn connect(&self) -> Result<Pubkey, WalletError> {
            if !self.installed {
                return Err(WalletError::NotInstalled);
            }
            *self.connected.lock().unwrap() = true;
            Ok(self.keypair.pubkey())
        }

        fn is_connected(&self) -> bool {
            *self.connected.lock().unwrap()
        }

        fn public_key(&self) -> Option<Pubkey> {
            self.is_connected().then(|| self.keypair.pubkey())
        }

        async fn sign_transaction(
            &self,
            mut tx: VersionedTransaction,
        ) -> Result<VersionedTransaction, WalletError> {
            if !self.is_connected() {
                return Err(WalletError::NotConnected);
            }
            let sig = self.keypair.sign_message(&tx.message.serialize());
            tx.signatures = vec![sig];
            Ok(tx)
        }

        async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
            Ok(self.keypair.sign_message(message))
        }
    }

    #[derive(Default)]
    struct FakeChain {
        reject: bool,
        timeout: bool,
        submitted: Mutex<Vec<VersionedTransaction>>,
    }

    impl FakeChain {
        fn submitted(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChainClient for FakeChain {
        async fn latest_blockhash(&self, _network: Network) -> Result<Hash, ChainError> {
            Ok(Hash::new_unique())
        }

        async fn submit_and_confirm(
            &self,
            _network: Network,
            tx: &VersionedTransaction,
        ) -> Result<Signature, ChainError> {
            if self.reject {
                return Err(ChainError::Submission("insufficient funds".to_string()));
            }
            let signature = tx.signatures.first().copied().unwrap_or_default();
            if self.timeout {
                return Err(ChainError::ConfirmationTimeout {
                    signature,
                    waited: Duration::from_secs(60),
                });
            }
            self.submitted.lock().unwrap().push(tx.clone());
            Ok(signature)
        }
    }

    #[derive(Default)]
    struct FakeAggregator {
        fail_quote: bool,
        quotes: Mutex<Vec<QuoteRequest>>,
    }

    impl FakeAggregator {
        fn calls(&self) -> usize {
            self.quotes.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SwapAggregator for FakeAggregator {
        async fn quote(&self, request: &QuoteRequest) -> Result<Quote, AggregatorError> {
            if self.fail_quote {
                return Err(AggregatorError::Api {
                    status: reqwest::StatusCode::BAD_REQUEST,
                    body: "no route".to_string(),
                });
            }
            self.quotes.lock().unwrap().push(request.clone());
            Quote::from_value(serde_json::json!({
                "inAmount": request.amount.to_string(),
                "outAmount": "41230000",
            }))
        }

        async fn swap_transaction(
            &self,
            _quote: &Quote,
            user: &Pubkey,
        ) -> Result<VersionedTransaction, AggregatorError> {
            let ix = system_instruction::transfer(user, &Pubkey::new_unique(), 1);
            chain::unsigned_transaction(user, &[ix], Hash::new_unique())
                .map_err(|e| AggregatorError::Transaction(e.to_string()))
        }
    }

    // ---- harness -----------------------------------------------------------

    fn view(amount: &str, preferred: TokenSymbol) -> CheckoutView {
        CheckoutView {
            link: PublicPaymentLink {
                id: Uuid::new_v4(),
                name: "Coffee".to_string(),
                description: None,
                amount: Decimal::from_str(amount).unwrap(),
            },
            merchant: PublicMerchant {
                id: Uuid::new_v4(),
                business_name: "Corner Cafe".to_string(),
                wallet_address: MERCHANT_WALLET.to_string(),
                preferred_token: preferred,
                network: Network::Devnet,
            },
            tokens: TokenCatalog::builtin().tokens().to_vec(),
        }
    }

    struct Harness {
        ledger: Arc<FakeLedger>,
        wallet: Arc<FakeWallet>,
        chain: Arc<FakeChain>,
        aggregator: Arc<FakeAggregator>,
    }

    impl Harness {
        fn new(ledger: FakeLedger) -> Self {
            Self {
                ledger: Arc::new(ledger),
                wallet: Arc::new(FakeWallet::new()),
                chain: Arc::new(FakeChain::default()),
                aggregator: Arc::new(FakeAggregator::default()),
            }
        }

        fn checkout(&self) -> Checkout {
            Checkout::new(
                self.ledger.clone(),
                self.wallet.clone(),
                self.chain.clone(),
                self.aggregator.clone(),
            )
        }
    }

    // ---- properties --------------------------------------------------------

    #[tokio::test]
    async fn same_token_pays_without_swap() {
        let v = view("10.00", TokenSymbol::Sol);
        let h = Harness::new(FakeLedger::with_view(v.clone()));

        let receipt = h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap();

        assert_eq!(h.aggregator.calls(), 0);
        assert_eq!(h.chain.submitted(), 1);
        assert_eq!(receipt.swap_signature, None);
        assert_eq!(receipt.transaction.status, TransactionStatus::Completed);
        assert_eq!(receipt.transaction.swap_signature, None);
        assert_eq!(
            receipt.redirect_path,
            format!("/pay/{}/success?tx={}", v.link.id, receipt.transaction_signature)
        );
        assert!(receipt.explorer_url.ends_with("?cluster=devnet"));
    }

    #[tokio::test]
    async fn different_token_transfers_then_swaps() {
        let v = view("25.00", TokenSymbol::Usdc);
        let h = Harness::new(FakeLedger::with_view(v.clone()));

        let receipt = h.checkout().run(v.link.id, TokenSymbol::Ray).await.unwrap();

        assert_eq!(h.chain.submitted(), 2);
        assert_eq!(h.aggregator.calls(), 1);
        let quote = h.aggregator.quotes.lock().unwrap()[0].clone();
        assert_eq!(quote.amount, 25_000_000);
        assert_eq!(quote.slippage_bps, DEFAULT_SLIPPAGE_BPS);
        let catalog = TokenCatalog::builtin();
        assert_eq!(quote.input_mint, catalog.get(TokenSymbol::Ray).unwrap().mint);
        assert_eq!(quote.output_mint, catalog.get(TokenSymbol::Usdc).unwrap().mint);

        let record = &h.ledger.records()[0];
        assert_eq!(record.target_token, TokenSymbol::Usdc);
        assert_eq!(record.status, TransactionStatus::Completed);
        assert!(record.swap_signature.is_some());
        assert_eq!(receipt.swap_signature, record.swap_signature);
    }

    #[tokio::test]
    async fn swap_happens_iff_tokens_differ() {
        for paid in solpay_sdk::objects::ACCEPTED_TOKENS {
            let v = view("1", TokenSymbol::Usdc);
            let h = Harness::new(FakeLedger::with_view(v.clone()));
            h.checkout().run(v.link.id, paid).await.unwrap();
            let swapped = h.aggregator.calls() == 1;
            assert_eq!(swapped, paid != TokenSymbol::Usdc, "paid with {paid}");
        }
    }

    #[tokio::test]
    async fn inactive_link_never_records() {
        let v = view("10", TokenSymbol::Sol);
        let mut ledger = FakeLedger::with_view(v.clone());
        ledger.inactive = true;
        let h = Harness::new(ledger);

        let err = h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap_err();
        assert!(matches!(err, CheckoutError::LinkInactive));
        assert!(h.ledger.records().is_empty());
        assert_eq!(h.chain.submitted(), 0);
    }

    #[tokio::test]
    async fn unknown_link_is_not_found() {
        let v = view("10", TokenSymbol::Sol);
        let h = Harness::new(FakeLedger::with_view(v));
        let err = h
            .checkout()
            .run(Uuid::new_v4(), TokenSymbol::Sol)
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::NotFound));
    }

    #[tokio::test]
    async fn missing_wallet_aborts_before_recording() {
        let v = view("10", TokenSymbol::Sol);
        let mut h = Harness::new(FakeLedger::with_view(v.clone()));
        h.wallet = Arc::new(FakeWallet::not_installed());

        let err = h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap_err();
        assert!(matches!(err, CheckoutError::WalletNotInstalled));
        assert!(h.ledger.records().is_empty());
    }

    #[tokio::test]
    async fn pay_requires_connected_wallet() {
        let v = view("10", TokenSymbol::Sol);
        let h = Harness::new(FakeLedger::with_view(v.clone()));

        let err = h.checkout().pay(&v, TokenSymbol::Sol).await.unwrap_err();
        assert!(matches!(err, CheckoutError::WalletNotConnected));
        assert!(h.ledger.records().is_empty());
    }

    #[tokio::test]
    async fn status_only_moves_forward() {
        let v = view("10", TokenSymbol::Sol);
        let h = Harness::new(FakeLedger::with_view(v.clone()));
        h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap();
        assert_eq!(
            *h.ledger.history.lock().unwrap(),
            vec![TransactionStatus::Pending, TransactionStatus::Completed]
        );

        let mut h = Harness::new(FakeLedger::with_view(v.clone()));
        h.chain = Arc::new(FakeChain {
            reject: true,
            ..Default::default()
        });
        let err = h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap_err();
        assert!(matches!(err, CheckoutError::SubmissionFailed(_)));
        assert_eq!(
            *h.ledger.history.lock().unwrap(),
            vec![TransactionStatus::Pending]
        );
    }

    #[tokio::test]
    async fn confirmation_timeout_is_surfaced() {
        let v = view("10", TokenSymbol::Sol);
        let mut h = Harness::new(FakeLedger::with_view(v.clone()));
        h.chain = Arc::new(FakeChain {
            timeout: true,
            ..Default::default()
        });
        let err = h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ConfirmationTimeout { .. }));
        assert!(err.user_message().contains("not confirmed"));
    }

    #[tokio::test]
    async fn failed_swap_is_unreconciled_with_transfer_attached() {
        let v = view("25", TokenSymbol::Usdc);
        let mut h = Harness::new(FakeLedger::with_view(v.clone()));
        h.aggregator = Arc::new(FakeAggregator {
            fail_quote: true,
            ..Default::default()
        });

        let err = h.checkout().run(v.link.id, TokenSymbol::Ray).await.unwrap_err();
        let CheckoutError::Unreconciled {
            transaction_id,
            transaction_signature,
            source,
        } = err
        else {
            panic!("expected unreconciled error, got {err:?}");
        };
        assert!(matches!(*source, CheckoutError::Aggregator(_)));

        let record = &h.ledger.records()[0];
        assert_eq!(record.id, transaction_id);
        assert_eq!(record.status, TransactionStatus::Pending);
        assert_eq!(record.transaction_signature.as_deref(), Some(transaction_signature.as_str()));
        assert_eq!(record.swap_signature, None);
    }

    #[tokio::test]
    async fn failed_completion_leaves_record_pending() {
        let v = view("10", TokenSymbol::Sol);
        let mut ledger = FakeLedger::with_view(v.clone());
        ledger.fail_complete = true;
        let h = Harness::new(ledger);

        let err = h.checkout().run(v.link.id, TokenSymbol::Sol).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Unreconciled { ref source, .. } if matches!(**source, CheckoutError::Persistence(_))
        ));
        assert_eq!(h.ledger.records()[0].status, TransactionStatus::Pending);
        assert_eq!(h.chain.submitted(), 1);
    }

    #[tokio::test]
    async fn over_precise_amount_is_rejected_before_recording() {
        let v = view("0.0000001", TokenSymbol::Usdc);
        let h = Harness::new(FakeLedger::with_view(v.clone()));
        let err = h.checkout().run(v.link.id, TokenSymbol::Usdc).await.unwrap_err();
        assert!(matches!(err, CheckoutError::AmountPrecision(_)));
        assert!(h.ledger.records().is_empty());
    }
}

//! Accepted-token catalog and amount conversion.
//!
//! The catalog is restricted to [`ACCEPTED_TOKENS`]. It starts from a built-in
//! list of mainnet mints and can be refreshed from a Solana token-list JSON
//! document (`{"tokens": [{"chainId", "address", "symbol", ...}]}`).

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use solpay_sdk::objects::{ACCEPTED_TOKENS, TokenInfo, TokenSymbol};

/// `chainId` of mainnet-beta in the token-list format.
const MAINNET_CHAIN_ID: u64 = 101;

pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to fetch token list: {0}")]
    Http(#[from] reqwest::Error),
    #[error("token list returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid token list: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount must be greater than zero")]
    NonPositive,
    #[error("amount has more than {decimals} decimal places")]
    TooPrecise { decimals: u8 },
    #[error("amount does not fit in base units")]
    Overflow,
}

/// Convert a display amount to the token's base units.
///
/// Amounts with more fractional digits than the token supports are rejected
/// rather than rounded.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64, AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NonPositive);
    }
    if amount.normalize().scale() > u32::from(decimals) {
        return Err(AmountError::TooPrecise { decimals });
    }
    let factor = 10u64
        .checked_pow(u32::from(decimals))
        .ok_or(AmountError::Overflow)?;
    amount
        .checked_mul(Decimal::from(factor))
        .and_then(|v| v.to_u64())
        .ok_or(AmountError::Overflow)
}

/// The tokens customers may pay with and merchants may settle in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCatalog {
    tokens: Vec<TokenInfo>,
}

impl Default for TokenCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TokenCatalog {
    pub fn builtin() -> Self {
        let entry = |symbol, name: &str, mint: &str, decimals| TokenInfo {
            symbol,
            name: name.to_string(),
            mint: mint.to_string(),
            decimals,
            logo_uri: None,
        };
        Self {
            tokens: vec![
                entry(TokenSymbol::Sol, "Solana", WRAPPED_SOL_MINT, 9),
                entry(
                    TokenSymbol::Usdc,
                    "USD Coin",
                    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                    6,
                ),
                entry(
                    TokenSymbol::Ray,
                    "Raydium",
                    "4k3Dyjzvzp8eMZWUXbBCjEvwSkkk59S5iCNLY3QrkX6R",
                    6,
                ),
                entry(
                    TokenSymbol::Srm,
                    "Serum",
                    "SRMuApVNdxXokk5GT7XD5cUUgXMBCoAz2LHeuAoKWRt",
                    6,
                ),
                entry(
                    TokenSymbol::Fida,
                    "Bonfida",
                    "EchesyfXePKdLtoiZSL8pBe8Myagyy8ZRqsACNCFGnvp",
                    6,
                ),
            ],
        }
    }

    /// Build a catalog from a token-list document.
    ///
    /// Only mainnet entries whose symbol is on the allow-list are kept, the
    /// first entry per symbol wins. Symbols missing from the document fall
    /// back to the built-in entry so the catalog always covers every accepted
    /// token.
    pub fn from_token_list(document: &str) -> Result<Self, CatalogError> {
        let list: TokenListDocument = serde_json::from_str(document)?;
        let builtin = Self::builtin();
        let tokens = ACCEPTED_TOKENS
            .iter()
            .filter_map(|symbol| {
                list.tokens
                    .iter()
                    .find(|t| {
                        t.chain_id == MAINNET_CHAIN_ID
                            && t.symbol.eq_ignore_ascii_case(symbol.as_str())
                    })
                    .map(|t| TokenInfo {
                        symbol: *symbol,
                        name: t.name.clone(),
                        // SOL is always quoted by its wrapped mint
                        mint: if symbol.is_native() {
                            WRAPPED_SOL_MINT.to_string()
                        } else {
                            t.address.clone()
                        },
                        decimals: t.decimals,
                        logo_uri: t.logo_uri.clone(),
                    })
                    .or_else(|| builtin.get(*symbol).cloned())
            })
            .collect();
        Ok(Self { tokens })
    }

    /// Fetch and filter a token list over HTTP.
    #[tracing::instrument(skip(http))]
    pub async fn fetch(http: &reqwest::Client, url: &str) -> Result<Self, CatalogError> {
        let resp = http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status));
        }
        let body = resp.text().await?;
        let catalog = Self::from_token_list(&body)?;
        tracing::info!(tokens = catalog.tokens.len(), "Token catalog refreshed");
        Ok(catalog)
    }

    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    pub fn get(&self, symbol: TokenSymbol) -> Option<&TokenInfo> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn is_accepted(&self, symbol: TokenSymbol) -> bool {
        self.get(symbol).is_some()
    }
}

#[derive(Debug, Deserialize)]
struct TokenListDocument {
    tokens: Vec<TokenListEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenListEntry {
    chain_id: u64,
    address: String,
    symbol: String,
    name: String,
    decimals: u8,
    #[serde(rename = "logoURI", default)]
    logo_uri: Option<String>,
}

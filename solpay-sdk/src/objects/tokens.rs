use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Solana clusters a merchant can settle on
pub enum Network {
    Devnet,
    Mainnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
/// Tokens accepted by SolPay, both as payment and as settlement currency
pub enum TokenSymbol {
    Sol,
    Usdc,
    Ray,
    Srm,
    Fida,
}

/// The allow-list of accepted tokens, in display order.
pub const ACCEPTED_TOKENS: [TokenSymbol; 5] = [
    TokenSymbol::Sol,
    TokenSymbol::Usdc,
    TokenSymbol::Ray,
    TokenSymbol::Srm,
    TokenSymbol::Fida,
];

impl TokenSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Sol => "SOL",
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Ray => "RAY",
            TokenSymbol::Srm => "SRM",
            TokenSymbol::Fida => "FIDA",
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, TokenSymbol::Sol)
    }
}

impl Display for TokenSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenSymbol {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACCEPTED_TOKENS
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// An entry of the accepted-token catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: TokenSymbol,
    pub name: String,
    /// Base58 mint address. For SOL this is the wrapped-SOL mint, which is
    /// what the swap aggregator expects.
    pub mint: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_symbol_wire_format() {
        assert_eq!(serde_json::to_string(&TokenSymbol::Usdc).unwrap(), "\"USDC\"");
        let parsed: TokenSymbol = serde_json::from_str("\"FIDA\"").unwrap();
        assert_eq!(parsed, TokenSymbol::Fida);
        assert!(serde_json::from_str::<TokenSymbol>("\"BONK\"").is_err());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("ray".parse::<TokenSymbol>().unwrap(), TokenSymbol::Ray);
        assert_eq!("Mainnet-Beta".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("testnet".parse::<Network>().is_err());
    }
}

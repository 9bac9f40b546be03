//! SolPay Payer
//!
//! Pays a payment link from a local keypair: loads the link, connects the
//! wallet, transfers, swaps into the merchant's settlement token if needed,
//! and records the payment on the server.

mod cli;

use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use cli::Args;
use solana_sdk::pubkey::Pubkey;
use solpay_core::chain::SolanaRpc;
use solpay_core::checkout::Checkout;
use solpay_core::swap::JupiterClient;
use solpay_core::wallet::{ConnectApproval, KeypairWallet};
use solpay_sdk::client::PayClient;
use solpay_sdk::objects::CheckoutView;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let args = Args::parse();
    let chain_config = args.chain_config();
    let swap_config = args.swap_config();

    let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let ledger = PayClient::new(args.server.clone()).with_http_client(http.clone());
    let approval: ConnectApproval = if args.yes {
        Arc::new(|_: &Pubkey| true)
    } else {
        Arc::new(confirm_connection)
    };
    let wallet = KeypairWallet::with_approval(&args.keypair, approval);
    let chain = SolanaRpc::new(
        chain_config.devnet_rpc_url,
        chain_config.mainnet_rpc_url,
        chain_config.confirmation_timeout,
    );
    let aggregator = JupiterClient::new(swap_config.aggregator_url).with_http_client(http);

    let checkout = Checkout::new(
        Arc::new(ledger),
        Arc::new(wallet),
        Arc::new(chain),
        Arc::new(aggregator),
    )
    .with_slippage_bps(swap_config.slippage_bps);

    let view = match checkout.load(args.link).await {
        Ok(view) => view,
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load payment link");
            eprintln!("{}", e.user_message());
            return Ok(ExitCode::FAILURE);
        }
    };
    print_card(&view);

    let result = match checkout.connect_wallet().await {
        Ok(pubkey) => {
            println!("Paying from {pubkey}");
            checkout.pay(&view, args.token).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(receipt) => {
            println!("Payment successful!");
            println!("  transfer: {}", receipt.transaction_signature);
            if let Some(swap) = &receipt.swap_signature {
                println!("  swap:     {swap}");
            }
            println!("  explorer: {}", receipt.explorer_url);
            println!("  receipt:  {}", receipt_url(&args.server, &receipt.redirect_path));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Payment failed");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_card(view: &CheckoutView) {
    println!("{}", view.link.name);
    if let Some(description) = &view.link.description {
        println!("  {description}");
    }
    println!(
        "  {} to {} ({}), settled in {}",
        view.link.amount,
        view.merchant.business_name,
        view.merchant.network,
        view.merchant.preferred_token
    );
    let accepted: Vec<_> = view.tokens.iter().map(|t| t.symbol.as_str()).collect();
    println!("  accepted: {}", accepted.join(", "));
}

/// Stdin prompt standing in for the wallet's connection dialog.
fn confirm_connection(pubkey: &Pubkey) -> bool {
    print!("Connect wallet {pubkey} to SolPay? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

/// The receipt endpoint on the server's public API.
fn receipt_url(server: &url::Url, redirect_path: &str) -> String {
    format!(
        "{}/api/v1{}",
        server.as_str().trim_end_matches('/'),
        redirect_path
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

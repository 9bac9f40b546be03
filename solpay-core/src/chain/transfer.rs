use std::str::FromStr;

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::{VersionedMessage, v0::Message as MessageV0};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;
use solana_sdk::transaction::VersionedTransaction;
use solpay_sdk::objects::TokenInfo;
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

use super::ChainError;

/// Instructions moving `amount` base units of `token` from `payer` to
/// `recipient`.
///
/// SOL is a plain system transfer. SPL tokens create the recipient's
/// associated token account if needed, then `transfer_checked` from the
/// payer's associated account.
pub fn build_transfer_instructions(
    payer: &Pubkey,
    recipient: &Pubkey,
    token: &TokenInfo,
    amount: u64,
) -> Result<Vec<Instruction>, ChainError> {
    if token.symbol.is_native() {
        return Ok(vec![system_instruction::transfer(payer, recipient, amount)]);
    }

    let mint =
        Pubkey::from_str(&token.mint).map_err(|_| ChainError::InvalidAddress(token.mint.clone()))?;
    let token_program = spl_token::id();
    let source = get_associated_token_address(payer, &mint);
    let destination = get_associated_token_address(recipient, &mint);

    let create_destination =
        create_associated_token_account_idempotent(payer, recipient, &mint, &token_program);
    let transfer = spl_token::instruction::transfer_checked(
        &token_program,
        &source,
        &mint,
        &destination,
        payer,
        &[],
        amount,
        token.decimals,
    )
    .map_err(|e| ChainError::Build(e.to_string()))?;

    Ok(vec![create_destination, transfer])
}

/// Compile `instructions` into an unsigned v0 transaction paid by `fee_payer`.
pub fn unsigned_transaction(
    fee_payer: &Pubkey,
    instructions: &[Instruction],
    recent_blockhash: Hash,
) -> Result<VersionedTransaction, ChainError> {
    let message = MessageV0::try_compile(fee_payer, instructions, &[], recent_blockhash)
        .map_err(|e| ChainError::Build(format!("{e:?}")))?;
    Ok(VersionedTransaction {
        signatures: vec![],
        message: VersionedMessage::V0(message),
    })
}

//! # SPL Token Instructions
//!
//! Instruction builders for both token program variants, associated account
//! derivation, and exact decimal amount scaling.
//!
//! `spl_token`'s builders refuse any program id but their own, so Token-2022
//! instructions are built with the SPL Token id and then retargeted. The byte
//! layouts of these base instructions are shared by both programs.

use lib_core::{AppError, Result};
use lib_utils::validate_decimal;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::instruction::create_account;
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::types::ProgramVariant;

/// Size of a base mint account (no extensions).
pub const MINT_SIZE: usize = 82;

/// Associated token account of `owner` for `mint` under `program`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey, program: ProgramVariant) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &program.program_id())
}

// region: --- Amounts

/// Scale a decimal string to base units: `floor(amount × 10^decimals)`.
///
/// Works on the digits directly, so `"1.5"` at 6 decimals is exactly
/// `1_500_000`. Extra fractional digits are truncated.
pub fn scale_amount(amount: &str, decimals: u8) -> Result<u64> {
    let amount = amount.trim();
    validate_decimal(amount, "Amount").map_err(AppError::Validation)?;

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    let decimals = decimals as usize;
    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    digits.extend(fraction.chars().chain(std::iter::repeat('0')).take(decimals));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    digits
        .parse::<u64>()
        .map_err(|_| AppError::Validation("Amount is too large".to_string()))
}

/// Format base units with `decimals`, trimming trailing zeros.
///
/// Splits the digit string instead of dividing, so any `decimals` up to
/// `u8::MAX` is exact.
pub fn format_amount(raw: u64, decimals: u8) -> String {
    let decimals = decimals as usize;
    let digits = format!("{:0>width$}", raw, width = decimals + 1);
    let (whole, fraction) = digits.split_at(digits.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

// endregion: --- Amounts

// region: --- Instructions

fn retarget<E: std::fmt::Display>(
    ix: std::result::Result<Instruction, E>,
    program: ProgramVariant,
) -> Result<Instruction> {
    let mut ix = ix.map_err(|e| AppError::Internal(format!("Failed to build token instruction: {}", e)))?;
    ix.program_id = program.program_id();
    Ok(ix)
}

pub fn burn(
    program: ProgramVariant,
    account: &Pubkey,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction> {
    retarget(
        spl_token::instruction::burn_checked(&spl_token::id(), account, mint, owner, &[], amount, decimals),
        program,
    )
}

pub fn transfer(
    program: ProgramVariant,
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction> {
    retarget(
        spl_token::instruction::transfer_checked(
            &spl_token::id(),
            source,
            mint,
            destination,
            owner,
            &[],
            amount,
            decimals,
        ),
        program,
    )
}

pub fn approve(
    program: ProgramVariant,
    source: &Pubkey,
    mint: &Pubkey,
    delegate: &Pubkey,
    owner: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction> {
    retarget(
        spl_token::instruction::approve_checked(
            &spl_token::id(),
            source,
            mint,
            delegate,
            owner,
            &[],
            amount,
            decimals,
        ),
        program,
    )
}

pub fn revoke(program: ProgramVariant, source: &Pubkey, owner: &Pubkey) -> Result<Instruction> {
    retarget(
        spl_token::instruction::revoke(&spl_token::id(), source, owner, &[]),
        program,
    )
}

/// Close `account`, sending rent to `owner`.
pub fn close_account(
    program: ProgramVariant,
    account: &Pubkey,
    owner: &Pubkey,
) -> Result<Instruction> {
    retarget(
        spl_token::instruction::close_account(&spl_token::id(), account, owner, owner, &[]),
        program,
    )
}

/// Initialize `mint` with `authority` as both mint and freeze authority.
pub fn initialize_mint(
    program: ProgramVariant,
    mint: &Pubkey,
    authority: &Pubkey,
    decimals: u8,
) -> Result<Instruction> {
    retarget(
        spl_token::instruction::initialize_mint(&spl_token::id(), mint, authority, Some(authority), decimals),
        program,
    )
}

pub fn mint_to(
    program: ProgramVariant,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction> {
    retarget(
        spl_token::instruction::mint_to(&spl_token::id(), mint, destination, authority, &[], amount),
        program,
    )
}

/// Create the associated token account of `owner` for `mint`, paid by `payer`.
pub fn create_associated_account(
    program: ProgramVariant,
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Instruction {
    spl_associated_token_account::instruction::create_associated_token_account(
        payer,
        owner,
        mint,
        &program.program_id(),
    )
}

/// Instructions that create a mint and fund `owner` with `supply` base units:
/// create-account, initialize-mint, create-associated-account, mint-to.
pub fn new_mint_instructions(
    program: ProgramVariant,
    owner: &Pubkey,
    mint: &Pubkey,
    decimals: u8,
    supply: u64,
    rent_lamports: u64,
) -> Result<Vec<Instruction>> {
    let owner_ata = associated_token_address(owner, mint, program);
    Ok(vec![
        create_account(owner, mint, rent_lamports, MINT_SIZE as u64, &program.program_id()),
        initialize_mint(program, mint, owner, decimals)?,
        create_associated_account(program, owner, owner, mint),
        mint_to(program, mint, &owner_ata, owner, supply)?,
    ])
}

// endregion: --- Instructions

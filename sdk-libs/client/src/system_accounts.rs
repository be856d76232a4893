use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, system_program};

use crate::constants::{
    ACCOUNT_COMPRESSION_AUTHORITY_PDA, CPI_AUTHORITY_PDA_SEED, PROGRAM_ID_ACCOUNT_COMPRESSION,
    PROGRAM_ID_LIGHT_SYSTEM, PROGRAM_ID_NOOP, REGISTERED_PROGRAM_PDA,
};

/// Ids of the programs and PDAs every compressed-account instruction passes
/// to the light system program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemProgramIds {
    pub light_system_program: Pubkey,
    pub account_compression_program: Pubkey,
    pub noop_program: Pubkey,
    pub registered_program_pda: Pubkey,
    pub account_compression_authority: Pubkey,
    pub system_program: Pubkey,
}

impl Default for SystemProgramIds {
    fn default() -> Self {
        Self {
            light_system_program: PROGRAM_ID_LIGHT_SYSTEM,
            account_compression_program: PROGRAM_ID_ACCOUNT_COMPRESSION,
            noop_program: PROGRAM_ID_NOOP,
            registered_program_pda: REGISTERED_PROGRAM_PDA,
            account_compression_authority: ACCOUNT_COMPRESSION_AUTHORITY_PDA,
            system_program: system_program::ID,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticAccounts {
    pub self_program: Pubkey,
    pub cpi_signer: Pubkey,
    pub light_system_program: Pubkey,
    pub system_program: Pubkey,
    pub account_compression_program: Pubkey,
    pub registered_program_pda: Pubkey,
    pub noop_program: Pubkey,
    pub account_compression_authority: Pubkey,
}

impl StaticAccounts {
    /// Read-only metas in the order the light system accounts are appended
    /// to a program's accounts struct, after `self_program` and `cpi_signer`.
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.self_program, false),
            AccountMeta::new_readonly(self.cpi_signer, false),
            AccountMeta::new_readonly(self.light_system_program, false),
            AccountMeta::new_readonly(self.system_program, false),
            AccountMeta::new_readonly(self.account_compression_program, false),
            AccountMeta::new_readonly(self.registered_program_pda, false),
            AccountMeta::new_readonly(self.noop_program, false),
            AccountMeta::new_readonly(self.account_compression_authority, false),
        ]
    }
}

pub fn get_cpi_signer(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[CPI_AUTHORITY_PDA_SEED], program_id)
}

pub fn required_static_accounts(program_id: Pubkey, ids: &SystemProgramIds) -> StaticAccounts {
    StaticAccounts {
        self_program: program_id,
        cpi_signer: get_cpi_signer(&program_id).0,
        light_system_program: ids.light_system_program,
        system_program: ids.system_program,
        account_compression_program: ids.account_compression_program,
        registered_program_pda: ids.registered_program_pda,
        noop_program: ids.noop_program,
        account_compression_authority: ids.account_compression_authority,
    }
}

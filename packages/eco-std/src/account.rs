use anchor_lang::prelude::*;
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::solana_program::system_instruction;

/// PDA-backed program accounts created and rewritten by hand, so that the
/// instruction can decide at runtime whether the account must exist yet.
pub trait AccountExt: AccountSerialize + AccountDeserialize + Owner + Space {
    fn data_len() -> usize {
        8 + Self::INIT_SPACE
    }

    /// Creates `account` at its PDA. Lamports already parked on the address
    /// are kept and only the rent shortfall is charged to `payer`.
    fn init<'info>(
        self,
        account: &AccountInfo<'info>,
        payer: &AccountInfo<'info>,
        system_program: &Program<'info, System>,
        signer_seeds: &[&[&[u8]]],
    ) -> Result<()> {
        let program_id = Self::owner();
        let data_len = Self::data_len();
        let min_balance = Rent::get()?.minimum_balance(data_len);

        require!(
            account.data_is_empty() && *account.owner != program_id,
            anchor_lang::error::ErrorCode::ConstraintZero
        );

        match account.lamports() {
            0 => {
                invoke_signed(
                    &system_instruction::create_account(
                        payer.key,
                        account.key,
                        min_balance,
                        data_len as u64,
                        &program_id,
                    ),
                    &[
                        payer.clone(),
                        account.clone(),
                        system_program.to_account_info(),
                    ],
                    signer_seeds,
                )?;
            }
            balance => {
                if let Some(shortfall) = min_balance
                    .checked_sub(balance)
                    .filter(|shortfall| *shortfall > 0)
                {
                    invoke_signed(
                        &system_instruction::transfer(payer.key, account.key, shortfall),
                        &[
                            payer.clone(),
                            account.clone(),
                            system_program.to_account_info(),
                        ],
                        signer_seeds,
                    )?;
                }

                invoke_signed(
                    &system_instruction::allocate(account.key, data_len as u64),
                    &[account.clone(), system_program.to_account_info()],
                    signer_seeds,
                )?;
                invoke_signed(
                    &system_instruction::assign(account.key, &program_id),
                    &[account.clone(), system_program.to_account_info()],
                    signer_seeds,
                )?;
            }
        }

        self.write(account)
    }

    /// `None` while the account is uninitialized or owned by another program.
    fn read(account: &AccountInfo<'_>) -> Result<Option<Self>> {
        if account.data_is_empty() || *account.owner != Self::owner() {
            return Ok(None);
        }

        Self::try_deserialize(&mut &account.try_borrow_data()?[..]).map(Some)
    }

    fn write(&self, account: &AccountInfo<'_>) -> Result<()> {
        self.try_serialize(&mut &mut account.try_borrow_mut_data()?[..])
    }
}

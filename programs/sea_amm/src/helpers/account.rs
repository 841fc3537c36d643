use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount, Transfer};

use crate::errors::AmmError;

/// An address can be claimed only while it holds no data and still belongs to
/// the system program. Lamports alone do not count as initialization.
pub fn ensure_uninitialized(account: &AccountInfo) -> Result<()> {
    require!(
        account.data_is_empty() && account.owner == &system_program::ID,
        AmmError::AlreadyExists
    );
    Ok(())
}

/// Lamports still needed for `target` to hold `space` bytes rent exempt
pub fn rent_shortfall(rent: &Rent, target: &AccountInfo, space: usize) -> u64 {
    rent.minimum_balance(space).saturating_sub(target.lamports())
}

/// Allocate a PDA owned by `owner` with `space` bytes, paid by `payer`.
///
/// A PDA that was pre-funded by a plain transfer cannot go through
/// `create_account`, so it is topped up, allocated and assigned instead.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    owner: &Pubkey,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    ensure_uninitialized(target)?;

    let rent = Rent::get()?;

    if target.lamports() == 0 {
        return system_program::create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: target.clone(),
                },
                &[signer_seeds],
            ),
            rent.minimum_balance(space),
            space as u64,
            owner,
        );
    }

    let top_up = rent_shortfall(&rent, target, space);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                Transfer {
                    from: payer.clone(),
                    to: target.clone(),
                },
            ),
            top_up,
        )?;
    }

    system_program::allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            Allocate {
                account_to_allocate: target.clone(),
            },
            &[signer_seeds],
        ),
        space as u64,
    )?;

    system_program::assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            Assign {
                account_to_assign: target.clone(),
            },
            &[signer_seeds],
        ),
        owner,
    )
}

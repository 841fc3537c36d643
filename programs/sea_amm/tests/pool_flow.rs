use anchor_lang::prelude::{AccountInfo, Pubkey};
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::solana_program::instruction::{Instruction, InstructionError};
use anchor_lang::solana_program::{program_pack::Pack, system_instruction, system_program};
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::token::spl_token;
use sea_amm::errors::AmmError;
use sea_amm::math::{swap_quote, Fee};
use sea_amm::pda::{
    find_lp_mint_address, find_pool_address, find_user_lp_address, find_vault_a_address,
    find_vault_b_address, PoolAddresses,
};
use sea_amm::state::Pool;
use sea_amm::SwapDirection;
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::{Transaction, TransactionError};

const USER_FUNDS: u64 = 1_000_000;

fn process_instruction(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    // entry wants accounts and infos to share one lifetime
    let accounts = Box::leak(Box::new(accounts.to_vec()));
    sea_amm::entry(program_id, accounts, data)
}

struct Fixture {
    context: ProgramTestContext,
    user: Keypair,
    token_mint_a: Pubkey,
    token_mint_b: Pubkey,
    user_token_a: Pubkey,
    user_token_b: Pubkey,
    addresses: PoolAddresses,
}

impl Fixture {
    async fn new() -> Self {
        let program_test = ProgramTest::new("sea_amm", sea_amm::ID, processor!(process_instruction));
        let mut context = program_test.start_with_context().await;

        let first = Keypair::new();
        let second = Keypair::new();
        let (mint_a, mint_b) = if first.pubkey() < second.pubkey() {
            (first, second)
        } else {
            (second, first)
        };
        create_mint(&mut context, &mint_a).await;
        create_mint(&mut context, &mint_b).await;

        let user = Keypair::new();
        let fund_user =
            system_instruction::transfer(&context.payer.pubkey(), &user.pubkey(), 1_000_000_000);
        process(&mut context, &[fund_user], &[]).await.unwrap();

        let user_token_a =
            create_token_account(&mut context, &mint_a.pubkey(), &user.pubkey(), USER_FUNDS).await;
        let user_token_b =
            create_token_account(&mut context, &mint_b.pubkey(), &user.pubkey(), USER_FUNDS).await;

        let addresses =
            PoolAddresses::derive(&sea_amm::ID, &mint_a.pubkey(), &mint_b.pubkey()).unwrap();

        Self {
            context,
            user,
            token_mint_a: mint_a.pubkey(),
            token_mint_b: mint_b.pubkey(),
            user_token_a,
            user_token_b,
            addresses,
        }
    }

    fn user_lp_account(&self) -> Pubkey {
        find_user_lp_address(&sea_amm::ID, &self.addresses.lp_token_mint, &self.user.pubkey())
            .unwrap()
            .0
    }

    fn create_pool_ix(&self, authority: &Pubkey) -> Instruction {
        Instruction {
            program_id: sea_amm::ID,
            accounts: sea_amm::accounts::CreatePool {
                authority: *authority,
                token_mint_a: self.token_mint_a,
                token_mint_b: self.token_mint_b,
                pool: self.addresses.pool,
                token_vault_a: self.addresses.token_vault_a,
                token_vault_b: self.addresses.token_vault_b,
                lp_token_mint: self.addresses.lp_token_mint,
                token_program: spl_token::ID,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: sea_amm::instruction::CreatePool {}.data(),
        }
    }

    fn add_liquidity_ix(&self, amount_a: u64, amount_b: u64, min_lp_out: u64) -> Instruction {
        Instruction {
            program_id: sea_amm::ID,
            accounts: sea_amm::accounts::AddLiquidity {
                user: self.user.pubkey(),
                pool: self.addresses.pool,
                token_mint_a: self.token_mint_a,
                token_mint_b: self.token_mint_b,
                token_vault_a: self.addresses.token_vault_a,
                token_vault_b: self.addresses.token_vault_b,
                lp_token_mint: self.addresses.lp_token_mint,
                user_token_account_a: self.user_token_a,
                user_token_account_b: self.user_token_b,
                user_lp_token_account: self.user_lp_account(),
                token_program: spl_token::ID,
                system_program: system_program::ID,
            }
            .to_account_metas(None),
            data: sea_amm::instruction::AddLiquidity {
                amount_a,
                amount_b,
                min_lp_out,
            }
            .data(),
        }
    }

    fn remove_liquidity_ix(&self, lp_amount: u64, min_amount_a: u64, min_amount_b: u64) -> Instruction {
        Instruction {
            program_id: sea_amm::ID,
            accounts: sea_amm::accounts::RemoveLiquidity {
                user: self.user.pubkey(),
                pool: self.addresses.pool,
                token_mint_a: self.token_mint_a,
                token_mint_b: self.token_mint_b,
                token_vault_a: self.addresses.token_vault_a,
                token_vault_b: self.addresses.token_vault_b,
                lp_token_mint: self.addresses.lp_token_mint,
                user_token_account_a: self.user_token_a,
                user_token_account_b: self.user_token_b,
                user_lp_token_account: self.user_lp_account(),
                token_program: spl_token::ID,
            }
            .to_account_metas(None),
            data: sea_amm::instruction::RemoveLiquidity {
                lp_amount,
                min_amount_a,
                min_amount_b,
            }
            .data(),
        }
    }

    fn swap_ix(&self, direction: SwapDirection, amount_in: u64, min_amount_out: u64) -> Instruction {
        self.swap_ix_with_vault_a(
            self.addresses.token_vault_a,
            direction,
            amount_in,
            min_amount_out,
        )
    }

    fn swap_ix_with_vault_a(
        &self,
        token_vault_a: Pubkey,
        direction: SwapDirection,
        amount_in: u64,
        min_amount_out: u64,
    ) -> Instruction {
        Instruction {
            program_id: sea_amm::ID,
            accounts: sea_amm::accounts::Swap {
                user: self.user.pubkey(),
                pool: self.addresses.pool,
                token_mint_a: self.token_mint_a,
                token_mint_b: self.token_mint_b,
                token_vault_a,
                token_vault_b: self.addresses.token_vault_b,
                user_token_account_a: self.user_token_a,
                user_token_account_b: self.user_token_b,
                token_program: spl_token::ID,
            }
            .to_account_metas(None),
            data: sea_amm::instruction::Swap {
                direction,
                amount_in,
                min_amount_out,
            }
            .data(),
        }
    }

    async fn create_pool(&mut self) {
        let ix = self.create_pool_ix(&self.context.payer.pubkey());
        process(&mut self.context, &[ix], &[]).await.unwrap();
    }

    async fn send_as_user(&mut self, instructions: &[Instruction]) -> Result<(), BanksClientError> {
        let user = self.user.insecure_clone();
        process(&mut self.context, instructions, &[&user]).await
    }

    async fn pool(&mut self) -> Pool {
        let account = self
            .context
            .banks_client
            .get_account(self.addresses.pool)
            .await
            .unwrap()
            .unwrap();
        Pool::try_deserialize(&mut account.data.as_slice()).unwrap()
    }

    async fn balance(&mut self, token_account: Pubkey) -> u64 {
        let account = self
            .context
            .banks_client
            .get_account(token_account)
            .await
            .unwrap()
            .unwrap();
        spl_token::state::Account::unpack(&account.data).unwrap().amount
    }
}

async fn process(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let blockhash = context.banks_client.get_latest_blockhash().await?;
    let mut all_signers = vec![&context.payer];
    all_signers.extend_from_slice(signers);

    let transaction = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(transaction).await
}

async fn create_mint(context: &mut ProgramTestContext, mint: &Keypair) {
    let rent = context.banks_client.get_rent().await.unwrap();
    let payer = context.payer.pubkey();
    let instructions = [
        system_instruction::create_account(
            &payer,
            &mint.pubkey(),
            rent.minimum_balance(spl_token::state::Mint::LEN),
            spl_token::state::Mint::LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_mint2(&spl_token::ID, &mint.pubkey(), &payer, None, 6)
            .unwrap(),
    ];
    process(context, &instructions, &[mint]).await.unwrap();
}

async fn create_token_account(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Pubkey {
    let rent = context.banks_client.get_rent().await.unwrap();
    let payer = context.payer.pubkey();
    let account = Keypair::new();
    let instructions = [
        system_instruction::create_account(
            &payer,
            &account.pubkey(),
            rent.minimum_balance(spl_token::state::Account::LEN),
            spl_token::state::Account::LEN as u64,
            &spl_token::ID,
        ),
        spl_token::instruction::initialize_account3(&spl_token::ID, &account.pubkey(), mint, owner)
            .unwrap(),
        spl_token::instruction::mint_to(&spl_token::ID, mint, &account.pubkey(), &payer, &[], amount)
            .unwrap(),
    ];
    process(context, &instructions, &[&account]).await.unwrap();
    account.pubkey()
}

fn assert_tx_err(result: Result<(), BanksClientError>, index: u8, code: u32) {
    assert_eq!(
        result.unwrap_err().unwrap(),
        TransactionError::InstructionError(index, InstructionError::Custom(code))
    );
}

fn assert_amm_err(result: Result<(), BanksClientError>, index: u8, expected: AmmError) {
    assert_tx_err(result, index, expected.into());
}

#[tokio::test]
async fn test_create_pool_initializes_accounts() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;

    let pool = fixture.pool().await;
    assert_eq!(pool.authority, fixture.context.payer.pubkey());
    assert_eq!(pool.token_mint_a, fixture.token_mint_a);
    assert_eq!(pool.token_mint_b, fixture.token_mint_b);
    assert_eq!(pool.token_vault_a, fixture.addresses.token_vault_a);
    assert_eq!(pool.token_vault_b, fixture.addresses.token_vault_b);
    assert_eq!(pool.lp_token_mint, fixture.addresses.lp_token_mint);
    assert_eq!((pool.reserve_a, pool.reserve_b, pool.total_lp_supply), (0, 0, 0));
    assert_eq!(pool.bump, fixture.addresses.pool_bump);
    assert_eq!(pool.vault_a_bump, fixture.addresses.vault_a_bump);
    assert_eq!(pool.vault_b_bump, fixture.addresses.vault_b_bump);
    assert_eq!(pool.lp_mint_bump, fixture.addresses.lp_mint_bump);

    let vault_a = fixture.addresses.token_vault_a;
    let vault = fixture
        .context
        .banks_client
        .get_account(vault_a)
        .await
        .unwrap()
        .unwrap();
    let vault = spl_token::state::Account::unpack(&vault.data).unwrap();
    assert_eq!(vault.owner, fixture.addresses.pool);
    assert_eq!(vault.mint, fixture.token_mint_a);

    let lp_mint = fixture
        .context
        .banks_client
        .get_account(fixture.addresses.lp_token_mint)
        .await
        .unwrap()
        .unwrap();
    let lp_mint = spl_token::state::Mint::unpack(&lp_mint.data).unwrap();
    assert_eq!(lp_mint.supply, 0);
    assert_eq!(lp_mint.decimals, 6);
    assert!(lp_mint.freeze_authority.is_none());
}

#[tokio::test]
async fn test_second_create_pool_fails() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;

    // a different authority keeps the transaction distinct
    let other = Keypair::new();
    let fund = system_instruction::transfer(
        &fixture.context.payer.pubkey(),
        &other.pubkey(),
        1_000_000_000,
    );
    let ix = fixture.create_pool_ix(&other.pubkey());
    let result = process(&mut fixture.context, &[fund, ix], &[&other]).await;

    assert_amm_err(result, 1, AmmError::AlreadyExists);
}

#[tokio::test]
async fn test_create_pool_rejects_unordered_mints() {
    let mut fixture = Fixture::new().await;
    let (first, second) = (fixture.token_mint_b, fixture.token_mint_a);
    let pool = find_pool_address(&sea_amm::ID, &first, &second).unwrap().0;

    let ix = Instruction {
        program_id: sea_amm::ID,
        accounts: sea_amm::accounts::CreatePool {
            authority: fixture.context.payer.pubkey(),
            token_mint_a: first,
            token_mint_b: second,
            pool,
            token_vault_a: find_vault_a_address(&sea_amm::ID, &first, &second).unwrap().0,
            token_vault_b: find_vault_b_address(&sea_amm::ID, &first, &second).unwrap().0,
            lp_token_mint: find_lp_mint_address(&sea_amm::ID, &first, &second).unwrap().0,
            token_program: spl_token::ID,
            system_program: system_program::ID,
        }
        .to_account_metas(None),
        data: sea_amm::instruction::CreatePool {}.data(),
    };
    let result = process(&mut fixture.context, &[ix], &[]).await;
    assert_amm_err(result, 0, AmmError::InvalidMintOrder);

    let account = fixture.context.banks_client.get_account(pool).await.unwrap();
    assert!(account.is_none());
}

#[tokio::test]
async fn test_create_pool_requires_rent_from_authority() {
    let mut fixture = Fixture::new().await;

    let poor = Keypair::new();
    let fund = system_instruction::transfer(&fixture.context.payer.pubkey(), &poor.pubkey(), 1_000_000);
    let ix = fixture.create_pool_ix(&poor.pubkey());
    let result = process(&mut fixture.context, &[fund, ix], &[&poor]).await;

    assert_amm_err(result, 1, AmmError::InsufficientFunds);
}

#[tokio::test]
async fn test_create_pool_only_charges_missing_rent() {
    let mut fixture = Fixture::new().await;
    let rent = fixture.context.banks_client.get_rent().await.unwrap();
    let payer = fixture.context.payer.pubkey();

    // everything but the pool record is already paid for
    let prefund = [
        (fixture.addresses.token_vault_a, spl_token::state::Account::LEN),
        (fixture.addresses.token_vault_b, spl_token::state::Account::LEN),
        (fixture.addresses.lp_token_mint, spl_token::state::Mint::LEN),
    ]
    .map(|(address, space)| {
        system_instruction::transfer(&payer, &address, rent.minimum_balance(space))
    });
    process(&mut fixture.context, &prefund, &[]).await.unwrap();

    let authority = Keypair::new();
    let pool_rent = rent.minimum_balance(Pool::ACCOUNT_SIZE);
    let fund = system_instruction::transfer(&payer, &authority.pubkey(), pool_rent);
    let ix = fixture.create_pool_ix(&authority.pubkey());
    process(&mut fixture.context, &[fund, ix], &[&authority])
        .await
        .unwrap();

    let pool = fixture.pool().await;
    assert_eq!(pool.authority, authority.pubkey());
    assert_eq!(fixture.balance(fixture.addresses.token_vault_a).await, 0);
}

#[tokio::test]
async fn test_liquidity_and_swap_flow() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;

    let ix = fixture.add_liquidity_ix(400, 900, 600);
    fixture.send_as_user(&[ix]).await.unwrap();
    let lp_account = fixture.user_lp_account();
    assert_eq!(fixture.balance(lp_account).await, 600);

    // only the proportional amount of B is pulled
    let ix = fixture.add_liquidity_ix(40, 500, 60);
    fixture.send_as_user(&[ix]).await.unwrap();
    assert_eq!(fixture.balance(lp_account).await, 660);
    assert_eq!(fixture.balance(fixture.addresses.token_vault_a).await, 440);
    assert_eq!(fixture.balance(fixture.addresses.token_vault_b).await, 990);
    assert_eq!(fixture.balance(fixture.user_token_b).await, USER_FUNDS - 990);

    let expected = swap_quote(440, 990, 100, Fee::STANDARD).unwrap();
    let ix = fixture.swap_ix(SwapDirection::AToB, 100, expected.amount_out);
    fixture.send_as_user(&[ix]).await.unwrap();

    let pool = fixture.pool().await;
    assert_eq!(pool.reserve_a, expected.new_reserve_in);
    assert_eq!(pool.reserve_b, expected.new_reserve_out);
    assert_eq!(fixture.balance(fixture.addresses.token_vault_a).await, pool.reserve_a);
    assert_eq!(fixture.balance(fixture.addresses.token_vault_b).await, pool.reserve_b);
    assert_eq!(
        fixture.balance(fixture.user_token_b).await,
        USER_FUNDS - 990 + expected.amount_out
    );

    let ix = fixture.remove_liquidity_ix(660, 1, 1);
    fixture.send_as_user(&[ix]).await.unwrap();

    let pool = fixture.pool().await;
    assert_eq!((pool.reserve_a, pool.reserve_b, pool.total_lp_supply), (0, 0, 0));
    assert_eq!(fixture.balance(lp_account).await, 0);
    assert_eq!(fixture.balance(fixture.user_token_a).await, USER_FUNDS);
    assert_eq!(fixture.balance(fixture.user_token_b).await, USER_FUNDS);

    // drained pool bootstraps again
    let ix = fixture.add_liquidity_ix(400, 900, 600);
    fixture.send_as_user(&[ix]).await.unwrap();
    assert_eq!(fixture.pool().await.total_lp_supply, 600);
}

#[tokio::test]
async fn test_failed_instruction_rolls_back_transaction() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;
    let ix = fixture.add_liquidity_ix(1_000, 1_000, 0);
    fixture.send_as_user(&[ix]).await.unwrap();

    let deposit = fixture.add_liquidity_ix(100, 100, 0);
    let swap = fixture.swap_ix(SwapDirection::BToA, 100, 1_000);
    let result = fixture.send_as_user(&[deposit, swap]).await;
    assert_amm_err(result, 1, AmmError::SlippageExceeded);

    let pool = fixture.pool().await;
    assert_eq!((pool.reserve_a, pool.reserve_b, pool.total_lp_supply), (1_000, 1_000, 1_000));
    assert_eq!(fixture.balance(fixture.user_token_a).await, USER_FUNDS - 1_000);
    assert_eq!(fixture.balance(fixture.user_lp_account()).await, 1_000);
}

#[tokio::test]
async fn test_remove_more_than_held_fails() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;
    let ix = fixture.add_liquidity_ix(1_000, 1_000, 0);
    fixture.send_as_user(&[ix]).await.unwrap();

    let ix = fixture.remove_liquidity_ix(1_001, 0, 0);
    assert_amm_err(fixture.send_as_user(&[ix]).await, 0, AmmError::InsufficientBalance);

    let ix = fixture.remove_liquidity_ix(500, 501, 0);
    assert_amm_err(fixture.send_as_user(&[ix]).await, 0, AmmError::SlippageExceeded);
}

#[tokio::test]
async fn test_swap_ignores_tokens_sent_to_vault() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;
    let ix = fixture.add_liquidity_ix(1_000, 1_000, 0);
    fixture.send_as_user(&[ix]).await.unwrap();

    let donation = spl_token::instruction::transfer(
        &spl_token::ID,
        &fixture.user_token_b,
        &fixture.addresses.token_vault_b,
        &fixture.user.pubkey(),
        &[],
        5_000,
    )
    .unwrap();
    fixture.send_as_user(&[donation]).await.unwrap();

    let ix = fixture.swap_ix(SwapDirection::AToB, 100, 90);
    fixture.send_as_user(&[ix]).await.unwrap();

    let pool = fixture.pool().await;
    assert_eq!((pool.reserve_a, pool.reserve_b), (1_100, 910));
    assert_eq!(fixture.balance(fixture.addresses.token_vault_b).await, 5_910);
}

#[tokio::test]
async fn test_swap_rejects_foreign_vault() {
    let mut fixture = Fixture::new().await;
    fixture.create_pool().await;
    let ix = fixture.add_liquidity_ix(1_000, 1_000, 0);
    fixture.send_as_user(&[ix]).await.unwrap();

    let mint_a = fixture.token_mint_a;
    let user = fixture.user.pubkey();
    let foreign = create_token_account(&mut fixture.context, &mint_a, &user, 5_000).await;
    let ix = fixture.swap_ix_with_vault_a(foreign, SwapDirection::BToA, 100, 0);
    let code = match fixture.send_as_user(&[ix]).await.unwrap_err().unwrap() {
        TransactionError::InstructionError(0, InstructionError::Custom(code)) => code,
        other => panic!("unexpected error: {:?}", other),
    };

    let rejected: [u32; 2] = [
        anchor_lang::error::ErrorCode::ConstraintHasOne.into(),
        anchor_lang::error::ErrorCode::ConstraintSeeds.into(),
    ];
    assert!(rejected.contains(&code), "code {}", code);
    assert_eq!(fixture.balance(foreign).await, 5_000);
}

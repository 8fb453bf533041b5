use anchor_lang::prelude::*;
use derive_new::new;

use crate::account::AccountExt;
use crate::{Bytes32, EcoStdError};

pub const PROOF_SEED: &[u8] = b"proof";
pub const PROVE_DISCRIMINATOR: [u8; 8] = [52, 246, 26, 161, 211, 170, 86, 215];

/// Width of one `(intent_hash, claimant)` record in an encoded proof batch.
pub const INTENT_HASH_CLAIMANT_LEN: usize = 64;

pub const LOCAL_PROVER_ID: Pubkey = pubkey!("2vYQYECW25TK8TVwNrF539VYSapwFhxbF9qchVhnUJZa");
pub const HYPER_PROVER_ID: Pubkey = pubkey!("7jccbTLieovCG2wMvw3c34aTZYbkg5HiU6icyX2qc9PY");
pub const LAYERZERO_PROVER_ID: Pubkey = pubkey!("AFgRX4DVUuxHgXEvHuBwZtkL6FHZfmxqds5Sk5CUiQVQ");
pub const STORAGE_PROVER_ID: Pubkey = pubkey!("Dt2ussicQDCr7txieHDAcWjR6mN7uqWi7T3JnhmzmyPz");

/// Route calls may never reach a prover: a solver could otherwise forge
/// proofs through the portal's executor.
pub fn is_prover(program_id: &Pubkey) -> bool {
    [
        LOCAL_PROVER_ID,
        HYPER_PROVER_ID,
        LAYERZERO_PROVER_ID,
        STORAGE_PROVER_ID,
    ]
    .contains(program_id)
}

#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Default, new, Debug, PartialEq, Eq,
)]
pub struct Proof {
    pub destination: u64,
    pub claimant: Pubkey,
}

impl Proof {
    pub fn pda(intent_hash: &Bytes32, prover: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[PROOF_SEED, intent_hash.as_ref()], prover)
    }

    pub fn try_from_account_info(account: &AccountInfo<'_>) -> Result<Option<Self>> {
        account
            .data
            .borrow()
            .get(8..)
            .map(Self::try_from_slice)
            .transpose()
            .map_err(Into::into)
    }

    /// The proof `prover` recorded for `intent_hash`, if the account really is
    /// that prover's proof PDA.
    pub fn load(
        account: &AccountInfo<'_>,
        intent_hash: &Bytes32,
        prover: &Pubkey,
    ) -> Result<Option<Self>> {
        require!(
            account.key() == Self::pda(intent_hash, prover).0,
            EcoStdError::InvalidProofAccount
        );

        if account.owner != prover {
            return Ok(None);
        }

        Self::try_from_account_info(account)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, new, Debug, PartialEq, Eq)]
pub struct IntentHashClaimant {
    pub intent_hash: Bytes32,
    pub claimant: Bytes32,
}

/// A batch of fulfillments on `destination`, as carried in proof messages.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, new, Debug, PartialEq, Eq)]
pub struct IntentHashesClaimants {
    pub destination: u64,
    pub intent_hashes_claimants: Vec<IntentHashClaimant>,
}

impl IntentHashesClaimants {
    /// 8-byte big-endian destination followed by fixed 64-byte records.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.destination
            .to_be_bytes()
            .into_iter()
            .chain(
                self.intent_hashes_claimants
                    .iter()
                    .flat_map(|pair| [*pair.intent_hash, *pair.claimant].concat()),
            )
            .collect()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        require!(
            bytes.len() >= 8 && (bytes.len() - 8) % INTENT_HASH_CLAIMANT_LEN == 0,
            EcoStdError::InvalidEncodedProofs
        );
        let (destination, records) = bytes.split_at(8);
        let destination = destination
            .try_into()
            .map(u64::from_be_bytes)
            .map_err(|_| EcoStdError::InvalidEncodedProofs)?;

        records
            .chunks_exact(INTENT_HASH_CLAIMANT_LEN)
            .map(|record| {
                let (intent_hash, claimant) = record.split_at(32);

                Ok(IntentHashClaimant::new(
                    intent_hash.try_into()?,
                    claimant.try_into()?,
                ))
            })
            .collect::<Result<_>>()
            .map(|intent_hashes_claimants| Self::new(destination, intent_hashes_claimants))
    }

    pub fn len(&self) -> usize {
        self.intent_hashes_claimants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intent_hashes_claimants.is_empty()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, new)]
pub struct ProveArgs {
    pub source: u64,
    pub intent_hashes_claimants: IntentHashesClaimants,
    pub data: Vec<u8>,
}

#[event]
#[derive(new)]
pub struct IntentProven {
    intent_hash: Bytes32,
    claimant: Pubkey,
    destination: u64,
}

#[event]
#[derive(new)]
pub struct IntentAlreadyProven {
    intent_hash: Bytes32,
}

/// Outcome of recording one fulfillment. The first proof for an intent hash
/// wins; later ones are dropped so a replayed or conflicting message can never
/// change the claimant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofRecord {
    Recorded(Proof),
    AlreadyProven,
}

/// Writes `T`'s proof PDA for `intent_hash_claimant`. `payer_seeds` lets a PDA
/// of the prover pay for the account when the instruction has no signer with
/// lamports (bridge deliveries).
pub fn mark_proven<'info, T>(
    proof_account: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system_program: &Program<'info, System>,
    payer_seeds: Option<&[&[u8]]>,
    intent_hash_claimant: &IntentHashClaimant,
    destination: u64,
) -> Result<ProofRecord>
where
    T: AccountExt + From<Proof>,
{
    let IntentHashClaimant {
        intent_hash,
        claimant,
    } = intent_hash_claimant;
    let (proof_pda, bump) = Proof::pda(intent_hash, &T::owner());
    require!(
        proof_account.key() == proof_pda,
        EcoStdError::InvalidProofAccount
    );

    if !proof_account.data_is_empty() {
        return Ok(ProofRecord::AlreadyProven);
    }

    let bump = [bump];
    let proof_seeds: [&[u8]; 3] = [PROOF_SEED, intent_hash.as_ref(), &bump];
    let signer_seeds: Vec<&[&[u8]]> = payer_seeds
        .into_iter()
        .chain([proof_seeds.as_slice()])
        .collect();
    let proof = Proof::new(destination, (*claimant).into());

    T::from(proof).init(proof_account, payer, system_program, &signer_seeds)?;

    Ok(ProofRecord::Recorded(proof))
}

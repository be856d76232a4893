use num_bigint::BigUint;
use solana_sdk::{keccak, pubkey::Pubkey};

pub type Address = [u8; 32];
pub type AddressSeed = [u8; 32];

/// Bump byte appended when an address is hashed from its seed.
pub const HASH_TO_FIELD_SIZE_SEED: u8 = u8::MAX;

/// Hashes `bytes` with keccak-256, feeding each slice in order, and zeroes
/// the most significant byte of the digest.
pub fn hashv_to_bn254_field_size_be(bytes: &[&[u8]]) -> [u8; 32] {
    let mut hasher = keccak::Hasher::default();
    for input in bytes {
        hasher.hash(input);
    }
    let mut hashed_value: [u8; 32] = hasher.result().to_bytes();
    // Truncates to 31 bytes so that value is less than bn254 Fr modulo
    // field size.
    hashed_value[0] = 0;
    hashed_value
}

/// Derives a single address seed for a compressed account, based on the
/// provided multiple `seeds` and `program_id`.
///
/// # Examples
///
/// ```
/// use counter_client::{address::derive_address_seed, constants::COUNTER_PROGRAM_ID};
///
/// let seed = derive_address_seed(&[b"counter"], &COUNTER_PROGRAM_ID);
/// assert_eq!(seed[0], 0);
/// ```
pub fn derive_address_seed(seeds: &[&[u8]], program_id: &Pubkey) -> AddressSeed {
    let mut inputs = Vec::with_capacity(seeds.len() + 1);

    let program_id = program_id.to_bytes();
    inputs.push(program_id.as_slice());

    inputs.extend(seeds);

    hashv_to_bn254_field_size_be(inputs.as_slice())
}

/// Derives an address for a compressed account, based on the provided singular
/// `seed` and `address_merkle_tree_pubkey`. Unlike the seed, the address hash
/// ends with the [`HASH_TO_FIELD_SIZE_SEED`] bump.
pub fn derive_address_from_seed(
    address_seed: &AddressSeed,
    address_merkle_tree_pubkey: &Pubkey,
) -> Address {
    hashv_to_bn254_field_size_be(&[
        address_merkle_tree_pubkey.as_ref(),
        address_seed.as_slice(),
        &[HASH_TO_FIELD_SIZE_SEED],
    ])
}

/// Derives an address from provided seeds. Returns that address and a singular
/// seed.
pub fn derive_address(
    seeds: &[&[u8]],
    address_merkle_tree_pubkey: &Pubkey,
    program_id: &Pubkey,
) -> (Address, AddressSeed) {
    let address_seed = derive_address_seed(seeds, program_id);
    let address = derive_address_from_seed(&address_seed, address_merkle_tree_pubkey);

    (address, address_seed)
}

/// Big-endian field element view of an address, as the indexer keys it.
pub fn address_to_bn254(address: &Address) -> BigUint {
    BigUint::from_bytes_be(address)
}

/// Inverse of [`address_to_bn254`]. Returns `None` if the value does not fit
/// into 32 bytes.
pub fn bn254_to_address(value: &BigUint) -> Option<Address> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return None;
    }
    let mut address = [0u8; 32];
    address[32 - bytes.len()..].copy_from_slice(&bytes);
    Some(address)
}

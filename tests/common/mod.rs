//! Shared test doubles

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use stark_hd_signer::crypto::backend::{BackendError, CryptoBackend, HdNode, RawSignature};
use stark_hd_signer::crypto::constants::{Curve, ECC_INFO_PARITY_ODD, MAX_DER_SIGNATURE_LEN};
use stark_hd_signer::crypto::helpers;
use stark_hd_signer::crypto::secret::{PrivateKey, SecretBuffer};
use stark_hd_signer::crypto::stark;
use stark_hd_signer::DerivationPath;

pub const ABANDON_MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// `m/2645'/579218131'/211006541'/1534045311'/1431804530'/0`
pub const STARKEX_PATH: &str = "m/2645'/579218131'/211006541'/1534045311'/1431804530'/0";

pub fn seed_one() -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[31] = 1;
    seed
}

pub fn digest(last: u8) -> [u8; 32] {
    let mut d = [0u8; 32];
    d[0] = 0x05;
    d[31] = last;
    d
}

/// How the mock answers `sign_deterministic`.
#[derive(Clone)]
pub enum SignBehavior {
    /// Real Stark signing over the given key
    Real,
    Fail(BackendError),
    /// Return a well-formed signature record with a bogus length
    Length(usize),
}

/// Counting backend with scripted answers.
///
/// `derive_node` returns a fixed node, `hash256` pops scripted candidates
/// and falls back to real SHA-256 once the script runs out.
pub struct MockBackend {
    pub node: [u8; 32],
    pub derive_error: Option<BackendError>,
    pub reduce_error: Option<BackendError>,
    /// Overrides the leading tag byte of generated public keys
    pub public_key_tag: Option<u8>,
    pub hashes: RefCell<VecDeque<[u8; 32]>>,
    pub hash_inputs: RefCell<Vec<Vec<u8>>>,
    pub derive_calls: Cell<usize>,
    pub hash_calls: Cell<usize>,
    pub sign_calls: Cell<usize>,
    pub sign: SignBehavior,
}

impl MockBackend {
    pub fn new(node: [u8; 32]) -> Self {
        Self {
            node,
            derive_error: None,
            reduce_error: None,
            public_key_tag: None,
            hashes: RefCell::new(VecDeque::new()),
            hash_inputs: RefCell::new(Vec::new()),
            derive_calls: Cell::new(0),
            hash_calls: Cell::new(0),
            sign_calls: Cell::new(0),
            sign: SignBehavior::Real,
        }
    }

    pub fn with_hashes(self, hashes: &[[u8; 32]]) -> Self {
        self.hashes.borrow_mut().extend(hashes.iter().copied());
        self
    }

    pub fn failing_derivation(mut self, error: BackendError) -> Self {
        self.derive_error = Some(error);
        self
    }

    pub fn failing_reduction(mut self, error: BackendError) -> Self {
        self.reduce_error = Some(error);
        self
    }

    pub fn with_public_key_tag(mut self, tag: u8) -> Self {
        self.public_key_tag = Some(tag);
        self
    }

    pub fn with_sign(mut self, sign: SignBehavior) -> Self {
        self.sign = sign;
        self
    }

    pub fn oracle_calls(&self) -> usize {
        self.derive_calls.get() + self.hash_calls.get() + self.sign_calls.get()
    }
}

impl CryptoBackend for MockBackend {
    fn derive_node(
        &self,
        _curve: Curve,
        _path: &DerivationPath,
        with_chain_code: bool,
    ) -> Result<HdNode, BackendError> {
        self.derive_calls.set(self.derive_calls.get() + 1);
        if let Some(e) = &self.derive_error {
            return Err(e.clone());
        }
        Ok(HdNode {
            seed: SecretBuffer::from_slice(&self.node),
            chain_code: with_chain_code.then_some([0xcc; 32]),
        })
    }

    fn hash256(&self, data: &[u8]) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        self.hash_calls.set(self.hash_calls.get() + 1);
        self.hash_inputs.borrow_mut().push(data.to_vec());
        match self.hashes.borrow_mut().pop_front() {
            Some(h) => h,
            None => Sha256::digest(data).into(),
        }
    }

    fn reduce_modulo(&self, value: &[u8; 32], modulus: &[u8; 32]) -> Result<[u8; 32], BackendError> {
        if let Some(e) = &self.reduce_error {
            return Err(e.clone());
        }
        helpers::reduce_modulo(value, modulus).ok_or(BackendError::ZeroModulus)
    }

    fn generate_public_key(&self, key: &PrivateKey) -> Result<[u8; 65], BackendError> {
        let mut point = match key.curve() {
            Curve::Stark256 => stark::public_key_uncompressed(&SecretBuffer::from_slice(
                key.secret_bytes(),
            ))?,
            curve => return Err(BackendError::UnsupportedCurve(curve)),
        };
        if let Some(tag) = self.public_key_tag {
            point[0] = tag;
        }
        Ok(point)
    }

    fn sign_deterministic(
        &self,
        key: &PrivateKey,
        digest: &[u8; 32],
        low_s: bool,
    ) -> Result<RawSignature, BackendError> {
        self.sign_calls.set(self.sign_calls.get() + 1);
        match &self.sign {
            SignBehavior::Real => {
                stark::sign_digest(&SecretBuffer::from_slice(key.secret_bytes()), digest, low_s)
            }
            SignBehavior::Fail(e) => Err(e.clone()),
            SignBehavior::Length(len) => Ok(RawSignature {
                bytes: [0x30; MAX_DER_SIGNATURE_LEN],
                len: *len,
                info: ECC_INFO_PARITY_ODD,
            }),
        }
    }
}

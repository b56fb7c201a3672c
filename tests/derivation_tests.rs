//! Integration tests for key derivation

mod common;

use common::{seed_one, MockBackend, ABANDON_MNEMONIC, STARKEX_PATH};
use proptest::prelude::*;
use stark_hd_signer::crypto::constants::{
    Curve, HARDENED, STARK_CURVE_ORDER, STARK_DERIVE_BIAS, STARK_PURPOSE_INDEX,
};
use stark_hd_signer::crypto::helpers::lt_unsigned;
use stark_hd_signer::crypto::path::validate_stark_path;
use stark_hd_signer::crypto::secret::SecretBuffer;
use stark_hd_signer::derive::grind_stark_scalar;
use stark_hd_signer::{
    derive_private_key, derive_stark_private_key, init_public_key, BackendError, CryptoBackend,
    DerivationPath, Error, SignerConfig, SoftwareBackend, StarkKeyPair,
};

fn stark_path() -> DerivationPath {
    DerivationPath::stark(&[HARDENED, 0])
}

// ============================================================================
// Rejection sampling with scripted candidates
// ============================================================================

#[test]
fn test_first_candidate_accepted() {
    let backend = MockBackend::new(seed_one()).with_hashes(&[[0x7a; 32]]);
    let key = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();

    assert_eq!(key.curve(), Curve::Stark256);
    assert_eq!(
        hex::encode(key.secret_bytes()),
        "027a7a7a7a7a797b7a7a7a7a7a7a7a7eb9ea660b96e7098ab276f8a14bdbf4b9"
    );
    assert_eq!(backend.derive_calls.get(), 1);
    assert_eq!(backend.hash_calls.get(), 1);

    let inputs = backend.hash_inputs.borrow();
    assert_eq!(inputs[0].len(), 33);
    assert_eq!(&inputs[0][..32], &seed_one());
    assert_eq!(inputs[0][32], 0);
}

#[test]
fn test_candidate_equal_to_bias_rejected() {
    let backend = MockBackend::new(seed_one()).with_hashes(&[STARK_DERIVE_BIAS, [0x7a; 32]]);
    let key = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();

    assert_eq!(backend.hash_calls.get(), 2);
    assert_eq!(
        hex::encode(key.secret_bytes()),
        "027a7a7a7a7a797b7a7a7a7a7a7a7a7eb9ea660b96e7098ab276f8a14bdbf4b9"
    );
}

#[test]
fn test_candidate_just_below_bias_reduces_to_order_minus_one() {
    let mut below = STARK_DERIVE_BIAS;
    below[31] -= 1;
    let backend = MockBackend::new(seed_one()).with_hashes(&[below]);
    let key = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();

    assert_eq!(
        hex::encode(key.secret_bytes()),
        "0800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2e"
    );
}

#[test]
fn test_high_candidate_below_bias_reduces() {
    let mut high = [0xff; 32];
    high[0] = 0xf7;
    let backend = MockBackend::new(seed_one()).with_hashes(&[high]);
    let key = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();

    assert_eq!(
        hex::encode(key.secret_bytes()),
        "07fffffffffffe0200000000000000087edfd72238d91e206ff8fc4da2c2f47d"
    );
}

#[test]
fn test_retry_index_increments() {
    let backend =
        MockBackend::new(seed_one()).with_hashes(&[[0xff; 32], STARK_DERIVE_BIAS, [0x7a; 32]]);
    derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();

    let inputs = backend.hash_inputs.borrow();
    let indices: Vec<u8> = inputs.iter().map(|input| input[32]).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(inputs.iter().all(|input| input[..32] == seed_one()));
}

#[test]
fn test_bounded_loop_exhausts() {
    let backend = MockBackend::new(seed_one()).with_hashes(&[[0xff; 32]; 3]);
    let config = SignerConfig {
        max_grind_attempts: 3,
        ..SignerConfig::default()
    };
    let result = derive_stark_private_key(&backend, &stark_path(), &config);

    assert!(matches!(result, Err(Error::DerivationExhausted { attempts: 3 })));
    assert_eq!(backend.hash_calls.get(), 3);
}

#[test]
fn test_candidate_reducing_to_zero_retried() {
    let backend = MockBackend::new(seed_one()).with_hashes(&[STARK_CURVE_ORDER, [0x7a; 32]]);
    let key = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();

    assert_eq!(backend.hash_calls.get(), 2);
    assert_eq!(
        hex::encode(key.secret_bytes()),
        "027a7a7a7a7a797b7a7a7a7a7a7a7a7eb9ea660b96e7098ab276f8a14bdbf4b9"
    );
}

#[test]
fn test_only_zero_candidates_exhaust() {
    let backend = MockBackend::new(seed_one()).with_hashes(&[[0u8; 32]; 2]);
    let config = SignerConfig {
        max_grind_attempts: 2,
        ..SignerConfig::default()
    };
    let result = derive_stark_private_key(&backend, &stark_path(), &config);
    assert!(matches!(result, Err(Error::DerivationExhausted { attempts: 2 })));
}

#[test]
fn test_reduction_failure_yields_no_key() {
    let backend = MockBackend::new(seed_one())
        .with_hashes(&[[0x7a; 32]])
        .failing_reduction(BackendError::ZeroModulus);
    let result = grind_stark_scalar(&backend, &SecretBuffer::from_slice(&seed_one()), 256);

    assert!(matches!(
        result,
        Err(Error::OracleFailure(BackendError::ZeroModulus))
    ));
    assert_eq!(backend.hash_calls.get(), 1);
}

// ============================================================================
// Public key materialization
// ============================================================================

#[test]
fn test_wrongly_tagged_public_key_rejected() {
    let backend = MockBackend::new(seed_one()).with_public_key_tag(0x02);
    let result = StarkKeyPair::derive(&backend, &stark_path(), &SignerConfig::default());

    assert!(matches!(
        result,
        Err(Error::OracleFailure(BackendError::InvalidPointEncoding))
    ));
}

#[test]
fn test_public_key_tag_stripped() {
    let backend = MockBackend::new(seed_one());
    let pair = StarkKeyPair::derive(&backend, &stark_path(), &SignerConfig::default()).unwrap();
    let key = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default()).unwrap();
    let raw = backend.generate_public_key(&key).unwrap();

    assert_eq!(raw[0], 0x04);
    assert_eq!(pair.public_key().as_bytes()[..], raw[1..]);
}

// ============================================================================
// Path validation happens before any backend call
// ============================================================================

#[test]
fn test_wrong_purpose_touches_nothing() {
    let backend = MockBackend::new(seed_one());
    let path = DerivationPath::new(vec![HARDENED | 44, HARDENED | 60, 0]);
    let result = derive_stark_private_key(&backend, &path, &SignerConfig::default());

    assert!(matches!(result, Err(Error::InvalidPath(_))));
    assert_eq!(backend.oracle_calls(), 0);
}

#[test]
fn test_short_path_touches_nothing() {
    let backend = MockBackend::new(seed_one());
    let result = derive_stark_private_key(
        &backend,
        &DerivationPath::new(vec![STARK_PURPOSE_INDEX]),
        &SignerConfig::default(),
    );

    assert!(matches!(result, Err(Error::InvalidPath(_))));
    assert_eq!(backend.oracle_calls(), 0);
}

#[test]
fn test_invalid_config_touches_nothing() {
    let backend = MockBackend::new(seed_one());
    let config = SignerConfig {
        max_grind_attempts: 0,
        ..SignerConfig::default()
    };
    let result = derive_stark_private_key(&backend, &stark_path(), &config);

    assert!(matches!(result, Err(Error::InvalidConfig(_))));
    assert_eq!(backend.oracle_calls(), 0);
}

#[test]
fn test_derivation_failure_propagates() {
    let backend =
        MockBackend::new(seed_one()).failing_derivation(BackendError::DerivationFailed { depth: 2 });
    let result = derive_stark_private_key(&backend, &stark_path(), &SignerConfig::default());

    assert!(matches!(
        result,
        Err(Error::OracleFailure(BackendError::DerivationFailed { depth: 2 }))
    ));
    assert_eq!(backend.hash_calls.get(), 0);
}

// ============================================================================
// Software backend vectors
// ============================================================================

#[test]
fn test_starkex_path_vector() {
    let backend = SoftwareBackend::from_mnemonic(ABANDON_MNEMONIC, "").unwrap();
    let path: DerivationPath = STARKEX_PATH.parse().unwrap();
    let pair = StarkKeyPair::derive(&backend, &path, &SignerConfig::default()).unwrap();

    assert_eq!(
        hex::encode(pair.public_key().x()),
        "077519d2e88cab4fa81e039a45beff27a6b175521acfcc1ca6135bd54ca6bc69"
    );
    assert_eq!(
        hex::encode(pair.public_key().y()),
        "0227e5da48602f406de944f640d3c60ed74e1716a812726e454fd1bb40e2d856"
    );

    let key = derive_stark_private_key(&backend, &path, &SignerConfig::default()).unwrap();
    assert_eq!(
        hex::encode(key.secret_bytes()),
        "075cd07aceaf123e36750c23cf8e48467fc7871d9bdf4e604872d6972eb68189"
    );
}

#[test]
fn test_short_stark_path_vector() {
    let backend = SoftwareBackend::from_mnemonic(ABANDON_MNEMONIC, "").unwrap();
    let path = DerivationPath::stark(&[0]);
    let key = derive_stark_private_key(&backend, &path, &SignerConfig::default()).unwrap();
    assert_eq!(
        hex::encode(key.secret_bytes()),
        "05c81a2ad4de7142456ba9454c356b19356d877a0dad44d55930b9f3a09b0b1b"
    );

    let public = init_public_key(&backend, &key).unwrap();
    assert_eq!(
        public.to_hex(),
        "03676d66d11c90fed4e555401484205c20a76d58222c61b82e7240122af2b95a\
         01d7ddd9037a800c1a7f6896540e04f39b6cb3eabbb970f4b2b4d97b10afd208"
    );
}

#[test]
fn test_secp256k1_generic_vector() {
    let backend = SoftwareBackend::from_mnemonic(ABANDON_MNEMONIC, "").unwrap();
    let path: DerivationPath = "m/44'/60'/0'/0/0".parse().unwrap();
    let (key, chain_code) = derive_private_key(&backend, &path, &SignerConfig::default()).unwrap();

    assert_eq!(key.curve(), Curve::Secp256k1);
    assert_eq!(
        hex::encode(key.secret_bytes()),
        "1ab42cc412b618bdea3a599e3c9bae199ebf030895b039e9db1e30dafb12b727"
    );
    assert_eq!(
        hex::encode(chain_code),
        "736094f4f24b67e838a4b3d23d31d229ca03e00c9bb99ce95da6d86e8b3847b5"
    );

    let public = init_public_key(&backend, &key).unwrap();
    assert_eq!(
        hex::encode(public.x()),
        "37b0bb7a8288d38ed49a524b5dc98cff3eb5ca824c9f9dc0dfdb3d9cd600f299"
    );
}

#[test]
fn test_passphrase_changes_key() {
    let plain = SoftwareBackend::from_mnemonic(ABANDON_MNEMONIC, "").unwrap();
    let salted = SoftwareBackend::from_mnemonic(ABANDON_MNEMONIC, "TREZOR").unwrap();
    let config = SignerConfig::default();

    let a = derive_stark_private_key(&plain, &stark_path(), &config).unwrap();
    let b = derive_stark_private_key(&salted, &stark_path(), &config).unwrap();
    assert_ne!(a.secret_bytes(), b.secret_bytes());
}

#[test]
fn test_invalid_mnemonic_rejected() {
    assert!(matches!(
        SoftwareBackend::from_mnemonic("abandon abandon abandon", ""),
        Err(BackendError::InvalidMnemonic(_))
    ));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn test_ground_scalar_below_order(seed in any::<[u8; 32]>()) {
        let backend = MockBackend::new(seed);
        let key = grind_stark_scalar(
            &backend,
            &SecretBuffer::from_slice(&seed),
            256,
        )
        .unwrap();
        prop_assert!(lt_unsigned(key.secret_bytes(), &STARK_CURVE_ORDER));
    }

    #[test]
    fn test_non_stark_purpose_always_rejected(
        purpose in any::<u32>().prop_filter("not stark purpose", |p| *p != STARK_PURPOSE_INDEX),
        rest in prop::collection::vec(any::<u32>(), 1..8),
    ) {
        let mut indices = vec![purpose];
        indices.extend(rest);
        let path = DerivationPath::new(indices);
        prop_assert!(validate_stark_path(&path, 10).is_err());
    }

    #[test]
    fn test_path_display_parse_roundtrip(
        indices in prop::collection::vec(any::<u32>(), 0..10),
    ) {
        let path = DerivationPath::new(indices);
        let parsed: DerivationPath = path.to_string().parse().unwrap();
        prop_assert_eq!(parsed, path);
    }
}

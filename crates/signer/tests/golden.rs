//! Cross-checked signature vectors, verified end to end.

use alloy::primitives::U256;
use mintsig_signer::{
    decode, digest, encode, sign, Preset, RecoveryConvention, Signature, SignatureGenerator,
    TypedValue,
};
use mintsig_test_utils::{golden_fixtures, random_address, random_key, test_tracing};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn golden_fixtures_sign() {
    test_tracing();

    let fixtures = golden_fixtures();
    assert_eq!(fixtures.len(), 5);

    for fixture in fixtures {
        let request = &fixture.request;
        let params = request.parameters().unwrap();
        let payload = request.generator().sign_parameters(&params, &fixture.private_key).unwrap();

        assert_eq!(payload.digest, fixture.expected_digest, "{}", fixture.name);
        assert_eq!(payload.signer, fixture.expected_signer, "{}", fixture.name);
        assert_eq!(Some(payload.signature), request.expected_signature, "{}", fixture.name);
        assert_eq!(
            payload.signature.recover_address(&payload.digest).unwrap(),
            fixture.expected_signer,
            "{}",
            fixture.name
        );

        // the encoding decodes back to the same parameters
        let schema = request.schema().unwrap();
        assert_eq!(decode(&schema.types(), &payload.encoded).unwrap(), params, "{}", fixture.name);
    }
}

#[test]
fn golden_fixtures_step_by_step() {
    for fixture in golden_fixtures() {
        let request = &fixture.request;
        let encoded = encode(&request.parameters().unwrap()).unwrap();
        let digest = digest(&encoded, request.digest);
        assert_eq!(digest, fixture.expected_digest, "{}", fixture.name);

        let signature = sign(&digest, &fixture.private_key, request.convention).unwrap();
        assert_eq!(Some(signature), request.expected_signature, "{}", fixture.name);
    }
}

#[test]
fn chain_id_changes_signature() {
    let fixture = golden_fixtures().into_iter().find(|f| f.name == "box_mint").unwrap();
    let generator = SignatureGenerator::default();

    let original = generator
        .sign_parameters(&fixture.request.parameters().unwrap(), &fixture.private_key)
        .unwrap();
    let moved = fixture.request.clone().with_chain_id(56).unwrap();
    let other = generator.sign_parameters(&moved.parameters().unwrap(), &fixture.private_key).unwrap();

    assert_ne!(original.digest, other.digest);
    assert_ne!(original.signature, other.signature);
    assert_eq!(other.signer, fixture.expected_signer);
    assert_eq!(other.encoded[..32], U256::from(56).to_be_bytes::<32>());
}

#[test]
fn random_box_mints_recover() {
    let mut rng = StdRng::seed_from_u64(7);
    let schema = Preset::BoxMint.schema();

    for _ in 0..16 {
        let key = random_key(&mut rng);
        let params = [
            TypedValue::uint256(U256::from(rng.gen::<u64>())),
            TypedValue::address(key.address().unwrap()),
            TypedValue::address(random_address(&mut rng)),
            TypedValue::address(random_address(&mut rng)),
            TypedValue::uint256(U256::from_be_bytes(rng.gen::<[u8; 32]>())),
            TypedValue::uint256(U256::from(rng.gen_range(1..100u64))),
            TypedValue::uint256(U256::from(rng.gen::<u32>())),
        ]
        .into_iter()
        .collect();

        for convention in [RecoveryConvention::Legacy, RecoveryConvention::Parity] {
            let payload = SignatureGenerator::default()
                .with_convention(convention)
                .sign_parameters(&params, &key)
                .unwrap();

            assert_eq!(payload.signature.convention(), convention);
            assert_eq!(payload.signature.recover_address(&payload.digest).unwrap(), payload.signer);
            assert_eq!(decode(&schema.types(), &payload.encoded).unwrap(), params);

            let bytes = payload.signature.as_bytes();
            assert_eq!(Signature::try_from(&bytes[..]).unwrap(), payload.signature);
        }
    }
}

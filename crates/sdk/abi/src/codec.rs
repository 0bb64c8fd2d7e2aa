use crate::{AbiType, EncodingError, ParameterList, TypedValue};
use alloy::dyn_abi::{DynSolType, DynSolValue};
use tracing::trace;

/// Returns the ABI encoding of `parameters`, identical to Solidity's `abi.encode(p0, p1, ...)`.
///
/// Static values are encoded in place as 32-byte words. Strings and arrays are encoded as an
/// offset into the tail section, measured from the start of the head, followed by the
/// length-prefixed data.
pub fn encode(parameters: &ParameterList) -> Result<Vec<u8>, EncodingError> {
    parameters.validate()?;

    let values = parameters.iter().map(TypedValue::to_sol_value).collect();
    let encoded = DynSolValue::Tuple(values).abi_encode_params();
    trace!(signature = parameters.signature(), len = encoded.len(), "abi encoded parameters");

    Ok(encoded)
}

/// Decodes `data` as `abi.encode` of values with the given types.
pub fn decode(types: &[AbiType], data: &[u8]) -> Result<ParameterList, EncodingError> {
    types.iter().try_for_each(AbiType::validate)?;

    let tuple = DynSolType::Tuple(types.iter().map(AbiType::to_sol_type).collect());
    let values = match tuple.abi_decode_params(data)? {
        DynSolValue::Tuple(values) => values,
        other => vec![other],
    };
    if values.len() != types.len() {
        return Err(EncodingError::ArityMismatch { expected: types.len(), found: values.len() });
    }

    types.iter().zip(values).map(|(ty, value)| TypedValue::from_sol_value(ty, value)).collect()
}

#[cfg(test)]
mod test {
    use super::{decode, encode};
    use crate::{AbiType, EncodingError, ParameterList, TypedValue};
    use alloy::primitives::{address, hex, U256};

    const CID: &str = "bafkreifiuytiisforeksrt3aw3itv3ajc6wsxm6pvknawoj3nk5t2tm64e";

    fn word(data: &[u8], index: usize) -> U256 {
        U256::from_be_slice(&data[index * 32..(index + 1) * 32])
    }

    fn nft_mint_params() -> ParameterList {
        let user = address!("29E754233F6A50ee5AE3ee6A0217aD907dc3386B");
        ParameterList::new()
            .with(TypedValue::uint256(U256::from(97u64)))
            .with(TypedValue::address(user))
            .with(TypedValue::address(user))
            .with(TypedValue::uint256(U256::from(0u64)))
            .with(TypedValue::array(AbiType::String, vec![TypedValue::string(CID)]).unwrap())
            .with(TypedValue::array(AbiType::UINT8, vec![TypedValue::uint8(1)]).unwrap())
            .with(TypedValue::array(AbiType::UINT8, vec![TypedValue::uint8(1)]).unwrap())
            .with(TypedValue::uint256(U256::from(1666413347u64)))
    }

    #[test]
    fn nft_mint_encoding() {
        let encoded = encode(&nft_mint_params()).unwrap();
        let expected = hex::decode(concat!(
            "0000000000000000000000000000000000000000000000000000000000000061",
            "00000000000000000000000029e754233f6a50ee5ae3ee6a0217ad907dc3386b",
            "00000000000000000000000029e754233f6a50ee5ae3ee6a0217ad907dc3386b",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000100",
            "00000000000000000000000000000000000000000000000000000000000001a0",
            "00000000000000000000000000000000000000000000000000000000000001e0",
            "0000000000000000000000000000000000000000000000000000000063537323",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "000000000000000000000000000000000000000000000000000000000000003b",
            "6261666b7265696669757974696973666f72656b737274336177336974763361",
            "6a63367773786d3670766b6e61776f6a336e6b357432746d3634650000000000",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000001",
        ))
        .unwrap();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn head_precedes_tail() {
        let params = nft_mint_params();
        let encoded = encode(&params).unwrap();
        assert_eq!(encoded.len() % 32, 0);

        let head_len = params.len() * 32;
        let mut tail_offsets = vec![];
        for (i, value) in params.iter().enumerate() {
            if value.abi_type().is_dynamic() {
                tail_offsets.push(word(&encoded, i).to::<usize>());
            }
        }

        // every dynamic value points past the head, in order
        assert_eq!(tail_offsets, vec![head_len, 0x1a0, 0x1e0]);
        assert!(tail_offsets.windows(2).all(|w| w[0] < w[1]));

        // each uint8[] tail is length 1 followed by the element
        assert_eq!(word(&encoded, 0x1a0 / 32), U256::from(1));
        assert_eq!(word(&encoded, 0x1a0 / 32 + 1), U256::from(1));

        let decoded = decode(&params.types(), &encoded).unwrap();
        assert_eq!(decoded, params);
    }

    #[test]
    fn static_only_is_all_head() {
        let params = ParameterList::new()
            .with(TypedValue::uint256(U256::from(97u64)))
            .with(TypedValue::bool(false))
            .with(TypedValue::uint(64, U256::from(7)).unwrap());
        let encoded = encode(&params).unwrap();
        assert_eq!(encoded.len(), 96);
        assert_eq!(word(&encoded, 0), U256::from(97));
        assert_eq!(word(&encoded, 1), U256::ZERO);
        assert_eq!(word(&encoded, 2), U256::from(7));
    }

    #[test]
    fn empty_list() {
        assert!(encode(&ParameterList::new()).unwrap().is_empty());
        assert!(decode(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn nested_arrays_round_trip() {
        let inner = AbiType::array_of(AbiType::UINT8);
        let params = ParameterList::new()
            .with(
                TypedValue::array(
                    inner.clone(),
                    vec![
                        TypedValue::array(AbiType::UINT8, vec![TypedValue::uint8(1)]).unwrap(),
                        TypedValue::array(AbiType::UINT8, vec![]).unwrap(),
                    ],
                )
                .unwrap(),
            )
            .with(TypedValue::string(""));

        let encoded = encode(&params).unwrap();
        assert_eq!(decode(&params.types(), &encoded).unwrap(), params);
    }

    #[test]
    fn encode_rejects_invalid_values() {
        let params = ParameterList::new().with(TypedValue::Uint { width: 8, value: U256::from(256) });
        assert_eq!(
            encode(&params),
            Err(EncodingError::IntegerOutOfRange { width: 8, value: "256".into() })
        );

        let params = ParameterList::new().with(TypedValue::Array {
            element: AbiType::Bool,
            values: vec![TypedValue::string("true")],
        });
        assert!(matches!(encode(&params), Err(EncodingError::TypeMismatch { .. })));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(&[AbiType::String], &[0u8; 31]).is_err());

        // a uint8 word with high bits set
        let data = U256::from(256).to_be_bytes::<32>();
        assert!(decode(&[AbiType::UINT8], &data).is_err());
    }
}

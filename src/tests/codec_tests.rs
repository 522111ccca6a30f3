use crate::codec::{
    compute_fee, hex_to_decimal, hex_to_u64, try_hex_to_decimal, try_hex_to_u64, wei_to_ether,
    CodecError,
};

#[test]
fn test_hex_to_decimal() {
    assert_eq!(hex_to_decimal("0x10"), "16");
    assert_eq!(hex_to_decimal("10"), "16");
    assert_eq!(hex_to_decimal("0xde0b6b3a7640000"), "1000000000000000000");
    assert_eq!(hex_to_decimal("0X1f"), "31");
}

#[test]
fn test_hex_to_decimal_exceeds_64_bits() {
    assert_eq!(hex_to_decimal("0x10000000000000000"), "18446744073709551616");
    assert_eq!(
        hex_to_decimal("0xffffffffffffffffffffffffffffffff"),
        "340282366920938463463374607431768211455"
    );
}

#[test]
fn test_hex_to_decimal_degrades_to_zero() {
    assert_eq!(hex_to_decimal(""), "0");
    assert_eq!(hex_to_decimal("0x"), "0");
    assert_eq!(hex_to_decimal("not-hex"), "0");
    assert_eq!(hex_to_decimal("0x12_34"), "0");

    assert_eq!(try_hex_to_decimal(""), Err(CodecError::Empty));
    assert!(matches!(try_hex_to_decimal("0xzz"), Err(CodecError::InvalidHex(_))));
}

#[test]
fn test_hex_to_u64() {
    assert_eq!(hex_to_u64("0x1b4"), 436);
    assert_eq!(hex_to_u64("garbage"), 0);
    assert!(matches!(
        try_hex_to_u64("0x1ffffffffffffffff"),
        Err(CodecError::Overflow(_))
    ));
}

#[test]
fn test_compute_fee() {
    // 20 gwei * 21000 gas for a plain transfer
    assert_eq!(compute_fee("20000000000", "21000"), "420000000000000");
    assert_eq!(
        compute_fee("340282366920938463463374607431768211456", "2"),
        "680564733841876926926749214863536422912"
    );
    assert_eq!(compute_fee("0", "21000"), "0");
}

#[test]
fn test_compute_fee_rejects_non_decimal_operands() {
    assert_eq!(compute_fee("0x10", "21000"), "0");
    assert_eq!(compute_fee("20000000000", ""), "0");
    assert_eq!(compute_fee("-5", "2"), "0");
    assert_eq!(compute_fee("+5", "2"), "0");
}

#[test]
fn test_wei_to_ether() {
    assert_eq!(wei_to_ether("1"), "0.000000000000000001");
    assert_eq!(wei_to_ether("0"), "0.000000000000000000");
    assert_eq!(wei_to_ether("1500000000000000000"), "1.500000000000000000");
    assert_eq!(
        wei_to_ether("12345678901234567890123"),
        "12345.678901234567890123"
    );
}

#[test]
fn test_wei_to_ether_malformed() {
    assert_eq!(wei_to_ether(""), "0");
    assert_eq!(wei_to_ether("1.5"), "0");
    assert_eq!(wei_to_ether("-1"), "0");
}

#[cfg(test)]
mod tests {
    use crate::virtual_machine::operand::TokenType;
    use std::collections::HashSet;

    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    const EXPECTED_ISA_HASH: u64 = 13093295712953939896;

    fn fnv1a64(mut h: u64, bytes: &[u8]) -> u64 {
        for b in bytes {
            h ^= *b as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
        h
    }

    macro_rules! hash_isa {
        (
            $( $(#[$doc:meta])* $name:ident, $mnemonic:literal => [ $( $kind:ident ),* $(,)? ], $handler:ident ),* $(,)?
        ) => {{
            let mut h = FNV_OFFSET;
            $(
                let kinds: &[&str] = &[ $( stringify!($kind) ),* ];
                h = fnv1a64(h, stringify!($name).as_bytes());
                h = fnv1a64(h, $mnemonic.as_bytes());
                for kind in kinds {
                    h = fnv1a64(h, kind.as_bytes());
                }
                h = fnv1a64(h, &[kinds.len() as u8]);
            )*
            h
        }};
    }

    macro_rules! list_isa {
        (
            $( $(#[$doc:meta])* $name:ident, $mnemonic:literal => [ $( $kind:ident ),* $(,)? ], $handler:ident ),* $(,)?
        ) => {
            vec![ $( ($mnemonic, vec![ $( TokenType::$kind ),* ]) ),* ]
        };
    }

    fn current_isa_hash() -> u64 {
        crate::for_each_instruction!(hash_isa)
    }

    #[test]
    #[ignore]
    fn print_isa_hash() {
        println!("ISA_HASH={}", current_isa_hash());
    }

    #[test]
    fn isa_hash_unchanged() {
        assert_eq!(current_isa_hash(), EXPECTED_ISA_HASH);
    }

    #[test]
    fn no_duplicate_signatures() {
        let variants: Vec<(&str, Vec<TokenType>)> = crate::for_each_instruction!(list_isa);
        let mut seen = HashSet::new();
        for (mnemonic, types) in &variants {
            assert!(
                seen.insert((*mnemonic, types.clone())),
                "{mnemonic} registered twice with {types:?}"
            );
        }
    }

    #[test]
    fn no_variant_accepts_unknown_operands() {
        let variants: Vec<(&str, Vec<TokenType>)> = crate::for_each_instruction!(list_isa);
        for (mnemonic, types) in &variants {
            assert!(
                !types.contains(&TokenType::Unknown),
                "{mnemonic} accepts an unknown operand"
            );
        }
    }
}

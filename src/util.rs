use num_traits::PrimInt;
use std::str::FromStr;

pub(crate) fn parse_positive_int<T: PrimInt + FromStr>(int_str: &str) -> Option<T> {
    int_str
        .trim()
        .parse::<T>()
        .ok()
        .filter(|i| *i > T::zero())
}

/// The run of alphabetic characters at the start of `s`, stopping at the first
/// character that isn't one.
pub(crate) fn leading_alphabetic(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map_or(s.len(), |(i, _)| i);
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_ints_only() {
        assert_eq!(parse_positive_int::<u8>("7"), Some(7));
        assert_eq!(parse_positive_int::<u8>(" 12 "), Some(12));
        assert_eq!(parse_positive_int::<u8>("0"), None);
        assert_eq!(parse_positive_int::<i32>("-3"), None);
        assert_eq!(parse_positive_int::<u8>("x"), None);
        assert_eq!(parse_positive_int::<u8>(""), None);
    }

    #[test]
    fn alphabetic_prefix() {
        assert_eq!(leading_alphabetic("S7"), "S");
        assert_eq!(leading_alphabetic("POCS2"), "POCS");
        assert_eq!(leading_alphabetic("DGR"), "DGR");
        assert_eq!(leading_alphabetic("64"), "");
        assert_eq!(leading_alphabetic(""), "");
        assert_eq!(leading_alphabetic("L+"), "L");
    }
}

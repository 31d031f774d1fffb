use paysign_core::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The RSASSA-PSS flavours accepted by Amazon Pay.
///
/// Both use SHA-256 with MGF1-SHA-256 and trailer field 1; they only differ in
/// salt length and in the tag that prefixes the string to sign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    /// `AMZN-PAY-RSASSA-PSS`, salt length 20.
    #[default]
    Default,
    /// `AMZN-PAY-RSASSA-PSS-V2`, salt length 32.
    V2,
}

impl SignatureAlgorithm {
    /// The tag written in the string to sign and the authorization header.
    pub fn name(&self) -> &'static str {
        match self {
            SignatureAlgorithm::Default => "AMZN-PAY-RSASSA-PSS",
            SignatureAlgorithm::V2 => "AMZN-PAY-RSASSA-PSS-V2",
        }
    }

    /// PSS salt length in bytes.
    pub fn salt_len(&self) -> usize {
        match self {
            SignatureAlgorithm::Default => 20,
            SignatureAlgorithm::V2 => 32,
        }
    }
}

impl Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AMZN-PAY-RSASSA-PSS" => Ok(SignatureAlgorithm::Default),
            "AMZN-PAY-RSASSA-PSS-V2" => Ok(SignatureAlgorithm::V2),
            _ => Err(Error::config_invalid(format!(
                "{s} is not a valid signature algorithm"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("AMZN-PAY-RSASSA-PSS", SignatureAlgorithm::Default, 20)]
    #[test_case("AMZN-PAY-RSASSA-PSS-V2", SignatureAlgorithm::V2, 32)]
    fn test_parse(input: &str, expected: SignatureAlgorithm, salt: usize) {
        let alg: SignatureAlgorithm = input.parse().unwrap();
        assert_eq!(alg, expected);
        assert_eq!(alg.salt_len(), salt);
        assert_eq!(alg.to_string(), input);
    }

    #[test_case("amzn-pay-rsassa-pss"; "wrong case")]
    #[test_case("AMZN-PAY-RSASSA-PSS-V3"; "unknown version")]
    #[test_case(""; "empty")]
    fn test_parse_invalid(input: &str) {
        assert!(input.parse::<SignatureAlgorithm>().is_err());
    }
}

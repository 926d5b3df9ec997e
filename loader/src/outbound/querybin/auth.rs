//! HTTP Basic authorization header construction.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

/// Build the `Authorization` header value for HTTP Basic authentication.
///
/// The value is `"Basic "` followed by the standard, padded base64 encoding
/// of the UTF-8 bytes of `user:passwd`. No character set negotiation takes
/// place.
///
/// # Examples
/// ```
/// use querybin_loader::outbound::querybin::basic_authorization;
///
/// assert_eq!(
///     basic_authorization("Aladdin", "open sesame").as_str(),
///     "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
/// );
/// ```
pub fn basic_authorization(user: &str, passwd: &str) -> Zeroizing<String> {
    let credentials = Zeroizing::new(format!("{user}:{passwd}"));
    Zeroizing::new(format!("Basic {}", STANDARD.encode(credentials.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Aladdin", "open sesame", "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")]
    #[case("analyst", "", "Basic YW5hbHlzdDo=")]
    #[case("user", "pa:ss", "Basic dXNlcjpwYTpzcw==")]
    #[case("jürgen", "pässwort", "Basic asO8cmdlbjpww6Rzc3dvcnQ=")]
    #[case("研究者", "秘密🔑", "Basic 56CU56m26ICFOuenmOWvhvCflJE=")]
    fn encodes_utf8_credentials(#[case] user: &str, #[case] passwd: &str, #[case] expected: &str) {
        assert_eq!(basic_authorization(user, passwd).as_str(), expected);
    }

    #[test]
    fn header_decodes_back_to_the_credentials() {
        let header = basic_authorization("jürgen", "pässwort");
        let encoded = header
            .strip_prefix("Basic ")
            .expect("header should use the Basic scheme");
        let decoded = STANDARD.decode(encoded).expect("valid base64");
        assert_eq!(decoded, "jürgen:pässwort".as_bytes());
    }
}

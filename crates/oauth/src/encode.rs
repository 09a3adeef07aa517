use std::borrow::Cow;

/// RFC 3986 percent-encoding as required by RFC 5849 §3.6: everything except
/// `ALPHA / DIGIT / "-" / "." / "_" / "~"` is encoded, with uppercase hex.
pub fn percent_encode(input: &str) -> Cow<'_, str> {
    urlencoding::encode(input)
}

/// Encode, sort and join parameters into the normalized parameter string
/// (RFC 5849 §3.4.1.3.2).
pub fn normalize_parameters<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut encoded: Vec<(String, String)> = params
        .into_iter()
        .map(|(k, v)| (percent_encode(k).into_owned(), percent_encode(v).into_owned()))
        .collect();
    encoded.sort();
    encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case("abcXYZ019", "abcXYZ019")]
    #[case("-._~", "-._~")]
    #[case("Hello Ladies + Gentlemen", "Hello%20Ladies%20%2B%20Gentlemen")]
    #[case("a signed OAuth request!", "a%20signed%20OAuth%20request%21")]
    #[case("https://x/y?v=2", "https%3A%2F%2Fx%2Fy%3Fv%3D2")]
    #[case("\u{2603}", "%E2%98%83")]
    fn encodes_per_rfc3986(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(percent_encode(input), expected);
    }

    #[test]
    fn sorts_by_key_then_value() {
        let params = [("b", "2"), ("a", "z"), ("a", "y"), ("c", "")];
        assert_eq!(normalize_parameters(params), "a=y&a=z&b=2&c=");
    }
}

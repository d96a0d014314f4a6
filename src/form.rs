use itertools::Itertools;
use url::form_urlencoded::byte_serialize;

/// Encodes `pairs` as an `application/x-www-form-urlencoded` body, keeping
/// their order.
pub fn encode(pairs: &[(&str, &str)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", query_component(k), query_component(v)))
        .join("&")
}

/// Percent-encodes one value, spaces become `+`.
pub fn query_component(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_keeps_order() {
        assert_eq!(
            encode(&[("catid", "54"), ("perpage", "1000"), ("display", "grid")]),
            "catid=54&perpage=1000&display=grid"
        );
    }

    #[test]
    fn encode_escapes() {
        assert_eq!(
            encode(&[("address", "505 E Green St, Champaign & Urbana")]),
            "address=505+E+Green+St%2C+Champaign+%26+Urbana"
        );
        assert_eq!(query_component("a=b"), "a%3Db");
    }

    #[test]
    fn encode_empty() {
        assert_eq!(encode(&[]), "");
    }
}

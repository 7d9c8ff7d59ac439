use chat_history_domain::{
    FALLBACK_SUFFIX_LEN, RANDOMIZED_SUFFIX_LEN, base36_digit, fallback_url_id, randomized_url_id,
    unix_millis_now,
};
use rand::Rng as _;

fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len).map(|_| base36_digit(rng.gen_range(0..36))).collect()
}

pub(crate) fn fresh_randomized_url_id(url_id: &str) -> String {
    randomized_url_id(
        url_id,
        unix_millis_now(),
        &random_base36(RANDOMIZED_SUFFIX_LEN),
    )
}

pub(crate) fn fresh_fallback_url_id() -> String {
    fallback_url_id(unix_millis_now(), &random_base36(FALLBACK_SUFFIX_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base36(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    }

    #[test]
    fn fresh_randomized_url_id_keeps_prefix() {
        let url_id = fresh_randomized_url_id("demo-3");
        let parts = url_id.split('-').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3, "unexpected url id: {url_id}");
        assert_eq!(parts[0], "demo");
        assert!(is_base36(parts[1]));
        assert_eq!(parts[2].len(), RANDOMIZED_SUFFIX_LEN);
        assert!(is_base36(parts[2]));
    }

    #[test]
    fn fresh_fallback_url_id_has_chat_prefix() {
        let url_id = fresh_fallback_url_id();
        let parts = url_id.split('-').collect::<Vec<_>>();
        assert_eq!(parts.len(), 3, "unexpected url id: {url_id}");
        assert_eq!(parts[0], "chat");
        assert!(parts[1].parse::<u64>().is_ok());
        assert_eq!(parts[2].len(), FALLBACK_SUFFIX_LEN);
    }
}

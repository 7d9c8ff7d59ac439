use std::collections::HashSet;

pub const FALLBACK_URL_ID_PREFIX: &str = "chat";
pub const RANDOMIZED_SUFFIX_LEN: usize = 3;
pub const FALLBACK_SUFFIX_LEN: usize = 5;

const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Next numeric chat id: one past the largest id that parses as an integer.
/// Ids that do not parse count as zero. `None` once the id space is used up.
pub fn next_chat_id<I, S>(ids: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let highest = ids
        .into_iter()
        .map(|id| id.as_ref().trim().parse::<u128>().unwrap_or(0))
        .max()
        .unwrap_or(0);
    highest.checked_add(1).map(|next| next.to_string())
}

/// `candidate` if nobody uses it yet, otherwise the first free `candidate-N`
/// with `N >= 2`.
pub fn resolve_url_id(candidate: &str, existing: &HashSet<String>) -> String {
    if !existing.contains(candidate) {
        return candidate.to_owned();
    }

    let mut suffix = 2u64;
    loop {
        let next = format!("{candidate}-{suffix}");
        if !existing.contains(&next) {
            return next;
        }
        suffix += 1;
    }
}

pub fn url_id_prefix(url_id: &str) -> &str {
    url_id.split('-').next().unwrap_or(url_id)
}

/// `<prefix>-<millis in base36>-<random>`, where the prefix is everything
/// before the first dash of `url_id`.
pub fn randomized_url_id(url_id: &str, unix_millis: u64, random: &str) -> String {
    format!(
        "{}-{}-{random}",
        url_id_prefix(url_id),
        to_base36(unix_millis)
    )
}

pub fn fallback_url_id(unix_millis: u64, random: &str) -> String {
    format!("{FALLBACK_URL_ID_PREFIX}-{unix_millis}-{random}")
}

pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_owned();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

pub fn base36_digit(index: usize) -> char {
    BASE36_DIGITS[index % BASE36_DIGITS.len()] as char
}

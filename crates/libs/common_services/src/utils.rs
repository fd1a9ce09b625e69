/// Generate a URL-safe random ID of a given length.
#[must_use]
pub fn nice_id(length: usize) -> String {
    const URL_SAFE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_";
    (0..length)
        .map(|_| {
            let idx = rand::random_range(0..URL_SAFE.len());
            URL_SAFE[idx] as char
        })
        .collect()
}

/// Logs a warning message with an 'ALERT:' prefix.
#[macro_export]
macro_rules! alert {
    ($($arg:tt)*) => {
        warn!("ALERT: {}", format_args!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn nice_id_has_requested_length_and_charset() {
        let id = nice_id(32);
        assert_eq!(id.len(), 32);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    // Access tokens are the only thing protecting report URLs, so a batch of
    // them must never collide.
    #[test]
    fn access_token_length_ids_do_not_collide() {
        let tokens: HashSet<String> = (0..10_000).map(|_| nice_id(32)).collect();
        assert_eq!(tokens.len(), 10_000);
    }
}

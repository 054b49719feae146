/// Longest slice of an unexpected response body kept in error messages.
pub(crate) const BODY_EXCERPT: usize = 200;

/// Leading part of a response body, cut on a char boundary.
pub(crate) fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_kept_whole() {
        assert_eq!(excerpt("Bad credentials"), "Bad credentials");
    }

    #[test]
    fn multibyte_body_cut_on_char_boundary() {
        let body = "é".repeat(BODY_EXCERPT + 10);
        let cut = excerpt(&body);
        assert_eq!(cut.chars().count(), BODY_EXCERPT);
        assert!(body.starts_with(&cut));
    }
}

use crate::controller::Failure;

pub const MAX_QUERY_LEN: usize = 100;

/// Drops every angle bracket from raw input and trims surrounding whitespace.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c != '<' && c != '>')
        .collect::<String>()
        .trim()
        .to_owned()
}

pub fn validate(query: &str, max_len: usize) -> Result<&str, Failure> {
    let n = query.chars().count();
    if n == 0 || n > max_len {
        Err(Failure::InvalidQuery)
    } else {
        Ok(query)
    }
}

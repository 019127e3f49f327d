use chrono::Utc;

/// Millisecond-timestamp id, bumped until it collides with none of `taken`.
pub fn generate_id<'a, I>(taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    let mut candidate = Utc::now().timestamp_millis();
    loop {
        let id = candidate.to_string();
        if !taken.contains(&id.as_str()) {
            return id;
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_is_numeric() {
        let id = generate_id(Vec::<&str>::new());
        assert!(id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_generated_id_avoids_taken() {
        let first = generate_id(Vec::<&str>::new());
        let second = generate_id([first.as_str()]);
        assert_ne!(first, second);
    }
}

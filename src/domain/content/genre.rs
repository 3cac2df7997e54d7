use super::entity::ContentEntry;

/// Compound rail label that covers two stored genre tags
pub const ACTION_AND_ADVENTURE: &str = "Action & Adventure";

/// Genre membership test for a genre rail.
///
/// A rail label maps to one stored tag, except "Action & Adventure",
/// which matches entries tagged "Action" or "Adventure".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreFilter {
    tags: Vec<String>,
}

impl GenreFilter {
    /// Returns `None` for a blank genre: there is nothing to match.
    pub fn parse(genre: &str) -> Option<Self> {
        let genre = genre.trim();
        if genre.is_empty() {
            return None;
        }

        let tags = if genre == ACTION_AND_ADVENTURE {
            vec!["Action".to_string(), "Adventure".to_string()]
        } else {
            vec![genre.to_string()]
        };

        Some(Self { tags })
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn matches(&self, entry: &ContentEntry) -> bool {
        entry.genre.iter().any(|g| self.tags.contains(g))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_genre_has_no_filter() {
        assert!(GenreFilter::parse("").is_none());
        assert!(GenreFilter::parse("   ").is_none());
    }

    #[test]
    fn test_action_and_adventure_expands() {
        let filter = GenreFilter::parse("Action & Adventure").unwrap();
        assert_eq!(filter.tags(), &["Action".to_string(), "Adventure".to_string()]);
    }

    #[test]
    fn test_plain_genre_is_single_tag() {
        let filter = GenreFilter::parse("Comedy").unwrap();
        assert_eq!(filter.tags(), &["Comedy".to_string()]);
    }
}

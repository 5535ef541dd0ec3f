//! Catalog data model and the search rules applied to it.
//!
//! Everything in here is synchronous and side-effect free; the network side
//! lives in `backend`, and `App` decides when these functions run.

use serde::Deserialize;

/// Number of description characters shown on a card before the ellipsis.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 60;

/// One movie as served by the catalog endpoint.
///
/// Every field is optional on the wire; accessors fall back to `""`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CatalogItem {
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "genero", default)]
    pub genre: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "poster", default)]
    pub poster_url: Option<String>,
}

impl CatalogItem {
    pub fn new(title: &str, genre: &str, description: &str, poster_url: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            genre: Some(genre.to_string()),
            description: Some(description.to_string()),
            poster_url: Some(poster_url.to_string()),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn genre(&self) -> &str {
        self.genre.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn poster_url(&self) -> &str {
        self.poster_url.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Keyword,
    Description,
}

impl SearchMode {
    pub fn toggle(self) -> Self {
        match self {
            SearchMode::Keyword => SearchMode::Description,
            SearchMode::Description => SearchMode::Keyword,
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            SearchMode::Keyword => "Search by title or genre",
            SearchMode::Description => "Describe the movie you are looking for...",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            SearchMode::Keyword => "Search",
            SearchMode::Description => "Search with AI",
        }
    }

    /// Label of the button that switches away from this mode.
    pub fn toggle_label(self) -> &'static str {
        match self {
            SearchMode::Keyword => "AI mode",
            SearchMode::Description => "Keyword mode",
        }
    }
}

/// The session's single state store.
///
/// `visible` is always a subsequence of `all`.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    pub all: Vec<CatalogItem>,
    pub visible: Vec<CatalogItem>,
    pub query: String,
    pub mode: SearchMode,
    pub recommendation: String,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly loaded catalog and show all of it.
    pub fn set_catalog(&mut self, items: Vec<CatalogItem>) {
        self.visible = items.clone();
        self.all = items;
    }

    pub fn reset_catalog(&mut self) {
        self.all.clear();
        self.visible.clear();
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    pub fn apply_keyword_search(&mut self) {
        self.visible = keyword_filter(&self.all, &self.query);
        self.recommendation.clear();
    }

    pub fn apply_recommendation(&mut self, text: String) {
        self.visible = recommendation_matches(&self.all, &text);
        self.recommendation = text;
    }

    /// Failed description search: the grid empties, the last suggestion stays.
    pub fn apply_recommendation_failure(&mut self) {
        self.visible.clear();
    }

    pub fn prompt(&self) -> String {
        build_prompt(&self.query, &self.all)
    }
}

/// Items whose title or genre contains `query`, ignoring case.
pub fn keyword_filter(all: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    let needle = query.to_lowercase();
    all.iter()
        .filter(|item| {
            let title = item.title().to_lowercase();
            let genre = item.genre().to_lowercase();
            title.contains(&needle) || genre.contains(&needle) || title.starts_with(&needle)
        })
        .cloned()
        .collect()
}

/// Items whose title appears somewhere in the recommendation text.
///
/// An empty recommendation matches nothing. A missing title counts as `""`,
/// which any non-empty recommendation contains.
pub fn recommendation_matches(all: &[CatalogItem], recommendation: &str) -> Vec<CatalogItem> {
    if recommendation.is_empty() {
        return Vec::new();
    }
    let haystack = recommendation.to_lowercase();
    all.iter()
        .filter(|item| haystack.contains(&item.title().to_lowercase()))
        .cloned()
        .collect()
}

pub fn build_prompt(query: &str, all: &[CatalogItem]) -> String {
    let titles: Vec<&str> = all.iter().map(CatalogItem::title).collect();
    format!(
        "Give a recommendation based on this description: {}. Use only movies from this catalog: {}.",
        query,
        titles.join(", ")
    )
}

/// First `max_chars` characters of `description` followed by `...`.
pub fn truncate_description(description: &str, max_chars: usize) -> String {
    let mut preview: String = description.chars().take(max_chars).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("Dune", "Sci-Fi", "Spice and sand.", "https://img/dune.jpg"),
            CatalogItem::new("Amelie", "Romance", "A shy waitress in Paris.", "https://img/amelie.jpg"),
        ]
    }

    #[test]
    fn test_catalog_item_deserialize() {
        let json = r#"{
            "titulo": "Dune",
            "genero": "Sci-Fi",
            "descripcion": "Spice and sand.",
            "poster": "https://img/dune.jpg"
        }"#;

        let item: CatalogItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.title(), "Dune");
        assert_eq!(item.genre(), "Sci-Fi");
        assert_eq!(item.description(), "Spice and sand.");
        assert_eq!(item.poster_url(), "https://img/dune.jpg");
    }

    #[test]
    fn test_catalog_item_deserialize_defaults() {
        let json = r#"{"titulo": null}"#;

        let item: CatalogItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.title(), "");
        assert_eq!(item.genre(), "");
        assert_eq!(item.description(), "");
        assert_eq!(item.poster_url(), "");
    }

    #[test]
    fn test_keyword_filter_matches_genre_case_insensitively() {
        let catalog = sample_catalog();

        let visible = keyword_filter(&catalog, "sci");

        assert_eq!(visible, vec![catalog[0].clone()]);
    }

    #[test]
    fn test_keyword_filter_matches_title() {
        let catalog = sample_catalog();

        assert_eq!(keyword_filter(&catalog, "AME"), vec![catalog[1].clone()]);
        assert_eq!(keyword_filter(&catalog, "un"), vec![catalog[0].clone()]);
    }

    #[test]
    fn test_keyword_filter_empty_query_returns_everything() {
        let catalog = sample_catalog();

        assert_eq!(keyword_filter(&catalog, ""), catalog);
    }

    #[test]
    fn test_keyword_filter_no_match() {
        let catalog = sample_catalog();

        assert!(keyword_filter(&catalog, "western").is_empty());
    }

    #[test]
    fn test_keyword_filter_results_only_contain_matching_items() {
        let catalog = vec![
            CatalogItem::new("Alien", "Horror", "", ""),
            CatalogItem::new("Aliens", "Action", "", ""),
            CatalogItem::new("Heat", "Crime", "", ""),
            CatalogItem::default(),
        ];

        for query in ["", "a", "ALIEN", "cri", "zzz", "o"] {
            let needle = query.to_lowercase();
            let visible = keyword_filter(&catalog, query);
            for item in &visible {
                assert!(
                    item.title().to_lowercase().contains(&needle)
                        || item.genre().to_lowercase().contains(&needle),
                    "{:?} should not match {:?}",
                    item,
                    query
                );
            }
            let expected = catalog
                .iter()
                .filter(|item| {
                    item.title().to_lowercase().contains(&needle)
                        || item.genre().to_lowercase().contains(&needle)
                })
                .count();
            assert_eq!(visible.len(), expected);
        }
    }

    #[test]
    fn test_keyword_search_clears_recommendation() {
        let mut state = CatalogState::new();
        state.set_catalog(sample_catalog());
        state.recommendation = "Watch Dune".to_string();
        state.query = "romance".to_string();

        state.apply_keyword_search();

        assert_eq!(state.recommendation, "");
        assert_eq!(state.visible, vec![sample_catalog()[1].clone()]);
    }

    #[test]
    fn test_recommendation_matches_titles_in_text() {
        let catalog = sample_catalog();

        let visible = recommendation_matches(&catalog, "I suggest Amelie for you");

        assert_eq!(visible, vec![catalog[1].clone()]);
    }

    #[test]
    fn test_recommendation_matches_empty_text_is_empty() {
        let mut catalog = sample_catalog();
        catalog.push(CatalogItem::default());

        assert!(recommendation_matches(&catalog, "").is_empty());
    }

    #[test]
    fn test_recommendation_matches_untitled_items_on_any_text() {
        let catalog = vec![
            CatalogItem::default(),
            CatalogItem::new("Dune", "", "", ""),
            CatalogItem::new("Heat", "", "", ""),
        ];

        let visible = recommendation_matches(&catalog, "I suggest Dune");

        assert_eq!(visible, vec![catalog[0].clone(), catalog[1].clone()]);
        assert!(recommendation_matches(&catalog, "").is_empty());
    }

    #[test]
    fn test_apply_recommendation_sets_text_and_visible() {
        let mut state = CatalogState::new();
        state.set_catalog(sample_catalog());

        state.apply_recommendation("I suggest Amelie for you".to_string());

        assert_eq!(state.recommendation, "I suggest Amelie for you");
        assert_eq!(state.visible, vec![sample_catalog()[1].clone()]);
        assert_eq!(state.all, sample_catalog());
    }

    #[test]
    fn test_recommendation_failure_keeps_previous_text() {
        let mut state = CatalogState::new();
        state.set_catalog(sample_catalog());
        state.apply_recommendation("Try Dune".to_string());

        state.apply_recommendation_failure();

        assert!(state.visible.is_empty());
        assert_eq!(state.recommendation, "Try Dune");
    }

    #[test]
    fn test_build_prompt_lists_catalog_titles() {
        let prompt = build_prompt("space opera", &sample_catalog());

        assert_eq!(
            prompt,
            "Give a recommendation based on this description: space opera. \
             Use only movies from this catalog: Dune, Amelie."
        );
    }

    #[test]
    fn test_truncate_long_description() {
        let description = "x".repeat(75);

        let preview = truncate_description(&description, DESCRIPTION_PREVIEW_CHARS);

        assert_eq!(preview, format!("{}...", "x".repeat(60)));
    }

    #[test]
    fn test_truncate_exactly_sixty_chars() {
        let description = "y".repeat(60);

        let preview = truncate_description(&description, DESCRIPTION_PREVIEW_CHARS);

        assert_eq!(preview, format!("{}...", description));
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let description = "é".repeat(70);

        let preview = truncate_description(&description, DESCRIPTION_PREVIEW_CHARS);

        assert_eq!(preview.chars().count(), 63);
    }

    #[test]
    fn test_truncate_short_and_missing_description() {
        assert_eq!(truncate_description("Short", DESCRIPTION_PREVIEW_CHARS), "Short...");
        assert_eq!(truncate_description("", DESCRIPTION_PREVIEW_CHARS), "...");
    }

    #[test]
    fn test_mode_toggle_round_trips() {
        let mut state = CatalogState::new();
        assert_eq!(state.mode, SearchMode::Keyword);

        state.toggle_mode();
        assert_eq!(state.mode, SearchMode::Description);

        state.toggle_mode();
        assert_eq!(state.mode, SearchMode::Keyword);
    }
}

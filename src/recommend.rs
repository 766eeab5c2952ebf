//! Movie recommendations scored against a viewer's preferences.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// A movie as returned by the upstream discover endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// `YYYY-MM-DD`, sometimes empty.
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub original_language: String,
}

impl Movie {
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub favorite_genres: Vec<u32>,
    pub preferred_languages: Vec<String>,
    pub min_rating: f64,
    pub include_adult: bool,
    pub year_range: RangeInclusive<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    pub movie: Movie,
    pub score: i64,
    /// Comma-separated reasons, in scoring order.
    pub reason: String,
}

/// Query parameters for the discover request behind [`recommend`].
pub fn discover_params(prefs: &UserPreferences, page: u32) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", page.to_string()),
        ("sort_by", "popularity.desc".to_string()),
        ("include_adult", prefs.include_adult.to_string()),
        ("vote_average.gte", prefs.min_rating.to_string()),
        (
            "primary_release_date.gte",
            format!("{}-01-01", prefs.year_range.start()),
        ),
        (
            "primary_release_date.lte",
            format!("{}-12-31", prefs.year_range.end()),
        ),
    ];

    if !prefs.favorite_genres.is_empty() {
        let genres: Vec<String> = prefs.favorite_genres.iter().map(u32::to_string).collect();
        params.push(("with_genres", genres.join(",")));
    }
    if !prefs.preferred_languages.is_empty() {
        params.push(("with_original_language", prefs.preferred_languages.join("|")));
    }
    params
}

pub fn score_movie(prefs: &UserPreferences, movie: Movie) -> MovieRecommendation {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    let genre_matches = movie
        .genre_ids
        .iter()
        .filter(|id| prefs.favorite_genres.contains(id))
        .count();
    if genre_matches > 0 {
        score += genre_matches as f64 * 10.0;
        reasons.push(format!("Matches {genre_matches} of your favorite genres"));
    }

    if movie.vote_average >= prefs.min_rating {
        score += (movie.vote_average - prefs.min_rating) * 2.0;
        reasons.push(format!("High rating: {}/10", movie.vote_average));
    }

    score += (movie.popularity / 100.0).min(10.0);
    if movie.popularity > 50.0 {
        reasons.push("Popular movie".to_string());
    }

    if let Some(year) = movie.release_year().filter(|y| prefs.year_range.contains(y)) {
        score += 5.0;
        reasons.push(format!("Released in {year}"));
    }

    MovieRecommendation {
        movie,
        score: score.round() as i64,
        reason: reasons.join(", "),
    }
}

/// Score every movie and order best first. Equal scores keep their input order.
pub fn recommend(prefs: &UserPreferences, movies: Vec<Movie>) -> Vec<MovieRecommendation> {
    let mut scored: Vec<MovieRecommendation> =
        movies.into_iter().map(|movie| score_movie(prefs, movie)).collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prefs() -> UserPreferences {
        UserPreferences {
            favorite_genres: vec![28, 878],
            preferred_languages: vec!["en".into(), "ja".into()],
            min_rating: 7.0,
            include_adult: false,
            year_range: 1990..=2020,
        }
    }

    fn movie(id: u64, genres: &[u32], rating: f64, popularity: f64, date: &str) -> Movie {
        Movie {
            id,
            title: format!("movie-{id}"),
            overview: String::new(),
            release_date: date.to_string(),
            vote_average: rating,
            vote_count: 100,
            popularity,
            genre_ids: genres.to_vec(),
            adult: false,
            original_language: "en".into(),
        }
    }

    #[test]
    fn test_discover_params() {
        let params = discover_params(&prefs(), 2);

        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("sort_by", "popularity.desc".to_string()),
                ("include_adult", "false".to_string()),
                ("vote_average.gte", "7".to_string()),
                ("primary_release_date.gte", "1990-01-01".to_string()),
                ("primary_release_date.lte", "2020-12-31".to_string()),
                ("with_genres", "28,878".to_string()),
                ("with_original_language", "en|ja".to_string()),
            ]
        );
    }

    #[test]
    fn test_discover_params_skip_empty_lists() {
        let prefs = UserPreferences {
            favorite_genres: vec![],
            preferred_languages: vec![],
            ..prefs()
        };
        let keys: Vec<&str> = discover_params(&prefs, 1).into_iter().map(|(k, _)| k).collect();
        assert!(!keys.contains(&"with_genres"));
        assert!(!keys.contains(&"with_original_language"));
    }

    #[test]
    fn test_score_every_rule() {
        // 2 genres (20) + rating 8.5 (3) + popularity 250 (2.5) + year (5) = 30.5
        let scored = score_movie(&prefs(), movie(1, &[28, 878, 12], 8.5, 250.0, "1999-03-31"));

        assert_eq!(scored.score, 31);
        assert_eq!(
            scored.reason,
            "Matches 2 of your favorite genres, High rating: 8.5/10, Popular movie, Released in 1999"
        );
    }

    #[test]
    fn test_score_with_nothing_matching() {
        let scored = score_movie(&prefs(), movie(2, &[35], 6.0, 20.0, "1985-06-01"));

        assert_eq!(scored.score, 0);
        assert_eq!(scored.reason, "");
    }

    #[test]
    fn test_popularity_is_capped_and_bad_dates_ignored() {
        let scored = score_movie(&prefs(), movie(3, &[], 7.0, 5000.0, ""));

        assert_eq!(scored.score, 10);
        assert_eq!(scored.reason, "High rating: 7/10, Popular movie");
    }

    #[test]
    fn test_recommend_sorts_best_first_and_is_stable() {
        let movies = vec![
            movie(1, &[], 6.0, 10.0, ""),
            movie(2, &[28], 9.0, 100.0, "2010-01-01"),
            movie(3, &[], 6.0, 10.0, ""),
        ];

        let ids: Vec<u64> = recommend(&prefs(), movies).iter().map(|r| r.movie.id).collect();

        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_movie_decodes_with_missing_fields() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 603, "title": "The Matrix", "release_date": "1999-03-30", "genre_ids": [28, 878]}"#,
        )
        .unwrap();

        assert_eq!(movie.release_year(), Some(1999));
        assert_eq!(movie.popularity, 0.0);
    }
}

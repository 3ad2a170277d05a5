//! Travel ordering.
//!
//! The sort is stable: travels that compare equal keep their input order, so
//! the table of contents is reproducible for the same input.
//!
//! Text orders (`country`, `alphabetical`) use the Russian collation from
//! `icu_collator` at secondary strength: Cyrillic sorts before Latin, accents
//! only break ties, and case is ignored.

use crate::types::{SortOrder, Travel};
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use std::cmp::Ordering;

/// Return the travels ordered per `order`. The input is left untouched.
pub fn sort_travels(travels: &[Travel], order: SortOrder) -> Vec<Travel> {
    let mut sorted = travels.to_vec();
    match order {
        SortOrder::DateDesc => sorted.sort_by(|a, b| b.sort_year().cmp(&a.sort_year())),
        SortOrder::DateAsc => sorted.sort_by_key(Travel::sort_year),
        SortOrder::Country => {
            let collation = Collation::russian();
            sorted.sort_by(|a, b| {
                collation.compare(
                    a.country_name.as_deref().unwrap_or_default(),
                    b.country_name.as_deref().unwrap_or_default(),
                )
            })
        }
        SortOrder::Alphabetical => {
            let collation = Collation::russian();
            sorted.sort_by(|a, b| collation.compare(&a.name, &b.name))
        }
    }
    sorted
}

/// Compare two strings the way a Russian reader would order them.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    Collation::russian().compare(a, b)
}

/// Russian collator, or a case-folding fallback when its data can't load.
struct Collation(Option<Collator>);

impl Collation {
    fn russian() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        match Collator::try_new(&locale!("ru").into(), options) {
            Ok(collator) => Collation(Some(collator)),
            Err(e) => {
                tracing::warn!(error = %e, "russian collation unavailable, comparing case-folded text");
                Collation(None)
            }
        }
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        let (a, b) = (a.trim(), b.trim());
        match &self.0 {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::travel;

    fn names(travels: &[Travel]) -> Vec<&str> {
        travels.iter().map(|t| t.name.as_str()).collect()
    }

    fn with_year(name: &str, year: Option<i64>) -> Travel {
        Travel {
            year,
            ..travel(name)
        }
    }

    #[test]
    fn date_desc_puts_missing_year_last() {
        let input = vec![
            with_year("old", Some(2015)),
            with_year("none", None),
            with_year("new", Some(2023)),
        ];
        assert_eq!(names(&sort_travels(&input, SortOrder::DateDesc)), vec!["new", "old", "none"]);
    }

    #[test]
    fn date_asc_puts_missing_year_first() {
        let input = vec![
            with_year("new", Some(2023)),
            with_year("none", None),
            with_year("old", Some(2015)),
        ];
        assert_eq!(names(&sort_travels(&input, SortOrder::DateAsc)), vec!["none", "old", "new"]);
    }

    #[test]
    fn equal_years_keep_input_order() {
        let input = vec![
            with_year("b", Some(2020)),
            with_year("a", Some(2020)),
            with_year("c", Some(2020)),
        ];
        assert_eq!(names(&sort_travels(&input, SortOrder::DateDesc)), vec!["b", "a", "c"]);
        assert_eq!(names(&sort_travels(&input, SortOrder::DateAsc)), vec!["b", "a", "c"]);
    }

    #[test]
    fn alphabetical_is_case_insensitive_cyrillic() {
        let input = vec![travel("вильнюс"), travel("Амстердам"), travel("Берлин")];
        assert_eq!(
            names(&sort_travels(&input, SortOrder::Alphabetical)),
            vec!["Амстердам", "Берлин", "вильнюс"]
        );
    }

    #[test]
    fn yo_sorts_with_ye() {
        assert_eq!(locale_cmp("Ёж", "Жук"), Ordering::Less);
        assert_eq!(locale_cmp("Ёж", "Дом"), Ordering::Greater);
        assert_eq!(locale_cmp("елка", "Ёлка"), Ordering::Less);
        assert_eq!(locale_cmp("Берлин", "берлин"), Ordering::Equal);
    }

    #[test]
    fn cyrillic_before_latin_and_accents_fold() {
        let input = vec![travel("Zurich"), travel("Берлин"), travel("Évian"), travel("Ялта")];
        assert_eq!(
            names(&sort_travels(&input, SortOrder::Alphabetical)),
            vec!["Берлин", "Ялта", "Évian", "Zurich"]
        );

        let input = vec![travel("Zagreb"), travel("Ézy"), travel("Avignon")];
        assert_eq!(
            names(&sort_travels(&input, SortOrder::Alphabetical)),
            vec!["Avignon", "Ézy", "Zagreb"]
        );
    }

    #[test]
    fn country_sort_missing_country_first_and_stable() {
        let mut pl1 = travel("Краков");
        pl1.country_name = Some("Польша".to_string());
        let mut by = travel("Минск");
        by.country_name = Some("Беларусь".to_string());
        let mut pl2 = travel("Гданьск");
        pl2.country_name = Some("польша".to_string());
        let unknown = travel("Где-то");

        let sorted = sort_travels(&[pl1, by, pl2, unknown], SortOrder::Country);
        assert_eq!(names(&sorted), vec!["Где-то", "Минск", "Краков", "Гданьск"]);
    }

    #[test]
    fn input_not_mutated() {
        let input = vec![travel("b"), travel("a")];
        let _ = sort_travels(&input, SortOrder::Alphabetical);
        assert_eq!(names(&input), vec!["b", "a"]);
    }
}

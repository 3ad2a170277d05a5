//! Russian wording for counts and ranges shown in the book.

use crate::types::Travel;

/// Pick the Russian plural form for `n`: `[one, few, many]`.
///
/// ```text
/// 1, 21, 101      → one   (путешествие)
/// 2-4, 22-24      → few   (путешествия)
/// 0, 5-20, 11-14  → many  (путешествий)
/// ```
pub fn plural_ru(n: u64, forms: [&'static str; 3]) -> &'static str {
    let [one, few, many] = forms;
    match (n % 10, n % 100) {
        (1, h) if h != 11 => one,
        (2..=4, h) if !(12..=14).contains(&h) => few,
        _ => many,
    }
}

/// "3 путешествия"
pub fn travel_count(n: usize) -> String {
    let n = n as u64;
    format!("{n} {}", plural_ru(n, ["путешествие", "путешествия", "путешествий"]))
}

/// "5 фотографий"
pub fn photo_count(n: usize) -> String {
    let n = n as u64;
    format!("{n} {}", plural_ru(n, ["фотография", "фотографии", "фотографий"]))
}

/// "4 дня", or `None` for unknown or non-positive durations.
pub fn days(n: Option<i64>) -> Option<String> {
    let n = u64::try_from(n?).ok().filter(|n| *n > 0)?;
    Some(format!("{n} {}", plural_ru(n, ["день", "дня", "дней"])))
}

/// "2019 - 2023", a single year when all match, `None` without any year.
pub fn year_range(travels: &[Travel]) -> Option<String> {
    let years = travels.iter().filter_map(|t| t.year).filter(|y| *y > 0);
    let (min, max) = years.fold(None, |acc: Option<(i64, i64)>, y| match acc {
        None => Some((y, y)),
        Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
    })?;
    Some(if min == max {
        min.to_string()
    } else {
        format!("{min} - {max}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::travel;

    #[test]
    fn plural_forms() {
        let forms = ["путешествие", "путешествия", "путешествий"];
        assert_eq!(plural_ru(0, forms), "путешествий");
        assert_eq!(plural_ru(1, forms), "путешествие");
        assert_eq!(plural_ru(3, forms), "путешествия");
        assert_eq!(plural_ru(5, forms), "путешествий");
        assert_eq!(plural_ru(11, forms), "путешествий");
        assert_eq!(plural_ru(12, forms), "путешествий");
        assert_eq!(plural_ru(21, forms), "путешествие");
        assert_eq!(plural_ru(24, forms), "путешествия");
        assert_eq!(plural_ru(111, forms), "путешествий");
    }

    #[test]
    fn count_labels() {
        assert_eq!(travel_count(0), "0 путешествий");
        assert_eq!(travel_count(22), "22 путешествия");
        assert_eq!(photo_count(1), "1 фотография");
    }

    #[test]
    fn days_label() {
        assert_eq!(days(Some(1)).as_deref(), Some("1 день"));
        assert_eq!(days(Some(3)).as_deref(), Some("3 дня"));
        assert_eq!(days(Some(14)).as_deref(), Some("14 дней"));
        assert_eq!(days(Some(0)), None);
        assert_eq!(days(Some(-2)), None);
        assert_eq!(days(None), None);
    }

    #[test]
    fn year_range_variants() {
        let with_year = |y| Travel {
            year: Some(y),
            ..travel("t")
        };
        assert_eq!(year_range(&[]), None);
        assert_eq!(year_range(&[travel("no year")]), None);
        assert_eq!(year_range(&[with_year(2020), with_year(2020)]).as_deref(), Some("2020"));
        assert_eq!(
            year_range(&[with_year(2023), travel("x"), with_year(2017)]).as_deref(),
            Some("2017 - 2023")
        );
    }
}

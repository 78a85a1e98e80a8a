//! Parameterized statement composition.
//!
//! Optional `IN` predicates are appended to a base statement as positional
//! `?` placeholders. Values are only ever bound, never spliced into the text.

use super::cache::CacheKey;

/// Placeholder token for a bound parameter.
pub const PLACEHOLDER: &str = "?";

/// An optional `<column> IN (...)` predicate.
///
/// The column expression comes from code, never from user input; the values
/// are user input and are always bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InPredicate {
    /// Column expression, e.g. `v.nome`.
    pub column: String,
    /// Values to match, in binding order.
    pub values: Vec<String>,
}

impl InPredicate {
    /// Create a predicate over the given values.
    pub fn new<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// An empty predicate places no restriction and is skipped.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// SQL text plus its bound parameters, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedQuery {
    pub sql: String,
    pub params: Vec<String>,
}

impl ComposedQuery {
    /// A statement with no parameters.
    pub fn plain(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Cache key covering the text and every parameter.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(&self.sql, &self.params)
    }
}

/// Compose `base_query` with its own parameters and zero or more optional
/// `IN` predicates.
///
/// `base_query` carries the mandatory predicates (the date range) and its
/// parameters come first. Each non-empty predicate then appends
/// `AND <column> IN (?, ...)` and its values, in the order given.
pub fn compose(base_query: &str, base_params: &[String], predicates: &[InPredicate]) -> ComposedQuery {
    debug_assert_eq!(count_placeholders(base_query), base_params.len());

    let mut sql = base_query.trim_end().to_string();
    let mut params = base_params.to_vec();

    for predicate in predicates.iter().filter(|p| !p.is_empty()) {
        let placeholders = vec![PLACEHOLDER; predicate.values.len()].join(", ");
        sql.push_str(&format!("\n  AND {} IN ({})", predicate.column, placeholders));
        params.extend(predicate.values.iter().cloned());
    }

    ComposedQuery { sql, params }
}

/// Count `?` placeholders outside of quoted literals and identifiers.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;

    for c in sql.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '?' => count += 1,
                _ => {}
            },
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT * FROM AplicacaoDose ad WHERE ad.data_vacina BETWEEN ? AND ?";

    fn dates() -> Vec<String> {
        vec!["2024-01-01".to_string(), "2024-01-31".to_string()]
    }

    #[test]
    fn test_compose_without_predicates() {
        let q = compose(BASE, &dates(), &[]);
        assert_eq!(q.sql, BASE);
        assert_eq!(q.params, dates());
    }

    #[test]
    fn test_compose_skips_empty_predicates() {
        let predicates = vec![
            InPredicate::new("e.municipio", Vec::<String>::new()),
            InPredicate::new("ad.dose_vacina", ["1ª Dose"]),
            InPredicate::new("v.nome", Vec::<String>::new()),
        ];
        let q = compose(BASE, &dates(), &predicates);

        assert_eq!(q.sql.matches(" IN (").count(), 1);
        assert!(q.sql.ends_with("AND ad.dose_vacina IN (?)"));
        assert_eq!(q.params, vec!["2024-01-01", "2024-01-31", "1ª Dose"]);
    }

    #[test]
    fn test_compose_counts_for_every_dimension_combination() {
        let columns = ["e.municipio", "ad.dose_vacina", "v.nome"];
        let values: [&[&str]; 3] = [
            &["Recife", "Olinda"],
            &["1ª Dose"],
            &["BCG", "Penta", "Covid-19"],
        ];

        for mask in 0u8..8 {
            let predicates: Vec<InPredicate> = (0..3)
                .map(|i| {
                    let selected: &[&str] = if mask & (1 << i) != 0 { values[i] } else { &[] };
                    InPredicate::new(columns[i], selected.iter().copied())
                })
                .collect();
            let non_empty = predicates.iter().filter(|p| !p.is_empty()).count();
            let bound: usize = predicates.iter().map(|p| p.values.len()).sum();

            let q = compose(BASE, &dates(), &predicates);
            assert_eq!(q.sql.matches(" IN (").count(), non_empty, "mask {}", mask);
            assert_eq!(q.params.len(), bound + 2, "mask {}", mask);
            assert_eq!(count_placeholders(&q.sql), q.params.len(), "mask {}", mask);
            assert_eq!(&q.params[..2], dates().as_slice());
        }
    }

    #[test]
    fn test_compose_parameter_order_follows_predicates() {
        let predicates = vec![
            InPredicate::new("e.municipio", ["NITERÓI", "RIO DE JANEIRO"]),
            InPredicate::new("v.nome", ["BCG"]),
        ];
        let q = compose(BASE, &dates(), &predicates);

        assert_eq!(
            q.params,
            vec!["2024-01-01", "2024-01-31", "NITERÓI", "RIO DE JANEIRO", "BCG"]
        );
        let municipio = q.sql.find("e.municipio IN (?, ?)").unwrap();
        let vacina = q.sql.find("v.nome IN (?)").unwrap();
        assert!(municipio < vacina);
        assert_eq!(count_placeholders(&q.sql), q.params.len());
    }

    #[test]
    fn test_compose_never_interpolates_values() {
        let hostile = "x') OR 1=1 --";
        let q = compose(BASE, &dates(), &[InPredicate::new("v.nome", [hostile])]);

        assert!(!q.sql.contains(hostile));
        assert_eq!(q.params.last().map(String::as_str), Some(hostile));
    }

    #[test]
    fn test_count_placeholders_ignores_literals() {
        assert_eq!(count_placeholders("SELECT '?' FROM t WHERE a = ? AND b = \"?\""), 1);
        assert_eq!(count_placeholders("SELECT 1"), 0);
    }

    #[test]
    fn test_cache_key_distinguishes_params() {
        let a = compose(BASE, &dates(), &[InPredicate::new("v.nome", ["BCG"])]);
        let b = compose(BASE, &dates(), &[InPredicate::new("v.nome", ["Penta"])]);
        assert_ne!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), a.clone().cache_key());
    }
}

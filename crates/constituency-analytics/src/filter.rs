use constituency_model::ConstituencyRecord;

/// Equality predicates selecting a cohort from the source records.
///
/// An unset predicate matches every record. Matching preserves the source
/// order, and no match yields an empty cohort rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub country: Option<String>,
    pub region: Option<String>,
}

impl RecordFilter {
    #[must_use]
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: Some(country.into()),
            region: None,
        }
    }

    #[must_use]
    pub fn matches(&self, record: &ConstituencyRecord) -> bool {
        self.country.as_ref().is_none_or(|c| *c == record.country)
            && self
                .region
                .as_ref()
                .is_none_or(|r| record.region.as_ref() == Some(r))
    }

    #[must_use]
    pub fn apply<'a>(&self, records: &'a [ConstituencyRecord]) -> Vec<&'a ConstituencyRecord> {
        let cohort = records
            .iter()
            .filter(|record| self.matches(record))
            .collect::<Vec<_>>();
        log::debug!(
            "record filter {self:?} kept {} of {} records",
            cohort.len(),
            records.len()
        );
        cohort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ConstituencyRecord> {
        vec![
            ConstituencyRecord::new("A", "England", "London"),
            ConstituencyRecord::new("B", "Wales", "Wales"),
            ConstituencyRecord::new("C", "England", "North West"),
            ConstituencyRecord::new("D", "England", "London"),
        ]
    }

    #[test]
    fn test_no_predicate_keeps_everything_in_order() {
        let records = records();
        let names: Vec<_> = RecordFilter::default()
            .apply(&records)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_country_predicate_preserves_order() {
        let records = records();
        let names: Vec<_> = RecordFilter::country("England")
            .apply(&records)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["A", "C", "D"]);
    }

    #[test]
    fn test_country_and_region() {
        let records = records();
        let filter = RecordFilter {
            country: Some("England".into()),
            region: Some("London".into()),
        };
        assert_eq!(filter.apply(&records).len(), 2);
    }

    #[test]
    fn test_absent_country_is_empty_not_error() {
        let records = records();
        assert!(RecordFilter::country("Northern Ireland").apply(&records).is_empty());
    }
}

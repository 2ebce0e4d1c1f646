//! Artifact-driven completion for the review stage.
//!
//! Six tracked items: metadata plus the five artifact kinds. Metadata is
//! always present (a rule cannot exist without it); the rest follow the
//! artifact store's presence predicates.

/// Per-item completion flags and the derived ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub metadata: bool,
    pub ontology: bool,
    pub interface: bool,
    pub configuration: bool,
    pub tests: bool,
    pub logic: bool,
}

impl Completion {
    /// Build from the five artifact presence flags; metadata is always set.
    pub fn from_artifacts(
        ontology: bool,
        interface: bool,
        configuration: bool,
        tests: bool,
        logic: bool,
    ) -> Self {
        Self {
            metadata: true,
            ontology,
            interface,
            configuration,
            tests,
            logic,
        }
    }

    pub fn present_count(&self) -> usize {
        [
            self.metadata,
            self.ontology,
            self.interface,
            self.configuration,
            self.tests,
            self.logic,
        ]
        .iter()
        .filter(|&&b| b)
        .count()
    }

    /// Percentage of the six tracked items present, rounded to the
    /// nearest integer. Always in `[0, 100]`.
    pub fn ratio(&self) -> u8 {
        ((self.present_count() as f64 / 6.0) * 100.0).round() as u8
    }

    /// `(name, present)` pairs in display order.
    pub fn items(&self) -> [(&'static str, bool); 6] {
        [
            ("metadata", self.metadata),
            ("ontology", self.ontology),
            ("interface", self.interface),
            ("configuration", self.configuration),
            ("tests", self.tests),
            ("logic", self.logic),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_alone_is_17_percent() {
        let c = Completion::from_artifacts(false, false, false, false, false);
        assert!(c.metadata);
        assert_eq!(c.present_count(), 1);
        assert_eq!(c.ratio(), 17);
    }

    #[test]
    fn all_present_is_100_percent() {
        let c = Completion::from_artifacts(true, true, true, true, true);
        assert_eq!(c.ratio(), 100);
    }

    #[test]
    fn ratio_steps() {
        // 1..=6 present out of 6, rounded.
        let expected = [17u8, 33, 50, 67, 83, 100];
        for present in 1..=5usize {
            let mut flags = [false; 5];
            for f in flags.iter_mut().take(present) {
                *f = true;
            }
            let c = Completion::from_artifacts(flags[0], flags[1], flags[2], flags[3], flags[4]);
            assert_eq!(c.ratio(), expected[present]);
        }
        let none = Completion::from_artifacts(false, false, false, false, false);
        assert_eq!(none.ratio(), expected[0]);
    }

    #[test]
    fn adding_an_artifact_never_decreases_ratio() {
        let mut flags = [false; 5];
        let mut last = Completion::from_artifacts(false, false, false, false, false).ratio();
        for i in 0..5 {
            flags[i] = true;
            let ratio =
                Completion::from_artifacts(flags[0], flags[1], flags[2], flags[3], flags[4])
                    .ratio();
            assert!(ratio >= last, "ratio decreased: {last} -> {ratio}");
            last = ratio;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn items_order_matches_workflow() {
        let c = Completion::from_artifacts(true, false, true, false, true);
        let names: Vec<&str> = c.items().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "metadata",
                "ontology",
                "interface",
                "configuration",
                "tests",
                "logic"
            ]
        );
    }
}

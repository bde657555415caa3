//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare;
    use crate::comparison::tests::measurement;
    use crate::report::tests::meta;

    #[test]
    fn test_json_roundtrips_report() {
        let report = Report::build(
            meta(),
            "A",
            "B",
            vec![compare(
                "Short text",
                29,
                measurement("a", 2e-6, 0.4, 9),
                measurement("b", 1e-6, 0.2, 9),
            )],
        );

        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"encode_speedup\": 2.0"));

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.summary.average_speedup, Some(2.0));
    }
}

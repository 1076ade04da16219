//! Unit tests for the report generator

#[cfg(test)]
mod tests {
    use crate::fixtures::stats_json;
    use playtime::models::ReportLine;
    use playtime::services::document::parse;
    use playtime::services::report::{
        SortBy, extract_playtime, generate_report, sort_and_limit,
    };
    use playtime::{AggregatedStats, Error, IdentityMapping, Report};
    use serde_json::json;
    use std::str::FromStr;

    fn stats_from(entries: &[(&str, serde_json::Value)]) -> AggregatedStats {
        let mut stats = AggregatedStats::new();
        for (key, doc) in entries {
            stats.insert(key, doc.clone());
        }
        stats
    }

    fn line(uuid: &str, name: &str, ticks: u64) -> ReportLine {
        ReportLine {
            uuid: uuid.to_string(),
            name: name.to_string(),
            total_playtime_ticks: ticks,
        }
    }

    #[test]
    fn test_single_player_report() {
        let doc = parse(r#"{"stats":{"minecraft:custom":{"minecraft:total_world_time": 54000}}}"#)
            .unwrap();
        let stats = stats_from(&[("abc123", doc)]);
        let identities: IdentityMapping = [("abc123", "Steve")].into_iter().collect();

        let report = generate_report(&identities, &stats);

        assert_eq!(report.lines, vec![line("abc123", "Steve", 54_000)]);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_unresolved_player_is_reported() {
        let stats = stats_from(&[("xyz999", parse(&stats_json(5)).unwrap())]);
        let identities = IdentityMapping::default();

        let report = generate_report(&identities, &stats);

        assert!(report.lines.is_empty());
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].uuid, "xyz999");
        assert!(matches!(
            &report.issues[0].error,
            Error::UnresolvedPlayer { uuid } if uuid == "xyz999"
        ));
    }

    #[test]
    fn test_shape_errors_do_not_hide_other_players() {
        let stats = stats_from(&[
            ("a", json!({"stats": {}})),
            ("b", parse(&stats_json(300)).unwrap()),
            ("c", json!({"stats": {"minecraft:custom": {"minecraft:total_world_time": "300"}}})),
            ("d", json!({"stats": {"minecraft:custom": {"minecraft:total_world_time": -1}}})),
            ("e", json!([])),
        ]);
        let identities: IdentityMapping =
            [("a", "A"), ("b", "B"), ("c", "C"), ("d", "D"), ("e", "E")]
                .into_iter()
                .collect();

        let report = generate_report(&identities, &stats);

        assert_eq!(report.lines, vec![line("b", "B", 300)]);
        let failed: Vec<&str> = report.issues.iter().map(|i| i.uuid.as_str()).collect();
        assert_eq!(failed, vec!["a", "c", "d", "e"]);
        assert!(report
            .issues
            .iter()
            .all(|i| matches!(i.error, Error::StatsShape { .. })));
    }

    #[test]
    fn test_fractional_playtime_is_not_a_tick_count() {
        let doc = json!({"stats": {"minecraft:custom": {"minecraft:total_world_time": 54000.0}}});

        let err = extract_playtime("abc123", &doc).unwrap_err();
        assert!(matches!(err, Error::StatsShape { ref uuid, .. } if uuid == "abc123"));
        assert!(err.to_string().contains("not an integer tick count"));
    }

    #[test]
    fn test_every_line_comes_from_stats_and_joins_once() {
        let stats = stats_from(&[
            ("p1", parse(&stats_json(1)).unwrap()),
            ("p2", parse(&stats_json(2)).unwrap()),
            ("p3", parse(&stats_json(3)).unwrap()),
        ]);
        let identities: IdentityMapping = [("p1", "One"), ("p3", "Three"), ("p9", "Nine")]
            .into_iter()
            .collect();

        let report = generate_report(&identities, &stats);

        for l in &report.lines {
            assert!(stats.get(&l.uuid).is_some());
        }
        for key in stats.keys().filter(|k| identities.contains(k)) {
            assert_eq!(report.lines.iter().filter(|l| l.uuid == key).count(), 1);
        }
        assert_eq!(report.lines.len(), 2);
    }

    #[test]
    fn test_round_trip_preserves_playtime() {
        for ticks in [0u64, 1, 54_000, u64::from(u32::MAX) + 7, u64::MAX] {
            let doc = parse(&stats_json(ticks)).unwrap();
            let reparsed = parse(&serde_json::to_string(&doc).unwrap()).unwrap();
            assert_eq!(extract_playtime("p", &reparsed).unwrap(), ticks);
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_report() {
        let report = generate_report(&IdentityMapping::default(), &AggregatedStats::new());
        assert!(report.lines.is_empty());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_sort_and_limit() {
        let lines = vec![
            line("c", "bob", 10),
            line("a", "Alice", 300),
            line("b", "carol", 20),
        ];

        let by_time = sort_and_limit(lines.clone(), Some(SortBy::Playtime), None);
        assert_eq!(by_time.iter().map(|l| l.uuid.as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let by_name = sort_and_limit(lines.clone(), Some(SortBy::Name), Some(2));
        assert_eq!(by_name.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(), vec!["Alice", "bob"]);

        let unsorted = sort_and_limit(lines, None, Some(1));
        assert_eq!(unsorted[0].uuid, "c");
    }

    #[test]
    fn test_sort_by_from_str() {
        assert_eq!(SortBy::from_str("playtime"), Ok(SortBy::Playtime));
        assert_eq!(SortBy::from_str("UUID"), Ok(SortBy::Uuid));
        assert!(SortBy::from_str("size").is_err());
    }

    #[test]
    fn test_into_strict_surfaces_first_issue() {
        let stats = stats_from(&[("xyz999", parse(&stats_json(5)).unwrap())]);
        let joined = generate_report(&IdentityMapping::default(), &stats);
        let report = Report {
            server_id: "srv".to_string(),
            lines: joined.lines,
            issues: joined.issues,
            started_at: std::time::SystemTime::UNIX_EPOCH,
            finished_at: std::time::SystemTime::UNIX_EPOCH,
        };

        let err = report.into_strict().unwrap_err();
        assert!(err.to_string().contains("xyz999"));
    }
}

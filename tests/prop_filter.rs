use chrono::NaiveDate;
use proptest::prelude::*;
use tasklite::filter::{FilterCriteria, Predicate, SortDirection, compile};

fn date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn prop_only_desc_sorts_descending(dir in "[A-Za-z]{0,6}") {
        let q = compile(&FilterCriteria::new().sort_by("priority").sort_direction(dir.clone()));
        let want = if dir.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc };
        prop_assert_eq!(q.sort.unwrap().direction, want);
    }

    #[test]
    fn prop_blank_search_adds_nothing(ws in "[ \t\n]{0,8}") {
        let q = compile(&FilterCriteria::new().search(ws));
        prop_assert!(q.predicates.is_empty());
    }

    #[test]
    fn prop_both_dates_give_one_between(from in date(), to in date()) {
        let q = compile(&FilterCriteria::new().due_from(from).due_to(to));
        prop_assert_eq!(q.predicates.len(), 1);
        let is_between = matches!(q.predicates[0], Predicate::RangeBetween { .. });
        prop_assert!(is_between);
    }

    #[test]
    fn prop_predicate_count_matches_present_criteria(
        status in any::<bool>(),
        prio in proptest::option::of(1i32..=5),
        from in proptest::option::of(date()),
        to in proptest::option::of(date()),
        search in proptest::option::of("[a-z ]{0,6}"),
    ) {
        let mut c = FilterCriteria::new();
        if status { c = c.status(tasklite::TaskStatus::Done); }
        if let Some(p) = prio { c = c.priority(p); }
        if let Some(d) = from { c = c.due_from(d); }
        if let Some(d) = to { c = c.due_to(d); }
        if let Some(s) = search.clone() { c = c.search(s); }
        let expected = usize::from(status)
            + usize::from(prio.is_some())
            + usize::from(from.is_some() || to.is_some())
            + usize::from(search.is_some_and(|s| !s.trim().is_empty()));
        let q = compile(&c);
        prop_assert_eq!(q.predicates.len(), expected);
        prop_assert!(q.sort.is_none());
    }
}

use acronym_core::db::open_db_in_memory;
use acronym_core::{normalize_term, AcronymRepository, SqliteAcronymRepository};
use proptest::prelude::*;

proptest! {
    #[test]
    fn lookup_ignores_case_and_surrounding_whitespace(
        term in "[A-Za-z]{1,6}",
        left in "[ \t]{0,3}",
        right in "[ \t]{0,3}",
    ) {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteAcronymRepository::new(&conn);
        repo.insert(&term, "expansion").unwrap();

        let variant = format!("{left}{}{right}", term.to_lowercase());
        prop_assert_eq!(
            repo.lookup(&variant).unwrap(),
            repo.lookup(&normalize_term(&term)).unwrap()
        );
        prop_assert_eq!(repo.lookup(&variant).unwrap().len(), 1);
    }

    #[test]
    fn blank_expansion_never_writes(term in "[A-Za-z]{0,6}", blank in "[ \t\n]{0,4}") {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteAcronymRepository::new(&conn);

        prop_assert_eq!(repo.insert(&term, &blank).unwrap(), None);
        prop_assert_eq!(repo.count().unwrap(), 0);
    }
}

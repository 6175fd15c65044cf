use acronym_core::db::open_db_in_memory;
use acronym_core::{
    format_lookup, AcronymRepository, RepoError, SharedAcronymStore, SqliteAcronymRepository,
};
use std::sync::Arc;
use std::thread;

#[test]
fn insert_normalizes_term_and_expansion() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);

    let id = repo.insert("ato", " Authority to Operate ").unwrap().unwrap();

    assert_eq!(repo.lookup("ATO").unwrap(), vec!["Authority to Operate"]);
    let record = repo.get(id).unwrap().unwrap();
    assert_eq!(record.term, "ATO");
    assert_eq!(record.expansion, "Authority to Operate");
    assert!(record.created_at > 0);
}

#[test]
fn blank_input_never_adds_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);

    assert_eq!(repo.insert("   ", "Authority to Operate").unwrap(), None);
    assert_eq!(repo.insert("ATO", "\t\n").unwrap(), None);
    assert_eq!(repo.insert("", "").unwrap(), None);

    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn lookup_on_unknown_term_is_empty_and_formats_hint() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);

    let expansions = repo.lookup("zzz").unwrap();
    assert!(expansions.is_empty());
    assert_eq!(
        format_lookup("zzz", &expansions),
        "Nothing for *ZZZ* yet. Try `/wtf add` to submit one."
    );
}

#[test]
fn same_term_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);

    let first = repo.insert("X", "A").unwrap().unwrap();
    let second = repo.insert("x", "B").unwrap().unwrap();

    assert_eq!(
        repo.lookup_with_ids("X").unwrap(),
        vec![(first, "A".to_string()), (second, "B".to_string())]
    );

    assert!(repo.delete(first).unwrap());
    assert_eq!(repo.lookup("X").unwrap(), vec!["B"]);
}

#[test]
fn lookup_is_exact_match_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);
    repo.insert("ATO", "Authority to Operate").unwrap();

    assert!(repo.lookup("AT").unwrap().is_empty());
    assert!(repo.lookup("ATOS").unwrap().is_empty());
    assert_eq!(repo.lookup("  ato ").unwrap().len(), 1);
}

#[test]
fn update_expansion_replaces_text_and_ignores_blank() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);
    let id = repo.insert("ATO", "Authority to Operate").unwrap().unwrap();

    assert!(!repo.update_expansion(id, "   ").unwrap());
    assert_eq!(
        repo.fetch_expansion(id).unwrap().as_deref(),
        Some("Authority to Operate")
    );

    assert!(repo.update_expansion(id, " Air Tasking Order ").unwrap());
    assert_eq!(
        repo.fetch_expansion(id).unwrap().as_deref(),
        Some("Air Tasking Order")
    );
    assert_eq!(repo.get(id).unwrap().unwrap().term, "ATO");
}

#[test]
fn update_and_delete_of_missing_id_are_no_ops() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);

    assert!(!repo.update_expansion(404, "anything").unwrap());
    assert!(!repo.delete(404).unwrap());
    assert_eq!(repo.fetch_expansion(404).unwrap(), None);
    assert_eq!(repo.get(404).unwrap(), None);
}

#[test]
fn delete_twice_is_safe() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);
    let id = repo.insert("ATO", "Authority to Operate").unwrap().unwrap();

    assert!(repo.delete(id).unwrap());
    assert!(!repo.delete(id).unwrap());
    assert!(repo
        .lookup_with_ids("ATO")
        .unwrap()
        .iter()
        .all(|(row_id, _)| *row_id != id));
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAcronymRepository::new(&conn);

    let first = repo.insert("ATO", "one").unwrap().unwrap();
    repo.delete(first).unwrap();
    let second = repo.insert("ATO", "two").unwrap().unwrap();

    assert!(second > first);
}

#[test]
fn corrupted_rows_are_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO acronyms (term, expansion) VALUES ('ato', 'lowercase term');",
        [],
    )
    .unwrap();
    let id = conn.last_insert_rowid();

    let err = SqliteAcronymRepository::new(&conn).get(id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn shared_store_serializes_concurrent_writers() {
    let store = Arc::new(SharedAcronymStore::new(open_db_in_memory().unwrap()));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for index in 0..10 {
                    store
                        .insert("ato", &format!("meaning {worker}-{index}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.count().unwrap(), 80);
    let rows = store.lookup_with_ids("ATO").unwrap();
    assert!(rows.windows(2).all(|pair| pair[0].0 < pair[1].0));

    let store = Arc::try_unwrap(store).ok().unwrap();
    store.close().unwrap();
}

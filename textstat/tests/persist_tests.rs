use tempfile::tempdir;
use textstat::persist::JsonDirStore;
use textstat::{StatisticsRecord, StatisticsStore, Subject, TermStat};

#[test]
fn records_round_trip_through_json_files() {
    let dir = tempdir().unwrap();
    let mut store = JsonDirStore::new(dir.path());
    let subject = Subject::Document("docs/report.txt".into());
    let record = StatisticsRecord::new(subject.clone(), vec![TermStat::new("cat", 0.5, 1.5f64.ln())]);

    store.put(record.clone()).unwrap();
    assert!(dir.path().join("documents/docs%2Freport.txt.json").exists());
    assert_eq!(store.get(&subject).unwrap(), Some(record));
}

#[test]
fn put_overwrites_and_clear_removes() {
    let dir = tempdir().unwrap();
    let mut store = JsonDirStore::new(dir.path());
    let subject = Subject::Collection("c1".into());

    store.put(StatisticsRecord::new(subject.clone(), vec![TermStat::new("old", 1.0, 0.0)])).unwrap();
    store.put(StatisticsRecord::new(subject.clone(), vec![TermStat::new("new", 1.0, 0.0)])).unwrap();
    let got = store.get(&subject).unwrap().unwrap();
    assert_eq!(got.data.len(), 1);
    assert_eq!(got.data[0].word, "new");

    store.clear(&subject).unwrap();
    assert!(store.get(&subject).unwrap().is_none());
    // clearing twice is fine
    store.clear(&subject).unwrap();
}

#[test]
fn missing_record_is_none() {
    let dir = tempdir().unwrap();
    let store = JsonDirStore::new(dir.path());
    assert!(store.get(&Subject::Document("ghost".into())).unwrap().is_none());
}

#[test]
fn path_like_and_underscore_ids_do_not_collide() {
    let dir = tempdir().unwrap();
    let mut store = JsonDirStore::new(dir.path());
    let nested = Subject::Document("pets/cat.txt".into());
    let flat = Subject::Document("pets_cat.txt".into());

    store.put(StatisticsRecord::new(nested.clone(), vec![TermStat::new("cat", 1.0, 0.0)])).unwrap();
    store.put(StatisticsRecord::new(flat.clone(), vec![TermStat::new("dog", 1.0, 0.0)])).unwrap();

    let got = store.get(&nested).unwrap().unwrap();
    assert_eq!(got.subject, nested);
    assert_eq!(got.data[0].word, "cat");
    let got = store.get(&flat).unwrap().unwrap();
    assert_eq!(got.subject, flat);
    assert_eq!(got.data[0].word, "dog");
}

#[test]
fn file_holding_another_subject_is_an_error() {
    let dir = tempdir().unwrap();
    let mut store = JsonDirStore::new(dir.path());
    let real = Subject::Document("a".into());
    store.put(StatisticsRecord::new(real, vec![])).unwrap();
    std::fs::copy(dir.path().join("documents/a.json"), dir.path().join("documents/b.json")).unwrap();
    assert!(store.get(&Subject::Document("b".into())).is_err());
}

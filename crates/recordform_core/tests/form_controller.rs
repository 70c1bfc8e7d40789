use recordform_core::{
    FormController, FormError, FormField, FormMode, Record, RecordDraft, RecordId, RecordStore,
    SqliteRecordStore, StoreError, StoreErrorKind, StoreResult,
};
use std::cell::Cell;

/// Sqlite store with switchable failures for error-slot checks.
struct FlakyStore {
    inner: SqliteRecordStore,
    fail_writes: Cell<bool>,
    fail_reads: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteRecordStore::open_in_memory().unwrap(),
            fail_writes: Cell::new(false),
            fail_reads: Cell::new(false),
        }
    }

    fn write_guard(&self) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(StoreError::Write(rusqlite::Error::ExecuteReturnedResults));
        }
        Ok(())
    }

    fn read_guard(&self) -> StoreResult<()> {
        if self.fail_reads.get() {
            return Err(StoreError::Read(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn insert(&self, draft: &RecordDraft) -> StoreResult<RecordId> {
        self.write_guard()?;
        self.inner.insert(draft)
    }

    fn replace(&self, record: &Record) -> StoreResult<()> {
        self.write_guard()?;
        self.inner.replace(record)
    }

    fn get(&self, id: RecordId) -> StoreResult<Option<Record>> {
        self.read_guard()?;
        self.inner.get(id)
    }

    fn list_all(&self) -> StoreResult<Vec<Record>> {
        self.read_guard()?;
        self.inner.list_all()
    }

    fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.write_guard()?;
        self.inner.delete(id)
    }
}

fn mounted() -> FormController<SqliteRecordStore> {
    let mut controller = FormController::new(SqliteRecordStore::open_in_memory().unwrap());
    controller.mount().unwrap();
    controller
}

fn fill<S: RecordStore>(controller: &mut FormController<S>, name: &str, email: &str, age: &str) {
    controller.set_field(FormField::Name, name);
    controller.set_field(FormField::Email, email);
    controller.set_field(FormField::Age, age);
}

#[test]
fn create_edit_delete_scenario() {
    let mut controller = mounted();
    assert!(controller.records().is_empty());

    fill(&mut controller, "A", "a@x.com", "30");
    let id = controller.submit().unwrap();
    assert_eq!(controller.mode(), FormMode::Creating);
    assert_eq!(controller.records().len(), 1);
    assert_eq!(controller.records()[0].id, id);
    assert_eq!(controller.records()[0].age, 30);
    assert!(controller.pending().name.is_empty());

    controller.begin_edit(id).unwrap();
    assert_eq!(controller.mode(), FormMode::Editing(id));
    assert_eq!(controller.pending().email, "a@x.com");
    assert_eq!(controller.pending().age, "30");
    assert_eq!(controller.view().submit_label, "Update");

    controller.set_field(FormField::Age, "31");
    assert_eq!(controller.submit().unwrap(), id);
    assert_eq!(controller.mode(), FormMode::Creating);
    assert_eq!(controller.view().submit_label, "Submit");
    assert_eq!(controller.records().len(), 1);
    assert_eq!(controller.records()[0].id, id);
    assert_eq!(controller.records()[0].age, 31);
    assert_eq!(controller.records()[0].name, "A");

    controller.delete(id).unwrap();
    assert!(controller.records().is_empty());
    assert!(controller.store().list_all().unwrap().is_empty());
}

#[test]
fn delete_of_never_issued_id_keeps_empty_list() {
    let mut controller = mounted();

    controller.delete(RecordId(999)).unwrap();

    assert!(controller.records().is_empty());
    assert!(controller.last_error().is_none());
}

#[test]
fn mount_loads_previously_stored_records() {
    let store = SqliteRecordStore::open_in_memory().unwrap();
    store.insert(&RecordDraft::new("A", "a@x.com", 30)).unwrap();
    store.insert(&RecordDraft::new("B", "b@x.com", 40)).unwrap();

    let mut controller = FormController::new(store);
    assert!(controller.records().is_empty());
    controller.mount().unwrap();

    let names: Vec<&str> = controller
        .records()
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B"]);
}

#[test]
fn set_field_by_name_routes_to_matching_input() {
    let mut controller = mounted();

    controller.set_field_by_name("email", "e@x.com").unwrap();
    assert_eq!(controller.pending().email, "e@x.com");

    let err = controller.set_field_by_name("phone", "123").unwrap_err();
    assert!(matches!(err, FormError::UnknownField(_)));
    assert_eq!(controller.last_error(), Some("unknown form field `phone`"));
}

#[test]
fn invalid_input_is_reported_without_writing() {
    let mut controller = mounted();
    fill(&mut controller, "A", "a@x.com", "0");

    let err = controller.submit().unwrap_err();
    assert!(matches!(err, FormError::Invalid(_)));
    assert!(controller.last_error().is_some());
    assert_eq!(controller.pending().age, "0");
    assert!(controller.store().list_all().unwrap().is_empty());

    controller.set_field(FormField::Age, "5");
    controller.submit().unwrap();
    assert!(controller.last_error().is_none());
}

#[test]
fn edit_of_record_not_displayed_is_rejected() {
    let mut controller = mounted();

    let err = controller.begin_edit(RecordId(3)).unwrap_err();
    assert!(matches!(err, FormError::NotDisplayed(RecordId(3))));
    assert_eq!(controller.mode(), FormMode::Creating);
}

#[test]
fn write_failure_lands_in_error_slot_and_keeps_state() {
    let mut controller = FormController::new(FlakyStore::new());
    controller.mount().unwrap();
    fill(&mut controller, "A", "a@x.com", "30");
    let id = controller.submit().unwrap();
    controller.begin_edit(id).unwrap();
    controller.set_field(FormField::Name, "Changed");

    controller.store().fail_writes.set(true);
    let err = controller.submit().unwrap_err();
    match &err {
        FormError::Store(store_err) => assert_eq!(store_err.kind(), StoreErrorKind::Write),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(controller.mode(), FormMode::Editing(id));
    assert_eq!(controller.pending().name, "Changed");
    assert_eq!(controller.records()[0].name, "A");
    assert_eq!(controller.view().error.as_deref(), controller.last_error());
    assert!(controller.last_error().unwrap().contains("write failed"));

    let delete_err = controller.delete(id).unwrap_err();
    assert!(matches!(delete_err, FormError::Store(_)));
    assert_eq!(controller.records().len(), 1);

    controller.clear_error();
    assert!(controller.last_error().is_none());

    controller.store().fail_writes.set(false);
    controller.submit().unwrap();
    assert_eq!(controller.records()[0].name, "Changed");
}

#[test]
fn read_failure_after_write_keeps_previous_list() {
    let mut controller = FormController::new(FlakyStore::new());
    controller.mount().unwrap();

    controller.store().fail_reads.set(true);
    fill(&mut controller, "A", "a@x.com", "30");
    let err = controller.submit().unwrap_err();
    match &err {
        FormError::Store(store_err) => assert_eq!(store_err.kind(), StoreErrorKind::Read),
        other => panic!("unexpected error: {other}"),
    }
    assert!(controller.records().is_empty());
    assert_eq!(controller.pending().name, "A");

    controller.store().fail_reads.set(false);
    controller.refresh().unwrap();
    assert_eq!(controller.records().len(), 1);
    assert!(controller.last_error().is_none());
}

#[test]
fn mount_failure_is_observable() {
    let store = FlakyStore::new();
    store.fail_reads.set(true);
    let mut controller = FormController::new(store);

    assert!(controller.mount().is_err());
    assert!(controller.last_error().unwrap().contains("read failed"));
    assert!(controller.records().is_empty());
}

#[test]
fn editing_another_record_switches_target() {
    let mut controller = mounted();
    fill(&mut controller, "A", "a@x.com", "30");
    let first = controller.submit().unwrap();
    fill(&mut controller, "B", "b@x.com", "40");
    let second = controller.submit().unwrap();

    controller.begin_edit(first).unwrap();
    controller.begin_edit(second).unwrap();
    assert_eq!(controller.mode(), FormMode::Editing(second));
    assert_eq!(controller.pending().name, "B");

    controller.set_field(FormField::Name, "Bee");
    controller.submit().unwrap();
    let names: Vec<&str> = controller
        .records()
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "Bee"]);
}

#[test]
fn deleting_edit_target_returns_to_creating_without_resurrecting_it() {
    let mut controller = mounted();
    fill(&mut controller, "A", "a@x.com", "30");
    let id = controller.submit().unwrap();

    controller.begin_edit(id).unwrap();
    controller.delete(id).unwrap();
    assert_eq!(controller.mode(), FormMode::Creating);
    assert!(controller.pending().name.is_empty());
    assert!(controller.view().editing_id.is_none());

    fill(&mut controller, "B", "b@x.com", "40");
    let created = controller.submit().unwrap();
    assert_ne!(created, id);
    assert!(controller.store().get(id).unwrap().is_none());
    assert_eq!(controller.records().len(), 1);
    assert_eq!(controller.records()[0].id, created);
}

#[test]
fn deleting_other_record_keeps_edit_target() {
    let mut controller = mounted();
    fill(&mut controller, "A", "a@x.com", "30");
    let first = controller.submit().unwrap();
    fill(&mut controller, "B", "b@x.com", "40");
    let second = controller.submit().unwrap();

    controller.begin_edit(second).unwrap();
    controller.delete(first).unwrap();

    assert_eq!(controller.mode(), FormMode::Editing(second));
    assert_eq!(controller.pending().name, "B");
}

#[test]
fn submit_for_edit_target_removed_elsewhere_is_rejected() {
    let mut controller = mounted();
    fill(&mut controller, "A", "a@x.com", "30");
    let id = controller.submit().unwrap();

    controller.begin_edit(id).unwrap();
    controller.store().delete(id).unwrap();
    controller.refresh().unwrap();

    let err = controller.submit().unwrap_err();
    assert!(matches!(err, FormError::NotDisplayed(missing) if missing == id));
    assert_eq!(controller.mode(), FormMode::Editing(id));
    assert!(controller.store().get(id).unwrap().is_none());
}

#[test]
fn name_is_stored_as_typed_and_integral_float_age_is_accepted() {
    let mut controller = mounted();
    fill(&mut controller, "  Ada  ", "ada@example.com", "2.0");
    let id = controller.submit().unwrap();

    let stored = controller.store().get(id).unwrap().unwrap();
    assert_eq!(stored.name, "  Ada  ");
    assert_eq!(stored.age, 2);

    fill(&mut controller, "   ", "b@x.com", "1e1");
    let blank_name = controller.submit().unwrap();
    let stored = controller.store().get(blank_name).unwrap().unwrap();
    assert_eq!(stored.name, "   ");
    assert_eq!(stored.age, 10);
}

#[test]
fn view_rows_mirror_records() {
    let mut controller = mounted();
    fill(&mut controller, "A", "a@x.com", "30");
    let id = controller.submit().unwrap();

    let view = controller.view();
    assert_eq!(view.headers, ["Id", "Name", "Email", "Age", "Action"]);
    assert_eq!(view.rows.len(), 1);
    assert_eq!(view.rows[0].id, id);
    assert_eq!(view.rows[0].age, 30);
    assert_eq!(view.value(FormField::Name), Some(""));
    assert!(view.editing_id.is_none());
}

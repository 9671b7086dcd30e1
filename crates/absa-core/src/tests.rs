use std::sync::{Arc, Mutex};

use absa_domain::{
    category::{BudgetBand, CategoryKind, NewCategory},
    common::{ClassDuration, EntityId, PaymentStatus},
    piano_class::{NewPianoClass, PianoClassPatch},
    saving::{NewSaving, SavingKind},
    schedule::{NewScheduleEntry, ScheduleEntryPatch, Weekday},
    seed::initial_state,
    state::{AppState, BrandSettingsPatch},
    student::{NewStudent, Student, StudentPatch},
    transaction::{NewTransaction, TransactionKind, TransactionPatch},
};
use chrono::NaiveDate;
use proptest::prelude::*;

use crate::{
    migration::normalize_state,
    store::{storage_key, KeyValueStore, LoadSource, MemoryStore, Store},
    summary_service::{
        budget_breakdown, category_label, family_totals, month_summary, payment_method_label,
        BandStatus,
    },
    time::FixedClock,
    warnings::state_warnings,
    CategoryService, CoreError, HistoryManager, IdGenerator, PianoClassService,
    SavingService, ScheduleService, SettingsService, StudentService, TransactionService,
    YearService, HISTORY_LIMIT,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids() -> IdGenerator {
    IdGenerator::new(Arc::new(FixedClock::on(date(2026, 3, 1))))
}

fn state_with_ana() -> AppState {
    let mut state = initial_state();
    state.student_db_mut().push(Student::from_new(
        EntityId::new(1),
        NewStudent::new("Ana", 35000.0),
    ));
    state
}

fn memory_store() -> Store {
    Store::open(Box::new(MemoryStore::new()), storage_key(2026)).0
}

#[test]
fn importing_students_twice_creates_classes_once() {
    let mut ids = ids();
    let state = state_with_ana();

    let (state, created) = PianoClassService::import_students_to_month(&state, &mut ids, 0);
    assert_eq!(created, 1);
    let classes = &state.months[0].piano_classes;
    assert_eq!(classes.len(), 1);
    let class = &classes[0];
    assert_eq!(class.student_id, Some(EntityId::new(1)));
    assert_eq!(class.student_name, "Ana");
    assert_eq!(class.rate, 35000.0);
    assert_eq!(class.count, 4);
    assert_eq!(class.total, 140000.0);
    assert_eq!(class.status, PaymentStatus::Pending);

    let (again, created) = PianoClassService::import_students_to_month(&state, &mut ids, 0);
    assert_eq!(created, 0);
    assert_eq!(again.months[0].piano_classes.len(), 1);
}

#[test]
fn import_skips_inactive_students_and_name_matches() {
    let mut ids = ids();
    let mut state = state_with_ana();
    state.student_db_mut().push(Student {
        active: false,
        ..Student::from_new(EntityId::new(2), NewStudent::new("Beto", 30000.0))
    });
    state.student_db_mut().push(Student::from_new(
        EntityId::new(3),
        NewStudent::new("Carla", 28000.0),
    ));
    let (state, _) = PianoClassService::add(
        &state,
        &mut ids,
        1,
        NewPianoClass::new("Carla", 28000.0, 2),
    );

    let (state, created) = PianoClassService::import_students_to_month(&state, &mut ids, 1);
    assert_eq!(created, 1);
    let names: Vec<_> = state.months[1]
        .piano_classes
        .iter()
        .map(|class| class.student_name.as_str())
        .collect();
    assert_eq!(names, ["Carla", "Ana"]);
}

#[test]
fn specific_import_includes_inactive_students() {
    let mut ids = ids();
    let mut state = initial_state();
    state.student_db_mut().push(Student {
        active: false,
        ..Student::from_new(
            EntityId::new(2),
            NewStudent::new("Beto", 30000.0)
                .with_duration(ClassDuration::Minutes30)
                .with_family("Rojas"),
        )
    });

    let (state, created) =
        PianoClassService::import_specific_students(&state, &mut ids, 4, &[EntityId::new(2)]);
    assert_eq!(created, 1);
    let class = &state.months[4].piano_classes[0];
    assert_eq!(class.duration, ClassDuration::Minutes30);
    assert_eq!(class.family.as_deref(), Some("Rojas"));
}

#[test]
fn toggling_a_class_captures_and_clears_the_payment_date() {
    let mut ids = ids();
    let (state, created) = PianoClassService::import_students_to_month(&state_with_ana(), &mut ids, 2);
    assert_eq!(created, 1);
    let id = state.months[2].piano_classes[0].id;

    let paid = PianoClassService::toggle_status(&state, 2, id, Some(date(2026, 3, 15)), date(2026, 3, 20));
    let class = &paid.months[2].piano_classes[0];
    assert_eq!(class.status, PaymentStatus::Paid);
    assert_eq!(class.payment_date, Some(date(2026, 3, 15)));

    let json = serde_json::to_value(class).unwrap();
    assert_eq!(json["status"], "Al día");
    assert_eq!(json["paymentDate"], "2026-03-15");

    let reverted = PianoClassService::toggle_status(&paid, 2, id, None, date(2026, 3, 20));
    let class = &reverted.months[2].piano_classes[0];
    assert_eq!(class.status, PaymentStatus::Pending);
    assert_eq!(class.payment_date, None);
    assert!(serde_json::to_value(class).unwrap()["paymentDate"].is_null());
}

#[test]
fn toggling_without_a_date_uses_today() {
    let mut ids = ids();
    let (state, id) = TransactionService::add(
        &initial_state(),
        &mut ids,
        0,
        TransactionKind::Expense,
        NewTransaction::new("Arriendo", 450000.0, date(2026, 1, 2)),
    );
    let id = id.unwrap();
    let paid = TransactionService::toggle_status(&state, 0, TransactionKind::Expense, id, None, date(2026, 1, 9));
    assert_eq!(paid.months[0].expenses[0].payment_date, Some(date(2026, 1, 9)));
}

#[test]
fn class_edits_recompute_the_total() {
    let mut ids = ids();
    let (state, id) = PianoClassService::add(
        &initial_state(),
        &mut ids,
        0,
        NewPianoClass::new("Ana", 35000.0, 4),
    );
    let id = id.unwrap();
    assert_eq!(state.months[0].piano_classes[0].total, 140000.0);

    let patch = PianoClassPatch {
        count: Some(3),
        ..PianoClassPatch::default()
    };
    let state = PianoClassService::update(&state, 0, id, patch);
    assert_eq!(state.months[0].piano_classes[0].total, 105000.0);

    let patch = PianoClassPatch {
        rate: Some(40000.0),
        ..PianoClassPatch::default()
    };
    let state = PianoClassService::update(&state, 0, id, patch);
    assert_eq!(state.months[0].piano_classes[0].total, 120000.0);
}

#[test]
fn updates_with_unknown_ids_leave_state_unchanged() {
    let state = state_with_ana();
    let missing = EntityId::new(999);

    assert_eq!(StudentService::update(&state, missing, StudentPatch::active(false)), state);
    assert_eq!(StudentService::delete(&state, missing), state);
    assert_eq!(
        TransactionService::update(&state, 0, TransactionKind::Income, missing, TransactionPatch::default()),
        state
    );
    assert_eq!(PianoClassService::delete(&state, 0, missing), state);
    assert_eq!(PianoClassService::delete(&state, 40, missing), state);
}

#[test]
fn mutations_leave_the_input_untouched_and_share_other_months() {
    let mut ids = ids();
    let before = state_with_ana();
    let snapshot = before.clone();

    let (after, _) = SavingService::add(
        &before,
        &mut ids,
        5,
        NewSaving {
            description: "Fondo".into(),
            amount: 50000.0,
            date: date(2026, 6, 1),
            kind: SavingKind::Ahorro,
        },
    );

    assert_eq!(before, snapshot);
    assert!(before.months[5].savings.is_empty());
    assert_eq!(after.months[5].savings.len(), 1);
    assert!(after.shares_month_with(&before, 4));
    assert!(!after.shares_month_with(&before, 5));
    assert!(Arc::ptr_eq(&after.student_db, &before.student_db));
}

#[test]
fn copying_the_previous_month_skips_existing_pairs() {
    let mut ids = ids();
    let mut state = initial_state();
    for (description, amount) in [("Arriendo", 450000.0), ("Luz", 30000.0)] {
        let (next, _) = TransactionService::add(
            &state,
            &mut ids,
            0,
            TransactionKind::Expense,
            NewTransaction::new(description, amount, date(2026, 1, 5)),
        );
        state = next;
    }
    let rent = state.months[0].expenses[0].id;
    state = TransactionService::toggle_status(&state, 0, TransactionKind::Expense, rent, None, date(2026, 1, 6));
    let (state, _) = TransactionService::add(
        &state,
        &mut ids,
        1,
        TransactionKind::Expense,
        NewTransaction::new("Luz", 30000.0, date(2026, 2, 3)),
    );

    let (state, copied) = TransactionService::import_from_previous_month(
        &state,
        &mut ids,
        1,
        TransactionKind::Expense,
        date(2026, 2, 10),
    );
    assert_eq!(copied, 1);
    let copy = &state.months[1].expenses[1];
    assert_eq!(copy.description, "Arriendo");
    assert_ne!(copy.id, rent);
    assert_eq!(copy.status, PaymentStatus::Pending);
    assert_eq!(copy.payment_date, None);
    assert_eq!(copy.date, Some(date(2026, 2, 10)));

    let (_, copied) = TransactionService::import_from_previous_month(
        &state,
        &mut ids,
        0,
        TransactionKind::Expense,
        date(2026, 2, 10),
    );
    assert_eq!(copied, 0);
}

#[test]
fn new_year_resets_months_and_keeps_reference_data() {
    let mut ids = ids();
    let (state, _) = PianoClassService::import_students_to_month(&state_with_ana(), &mut ids, 0);
    let (state, _) = ScheduleService::add(
        &state,
        &mut ids,
        NewScheduleEntry {
            day: Weekday::Martes,
            time: "16:00".into(),
            student_id: Some(EntityId::new(1)),
            student_name: "Ana".into(),
            duration: ClassDuration::Minutes45,
        },
    );

    let next = YearService::start_new_year(&state);
    assert_eq!(next.months.len(), 12);
    assert!(next.months.iter().all(|month| month.is_empty()));
    assert_eq!(next.student_db, state.student_db);
    assert_eq!(next.categories, state.categories);
    assert_eq!(next.payment_methods, state.payment_methods);
    assert_eq!(next.brand_settings, state.brand_settings);
    assert_eq!(next.year, state.year);
    assert!(next.schedule.is_empty());
}

#[test]
fn deleting_a_referenced_category_leaves_a_dangling_id() {
    let mut ids = ids();
    let food = EntityId::new(3);
    let (state, _) = TransactionService::add(
        &initial_state(),
        &mut ids,
        0,
        TransactionKind::Expense,
        NewTransaction::new("Supermercado", 80000.0, date(2026, 1, 4)).with_category(food),
    );

    let state = CategoryService::delete(&state, food);
    let expense = &state.months[0].expenses[0];
    assert_eq!(expense.category_id, Some(food));
    assert_eq!(category_label(&state, expense.category_id), "Otros");
    assert_eq!(payment_method_label(&state, None), "Sin medio");
    assert_eq!(state_warnings(&state).len(), 1);
}

#[test]
fn categories_and_subcategories() {
    let mut ids = ids();
    let (state, id) = CategoryService::add(
        &initial_state(),
        &mut ids,
        NewCategory::new("Mascotas", CategoryKind::Expense),
    );
    assert_eq!(state.category(id).unwrap().budget_band, Some(BudgetBand::Lifestyle));

    let state = CategoryService::add_subcategory(&state, id, "Veterinario");
    let state = CategoryService::add_subcategory(&state, id, "Comida");
    let state = CategoryService::delete_subcategory(&state, id, "Veterinario");
    assert_eq!(state.category(id).unwrap().subcategories, ["Comida"]);
}

#[test]
fn students_are_added_active_and_can_be_deactivated() {
    let mut ids = ids();
    let (state, id) = StudentService::add(&initial_state(), &mut ids, NewStudent::new("Dani", 32000.0));
    assert!(state.student(id).unwrap().active);
    let state = StudentService::set_active(&state, id, false);
    assert_eq!(state.active_students().count(), 0);
}

#[test]
fn schedule_entries_move_between_slots() {
    let mut ids = ids();
    let entry = NewScheduleEntry {
        day: Weekday::Lunes,
        time: "15:00".into(),
        student_id: None,
        student_name: "Ana".into(),
        duration: ClassDuration::OneHour,
    };
    let (state, id) = ScheduleService::add(&initial_state(), &mut ids, entry);
    let state = ScheduleService::update(&state, id, ScheduleEntryPatch::move_to(Weekday::Jueves, "17:30"));
    assert_eq!(state.schedule[0].day, Weekday::Jueves);
    assert_eq!(state.schedule[0].time, "17:30");
    let state = ScheduleService::delete(&state, id);
    assert!(state.schedule.is_empty());
}

#[test]
fn brand_settings_merge_shallowly() {
    let patch = BrandSettingsPatch {
        name: Some("Estudio Absa".into()),
        icon: None,
    };
    let state = SettingsService::update_brand_settings(&initial_state(), patch);
    assert_eq!(state.brand_settings.name, "Estudio Absa");
    assert_eq!(state.brand_settings.icon, "Music");
}

#[test]
fn budget_breakdown_uses_the_band_field() {
    let mut ids = ids();
    let (state, _) = PianoClassService::add(
        &initial_state(),
        &mut ids,
        0,
        NewPianoClass::new("Ana", 50000.0, 2),
    );
    let mut state = state;
    for (category, amount) in [(1, 40000.0), (6, 35000.0), (77, 5000.0)] {
        let (next, _) = TransactionService::add(
            &state,
            &mut ids,
            0,
            TransactionKind::Expense,
            NewTransaction::new("Gasto", amount, date(2026, 1, 7)).with_category(EntityId::new(category)),
        );
        state = next;
    }

    let breakdown = budget_breakdown(&state, 0).unwrap();
    assert_eq!(breakdown.total_income, 100000.0);
    assert_eq!(breakdown.basics.real, 40000.0);
    assert_eq!(breakdown.basics.ideal, 50000.0);
    assert_eq!(breakdown.lifestyle.real, 40000.0);
    assert_eq!(breakdown.lifestyle.status(), BandStatus::OverLimit);
    assert_eq!(breakdown.savings.status(), BandStatus::OnTrack);
    assert_eq!(breakdown.categories[0].name, "Hogar");
    assert_eq!(breakdown.categories[2].name, "Otros");
    assert!(budget_breakdown(&state, 12).is_none());
}

#[test]
fn month_and_family_totals() {
    let mut ids = ids();
    let mut state = initial_state();
    for (name, family) in [("Ana", Some("Pérez")), ("Luis", Some("Pérez")), ("Sofía", None)] {
        let mut class = NewPianoClass::new(name, 30000.0, 4);
        class.family = family.map(String::from);
        let (next, _) = PianoClassService::add(&state, &mut ids, 3, class);
        state = next;
    }
    let summary = month_summary(&state.months[3]);
    assert_eq!(summary.piano_income, 360000.0);
    assert_eq!(summary.balance, 360000.0);

    let families = family_totals(&state.months[3]);
    assert_eq!(families.len(), 1);
    assert_eq!(families[0].classes, 2);
    assert_eq!(families[0].total, 240000.0);
}

#[test]
fn history_round_trips_through_undo_and_redo() {
    let mut store = memory_store();
    let mut history = HistoryManager::new();
    let mut ids = ids();
    let mut states = vec![store.snapshot()];

    for name in ["Ana", "Beto", "Carla"] {
        let (next, _) = StudentService::add(store.current(), &mut ids, NewStudent::new(name, 30000.0));
        history.commit(&mut store, next).unwrap();
        states.push(store.snapshot());
    }

    for expected in states.iter().rev().skip(1) {
        assert!(history.undo(&mut store).unwrap());
        assert_eq!(store.current(), expected);
    }
    assert!(!history.can_undo());
    assert!(!history.undo(&mut store).unwrap());

    for expected in states.iter().skip(1) {
        assert!(history.redo(&mut store).unwrap());
        assert_eq!(store.current(), expected);
    }
    assert!(!history.can_redo());
}

#[test]
fn a_new_commit_discards_the_redo_stack() {
    let mut store = memory_store();
    let mut history = HistoryManager::new();
    let mut ids = ids();

    let (next, _) = StudentService::add(store.current(), &mut ids, NewStudent::new("Ana", 1.0));
    history.commit(&mut store, next).unwrap();
    history.undo(&mut store).unwrap();
    assert_eq!(history.redo_depth(), 1);

    let (next, _) = StudentService::add(store.current(), &mut ids, NewStudent::new("Beto", 1.0));
    history.commit(&mut store, next).unwrap();
    assert!(!history.can_redo());
}

#[test]
fn history_keeps_only_the_most_recent_states() {
    let mut store = memory_store();
    let mut history = HistoryManager::new();
    let mut ids = ids();
    let mut states = vec![store.snapshot()];

    for index in 0..(HISTORY_LIMIT + 5) {
        let (next, _) = StudentService::add(
            store.current(),
            &mut ids,
            NewStudent::new(format!("Alumno {index}"), 1.0),
        );
        history.commit(&mut store, next).unwrap();
        states.push(store.snapshot());
    }
    assert_eq!(history.undo_depth(), HISTORY_LIMIT);

    while history.undo(&mut store).unwrap() {}
    assert_eq!(store.current(), &states[states.len() - 1 - HISTORY_LIMIT]);
    assert_eq!(store.current().student_db.len(), 5);
}

#[test]
fn store_falls_back_to_the_seed_for_unreadable_data() {
    let backend = MemoryStore::with_entry(storage_key(2026), b"{not json".to_vec());
    let (store, outcome) = Store::open(Box::new(backend), storage_key(2026));
    assert_eq!(outcome.source, LoadSource::Seed);
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(store.current(), &initial_state());
}

#[test]
fn store_writes_back_migrated_documents() {
    let legacy = br#"{"year": 2026, "categories": [{"id": 2, "name": "Transporte", "color": "bg-green-500", "type": "expense", "subcategories": []}], "months": [{"name": "Enero", "pianoClasses": [], "expenses": [], "incomes": []}], "studentDb": []}"#;
    let backend = Arc::new(MemoryStore::with_entry(storage_key(2026), legacy.to_vec()));
    let (store, outcome) = Store::open(Box::new(SharedStore(backend.clone())), storage_key(2026));

    assert_eq!(outcome.source, LoadSource::Persisted);
    assert!(!outcome.migrations.is_empty());
    let state = store.current();
    assert_eq!(state.categories.len(), 1);
    assert_eq!(state.categories[0].budget_band, Some(BudgetBand::Basics));
    assert_eq!(state.months.len(), 12);
    assert_eq!(state.payment_methods.len(), 3);

    let saved = backend.get(&storage_key(2026)).unwrap().unwrap();
    let saved: serde_json::Value = serde_json::from_slice(&saved).unwrap();
    assert_eq!(saved["months"][0]["savings"], serde_json::json!([]));
}

#[test]
fn store_notifies_subscribers_until_unsubscribed() {
    let mut store = memory_store();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = store.subscribe(move |state| {
        sink.lock().unwrap().push(state.student_db.len());
    });

    let mut ids = ids();
    let (next, _) = StudentService::add(store.current(), &mut ids, NewStudent::new("Ana", 1.0));
    store.commit(next).unwrap();
    assert!(store.unsubscribe(subscription));
    store.commit(initial_state()).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![1]);
}

#[test]
fn failed_writes_still_advance_the_state() {
    let (mut store, _) = Store::open(Box::new(ReadOnlyStore), storage_key(2026));
    let mut ids = ids();
    let (next, _) = StudentService::add(store.current(), &mut ids, NewStudent::new("Ana", 1.0));

    let err = store.commit(next.clone()).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert_eq!(store.current(), &next);
}

#[test]
fn load_data_normalises_the_incoming_state() {
    let mut incoming = initial_state();
    incoming.months.truncate(2);
    let loaded = YearService::load_data(&initial_state(), incoming);
    assert_eq!(loaded.months.len(), 12);
}

struct SharedStore(Arc<MemoryStore>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        self.0.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), CoreError> {
        self.0.put(key, value)
    }
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CoreError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _value: &[u8]) -> Result<(), CoreError> {
        Err(CoreError::Storage("read-only".into()))
    }
}

#[derive(Debug, Clone)]
enum Op {
    AddStudent(u16),
    ImportStudents(usize),
    AddExpense(usize, u16),
    ToggleFirstClass(usize),
    NewYear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u16..500).prop_map(Op::AddStudent),
        (0usize..12).prop_map(Op::ImportStudents),
        (0usize..12, 1u16..500).prop_map(|(month, amount)| Op::AddExpense(month, amount)),
        (0usize..12).prop_map(Op::ToggleFirstClass),
        Just(Op::NewYear),
    ]
}

fn apply(state: &AppState, ids: &mut IdGenerator, op: &Op) -> AppState {
    match op {
        Op::AddStudent(rate) => {
            StudentService::add(state, ids, NewStudent::new(format!("S{rate}"), f64::from(*rate))).0
        }
        Op::ImportStudents(month) => PianoClassService::import_students_to_month(state, ids, *month).0,
        Op::AddExpense(month, amount) => {
            TransactionService::add(
                state,
                ids,
                *month,
                TransactionKind::Expense,
                NewTransaction::new("Gasto", f64::from(*amount), date(2026, 1, 1)),
            )
            .0
        }
        Op::ToggleFirstClass(month) => match state.months[*month].piano_classes.first() {
            Some(class) => {
                PianoClassService::toggle_status(state, *month, class.id, None, date(2026, 1, 1))
            }
            None => state.clone(),
        },
        Op::NewYear => YearService::start_new_year(state),
    }
}

proptest! {
    #[test]
    fn normalisation_is_idempotent(keep in 0usize..=12, strip_bands in any::<bool>()) {
        let mut state = initial_state();
        state.months.truncate(keep);
        if strip_bands {
            for category in state.categories_mut().iter_mut() {
                category.budget_band = None;
            }
        }
        let once = normalize_state(&state);
        prop_assert_eq!(normalize_state(&once), once);
    }

    #[test]
    fn undo_then_redo_restores_every_state(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut store = memory_store();
        let mut history = HistoryManager::new();
        let mut ids = ids();
        let mut states = vec![store.snapshot()];

        for op in &ops {
            let next = apply(store.current(), &mut ids, op);
            history.commit(&mut store, next).unwrap();
            states.push(store.snapshot());
        }

        let n = ops.len();
        for k in 1..=n {
            prop_assert!(history.undo(&mut store).unwrap());
            prop_assert_eq!(store.current(), &states[n - k]);
        }
        for k in 1..=n {
            prop_assert!(history.redo(&mut store).unwrap());
            prop_assert_eq!(store.current(), &states[k]);
        }
    }
}

//! Facade that owns the store, the undo history, and id/clock sources.
//!
//! Every mutation computes the next state through an `absa_core` service and
//! commits it through the [`HistoryManager`], so each change can be undone.
//! Mutations whose result equals the current state are not recorded. The only
//! errors returned are persistence failures and rejected backups.

use std::sync::Arc;

use absa_core::{
    backup::{export_document, parse_backup},
    storage_key,
    summary_service::{self, AnnualSummary, BudgetBreakdown, FamilyTotal, MonthSummary},
    warnings::state_warnings,
    CategoryService, Clock, CoreError, HistoryManager, IdGenerator, KeyValueStore, LoadOutcome,
    MigrationReport, PaymentMethodService, PianoClassService, SavingService, ScheduleService,
    SettingsService, Store, StudentService, SubscriptionId, TransactionService, YearService,
};
use absa_domain::{
    AppState, BrandSettingsPatch, CategoryPatch, EntityId, NewCategory, NewPaymentMethod,
    NewPianoClass, NewSaving, NewScheduleEntry, NewStudent, NewTransaction, PaymentMethodPatch,
    PianoClassPatch, SavingPatch, ScheduleEntryPatch, StudentPatch, TransactionKind,
    TransactionPatch,
};
use chrono::NaiveDate;
use tracing::{debug, info};

pub struct FinanceManager {
    store: Store,
    history: HistoryManager,
    ids: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl FinanceManager {
    /// Loads the state for `year` from `backend`.
    pub fn open(
        backend: Box<dyn KeyValueStore>,
        year: i32,
        clock: Arc<dyn Clock>,
    ) -> (Self, LoadOutcome) {
        let (store, outcome) = Store::open(backend, storage_key(year));
        let mut ids = IdGenerator::new(clock.clone());
        ids.observe(store.current());
        let manager = Self {
            store,
            history: HistoryManager::new(),
            ids,
            clock,
        };
        (manager, outcome)
    }

    pub fn state(&self) -> &AppState {
        self.store.current()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&AppState) + Send + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // Roster

    pub fn add_student(&mut self, student: NewStudent) -> Result<EntityId, CoreError> {
        let (next, id) = StudentService::add(self.store.current(), &mut self.ids, student);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_student(&mut self, id: EntityId, patch: StudentPatch) -> Result<bool, CoreError> {
        let next = StudentService::update(self.state(), id, patch);
        self.apply(next)
    }

    pub fn delete_student(&mut self, id: EntityId) -> Result<bool, CoreError> {
        let next = StudentService::delete(self.state(), id);
        self.apply(next)
    }

    /// Inactive students stay in the roster but are skipped by monthly imports.
    pub fn set_student_active(&mut self, id: EntityId, active: bool) -> Result<bool, CoreError> {
        let next = StudentService::set_active(self.state(), id, active);
        self.apply(next)
    }

    // Categories and payment methods

    pub fn add_category(&mut self, category: NewCategory) -> Result<EntityId, CoreError> {
        let (next, id) = CategoryService::add(self.store.current(), &mut self.ids, category);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_category(&mut self, id: EntityId, patch: CategoryPatch) -> Result<bool, CoreError> {
        let next = CategoryService::update(self.state(), id, patch);
        self.apply(next)
    }

    pub fn delete_category(&mut self, id: EntityId) -> Result<bool, CoreError> {
        let next = CategoryService::delete(self.state(), id);
        self.apply(next)
    }

    pub fn add_subcategory(&mut self, id: EntityId, label: &str) -> Result<bool, CoreError> {
        let next = CategoryService::add_subcategory(self.state(), id, label);
        self.apply(next)
    }

    pub fn delete_subcategory(&mut self, id: EntityId, label: &str) -> Result<bool, CoreError> {
        let next = CategoryService::delete_subcategory(self.state(), id, label);
        self.apply(next)
    }

    pub fn add_payment_method(&mut self, method: NewPaymentMethod) -> Result<EntityId, CoreError> {
        let (next, id) = PaymentMethodService::add(self.store.current(), &mut self.ids, method);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_payment_method(
        &mut self,
        id: EntityId,
        patch: PaymentMethodPatch,
    ) -> Result<bool, CoreError> {
        let next = PaymentMethodService::update(self.state(), id, patch);
        self.apply(next)
    }

    pub fn delete_payment_method(&mut self, id: EntityId) -> Result<bool, CoreError> {
        let next = PaymentMethodService::delete(self.state(), id);
        self.apply(next)
    }

    // Month records

    pub fn add_transaction(
        &mut self,
        month: usize,
        kind: TransactionKind,
        transaction: NewTransaction,
    ) -> Result<Option<EntityId>, CoreError> {
        let (next, id) =
            TransactionService::add(self.store.current(), &mut self.ids, month, kind, transaction);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_transaction(
        &mut self,
        month: usize,
        kind: TransactionKind,
        id: EntityId,
        patch: TransactionPatch,
    ) -> Result<bool, CoreError> {
        let next = TransactionService::update(self.state(), month, kind, id, patch);
        self.apply(next)
    }

    pub fn delete_transaction(
        &mut self,
        month: usize,
        kind: TransactionKind,
        id: EntityId,
    ) -> Result<bool, CoreError> {
        let next = TransactionService::delete(self.state(), month, kind, id);
        self.apply(next)
    }

    /// Flips a transaction's payment status; `payment_date` defaults to today.
    pub fn toggle_transaction_status(
        &mut self,
        month: usize,
        kind: TransactionKind,
        id: EntityId,
        payment_date: Option<NaiveDate>,
    ) -> Result<bool, CoreError> {
        let today = self.today();
        let next =
            TransactionService::toggle_status(self.state(), month, kind, id, payment_date, today);
        self.apply(next)
    }

    pub fn import_from_previous_month(
        &mut self,
        month: usize,
        kind: TransactionKind,
    ) -> Result<usize, CoreError> {
        let today = self.today();
        let (next, copied) = TransactionService::import_from_previous_month(
            self.store.current(),
            &mut self.ids,
            month,
            kind,
            today,
        );
        if copied > 0 {
            info!(month, %kind, copied, "copied entries from the previous month");
            self.apply(next)?;
        }
        Ok(copied)
    }

    pub fn add_piano_class(
        &mut self,
        month: usize,
        class: NewPianoClass,
    ) -> Result<Option<EntityId>, CoreError> {
        let (next, id) = PianoClassService::add(self.store.current(), &mut self.ids, month, class);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_piano_class(
        &mut self,
        month: usize,
        id: EntityId,
        patch: PianoClassPatch,
    ) -> Result<bool, CoreError> {
        let next = PianoClassService::update(self.state(), month, id, patch);
        self.apply(next)
    }

    pub fn delete_piano_class(&mut self, month: usize, id: EntityId) -> Result<bool, CoreError> {
        let next = PianoClassService::delete(self.state(), month, id);
        self.apply(next)
    }

    /// Flips a class's payment status; `payment_date` defaults to today.
    pub fn toggle_piano_class_status(
        &mut self,
        month: usize,
        id: EntityId,
        payment_date: Option<NaiveDate>,
    ) -> Result<bool, CoreError> {
        let today = self.today();
        let next = PianoClassService::toggle_status(self.state(), month, id, payment_date, today);
        self.apply(next)
    }

    /// Bills every active student missing from `month`. Returns how many classes were created.
    pub fn import_students_to_month(&mut self, month: usize) -> Result<usize, CoreError> {
        let (next, created) =
            PianoClassService::import_students_to_month(self.store.current(), &mut self.ids, month);
        if created > 0 {
            info!(month, created, "imported students into month");
            self.apply(next)?;
        }
        Ok(created)
    }

    pub fn import_specific_students(
        &mut self,
        month: usize,
        student_ids: &[EntityId],
    ) -> Result<usize, CoreError> {
        let (next, created) = PianoClassService::import_specific_students(
            self.store.current(),
            &mut self.ids,
            month,
            student_ids,
        );
        if created > 0 {
            info!(month, created, "imported selected students into month");
            self.apply(next)?;
        }
        Ok(created)
    }

    pub fn add_saving(
        &mut self,
        month: usize,
        saving: NewSaving,
    ) -> Result<Option<EntityId>, CoreError> {
        let (next, id) = SavingService::add(self.store.current(), &mut self.ids, month, saving);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_saving(
        &mut self,
        month: usize,
        id: EntityId,
        patch: SavingPatch,
    ) -> Result<bool, CoreError> {
        let next = SavingService::update(self.state(), month, id, patch);
        self.apply(next)
    }

    pub fn delete_saving(&mut self, month: usize, id: EntityId) -> Result<bool, CoreError> {
        let next = SavingService::delete(self.state(), month, id);
        self.apply(next)
    }

    // Schedule and settings

    pub fn add_schedule_entry(&mut self, entry: NewScheduleEntry) -> Result<EntityId, CoreError> {
        let (next, id) = ScheduleService::add(self.store.current(), &mut self.ids, entry);
        self.apply(next)?;
        Ok(id)
    }

    pub fn update_schedule_entry(
        &mut self,
        id: EntityId,
        patch: ScheduleEntryPatch,
    ) -> Result<bool, CoreError> {
        let next = ScheduleService::update(self.state(), id, patch);
        self.apply(next)
    }

    pub fn delete_schedule_entry(&mut self, id: EntityId) -> Result<bool, CoreError> {
        let next = ScheduleService::delete(self.state(), id);
        self.apply(next)
    }

    pub fn update_brand_settings(&mut self, patch: BrandSettingsPatch) -> Result<bool, CoreError> {
        let next = SettingsService::update_brand_settings(self.state(), patch);
        self.apply(next)
    }

    // Whole-state operations

    /// Empties all twelve months. Export a backup first if the records matter.
    pub fn start_new_year(&mut self) -> Result<(), CoreError> {
        let next = YearService::start_new_year(self.state());
        info!(year = next.year, "started a new year");
        self.apply(next).map(|_| ())
    }

    pub fn load_data(&mut self, incoming: AppState) -> Result<(), CoreError> {
        let next = YearService::load_data(self.state(), incoming);
        self.ids.observe(&next);
        self.apply(next).map(|_| ())
    }

    /// Validates a backup document and, if accepted, replaces the whole state.
    ///
    /// Rejected documents leave the state untouched. The import itself can be undone.
    pub fn import_backup(&mut self, bytes: &[u8]) -> Result<MigrationReport, CoreError> {
        let (incoming, report) = parse_backup(bytes)?;
        info!(migrations = report.applied.len(), "backup accepted");
        self.load_data(incoming)?;
        Ok(report)
    }

    pub fn export_document(&self) -> Result<String, CoreError> {
        export_document(self.state())
    }

    // History

    pub fn undo(&mut self) -> Result<bool, CoreError> {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> Result<bool, CoreError> {
        self.history.redo(&mut self.store)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    // Reads

    pub fn month_summary(&self, month: usize) -> Option<MonthSummary> {
        self.state().month(month).map(summary_service::month_summary)
    }

    pub fn annual_summary(&self) -> AnnualSummary {
        summary_service::annual_summary(self.state())
    }

    pub fn budget_breakdown(&self, month: usize) -> Option<BudgetBreakdown> {
        summary_service::budget_breakdown(self.state(), month)
    }

    pub fn family_totals(&self, month: usize) -> Option<Vec<FamilyTotal>> {
        self.state().month(month).map(summary_service::family_totals)
    }

    pub fn warnings(&self) -> Vec<String> {
        state_warnings(self.state())
    }

    fn apply(&mut self, next: AppState) -> Result<bool, CoreError> {
        if &next == self.store.current() {
            debug!("mutation left the state unchanged");
            return Ok(false);
        }
        self.history.commit(&mut self.store, next)?;
        Ok(true)
    }
}

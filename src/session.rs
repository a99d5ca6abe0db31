//! A calculator session: the keypad state machine plus its persisted lists.
//!
//! Both lists are read once when the session opens and written back through
//! their repositories on every change.

use crate::calculator::{Calculator, Key, Notice, Outcome};
use crate::error::SessionError;
use crate::items::{CalculationEntry, RecallItem, SavedCalculation};
use crate::storage::{Record, Repository, prepend_bounded};

pub struct Session<H, S> {
    calculator: Calculator,
    history: Vec<CalculationEntry>,
    saved: Vec<SavedCalculation>,
    history_repo: H,
    saved_repo: S,
}

impl<H, S> Session<H, S>
where
    H: Repository<CalculationEntry>,
    S: Repository<SavedCalculation>,
{
    /// Open a session, loading both lists. A list that cannot be read is
    /// logged and starts empty.
    pub fn open(calculator: Calculator, history_repo: H, saved_repo: S) -> Self {
        let history = load_or_empty(&history_repo, "history");
        let saved = load_or_empty(&saved_repo, "saved calculations");
        tracing::debug!(history = history.len(), saved = saved.len(), "session opened");

        Self {
            calculator,
            history,
            saved,
            history_repo,
            saved_repo,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Calculation history, newest first.
    pub fn history(&self) -> &[CalculationEntry] {
        &self.history
    }

    /// Saved calculations, newest first.
    pub fn saved(&self) -> &[SavedCalculation] {
        &self.saved
    }

    /// Press a key, recording any completed calculation in history.
    ///
    /// A history write that fails keeps the entry in memory and reports the
    /// failure as the outcome's notice.
    pub fn press(&mut self, key: Key) -> Outcome {
        let mut outcome = self.calculator.press(key);
        if let Some(entry) = &outcome.entry {
            match self.history_repo.append(&self.history, entry.clone()) {
                Ok(history) => self.history = history,
                Err(err) => {
                    tracing::warn!(%err, expression = %entry.expression, "history not persisted");
                    self.history =
                        prepend_bounded(&self.history, entry.clone(), self.history_repo.capacity());
                    outcome.notice.get_or_insert_with(|| {
                        Notice::error("Error", format!("Could not save history: {}", err))
                    });
                }
            }
        }
        outcome
    }

    /// Press keys in order, returning every outcome.
    pub fn press_all(&mut self, keys: impl IntoIterator<Item = Key>) -> Vec<Outcome> {
        keys.into_iter().map(|key| self.press(key)).collect()
    }

    /// Save the most recent history entry under `name`.
    pub fn save_last(&mut self, name: &str) -> Result<Notice, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::BlankName);
        }
        let last = self.history.first().ok_or(SessionError::NothingToSave)?;

        let saved = SavedCalculation::from_entry(last, name);
        tracing::info!(name, expression = %saved.expression, "calculation saved");
        self.saved = self.saved_repo.append(&self.saved, saved)?;
        Ok(Notice::info(
            "Calculation Saved!",
            format!("Saved as \"{}\".", name),
        ))
    }

    pub fn delete_history(&mut self, id: &str) -> Result<Notice, SessionError> {
        ensure_present(&self.history, id)?;
        self.history = self.history_repo.remove(&self.history, id)?;
        Ok(Notice::info("History Item Deleted", id))
    }

    pub fn clear_history(&mut self) -> Result<Notice, SessionError> {
        self.history = self.history_repo.clear()?;
        Ok(Notice::info("History Cleared", ""))
    }

    pub fn delete_saved(&mut self, id: &str) -> Result<Notice, SessionError> {
        ensure_present(&self.saved, id)?;
        self.saved = self.saved_repo.remove(&self.saved, id)?;
        Ok(Notice::info("Saved Calculation Deleted", id))
    }

    /// Find an item by id, looking in history first.
    pub fn find(&self, id: &str) -> Option<RecallItem> {
        self.history
            .iter()
            .find(|entry| entry.id == id)
            .cloned()
            .map(RecallItem::from)
            .or_else(|| {
                self.saved
                    .iter()
                    .find(|saved| saved.id == id)
                    .cloned()
                    .map(RecallItem::from)
            })
    }

    /// Load a history entry or saved calculation onto the display.
    pub fn recall(&mut self, id: &str) -> Result<Outcome, SessionError> {
        let item = self
            .find(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        tracing::debug!(section = item.section_name(), id, "recalling");
        Ok(self.calculator.recall(&item.to_entry()))
    }
}

fn load_or_empty<T: Record, R: Repository<T>>(repo: &R, what: &str) -> Vec<T> {
    repo.load().unwrap_or_else(|err| {
        tracing::warn!(%err, "could not load {}, starting empty", what);
        Vec::new()
    })
}

fn ensure_present<T: Record>(items: &[T], id: &str) -> Result<(), SessionError> {
    if items.iter().any(|item| item.id() == id) {
        Ok(())
    } else {
        Err(SessionError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{Operator, parse_keys};
    use crate::error::StorageError;
    use crate::storage::{
        HISTORY_KEY, JsonRepository, KeyValueStore, MemoryStore, history_repository,
        saved_repository,
    };

    type MemorySession = Session<
        JsonRepository<MemoryStore, CalculationEntry>,
        JsonRepository<MemoryStore, SavedCalculation>,
    >;

    fn session_with_capacity(store: &MemoryStore, capacity: usize) -> MemorySession {
        Session::open(
            Calculator::new(),
            history_repository(store.clone(), capacity),
            saved_repository(store.clone(), capacity),
        )
    }

    fn session(store: &MemoryStore) -> MemorySession {
        session_with_capacity(store, 50)
    }

    fn type_keys(session: &mut MemorySession, input: &str) -> Vec<Outcome> {
        session.press_all(parse_keys(input).unwrap())
    }

    #[test]
    fn test_equals_prepends_history_and_persists() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        type_keys(&mut s, "5 + 3 =");
        type_keys(&mut s, "9 sqrt");

        assert_eq!(s.history().len(), 2);
        assert_eq!(s.history()[0].expression, "sqrt(9)");
        assert_eq!(s.history()[1].expression, "5+3");

        let reopened = session(&store);
        assert_eq!(reopened.history(), s.history());
    }

    #[test]
    fn test_failed_computations_add_nothing() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        type_keys(&mut s, "7 ÷ 0 =");
        type_keys(&mut s, "2 asin");
        assert!(s.history().is_empty());
        assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        for i in 0..60 {
            type_keys(&mut s, &format!("{} + 1 =", i));
            assert!(s.history().len() <= 50);
        }
        assert_eq!(s.history().len(), 50);
        assert_eq!(s.history()[0].expression, "59+1");
        assert_eq!(s.history()[49].expression, "10+1");
    }

    #[test]
    fn test_save_last_uses_newest_entry() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        type_keys(&mut s, "5 + 3 =");
        type_keys(&mut s, "6 × 7 =");
        // Typing after the last result does not change what gets saved.
        type_keys(&mut s, "1 2");

        let notice = s.save_last("  answer ").unwrap();
        assert_eq!(notice.message, "Saved as \"answer\".");
        assert_eq!(s.saved().len(), 1);
        assert_eq!(s.saved()[0].name, "answer");
        assert_eq!(s.saved()[0].expression, "6×7");
        assert_eq!(s.saved()[0].result, "42");

        assert_eq!(session(&store).saved(), s.saved());
    }

    #[test]
    fn test_save_last_errors() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        assert!(matches!(s.save_last("x"), Err(SessionError::NothingToSave)));
        type_keys(&mut s, "1 + 1 =");
        assert!(matches!(s.save_last("   "), Err(SessionError::BlankName)));
        assert!(s.saved().is_empty());
    }

    #[test]
    fn test_saved_capacity() {
        let store = MemoryStore::new();
        let mut s = session_with_capacity(&store, 2);
        type_keys(&mut s, "1 + 1 =");
        for name in ["a", "b", "c"] {
            s.save_last(name).unwrap();
        }
        let names: Vec<_> = s.saved().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["c", "b"]);
    }

    #[test]
    fn test_saved_survives_history_clear() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        type_keys(&mut s, "2 × 2 =");
        s.save_last("four").unwrap();
        s.clear_history().unwrap();

        assert!(s.history().is_empty());
        assert_eq!(s.saved().len(), 1);
        let reopened = session(&store);
        assert!(reopened.history().is_empty());
        assert_eq!(reopened.saved()[0].name, "four");
    }

    #[test]
    fn test_delete_items() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        type_keys(&mut s, "1 + 1 =");
        type_keys(&mut s, "2 + 2 =");
        let id = s.history()[1].id.clone();

        s.delete_history(&id).unwrap();
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history()[0].expression, "2+2");
        assert!(matches!(
            s.delete_history(&id),
            Err(SessionError::NotFound(_))
        ));

        s.save_last("four").unwrap();
        let saved_id = s.saved()[0].id.clone();
        s.delete_saved(&saved_id).unwrap();
        assert!(s.saved().is_empty());
        assert!(session(&store).saved().is_empty());
    }

    #[test]
    fn test_recall_from_either_list() {
        let store = MemoryStore::new();
        let mut s = session(&store);
        type_keys(&mut s, "5 + 3 =");
        let history_id = s.history()[0].id.clone();
        s.save_last("eight").unwrap();
        let saved_id = s.saved()[0].id.clone();
        type_keys(&mut s, "AC");

        s.recall(&history_id).unwrap();
        assert_eq!(s.calculator().display_value(), "8");
        assert_eq!(s.calculator().expression(), "5+3");

        type_keys(&mut s, "AC");
        let outcome = s.recall(&saved_id).unwrap();
        assert_eq!(outcome.notice.unwrap().message, "Expression: 5+3");
        assert!(s.calculator().is_result_displayed());
        assert_eq!(s.calculator().operator(), None::<Operator>);

        // Equals straight after a recall records nothing.
        type_keys(&mut s, "=");
        assert_eq!(s.history().len(), 1);

        assert!(matches!(s.recall("nope"), Err(SessionError::NotFound(_))));
    }

    /// History repository whose writes always fail.
    struct ReadOnlyHistory;

    impl Repository<CalculationEntry> for ReadOnlyHistory {
        fn load(&self) -> Result<Vec<CalculationEntry>, StorageError> {
            Ok(Vec::new())
        }

        fn save(&self, _items: &[CalculationEntry]) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: HISTORY_KEY.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn capacity(&self) -> usize {
            50
        }
    }

    #[test]
    fn test_failed_history_write_keeps_outcome() {
        let mut s = Session::open(
            Calculator::new(),
            ReadOnlyHistory,
            saved_repository(MemoryStore::new(), 50),
        );
        let outcomes = s.press_all(parse_keys("5 + 3 =").unwrap());
        let last = outcomes.last().unwrap();

        assert_eq!(last.entry.as_ref().unwrap().expression, "5+3");
        let notice = last.notice.as_ref().unwrap();
        assert!(notice.is_error());
        assert!(notice.message.starts_with("Could not save history"));
        assert_eq!(s.calculator().display_value(), "8");
        assert_eq!(s.history().len(), 1);

        // The in-memory entry can still be saved by name.
        s.save_last("eight").unwrap();
        assert_eq!(s.saved()[0].result, "8");
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let store = MemoryStore::new();
        store.put(HISTORY_KEY, "not json").unwrap();
        let mut s = session(&store);
        assert!(s.history().is_empty());
        type_keys(&mut s, "1 + 2 =");
        assert_eq!(session(&store).history().len(), 1);
    }
}

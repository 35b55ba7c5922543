use chrono::{NaiveDate, Utc};

use crate::config::Config;
use crate::error::JournalError;
use crate::models::{Challenge, Settings, Trade, TradeInput, WeeklyReport};
use crate::session::{Session, SettingsInput};
use crate::store::{load_or_default, SessionStore};

/// Application shell: one session, one store. Every action runs to
/// completion in memory, then the whole session is saved.
///
/// A save failure is returned to the caller after the in-memory change
/// has already happened; that action is lost if the process exits.
pub struct Journal<S: SessionStore> {
    session: Session,
    store: S,
    cfg: Config,
}

impl<S: SessionStore> Journal<S> {
    pub fn open(store: S, cfg: Config) -> Self {
        let session = load_or_default(&store, &cfg);
        Self {
            session,
            store,
            cfg,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) -> Result<(), JournalError> {
        self.store.save(&self.session)?;
        Ok(())
    }

    /// Starts a week containing `date`, or today in the configured zone.
    pub fn start_challenge(
        &mut self,
        strategy: &str,
        pair: &str,
        date: Option<NaiveDate>,
    ) -> Result<Option<Challenge>, JournalError> {
        let date = date.unwrap_or_else(|| self.cfg.today());
        let started = self.session.start_challenge(strategy, pair, date).cloned();
        self.persist()?;
        Ok(started)
    }

    pub fn record_trade(&mut self, input: &TradeInput) -> Result<Option<Trade>, JournalError> {
        let trade = self.session.record_trade(input, Utc::now())?;
        self.persist()?;
        Ok(trade)
    }

    pub fn advance_day(&mut self) -> Result<Option<usize>, JournalError> {
        let day = self.session.advance_day();
        self.persist()?;
        Ok(day)
    }

    pub fn mark_no_trade(&mut self) -> Result<bool, JournalError> {
        let marked = self.session.mark_no_trade();
        self.persist()?;
        Ok(marked)
    }

    pub fn end_week(&mut self) -> Result<Option<WeeklyReport>, JournalError> {
        let report = self.session.end_week(Utc::now()).cloned();
        self.persist()?;
        Ok(report)
    }

    pub fn save_settings(
        &mut self,
        input: &SettingsInput,
        reset_account: bool,
    ) -> Result<Settings, JournalError> {
        let settings = self.session.save_settings(input, reset_account).clone();
        self.persist()?;
        Ok(settings)
    }
}

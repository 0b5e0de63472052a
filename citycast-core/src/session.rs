//! Search-as-you-type session.
//!
//! [`transition`] is a pure reducer over [`SearchState`]; it never touches
//! timers or the network and only returns [`Effect`]s. [`SearchSession`]
//! owns one debounce timer task and one lookup task, executes the effects
//! and feeds completions back through the reducer.
//!
//! Every query change bumps a request token. Timer and lookup completions
//! carry the token they were issued with and are discarded when it no
//! longer matches, so a slow response for an old query can never replace
//! suggestions for a newer one.

use std::sync::Arc;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Duration, sleep},
};
use tracing::{debug, trace};

use crate::{
    Failure,
    config::SearchSettings,
    model::CityCandidate,
    suggest::{CityLookup, CitySuggester},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<CityCandidate>,
    pub show_suggestions: bool,
    /// A lookup for the current query is in flight.
    pub loading: bool,
    /// Non-blocking indicator for the last failed lookup.
    pub suggestion_error: Option<Failure>,
    token: u64,
}

impl SearchState {
    /// Token of the most recent query change.
    pub fn token(&self) -> u64 {
        self.token
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    QueryChanged(String),
    DebounceElapsed { token: u64 },
    SuggestionsLoaded { token: u64, result: Result<Vec<CityCandidate>, Failure> },
    SuggestionSelected(CityCandidate),
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Abort the pending debounce timer and any in-flight lookup.
    CancelPending,
    StartDebounce { token: u64 },
    Lookup { token: u64, query: String },
}

pub fn transition(
    mut state: SearchState,
    event: SearchEvent,
    settings: &SearchSettings,
) -> (SearchState, Vec<Effect>) {
    match event {
        SearchEvent::QueryChanged(query) => {
            state.token += 1;
            state.loading = false;
            let long_enough = query.trim().chars().count() >= settings.min_query_chars;
            state.query = query;

            let mut effects = vec![Effect::CancelPending];
            if long_enough {
                effects.push(Effect::StartDebounce { token: state.token });
            } else {
                hide_suggestions(&mut state);
            }
            (state, effects)
        }

        SearchEvent::DebounceElapsed { token } if token == state.token => {
            state.loading = true;
            let query = state.query.trim().to_string();
            (state, vec![Effect::Lookup { token, query }])
        }

        SearchEvent::SuggestionsLoaded { token, result } if token == state.token => {
            state.loading = false;
            match result {
                Ok(cities) => {
                    state.show_suggestions = !cities.is_empty();
                    state.suggestions = cities;
                    state.suggestion_error = None;
                }
                Err(err) => {
                    hide_suggestions(&mut state);
                    state.suggestion_error = Some(err);
                }
            }
            (state, Vec::new())
        }

        SearchEvent::DebounceElapsed { token } | SearchEvent::SuggestionsLoaded { token, .. } => {
            trace!(stale = token, current = state.token, "discarding stale completion");
            (state, Vec::new())
        }

        SearchEvent::SuggestionSelected(city) => {
            state.token += 1;
            state.loading = false;
            state.query = city.name;
            hide_suggestions(&mut state);
            (state, vec![Effect::CancelPending])
        }

        SearchEvent::Cleared => {
            state.token += 1;
            state.loading = false;
            state.query.clear();
            hide_suggestions(&mut state);
            (state, vec![Effect::CancelPending])
        }
    }
}

fn hide_suggestions(state: &mut SearchState) {
    state.suggestions.clear();
    state.show_suggestions = false;
    state.suggestion_error = None;
}

/// Per-session driver. Sessions share nothing, so several can run side by side.
#[derive(Debug)]
pub struct SearchSession<L: CityLookup + 'static> {
    suggester: Arc<CitySuggester<L>>,
    settings: SearchSettings,
    state: SearchState,
    events_tx: mpsc::UnboundedSender<SearchEvent>,
    events_rx: mpsc::UnboundedReceiver<SearchEvent>,
    timer: Option<JoinHandle<()>>,
    lookup: Option<JoinHandle<()>>,
}

impl<L: CityLookup + 'static> SearchSession<L> {
    pub fn new(suggester: CitySuggester<L>, settings: SearchSettings) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            suggester: Arc::new(suggester),
            settings,
            state: SearchState::default(),
            events_tx,
            events_rx,
            timer: None,
            lookup: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// The text field changed.
    pub fn input(&mut self, text: impl Into<String>) {
        self.apply(SearchEvent::QueryChanged(text.into()));
    }

    /// A suggestion was picked. Returns the query to search weather for.
    pub fn select(&mut self, city: CityCandidate) -> String {
        self.apply(SearchEvent::SuggestionSelected(city));
        self.state.query.clone()
    }

    pub fn clear(&mut self) {
        self.apply(SearchEvent::Cleared);
    }

    /// A debounce timer or lookup for the current query has not completed yet.
    pub fn has_pending(&self) -> bool {
        self.timer.is_some() || self.lookup.is_some()
    }

    /// Waits for the next timer or lookup completion and applies it.
    /// Returns `None` when nothing is pending.
    pub async fn next_update(&mut self) -> Option<&SearchState> {
        if !self.has_pending() {
            return None;
        }
        let event = self.events_rx.recv().await?;
        self.apply(event);
        Some(&self.state)
    }

    /// Drives the session until the current query has its suggestions (or
    /// needs none).
    pub async fn settle(&mut self) -> &SearchState {
        while self.next_update().await.is_some() {}
        &self.state
    }

    fn apply(&mut self, event: SearchEvent) {
        match &event {
            SearchEvent::DebounceElapsed { token } if *token == self.state.token => {
                self.timer = None;
            }
            SearchEvent::SuggestionsLoaded { token, .. } if *token == self.state.token => {
                self.lookup = None;
            }
            _ => {}
        }

        let state = std::mem::take(&mut self.state);
        let (state, effects) = transition(state, event, &self.settings);
        self.state = state;

        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::CancelPending => self.cancel_pending(),
            Effect::StartDebounce { token } => {
                let delay: Duration = self.settings.debounce();
                let tx = self.events_tx.clone();
                self.timer = Some(tokio::spawn(async move {
                    sleep(delay).await;
                    let _ = tx.send(SearchEvent::DebounceElapsed { token });
                }));
            }
            Effect::Lookup { token, query } => {
                debug!(token, query = %query, "dispatching suggestion lookup");
                let suggester = Arc::clone(&self.suggester);
                let tx = self.events_tx.clone();
                self.lookup = Some(tokio::spawn(async move {
                    let result = suggester.suggest(&query).await;
                    let _ = tx.send(SearchEvent::SuggestionsLoaded { token, result });
                }));
            }
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(lookup) = self.lookup.take() {
            lookup.abort();
        }
    }
}

impl<L: CityLookup + 'static> Drop for SearchSession<L> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::suggest::fakes::{RecordingLookup, city};

    fn settings() -> SearchSettings {
        SearchSettings::default()
    }

    fn session(lookup: Arc<RecordingLookup>) -> SearchSession<Arc<RecordingLookup>> {
        SearchSession::new(CitySuggester::new(lookup, &settings()), settings())
    }

    // Pure reducer.

    #[test]
    fn query_change_cancels_then_schedules() {
        let (state, effects) =
            transition(SearchState::default(), SearchEvent::QueryChanged("Lo".into()), &settings());

        assert_eq!(state.token(), 1);
        assert_eq!(effects, vec![Effect::CancelPending, Effect::StartDebounce { token: 1 }]);
    }

    #[test]
    fn short_query_clears_without_scheduling() {
        let mut state = SearchState::default();
        state.suggestions = vec![city(1, "London")];
        state.show_suggestions = true;

        let (state, effects) = transition(state, SearchEvent::QueryChanged("L".into()), &settings());

        assert_eq!(effects, vec![Effect::CancelPending]);
        assert!(state.suggestions.is_empty());
        assert!(!state.show_suggestions);
    }

    #[test]
    fn elapsed_timer_for_current_token_requests_lookup() {
        let (state, _) =
            transition(SearchState::default(), SearchEvent::QueryChanged(" Paris ".into()), &settings());
        let (state, effects) =
            transition(state, SearchEvent::DebounceElapsed { token: 1 }, &settings());

        assert!(state.loading);
        assert_eq!(effects, vec![Effect::Lookup { token: 1, query: "Paris".into() }]);
    }

    #[test]
    fn stale_timer_and_response_are_discarded() {
        let (state, _) =
            transition(SearchState::default(), SearchEvent::QueryChanged("Lon".into()), &settings());
        let (state, _) = transition(state, SearchEvent::QueryChanged("Lond".into()), &settings());
        let before = state.clone();

        let (state, effects) =
            transition(state, SearchEvent::DebounceElapsed { token: 1 }, &settings());
        assert!(effects.is_empty());
        assert_eq!(state, before);

        let (state, effects) = transition(
            state,
            SearchEvent::SuggestionsLoaded { token: 1, result: Ok(vec![city(1, "Lonavla")]) },
            &settings(),
        );
        assert!(effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn older_response_after_newer_one_is_ignored() {
        let (state, _) =
            transition(SearchState::default(), SearchEvent::QueryChanged("Par".into()), &settings());
        let (state, _) = transition(state, SearchEvent::QueryChanged("Pari".into()), &settings());
        let (state, _) = transition(
            state,
            SearchEvent::SuggestionsLoaded { token: 2, result: Ok(vec![city(7, "Paris")]) },
            &settings(),
        );
        let (state, _) = transition(
            state,
            SearchEvent::SuggestionsLoaded { token: 1, result: Ok(vec![city(8, "Parma")]) },
            &settings(),
        );

        assert_eq!(state.suggestions, vec![city(7, "Paris")]);
        assert!(state.show_suggestions);
    }

    #[test]
    fn failed_lookup_degrades_to_empty_list_with_indicator() {
        let (state, _) =
            transition(SearchState::default(), SearchEvent::QueryChanged("Par".into()), &settings());
        let (state, _) = transition(
            state,
            SearchEvent::SuggestionsLoaded { token: 1, result: Err(Failure::network("down")) },
            &settings(),
        );

        assert!(state.suggestions.is_empty());
        assert!(!state.show_suggestions);
        assert!(!state.loading);
        assert_eq!(state.suggestion_error, Some(Failure::network("down")));
    }

    #[test]
    fn selection_sets_query_and_invalidates_pending_work() {
        let (state, _) =
            transition(SearchState::default(), SearchEvent::QueryChanged("Lon".into()), &settings());
        let (state, effects) = transition(
            state,
            SearchEvent::SuggestionSelected(city(2643743, "London")),
            &settings(),
        );

        assert_eq!(state.query, "London");
        assert_eq!(state.token(), 2);
        assert_eq!(effects, vec![Effect::CancelPending]);
        assert!(state.suggestions.is_empty());
    }

    // Driver with virtual time.

    #[tokio::test(start_paused = true)]
    async fn two_characters_issue_one_call_after_quiet_period() {
        let lookup = Arc::new(RecordingLookup::default());
        let mut session = session(lookup.clone());

        session.input("ab");
        sleep(Duration::from_millis(299)).await;
        assert!(lookup.calls().is_empty());

        let state = session.settle().await;
        assert_eq!(state.suggestions.len(), 5);
        assert_eq!(lookup.calls(), vec!["ab".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn one_character_never_calls() {
        let lookup = Arc::new(RecordingLookup::default());
        let mut session = session(lookup.clone());

        session.input("a");
        assert!(!session.has_pending());
        sleep(Duration::from_secs(1)).await;
        session.settle().await;

        assert!(lookup.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fast_typing_sends_only_the_last_query() {
        let lookup = Arc::new(RecordingLookup::default());
        let mut session = session(lookup.clone());

        for text in ["Lond", "Londo", "London"] {
            session.input(text);
            sleep(Duration::from_millis(200)).await;
        }
        let state = session.settle().await;

        assert_eq!(lookup.calls(), vec!["London".to_string()]);
        assert_eq!(state.suggestions[0].name, "London0");
    }

    #[tokio::test(start_paused = true)]
    async fn pauses_longer_than_debounce_send_each_query() {
        let lookup = Arc::new(RecordingLookup::default());
        let mut session = session(lookup.clone());

        session.input("Par");
        session.settle().await;
        session.input("Paris");
        session.settle().await;

        assert_eq!(lookup.calls(), vec!["Par".to_string(), "Paris".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_cancels_pending_lookup() {
        let lookup = Arc::new(RecordingLookup::default());
        let mut session = session(lookup.clone());

        session.input("Berlin");
        session.clear();
        sleep(Duration::from_secs(1)).await;
        session.settle().await;

        assert!(lookup.calls().is_empty());
        assert_eq!(session.state().query, "");
    }

    #[derive(Debug, Default)]
    struct SlowLookup {
        delays: HashMap<String, Duration>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CityLookup for SlowLookup {
        async fn search_cities(&self, query: &str, _limit: u8) -> Result<Vec<CityCandidate>, Failure> {
            self.calls.lock().unwrap().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                sleep(*delay).await;
            }
            Ok(vec![city(1, query)])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_lookup_for_superseded_query_never_lands() {
        let lookup = Arc::new(SlowLookup {
            delays: HashMap::from([("Mos".to_string(), Duration::from_secs(5))]),
            ..Default::default()
        });
        let mut session = SearchSession::new(CitySuggester::new(lookup.clone(), &settings()), settings());

        session.input("Mos");
        sleep(Duration::from_millis(350)).await;
        session.next_update().await;
        assert!(session.state().loading);
        // let the lookup task start
        sleep(Duration::from_millis(10)).await;

        session.input("Moscow");
        let state = session.settle().await;
        assert_eq!(state.suggestions, vec![city(1, "Moscow")]);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(session.state().suggestions, vec![city(1, "Moscow")]);
        assert_eq!(*lookup.calls.lock().unwrap(), vec!["Mos".to_string(), "Moscow".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_are_independent() {
        let lookup = Arc::new(RecordingLookup::default());
        let mut first = session(lookup.clone());
        let mut second = session(lookup.clone());

        first.input("Rome");
        second.input("Oslo");
        first.settle().await;
        second.settle().await;

        let mut calls = lookup.calls();
        calls.sort();
        assert_eq!(calls, vec!["Oslo".to_string(), "Rome".to_string()]);
        assert_eq!(first.state().suggestions[0].name, "Rome0");
        assert_eq!(second.state().suggestions[0].name, "Oslo0");
    }
}
